/// 서비스 오류 분류
/// 검증 오류는 즉시 반환하고 재시도하지 않는다
/// 영속성 오류는 상세 내용을 서버 로그에만 남기고 일반 메시지로 응답한다
// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

// endregion: --- Imports

// region:    --- Service Error
#[derive(Debug, Error)]
pub enum ServiceError {
    /// 경매를 찾을 수 없음
    #[error("{0}")]
    NotFound(String),

    /// 현재 경매 상태에서 허용되지 않는 동작
    #[error("{0}")]
    InvalidState(String),

    /// 권한 없음 (소유자가 아니거나, 본인 경매에 입찰)
    #[error("{0}")]
    Forbidden(String),

    /// 입찰 금액이 현재 가격 이하
    #[error("{0}")]
    InvalidBid(String),

    /// 잘못된 요청 본문 (등록 시점 검증 실패)
    #[error("{0}")]
    InvalidRequest(String),

    /// 인증 토큰 없음/만료/위조
    #[error("{0}")]
    Unauthorized(String),

    /// 영속성 계층 오류 또는 예기치 못한 오류
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// 클라이언트에 내려가는 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::InvalidState(_) => "INVALID_STATE",
            ServiceError::Forbidden(_) => "FORBIDDEN",
            ServiceError::InvalidBid(_) => "LOW_BID",
            ServiceError::InvalidRequest(_) => "INVALID_REQUEST",
            ServiceError::Unauthorized(_) => "UNAUTHORIZED",
            ServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP 상태 코드 매핑
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidState(_) => StatusCode::BAD_REQUEST,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::InvalidBid(_) => StatusCode::BAD_REQUEST,
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = match &self {
            // 내부 오류는 상세 내용을 로그로만 남긴다
            ServiceError::Internal(detail) => {
                error!("{:<12} --> 내부 오류: {}", "Error", detail);
                serde_json::json!({
                    "error": "서버 오류가 발생했습니다.",
                    "code": self.code()
                })
            }
            other => serde_json::json!({
                "error": other.to_string(),
                "code": self.code()
            }),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => {
                ServiceError::NotFound("경매를 찾을 수 없습니다.".to_string())
            }
            other => ServiceError::Internal(other.to_string()),
        }
    }
}
// endregion: --- Service Error
