/// 인증 게이트웨이
/// 자격 증명 발급은 별도의 인증 서비스가 담당한다고 가정
/// 본 서비스는 Bearer 토큰 검증만 수행한다
// region:    --- Imports
use crate::error::ServiceError;
use async_trait::async_trait;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

// endregion: --- Imports

// region:    --- Claims
/// 토큰에 담기는 사용자 클레임
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// 사용자 id
    pub sub: String,
    /// 만료 시각 (unix epoch 초)
    pub exp: usize,
}
// endregion: --- Claims

// region:    --- Auth Gateway Trait
/// 인증 게이트웨이 트레이트
#[async_trait]
pub trait AuthGateway {
    /// Bearer 토큰을 검증하고 사용자 id 를 반환한다
    async fn verify_credential(&self, token: &str) -> Result<i64, ServiceError>;
}

/// JWT 기반 인증 게이트웨이 구현체
pub struct JwtAuthGateway {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuthGateway {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

/// 인증 게이트웨이 구현체 메서드 구현
#[async_trait]
impl AuthGateway for JwtAuthGateway {
    async fn verify_credential(&self, token: &str) -> Result<i64, ServiceError> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| ServiceError::Unauthorized("유효하지 않은 인증 토큰입니다.".to_string()))?;

        decoded
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| ServiceError::Unauthorized("유효하지 않은 인증 토큰입니다.".to_string()))
    }
}
// endregion: --- Auth Gateway Trait

// region:    --- Helpers
/// Authorization 헤더에서 Bearer 토큰을 추출한다
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ServiceError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ServiceError::Unauthorized("인증 토큰이 없습니다.".to_string()))
}

/// 요청 헤더에서 인증된 사용자 id 를 얻는다
pub async fn authenticate(
    gateway: &impl AuthGateway,
    headers: &HeaderMap,
) -> Result<i64, ServiceError> {
    let token = bearer_token(headers)?;
    gateway.verify_credential(token).await
}

/// 자격 증명 발급 (외부 인증 서비스와 같은 형식, 테스트 용도)
pub fn issue_credential(secret: &str, user_id: i64, ttl_secs: i64) -> Result<String, ServiceError> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::seconds(ttl_secs)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ServiceError::Internal(format!("issueCredential: {}", e)))
}
// endregion: --- Helpers

// endregion: --- Tests
