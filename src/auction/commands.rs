/// 경매 등록 관련 커맨드 처리
/// 1. 등록
/// 2. 수정
/// 3. 삭제
// region:    --- Imports
use crate::auction::model::Listing;
use crate::database::DatabaseManager;
use crate::error::ServiceError;
use crate::query;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

// endregion: --- Imports

// region:    --- Commands
/// 경매 등록 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateListingCommand {
    pub title: String,
    pub description: String,
    pub start_price: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub image: String,
}

/// 경매 수정 명령 (생략한 필드는 기존 값 유지)
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UpdateListingCommand {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_price: Option<i64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// 등록 시점 검증: 시작가와 경매 기간
fn validate_listing_fields(
    start_price: i64,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<(), ServiceError> {
    if start_price <= 0 {
        return Err(ServiceError::InvalidRequest(
            "시작가는 0보다 커야 합니다.".to_string(),
        ));
    }
    if start_time >= end_time {
        return Err(ServiceError::InvalidRequest(
            "경매 시작 시간은 종료 시간보다 빨라야 합니다.".to_string(),
        ));
    }
    Ok(())
}

/// 1. 등록
/// 항상 pending 상태로 시작하고 현재가는 시작가로 초기화된다
pub async fn handle_create_listing(
    db_manager: &DatabaseManager,
    seller_id: i64,
    cmd: CreateListingCommand,
) -> Result<Listing, ServiceError> {
    info!(
        "{:<12} --> 경매 등록 처리 시작: seller={}, title={:?}",
        "Command", seller_id, cmd.title
    );

    validate_listing_fields(cmd.start_price, cmd.start_time, cmd.end_time)?;

    let listing = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Listing>(
                    "INSERT INTO listings
                        (title, description, image, start_price, current_bid,
                         start_time, end_time, seller, status)
                     VALUES ($1, $2, $3, $4, $4, $5, $6, $7, 'pending')
                     RETURNING *",
                )
                .bind(&cmd.title)
                .bind(&cmd.description)
                .bind(&cmd.image)
                .bind(cmd.start_price)
                .bind(cmd.start_time)
                .bind(cmd.end_time)
                .bind(seller_id)
                .fetch_one(&mut **tx)
                .await
            })
        })
        .await
        .map_err(|e: sqlx::Error| {
            ServiceError::Internal(format!("createListing seller={}: {}", seller_id, e))
        })?;

    info!(
        "{:<12} --> 경매 등록 완료: id={}, seller={}",
        "Command", listing.id, seller_id
    );
    Ok(listing)
}

/// 2. 수정
/// 판매자 본인만 가능하다
/// 진행 중이거나 종료된 경매의 수정도 허용한다 (원 동작 유지)
pub async fn handle_update_listing(
    db_manager: &DatabaseManager,
    listing_id: i64,
    caller_id: i64,
    cmd: UpdateListingCommand,
) -> Result<Listing, ServiceError> {
    info!(
        "{:<12} --> 경매 수정 처리 시작: id={}, caller={}",
        "Command", listing_id, caller_id
    );

    let listing = query::handlers::get_listing(db_manager, listing_id).await?;

    if listing.seller != caller_id {
        return Err(ServiceError::Forbidden(
            "본인이 등록한 경매만 수정할 수 있습니다.".to_string(),
        ));
    }

    // 수정 후 값 기준으로 등록 시점과 동일한 검증을 수행한다
    let start_price = cmd.start_price.unwrap_or(listing.start_price);
    let start_time = cmd.start_time.unwrap_or(listing.start_time);
    let end_time = cmd.end_time.unwrap_or(listing.end_time);
    validate_listing_fields(start_price, start_time, end_time)?;

    // 조회와 갱신 사이에 삭제되면 RowNotFound 가 NotFound 로 변환된다
    let updated = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Listing>(
                    "UPDATE listings
                     SET title = COALESCE($1, title),
                         description = COALESCE($2, description),
                         start_price = $3,
                         start_time = $4,
                         end_time = $5,
                         updated_at = $6
                     WHERE id = $7
                     RETURNING *",
                )
                .bind(&cmd.title)
                .bind(&cmd.description)
                .bind(start_price)
                .bind(start_time)
                .bind(end_time)
                .bind(Utc::now())
                .bind(listing_id)
                .fetch_one(&mut **tx)
                .await
                .map_err(ServiceError::from)
            })
        })
        .await?;

    Ok(updated)
}

/// 3. 삭제
/// 판매자 본인만 가능하다 (입찰 기록은 함께 삭제된다)
pub async fn handle_delete_listing(
    db_manager: &DatabaseManager,
    listing_id: i64,
    caller_id: i64,
) -> Result<(), ServiceError> {
    info!(
        "{:<12} --> 경매 삭제 처리 시작: id={}, caller={}",
        "Command", listing_id, caller_id
    );

    let listing = query::handlers::get_listing(db_manager, listing_id).await?;

    if listing.seller != caller_id {
        return Err(ServiceError::Forbidden(
            "본인이 등록한 경매만 삭제할 수 있습니다.".to_string(),
        ));
    }

    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query("DELETE FROM listings WHERE id = $1")
                    .bind(listing_id)
                    .execute(&mut **tx)
                    .await
            })
        })
        .await
        .map_err(|e: sqlx::Error| {
            ServiceError::Internal(format!("deleteListing id={}: {}", listing_id, e))
        })?;

    info!("{:<12} --> 경매 삭제 완료: id={}", "Command", listing_id);
    Ok(())
}
// endregion: --- Commands

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    /// 시작가가 0 이하이면 등록이 거부된다
    #[test]
    fn test_rejects_non_positive_start_price() {
        let now = Utc::now();
        let err = validate_listing_fields(0, now, now + Duration::hours(1)).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRequest(_)));
        let err = validate_listing_fields(-100, now, now + Duration::hours(1)).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRequest(_)));
    }

    /// 시작 시간이 종료 시간보다 늦거나 같으면 등록이 거부된다
    #[test]
    fn test_rejects_inverted_auction_window() {
        let now = Utc::now();
        let err = validate_listing_fields(100, now, now).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRequest(_)));
        let err = validate_listing_fields(100, now + Duration::hours(1), now).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRequest(_)));
    }

    /// 정상 범위의 값은 통과한다
    #[test]
    fn test_accepts_valid_fields() {
        let now = Utc::now();
        assert!(validate_listing_fields(100, now, now + Duration::hours(1)).is_ok());
    }
}
// endregion: --- Tests
