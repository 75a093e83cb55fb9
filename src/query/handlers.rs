// region:    --- Imports
use super::queries;
use crate::auction::model::{Listing, ListingStatus, ListingView};
use crate::bidding::model::Bid;
use crate::database::DatabaseManager;
use crate::error::ServiceError;
use tracing::info;

// endregion: --- Imports

// region:    --- Sort Order
/// 목록 상태 우선순위: 진행 중 > 대기 > 종료
fn status_rank(status: ListingStatus) -> u8 {
    match status {
        ListingStatus::Active => 1,
        ListingStatus::Pending => 2,
        ListingStatus::Ended => 3,
    }
}

/// 목록 정렬: 상태 우선순위 오름차순, 같은 상태 안에서는 등록일 내림차순
pub fn sort_listings(listings: &mut [ListingView]) {
    listings.sort_by(|a, b| {
        status_rank(a.listing.status)
            .cmp(&status_rank(b.listing.status))
            .then_with(|| b.listing.created_at.cmp(&a.listing.created_at))
    });
}
// endregion: --- Sort Order

// region:    --- Query Handlers
/// 모든 경매 조회
pub async fn get_all_listings(
    db_manager: &DatabaseManager,
) -> Result<Vec<ListingView>, ServiceError> {
    info!("{:<12} --> 모든 경매 조회", "Query");
    let mut listings = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, ListingView>(queries::GET_ALL_LISTINGS)
                    .fetch_all(&mut **tx)
                    .await
            })
        })
        .await
        .map_err(|e: sqlx::Error| ServiceError::Internal(format!("listListings: {}", e)))?;

    sort_listings(&mut listings);
    Ok(listings)
}

/// 경매 단건 조회 (이름 조인 포함)
pub async fn get_listing_view(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<ListingView, ServiceError> {
    info!("{:<12} --> 경매 조회 id: {}", "Query", listing_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, ListingView>(queries::GET_LISTING_VIEW)
                    .bind(listing_id)
                    .fetch_optional(&mut **tx)
                    .await
            })
        })
        .await
        .map_err(|e: sqlx::Error| {
            ServiceError::Internal(format!("getListing id={}: {}", listing_id, e))
        })?
        .ok_or_else(|| ServiceError::NotFound("경매를 찾을 수 없습니다.".to_string()))
}

/// 경매 스냅샷 조회 (커맨드 검증용, 이름 조인 없음)
pub async fn get_listing(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Listing, ServiceError> {
    info!("{:<12} --> 경매 스냅샷 조회 id: {}", "Query", listing_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Listing>(queries::GET_LISTING)
                    .bind(listing_id)
                    .fetch_optional(&mut **tx)
                    .await
            })
        })
        .await
        .map_err(|e: sqlx::Error| {
            ServiceError::Internal(format!("getListing id={}: {}", listing_id, e))
        })?
        .ok_or_else(|| ServiceError::NotFound("경매를 찾을 수 없습니다.".to_string()))
}

/// 입찰 이력 조회 (최신순)
pub async fn get_bid_history(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Vec<Bid>, ServiceError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", listing_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Bid>(queries::GET_BID_HISTORY)
                    .bind(listing_id)
                    .fetch_all(&mut **tx)
                    .await
            })
        })
        .await
        .map_err(|e: sqlx::Error| {
            ServiceError::Internal(format!("getBidHistory id={}: {}", listing_id, e))
        })
}
// endregion: --- Query Handlers

// endregion: --- Tests
