/// 입찰 관련 커맨드 처리
/// 검증을 통과한 입찰은 입찰 기록 추가와 경매 현재가 갱신을
/// 한 트랜잭션으로 묶어 반영한다
// region:    --- Imports
use crate::auction::model::{Listing, ListingStatus};
use crate::database::DatabaseManager;
use crate::error::ServiceError;
use crate::query;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령 (경매 id 는 경로에서, 입찰자 id 는 인증 토큰에서 얻는다)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub amount: i64,
}

// 동시 입찰 경합 시 최대 재시도 횟수
const MAX_RETRIES: i32 = 100;

/// 입찰 검증: 조건을 순서대로 검사하고 첫 실패를 그대로 반환한다
/// 1. 진행 중인 경매인가
/// 2. 판매자 본인의 입찰이 아닌가
/// 3. 입찰 금액이 현재가보다 높은가
pub fn validate_bid(listing: &Listing, bidder_id: i64, amount: i64) -> Result<(), ServiceError> {
    if listing.status != ListingStatus::Active {
        return Err(ServiceError::InvalidState(
            "진행 중인 경매가 아닙니다.".to_string(),
        ));
    }
    if listing.seller == bidder_id {
        return Err(ServiceError::Forbidden(
            "본인이 등록한 경매에는 입찰할 수 없습니다.".to_string(),
        ));
    }
    if amount <= listing.current_bid {
        return Err(ServiceError::InvalidBid(format!(
            "입찰 금액은 현재 가격 {}보다 높아야 합니다.",
            listing.current_bid
        )));
    }
    Ok(())
}

/// 입찰 처리
/// 현재가 갱신은 관측한 값을 조건으로 하는 조건부 UPDATE 로 수행하고,
/// 갱신에 실패하면(다른 입찰이 먼저 반영됨) 스냅샷을 다시 읽어 재검증 후 재시도한다
pub async fn handle_place_bid(
    db_manager: &DatabaseManager,
    listing_id: i64,
    bidder_id: i64,
    amount: i64,
) -> Result<Listing, ServiceError> {
    info!(
        "{:<12} --> 입찰 요청 처리 시작: listing={}, bidder={}, amount={}",
        "Command", listing_id, bidder_id, amount
    );

    let mut retries = 0;
    while retries < MAX_RETRIES {
        // 현재 경매 스냅샷 조회 (없으면 NotFound)
        let listing = query::handlers::get_listing(db_manager, listing_id).await?;

        // 검증 순서가 곧 응답 우선순위다
        validate_bid(&listing, bidder_id, amount)?;

        // 입찰 기록 추가 + 현재가/최고 입찰자 갱신을 한 트랜잭션으로 수행
        let updated = db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    let updated = sqlx::query_as::<_, Listing>(
                        "UPDATE listings
                         SET current_bid = $1, highest_bidder = $2, updated_at = now()
                         WHERE id = $3 AND status = $4 AND current_bid < $1
                         RETURNING *",
                    )
                    .bind(amount)
                    .bind(bidder_id)
                    .bind(listing_id)
                    .bind(ListingStatus::Active)
                    .fetch_optional(&mut **tx)
                    .await?;

                    if updated.is_some() {
                        sqlx::query(
                            "INSERT INTO bids (listing_id, bidder_id, amount)
                             VALUES ($1, $2, $3)",
                        )
                        .bind(listing_id)
                        .bind(bidder_id)
                        .bind(amount)
                        .execute(&mut **tx)
                        .await?;
                    }

                    Ok::<_, sqlx::Error>(updated)
                })
            })
            .await
            .map_err(|e: sqlx::Error| {
                ServiceError::Internal(format!("placeBid listing={}: {}", listing_id, e))
            })?;

        match updated {
            Some(listing) => {
                info!(
                    "{:<12} --> 입찰 성공: listing={}, 현재가={}",
                    "Command", listing.id, listing.current_bid
                );
                return Ok(listing);
            }
            None => {
                // 조건부 갱신 실패: 그 사이 상태나 현재가가 바뀌었다
                warn!(
                    "{:<12} --> 조건부 갱신 실패(동시 입찰 경합): listing={}, 재시도",
                    "Command", listing_id
                );
                retries += 1;
                continue;
            }
        }
    }

    Err(ServiceError::Internal(format!(
        "placeBid listing={}: 최대 재시도 횟수 초과",
        listing_id
    )))
}
// endregion: --- Commands

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn active_listing(seller: i64, current_bid: i64) -> Listing {
        let now = Utc::now();
        Listing {
            id: 1,
            title: "테스트 경매".to_string(),
            description: "검증 테스트용 경매입니다.".to_string(),
            image: "data:image/png;base64,".to_string(),
            start_price: 100,
            current_bid,
            start_time: now - Duration::hours(1),
            end_time: now + Duration::hours(1),
            seller,
            highest_bidder: None,
            winner: None,
            status: ListingStatus::Active,
            created_at: now - Duration::hours(2),
            updated_at: now - Duration::hours(1),
        }
    }

    /// 진행 중이 아닌 경매에는 입찰할 수 없다
    #[test]
    fn test_rejects_inactive_listing() {
        for status in [ListingStatus::Pending, ListingStatus::Ended] {
            let mut listing = active_listing(1, 100);
            listing.status = status;
            let err = validate_bid(&listing, 2, 200).unwrap_err();
            assert!(matches!(err, ServiceError::InvalidState(_)));
        }
    }

    /// 판매자 본인은 금액과 무관하게 입찰할 수 없다
    #[test]
    fn test_rejects_seller_bidding_on_own_listing() {
        let listing = active_listing(1, 100);
        let err = validate_bid(&listing, 1, 10_000).unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    /// 현재가 이하의 입찰은 입찰자와 무관하게 거부된다
    #[test]
    fn test_rejects_amount_not_above_current_bid() {
        let listing = active_listing(1, 150);
        let err = validate_bid(&listing, 2, 150).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidBid(_)));
        let err = validate_bid(&listing, 2, 120).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidBid(_)));
    }

    /// 현재가보다 높은 입찰은 통과한다
    #[test]
    fn test_accepts_higher_bid() {
        let listing = active_listing(1, 150);
        assert!(validate_bid(&listing, 2, 151).is_ok());
    }

    /// 상태 검사가 판매자 검사보다 먼저다 (검증 순서)
    #[test]
    fn test_state_check_precedes_seller_check() {
        let mut listing = active_listing(1, 100);
        listing.status = ListingStatus::Ended;
        // 판매자 본인의 입찰이지만 InvalidState 가 먼저 반환된다
        let err = validate_bid(&listing, 1, 200).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    /// 판매자 검사가 금액 검사보다 먼저다 (검증 순서)
    #[test]
    fn test_seller_check_precedes_amount_check() {
        let listing = active_listing(1, 100);
        // 금액이 현재가 이하이면서 판매자 본인이면 Forbidden 이 먼저 반환된다
        let err = validate_bid(&listing, 1, 50).unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }
}
// endregion: --- Tests
