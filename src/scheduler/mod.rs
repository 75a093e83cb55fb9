/// 경매 상태 전이 스케줄러
/// 고정 주기로 전체 경매를 훑어 시간 기준 상태 전이를 수행한다
/// 전이 규칙은 auction::lifecycle::advance 가 단일 진입점이다
// region:    --- Imports
use crate::auction::lifecycle;
use crate::auction::model::{Listing, ListingStatus};
use crate::query::queries;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info};

// endregion: --- Imports

// 스윕 주기 (초)
const SWEEP_INTERVAL_SECS: u64 = 60;

// region:    --- Auction Scheduler
/// 경매 상태 전이 스케줄러
pub struct AuctionScheduler {
    pool: Arc<PgPool>,
}

impl AuctionScheduler {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// 스케줄러 시작
    /// 반환된 핸들은 프로세스 종료 시 abort 한다
    /// 스윕은 한 태스크 안에서 순차 실행되고, 밀린 틱은 건너뛰므로 중첩 실행이 없다
    pub fn start(&self) -> JoinHandle<()> {
        let pool = Arc::clone(&self.pool);
        tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                // 스윕 실패는 기록만 하고 다음 틱은 계속 수행한다
                if let Err(e) = Self::run_sweep(&pool).await {
                    error!(
                        "{:<12} --> 경매 상태 전이 중 오류 발생: {:?}",
                        "Scheduler", e
                    );
                }
            }
        })
    }

    /// 한 번의 스윕: 전이 대상 경매를 찾아 개별적으로 전이를 적용한다
    /// 한 경매의 실패가 다른 경매의 전이를 막지 않는다
    pub async fn run_sweep(pool: &PgPool) -> Result<(), sqlx::Error> {
        let now = Utc::now();

        // pending -> active
        let due_to_start = sqlx::query_as::<_, Listing>(queries::GET_LISTINGS_DUE_TO_START)
            .bind(now)
            .fetch_all(pool)
            .await?;
        for listing in due_to_start {
            if let Err(e) = Self::apply_transition(pool, &listing, now).await {
                error!(
                    "{:<12} --> 경매 시작 처리 실패 id={}: {:?}",
                    "Scheduler", listing.id, e
                );
            }
        }

        // active -> ended
        let due_to_end = sqlx::query_as::<_, Listing>(queries::GET_LISTINGS_DUE_TO_END)
            .bind(now)
            .fetch_all(pool)
            .await?;
        for listing in due_to_end {
            if let Err(e) = Self::apply_transition(pool, &listing, now).await {
                error!(
                    "{:<12} --> 경매 종료 처리 실패 id={}: {:?}",
                    "Scheduler", listing.id, e
                );
            }
        }

        debug!("{:<12} --> 경매 상태 스윕 완료", "Scheduler");
        Ok(())
    }

    /// 단일 경매에 전이를 적용한다
    /// UPDATE 는 조회 시점 상태를 조건으로 하므로 역방향 전이가 일어날 수 없다
    async fn apply_transition(
        pool: &PgPool,
        listing: &Listing,
        now: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let Some(next) = lifecycle::advance(listing.status, listing.start_time, listing.end_time, now)
        else {
            return Ok(());
        };

        match next {
            ListingStatus::Active => {
                let result = sqlx::query(
                    "UPDATE listings SET status = $1, updated_at = $2
                     WHERE id = $3 AND status = $4",
                )
                .bind(ListingStatus::Active)
                .bind(now)
                .bind(listing.id)
                .bind(ListingStatus::Pending)
                .execute(pool)
                .await?;

                if result.rows_affected() > 0 {
                    info!(
                        "{:<12} --> 경매 시작: {:?} (id={})",
                        "Scheduler", listing.title, listing.id
                    );
                }
            }
            ListingStatus::Ended => {
                // 종료 시점의 최고 입찰자가 낙찰자가 된다 (입찰이 없으면 낙찰자 없음)
                let winner = sqlx::query_scalar::<_, Option<i64>>(
                    "UPDATE listings SET status = $1, winner = highest_bidder, updated_at = $2
                     WHERE id = $3 AND status = $4
                     RETURNING winner",
                )
                .bind(ListingStatus::Ended)
                .bind(now)
                .bind(listing.id)
                .bind(ListingStatus::Active)
                .fetch_optional(pool)
                .await?;

                if let Some(winner) = winner {
                    info!(
                        "{:<12} --> 경매 종료: {:?} (id={}, 낙찰자={:?})",
                        "Scheduler", listing.title, listing.id, winner
                    );
                }
            }
            ListingStatus::Pending => {}
        }

        Ok(())
    }
}
// endregion: --- Auction Scheduler
