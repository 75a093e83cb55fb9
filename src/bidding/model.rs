use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 입찰 모델 (한 번 기록되면 변경되지 않는다)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}
