// region:    --- Imports
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};
use sqlx::{Decode, Encode, Postgres, Type};
use std::fmt;
use std::str::FromStr;

// endregion: --- Imports

// region:    --- Listing Status
/// 경매 상태
/// pending -> active -> ended 순방향으로만 전이한다
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Pending,
    Active,
    Ended,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Pending => "pending",
            ListingStatus::Active => "active",
            ListingStatus::Ended => "ended",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ListingStatus::Pending),
            "active" => Ok(ListingStatus::Active),
            "ended" => Ok(ListingStatus::Ended),
            other => Err(format!("알 수 없는 경매 상태: {}", other)),
        }
    }
}

// listings.status 는 TEXT 컬럼이므로 문자열로 인코딩/디코딩한다
impl Type<Postgres> for ListingStatus {
    fn type_info() -> PgTypeInfo {
        <&str as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as Type<Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Postgres> for ListingStatus {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> Decode<'r, Postgres> for ListingStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let s = <&str as Decode<Postgres>>::decode(value)?;
        s.parse().map_err(Into::into)
    }
}
// endregion: --- Listing Status

// region:    --- Models
// 경매 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image: String,
    pub start_price: i64,
    pub current_bid: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub seller: i64,
    pub highest_bidder: Option<i64>,
    pub winner: Option<i64>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 목록/단건 조회용 프로젝션 (판매자/최고 입찰자/낙찰자 이름 조인)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ListingView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub listing: Listing,
    pub seller_name: String,
    pub highest_bidder_name: Option<String>,
    pub winner_name: Option<String>,
}
// endregion: --- Models
