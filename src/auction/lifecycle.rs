/// 경매 상태 전이 규칙
/// 스케줄러가 호출하는 단일 진입점으로, 시간 기준 전이를 여기서만 결정한다
// region:    --- Imports
use super::model::ListingStatus;
use chrono::{DateTime, Utc};

// endregion: --- Imports

// region:    --- Lifecycle
/// 현재 시각 기준으로 다음 상태를 결정한다
/// 전이 대상이 아니면 None
/// 상태를 건너뛰는 전이는 없다 (시작 시간과 종료 시간이 모두 지난 pending 경매는
/// 먼저 active 가 되고, 다음 스윕에서 ended 로 전이된다)
pub fn advance(
    status: ListingStatus,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<ListingStatus> {
    match status {
        ListingStatus::Pending if now >= start_time => Some(ListingStatus::Active),
        ListingStatus::Active if now >= end_time => Some(ListingStatus::Ended),
        _ => None,
    }
}
// endregion: --- Lifecycle

// endregion: --- Tests
