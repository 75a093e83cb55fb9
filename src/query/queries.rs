/// 경매 목록 조회 (판매자/최고 입찰자/낙찰자 이름 조인)
pub const GET_ALL_LISTINGS: &str = r#"
    SELECT l.*,
           s.name  AS seller_name,
           hb.name AS highest_bidder_name,
           w.name  AS winner_name
    FROM listings l
    JOIN users s        ON s.id  = l.seller
    LEFT JOIN users hb  ON hb.id = l.highest_bidder
    LEFT JOIN users w   ON w.id  = l.winner
"#;

/// 경매 단건 조회 (이름 조인 포함)
pub const GET_LISTING_VIEW: &str = r#"
    SELECT l.*,
           s.name  AS seller_name,
           hb.name AS highest_bidder_name,
           w.name  AS winner_name
    FROM listings l
    JOIN users s        ON s.id  = l.seller
    LEFT JOIN users hb  ON hb.id = l.highest_bidder
    LEFT JOIN users w   ON w.id  = l.winner
    WHERE l.id = $1
"#;

/// 경매 스냅샷 조회 (커맨드 검증용)
pub const GET_LISTING: &str = "SELECT * FROM listings WHERE id = $1";

/// 입찰 이력 조회
pub const GET_BID_HISTORY: &str = r#"
    SELECT id, listing_id, bidder_id, amount, created_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY created_at DESC
"#;

/// 시작 시간이 지난 대기 중 경매 조회 (스케줄러)
pub const GET_LISTINGS_DUE_TO_START: &str =
    "SELECT * FROM listings WHERE status = 'pending' AND start_time <= $1";

/// 종료 시간이 지난 진행 중 경매 조회 (스케줄러)
pub const GET_LISTINGS_DUE_TO_END: &str =
    "SELECT * FROM listings WHERE status = 'active' AND end_time <= $1";
