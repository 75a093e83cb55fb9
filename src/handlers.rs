// region:    --- Imports
use crate::auction::commands::{
    handle_create_listing as command_create_listing,
    handle_delete_listing as command_delete_listing,
    handle_update_listing as command_update_listing, CreateListingCommand, UpdateListingCommand,
};
use crate::auth::{self, JwtAuthGateway};
use crate::bidding::commands::{handle_place_bid as command_place_bid, PlaceBidCommand};
use crate::database::DatabaseManager;
use crate::error::ServiceError;
use crate::query;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- Health
/// 서비스 동작 확인
pub async fn handle_health() -> &'static str {
    "Auction Marketplace API is running..."
}
// endregion: --- Health

// region:    --- Command Handlers

/// 경매 등록 요청 처리
pub async fn handle_create_listing(
    State((db_manager, auth_gateway)): State<(Arc<DatabaseManager>, Arc<JwtAuthGateway>)>,
    headers: HeaderMap,
    Json(cmd): Json<CreateListingCommand>,
) -> Result<impl IntoResponse, ServiceError> {
    let seller_id = auth::authenticate(auth_gateway.as_ref(), &headers).await?;
    info!(
        "{:<12} --> 경매 등록 요청 처리 시작: seller={}",
        "Command", seller_id
    );

    let listing = command_create_listing(&db_manager, seller_id, cmd).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// 경매 수정 요청 처리
pub async fn handle_update_listing(
    State((db_manager, auth_gateway)): State<(Arc<DatabaseManager>, Arc<JwtAuthGateway>)>,
    Path(listing_id): Path<i64>,
    headers: HeaderMap,
    Json(cmd): Json<UpdateListingCommand>,
) -> Result<impl IntoResponse, ServiceError> {
    let caller_id = auth::authenticate(auth_gateway.as_ref(), &headers).await?;
    info!(
        "{:<12} --> 경매 수정 요청 처리 시작: id={}, caller={}",
        "Command", listing_id, caller_id
    );

    let listing = command_update_listing(&db_manager, listing_id, caller_id, cmd).await?;
    Ok(Json(listing))
}

/// 경매 삭제 요청 처리
pub async fn handle_delete_listing(
    State((db_manager, auth_gateway)): State<(Arc<DatabaseManager>, Arc<JwtAuthGateway>)>,
    Path(listing_id): Path<i64>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServiceError> {
    let caller_id = auth::authenticate(auth_gateway.as_ref(), &headers).await?;
    info!(
        "{:<12} --> 경매 삭제 요청 처리 시작: id={}, caller={}",
        "Command", listing_id, caller_id
    );

    command_delete_listing(&db_manager, listing_id, caller_id).await?;
    Ok(Json(serde_json::json!({
        "message": "경매가 삭제되었습니다."
    })))
}

/// 입찰 요청 처리
pub async fn handle_place_bid(
    State((db_manager, auth_gateway)): State<(Arc<DatabaseManager>, Arc<JwtAuthGateway>)>,
    Path(listing_id): Path<i64>,
    headers: HeaderMap,
    Json(cmd): Json<PlaceBidCommand>,
) -> Result<impl IntoResponse, ServiceError> {
    let bidder_id = auth::authenticate(auth_gateway.as_ref(), &headers).await?;
    info!(
        "{:<12} --> 입찰 요청 처리 시작: listing={}, bidder={}",
        "Command", listing_id, bidder_id
    );

    let listing = command_place_bid(&db_manager, listing_id, bidder_id, cmd.amount).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "입찰이 성공적으로 처리되었습니다.",
            "listing": listing
        })),
    ))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 모든 경매 조회
pub async fn handle_get_listings(
    State((db_manager, _)): State<(Arc<DatabaseManager>, Arc<JwtAuthGateway>)>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("{:<12} --> 모든 경매 조회", "HandlerQuery");
    let listings = query::handlers::get_all_listings(&db_manager).await?;
    Ok(Json(listings))
}

/// 경매 단건 조회
pub async fn handle_get_listing(
    State((db_manager, _)): State<(Arc<DatabaseManager>, Arc<JwtAuthGateway>)>,
    Path(listing_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("{:<12} --> 경매 조회 id: {}", "HandlerQuery", listing_id);
    let listing = query::handlers::get_listing_view(&db_manager, listing_id).await?;
    Ok(Json(listing))
}

/// 입찰 이력 조회
pub async fn handle_get_bid_history(
    State((db_manager, _)): State<(Arc<DatabaseManager>, Arc<JwtAuthGateway>)>,
    Path(listing_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "HandlerQuery", listing_id);
    let bids = query::handlers::get_bid_history(&db_manager, listing_id).await?;
    Ok(Json(bids))
}

// endregion: --- Query Handlers
