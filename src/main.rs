// region:    --- Imports
use crate::auth::JwtAuthGateway;
use crate::database::DatabaseManager;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Modules
mod auction;
mod auth;
mod bidding;
mod database;
mod error;
mod handlers;
mod query;
mod scheduler;

// endregion: --- Modules

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // DatabaseManager 생성
    let db_manager = Arc::new(DatabaseManager::new().await);

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // 인증 게이트웨이 생성 (자격 증명 발급은 외부 인증 서비스 담당)
    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let auth_gateway = Arc::new(JwtAuthGateway::new(&jwt_secret));

    // 경매 상태 전이 스케줄러 시작
    let scheduler = scheduler::AuctionScheduler::new(db_manager.get_pool());
    let scheduler_handle = scheduler.start();

    // 웹 프론트를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 라우터 설정
    let routes_all = Router::new()
        .route("/", get(handlers::handle_health))
        .route(
            "/api/listings",
            get(handlers::handle_get_listings).post(handlers::handle_create_listing),
        )
        .route(
            "/api/listings/:id",
            get(handlers::handle_get_listing)
                .put(handlers::handle_update_listing)
                .delete(handlers::handle_delete_listing),
        )
        .route(
            "/api/auctions/:id/bids",
            post(handlers::handle_place_bid).get(handlers::handle_get_bid_history),
        )
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024 * 50)) // 이미지가 data URL 로 올라오므로 바디 제한 상향(50MB)
        .with_state((db_manager, auth_gateway));

    // 리스너 생성
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행 (종료 시그널을 받으면 스케줄러도 함께 중지)
    if let Err(err) = axum::serve(listener, routes_all.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    scheduler_handle.abort();
    Ok(())
}

/// 종료 시그널 대기
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("{:<12} --> 종료 시그널 수신 실패: {}", "Main", e);
    }
}
// endregion: --- Main
