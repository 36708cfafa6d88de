use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use finsight_agent::handlers::{analyze_handler, chat_handler, health_check};
use finsight_agent::init::app_init;
use finsight_agent::AppState;

fn create_app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/analyze", axum::routing::post(analyze_handler))
        .route("/chat", axum::routing::post(chat_handler))
        .route("/health", axum::routing::get(health_check))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenv::dotenv().ok();
    log::info!("🚀 Starting stock analysis agent server...");

    let (config, state) = app_init()?;
    log::info!("✅ Application state initialized");
    let app = create_app_router(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("");
    log::info!("🎉 Server started!");
    log::info!("📍 http://{}", addr);
    log::info!("📊 Analyze: POST http://{}/analyze", addr);
    log::info!("💬 Chat: POST http://{}/chat", addr);
    log::info!("❤️  Health: GET http://{}/health", addr);
    log::info!("⏱️  Delegate timeout: {}s", config.delegate_timeout.as_secs());
    log::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
