//! Visa Compass server binary.
//!
//! Loads configuration, wires the adapters to the application handlers, and
//! serves the HTTP API.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use visa_compass::adapters::ai::{
    OpenAiClient, OpenAiConfig, OpenAiFieldExtractor, OpenAiOffTrackResponder,
};
use visa_compass::adapters::http::{api_router, ChatHandlers, SessionHandlers};
use visa_compass::adapters::storage::{InMemorySessionStore, RedisSessionStore};
use visa_compass::application::handlers::chat::ProcessTurnHandler;
use visa_compass::application::handlers::session::{GetSessionStateHandler, ResetSessionHandler};
use visa_compass::application::SessionLocks;
use visa_compass::config::{AppConfig, SessionStoreBackend};
use visa_compass::ports::{FieldExtractor, OffTrackResponder, SessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    let store = build_store(&config).await?;
    let (extractor, responder) = build_ai(&config);
    if extractor.is_none() {
        tracing::info!("no LLM configured; running on light parsing and canned redirects");
    }

    let locks = SessionLocks::new();
    let process_turn = Arc::new(ProcessTurnHandler::new(
        store.clone(),
        extractor,
        responder,
        locks.clone(),
    ));
    let get_state = Arc::new(GetSessionStateHandler::new(store.clone()));
    let reset = Arc::new(ResetSessionHandler::new(store, locks));

    let app = api_router(
        ChatHandlers::new(process_turn),
        SessionHandlers::new(get_state, reset),
    )
    .layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(cors_layer(&config)),
    );

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "visa-compass listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn SessionStore>, Box<dyn Error>> {
    match config.session_store.backend {
        SessionStoreBackend::Memory => Ok(Arc::new(InMemorySessionStore::new())),
        SessionStoreBackend::Redis => {
            let url = config
                .session_store
                .redis_url
                .as_deref()
                .expect("validated: redis backend requires a URL");
            let store = RedisSessionStore::connect(url, config.session_store.ttl_secs).await?;
            tracing::info!(ttl_secs = config.session_store.ttl_secs, "connected to Redis");
            Ok(Arc::new(store))
        }
    }
}

fn build_ai(
    config: &AppConfig,
) -> (
    Option<Arc<dyn FieldExtractor>>,
    Option<Arc<dyn OffTrackResponder>>,
) {
    if !config.ai.is_enabled() {
        return (None, None);
    }
    let api_key = config.ai.api_key.clone().unwrap_or_default();
    let client_config = OpenAiConfig::new(api_key)
        .with_model(&config.ai.model)
        .with_base_url(&config.ai.base_url)
        .with_timeout(config.ai.timeout());

    let extractor = OpenAiFieldExtractor::new(OpenAiClient::new(client_config.clone()));
    let responder = OpenAiOffTrackResponder::new(OpenAiClient::new(client_config));

    (Some(Arc::new(extractor)), Some(Arc::new(responder)))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = config.server.cors_origins_list();
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
