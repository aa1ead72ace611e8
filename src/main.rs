//! mindtutor server binary.
//!
//! Wires configuration, the Gemini client, the Postgres state store, the
//! agents and the HTTP surface together, then serves.

use std::sync::Arc;

use secrecy::Secret;
use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mindtutor::adapters::ai::{GeminiClient, GeminiConfig};
use mindtutor::adapters::http::{chat_router, ChatAppState};
use mindtutor::adapters::postgres::PostgresStateStore;
use mindtutor::application::{ChatService, Dispatcher};
use mindtutor::config::AppConfig;
use mindtutor::domain::agents::{
    CognitiveSupportResponder, IntentClassifier, OperatorSupportResponder, ResponderTable,
    ScoringResponder,
};
use mindtutor::domain::conversation::Category;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate()?;

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let client = GeminiClient::new(
        GeminiConfig::new(Secret::new(config.ai.api_key.clone()))
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.request_timeout()),
    )?;

    let responders = ResponderTable::new(Arc::new(OperatorSupportResponder))
        .with(Category::OperatorSupport, Arc::new(OperatorSupportResponder))
        .with(
            Category::CognitiveSupport,
            Arc::new(CognitiveSupportResponder),
        )
        .with(Category::Scoring, Arc::new(ScoringResponder));

    let dispatcher = Dispatcher::new(
        IntentClassifier::new(config.routing.default_category),
        responders,
        Arc::new(client),
        Arc::new(PostgresStateStore::new(pool)),
    );

    let service = Arc::new(ChatService::new(dispatcher));
    let app = chat_router(ChatAppState::new(service)).layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, environment = ?config.server.environment, "starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
