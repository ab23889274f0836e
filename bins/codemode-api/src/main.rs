mod handlers;
mod metrics;
mod routes;

use anyhow::{Context, Result};
use axum::Router;
use codemode_common::Config;
use codemode_judge::{LanguageTable, RedisCatalog, RemoteEngine, Verifier};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Verifier,
    pub languages: Arc<LanguageTable>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // LOG_FORMAT=json for log shippers, human-readable otherwise
    if std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false) {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    info!("Codemode judge API booting...");

    let config = Config::from_env();

    let languages = LanguageTable::load_or_builtin(Path::new(&config.language_config_path))?;
    info!(
        version = languages.version(),
        languages = languages.languages().len(),
        "Loaded executor language mapping"
    );

    let catalog = RedisCatalog::connect(&config.redis_url)
        .await
        .context("Failed to connect to Redis")?;
    info!("Connected to Redis: {}", config.redis_url);

    let engine = RemoteEngine::from_config(&config, languages.clone());
    info!(
        executor = %config.submit_url(),
        timeout_ms = config.executor_timeout_ms,
        "Remote executor configured"
    );

    let verifier = Verifier::new(Arc::new(engine), Arc::new(catalog))
        .with_max_parallel_tests(config.max_parallel_tests);

    metrics::init_metrics();

    let state = Arc::new(AppState {
        verifier,
        languages: Arc::new(languages),
    });

    let app = Router::new()
        .merge(routes::routes())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
