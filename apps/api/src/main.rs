mod analysis;
mod config;
mod db;
mod errors;
mod matching;
mod models;
mod routes;
mod state;
mod storage;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::entities::EntityRecognizer;
use crate::analysis::vocabulary::Vocabulary;
use crate::analysis::wordcloud::WordCloudRenderer;
use crate::analysis::ResumeAnalyzer;
use crate::config::Config;
use crate::db::create_pool;
use crate::matching::matcher::KeywordJobMatcher;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{AnalysisStore, MemoryAnalysisStore, PgAnalysisStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Load the reference vocabulary (built-in unless VOCABULARY_PATH is set)
    let vocabulary = match &config.vocabulary_path {
        Some(path) => Vocabulary::from_json_file(path)?,
        None => Vocabulary::default(),
    };
    info!("Vocabulary {} loaded", vocabulary.version);

    // Entity recognizer is process-wide; failing to build it is fatal
    let entities = Arc::new(
        EntityRecognizer::new().context("Failed to initialize entity recognizer")?,
    );

    let wordcloud = WordCloudRenderer::new(config.wordcloud_dir.clone());
    info!("Word clouds written to {}", wordcloud.output_dir().display());

    let analyzer = ResumeAnalyzer::new(&vocabulary, entities, Some(wordcloud))
        .context("Failed to compile vocabulary patterns")?;
    info!("Analyzer ready ({} skill patterns)", analyzer.skill_count());

    // Initialize storage (PostgreSQL when configured, in-memory otherwise)
    let store: Arc<dyn AnalysisStore> = match &config.database_url {
        Some(url) => {
            let pg = PgAnalysisStore::new(create_pool(url).await?);
            pg.migrate().await?;
            Arc::new(pg)
        }
        None => {
            warn!("DATABASE_URL not set; results are kept in memory only");
            Arc::new(MemoryAnalysisStore::new())
        }
    };

    // Build app state
    let state = AppState {
        config: config.clone(),
        analyzer: Arc::new(analyzer),
        matcher: Arc::new(KeywordJobMatcher),
        store,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
