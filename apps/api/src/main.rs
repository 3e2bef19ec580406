mod apply;
mod cache;
mod config;
mod cv;
mod db;
mod documents;
mod errors;
mod insights;
mod llm_client;
mod matching;
mod models;
mod repository;
mod routes;
mod state;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::apply::orchestrator::AutoApplyOrchestrator;
use crate::cache::ResultCache;
use crate::config::Config;
use crate::db::create_pool;
use crate::documents::{DocumentTextExtractor, RemoteDocumentSource};
use crate::llm_client::LlmClient;
use crate::matching::recommender::RecommendationEngine;
use crate::repository::postgres::PgRepository;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.database_max_connections).await?;
    let repository = Arc::new(PgRepository::new(db));

    // Initialize S3 / MinIO (optional: only needed for blob-stored resumes)
    let s3 = if config.blob_storage_enabled() {
        let client = build_s3_client(&config).await;
        info!("S3 client initialized");
        Some(client)
    } else {
        info!("S3 not configured; resumes are fetched over HTTP only");
        None
    };

    let source = RemoteDocumentSource::new(config.fetch_timeout, s3, config.s3_bucket.clone());
    let documents = DocumentTextExtractor::new(Arc::new(source));

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(
        config.openai_api_url.clone(),
        config.openai_api_key.clone(),
        config.model_timeout,
        config.model_max_retries,
    ));
    info!(
        "LLM client initialized (timeout {:?}, {} attempts)",
        config.model_timeout, config.model_max_retries
    );

    // Result caches, one per cached task
    let recommendation_cache = Arc::new(match config.recommendation_cache_ttl {
        Some(ttl) => ResultCache::with_ttl(ttl),
        None => ResultCache::new(),
    });
    let interview_cache = Arc::new(ResultCache::new());

    let recommender = Arc::new(RecommendationEngine::new(
        llm.clone(),
        repository.clone(),
        recommendation_cache,
    ));
    let auto_apply = Arc::new(AutoApplyOrchestrator::new(
        llm.clone(),
        documents.clone(),
        repository.clone(),
        config.auto_apply_concurrency,
    ));

    // Build app state
    let state = AppState {
        llm,
        candidates: repository.clone(),
        jobs: repository.clone(),
        applications: repository,
        documents,
        recommender,
        auto_apply,
        interview_cache,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client for MinIO (custom endpoint) or AWS (default chain).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()));

    if let (Some(key_id), Some(secret)) = (&config.aws_access_key_id, &config.aws_secret_access_key) {
        loader = loader.credentials_provider(Credentials::new(
            key_id,
            secret,
            None,
            None,
            "jobmatch-static",
        ));
    }

    if let Some(endpoint) = &config.s3_endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let shared = loader.load().await;
    let s3_config = aws_sdk_s3::config::Builder::from(&shared)
        .force_path_style(config.s3_endpoint.is_some())
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
