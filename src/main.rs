//! fitness-coach - entry point.
//!
//! Startup order:
//! 1. Load and validate configuration from the environment.
//! 2. Initialise tracing (JSON in production, human-readable otherwise).
//! 3. Connect the transcript store (PostgreSQL, or in memory without a database).
//! 4. Build the completion client and router, then serve with graceful shutdown.

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fitness_coach::adapters::http::{api_router, CoachingAppState};
use fitness_coach::adapters::{
    InMemoryTranscriptStore, OpenAIClient, OpenAIConfig, PostgresTranscriptStore,
    TracingExchangeObserver,
};
use fitness_coach::config::{AiConfig, AppConfig, DatabaseConfig};
use fitness_coach::ports::{CompletionClient, TranscriptStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    init_tracing(&config.server.log_level, config.is_production());
    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        "fitness-coach starting"
    );

    // ── 3. Transcript store ────────────────────────────────────────────────────
    let transcripts = transcript_store(config.database.as_ref()).await?;

    // ── 4. Completion client + router ──────────────────────────────────────────
    let completion = OpenAIClient::new(client_config(&config.ai)?)
        .context("failed to build completion client")?;
    let provider = completion.provider_info();
    info!(
        provider = %provider.name,
        model = %provider.model,
        base_url = %config.ai.base_url,
        "completion client ready"
    );

    let state = CoachingAppState::new(
        Arc::new(completion),
        transcripts,
        Arc::new(TracingExchangeObserver::new()),
    );
    let app = api_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("fitness-coach stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured filter; a bad filter falls back to `info`.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|e| {
            eprintln!("WARN: invalid log filter '{}' ({}); falling back to 'info'", log_level, e);
            EnvFilter::new("info")
        });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn transcript_store(
    database: Option<&DatabaseConfig>,
) -> anyhow::Result<Arc<dyn TranscriptStore>> {
    let Some(database) = database else {
        warn!("no database configured; transcripts are kept in memory and lost on restart");
        return Ok(Arc::new(InMemoryTranscriptStore::new()));
    };

    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(database.url())
        .await
        .context("failed to connect to PostgreSQL")?;

    if database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run migrations")?;
        info!("database migrations applied");
    }

    info!("PostgreSQL transcript store ready");
    Ok(Arc::new(PostgresTranscriptStore::new(pool)))
}

fn client_config(ai: &AiConfig) -> anyhow::Result<OpenAIConfig> {
    let api_key = ai.api_key().context("AI API key missing")?;
    Ok(OpenAIConfig::new(api_key)
        .with_base_url(ai.base_url.as_str())
        .with_model(ai.model.as_str())
        .with_temperature(ai.temperature)
        .with_max_tokens(ai.max_tokens)
        .with_timeout(ai.timeout())
        .with_attribution(ai.referer.as_str(), ai.app_title.as_str()))
}

/// Resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}
