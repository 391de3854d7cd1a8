use std::sync::Arc;

use clap::{Parser, Subcommand};
use nanoid::nanoid;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sahayak::api::{create_router, AppState};
use sahayak::auth;
use sahayak::config::Config;
use sahayak::db::{Database, DatabaseBackend, LibSqlBackend};
use sahayak::llm::LlmProvider;
use sahayak::models::User;
use sahayak::weather::{WeatherPrefetcher, WeatherService};

#[derive(Parser)]
#[command(name = "sahayak")]
#[command(about = "Farming assistant backend: plant diagnosis, crop advice, and farm records")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account from the command line, e.g. for a fresh deployment
    SeedAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "Administrator")]
        full_name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sahayak=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    tracing::info!("Initializing database...");
    let raw_db = Database::new(&config.database).await?;
    let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));

    if let Some(Command::SeedAdmin {
        email,
        password,
        full_name,
    }) = args.command
    {
        return seed_admin(&*db, &email, &password, &full_name).await;
    }

    if config.auth.uses_fallback_secrets() {
        tracing::warn!(
            "JWT secrets not configured - using insecure built-in fallbacks; set JWT_ACCESS_SECRET and JWT_REFRESH_SECRET"
        );
    }

    if let Some(llm_config) = &config.llm {
        tracing::info!("Initializing LLM provider: {}...", llm_config.model);
    }
    let llm = LlmProvider::new(config.llm.as_ref());
    if !llm.is_available() {
        tracing::warn!(
            "LLM unavailable - diagnosis, suggestions, alerts, and chat will answer with fallbacks"
        );
    }

    let weather = WeatherService::new(config.weather.as_ref());
    if !weather.is_available() {
        tracing::warn!("Weather provider unavailable - weather advice will be disabled");
    }

    if config.twilio.is_none() {
        tracing::warn!("Twilio credentials not set - WhatsApp image analysis will be disabled");
    }

    let state = AppState::new(config.clone(), db, llm, weather);

    let cancel_token = CancellationToken::new();

    if let Some(weather_config) = &config.weather {
        let prefetcher = WeatherPrefetcher::new(
            state.weather.clone(),
            weather_config.prefetch_cities.clone(),
            weather_config.prefetch_interval_secs,
        );
        if prefetcher.interval_secs() > 0 && state.weather.is_available() {
            tracing::info!(
                "Starting weather prefetcher... (interval={}s)",
                prefetcher.interval_secs()
            );
            let token = cancel_token.child_token();
            tokio::spawn(async move {
                prefetcher.run(token).await;
            });
        }
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Kisan Sahayak starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token))
        .await?;

    Ok(())
}

async fn seed_admin(
    db: &dyn DatabaseBackend,
    email: &str,
    password: &str,
    full_name: &str,
) -> anyhow::Result<()> {
    if db.get_user_by_email(email).await?.is_some() {
        tracing::info!("User {} already exists, nothing to do", email);
        return Ok(());
    }

    let password_hash = auth::hash_password(password)?;
    let user = User::new(
        nanoid!(),
        full_name.to_string(),
        email.to_string(),
        None,
        password_hash,
    );
    db.create_user(&user).await?;

    tracing::info!("Created user {} ({})", email, user.id);
    Ok(())
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, cancelling background tasks...");
    cancel_token.cancel();
}
