use inkwell_cms::{app, apply_schema, connect, ensure_database_exists, AppConfig, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "inkwell_cms=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .init();

    let config = AppConfig::from_env()?;
    ensure_database_exists(&config).await?;
    let pool = connect(&config).await?;
    apply_schema(&pool).await?;

    let state = AppState::new(pool, &config);
    if state.identity.is_none() {
        tracing::warn!("AUTH_JWT_SECRET not set, all requests are anonymous");
    }
    let router = app(state, config.body_limit_bytes);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
