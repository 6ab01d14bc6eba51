use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patient_gateway::{
    app::build_router, config::Config, db::connection::PoolManager, state::AppState,
};

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(2).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "patient_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(
        db_host = %config.db_host,
        db_port = config.db_port,
        db_name = %config.db_name,
        admin_user = %config.admin_user,
        admin_password = %mask_secret(&config.admin_password),
        guest_user = %config.guest_user,
        guest_password = %mask_secret(&config.guest_password),
        allowed_origin = %config.allowed_origin,
        max_connections = config.pool.max_connections,
        "Loaded configuration from environment/.env"
    );

    // Both roles must authenticate before the listener comes up.
    let pools = PoolManager::connect(&config).await?;
    tracing::info!("Connected admin and guest pools");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let app = build_router(AppState::new(pools, config))?;

    tracing::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
