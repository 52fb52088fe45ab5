use anyhow::{Context, Result};
use domain::services::{GuestStore, MemoryGuestStore};
use persistence::repositories::GuestGroupRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use wedding_rsvp_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // `wedding-rsvp hash-password <password>` prints a hash for admin.password_hash
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("hash-password") {
        let password = args
            .get(2)
            .context("usage: wedding-rsvp hash-password <password>")?;
        println!("{}", shared::password::hash_password(password)?);
        return Ok(());
    }

    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging);

    info!("Starting Wedding RSVP v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = middleware::init_metrics() {
        warn!(error = %e, "Prometheus recorder not installed, /metrics disabled");
    }

    let store: Arc<dyn GuestStore> = match config.storage.backend {
        config::StorageBackend::Postgres => {
            let pool = persistence::db::create_pool(&(&config.database).into()).await?;

            info!("Running database migrations...");
            persistence::db::run_migrations(&pool).await?;
            info!("Migrations completed");

            Arc::new(GuestGroupRepository::new(pool))
        }
        config::StorageBackend::Memory => {
            warn!("Using in-memory guest store; data is lost on restart");
            Arc::new(MemoryGuestStore::new())
        }
    };

    let addr = config.socket_addr()?;
    let app = app::create_app(config, store);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
