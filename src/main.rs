use std::sync::Arc;

use anyhow::Context;
use axum_session_middleware::{AxumDatabasePool, AxumSessionConfig, AxumSessionStore};
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use barbershop_backend::{
    app,
    config::{Config, StoreKind},
    seed,
    store::{BarbershopStore, MemoryStore, PgStore},
    utils::get_connection_pool,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the process environment may carry everything.
    let env_file = dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "barbershop_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(path) = env_file {
        tracing::debug!("loaded environment from {}", path.display());
    }

    let config = Config::from_env().context("invalid configuration")?;

    let (store, session_pool): (Arc<dyn BarbershopStore>, Arc<dyn AxumDatabasePool>) =
        match config.store {
            StoreKind::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL must be set")?;
                let pool = get_connection_pool(database_url)
                    .context("could not build connection pool")?;
                let pg = Arc::new(PgStore::new(pool));
                (
                    pg.clone() as Arc<dyn BarbershopStore>,
                    pg as Arc<dyn AxumDatabasePool>,
                )
            }
            StoreKind::Memory => {
                tracing::warn!("using the in-memory store; data is lost on restart");
                let memory = Arc::new(MemoryStore::new());
                (
                    memory.clone() as Arc<dyn BarbershopStore>,
                    memory as Arc<dyn AxumDatabasePool>,
                )
            }
        };

    if config.seed_on_startup {
        let summary = seed::initialize(store.as_ref(), &config.seed_staff_password)
            .await
            .context("seeding default data failed")?;
        tracing::info!(
            "seeded data: {} barbers, {} services",
            summary.barbers_count,
            summary.services_count
        );
    }

    let session_store = AxumSessionStore::new(session_pool).with_config(
        AxumSessionConfig::default().with_idle_timeout(config.session_idle_timeout),
    );

    let addr = config.socket_addr();
    let app = app(AppState::new(store, config), session_store);

    tracing::info!("listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
