use agency_crm::{
    database::{self, PostgreDatabase},
    routes::make_app,
    service::UserService,
    templates::Templates,
    AppState, Config,
};
use anyhow::Context;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::oneshot};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agency_crm=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::init().context("failed to load the configuration")?;

    info!(dsn = %config.db.redacted_dsn(), "Connecting to PostgreSQL...");
    let pool = database::connect_sqlx(&config.db)
        .await
        .context("failed to connect to the database")?;
    database::run_migrations(&pool)
        .await
        .context("failed to apply database migrations")?;
    info!("Connected to PostgreSQL!");

    let templates = match Templates::load(&config.templates_dir) {
        Ok(templates) => Some(templates),
        Err(err) => {
            warn!(dir = %config.templates_dir.display(), error = %err, "failed to parse templates");
            None
        }
    };
    if !config.static_dir.is_dir() {
        warn!(dir = %config.static_dir.display(), "static directory does not exist");
    }

    let service = UserService::new(Arc::new(PostgreDatabase::new(pool)));
    let state = Arc::new(AppState {
        service: service.clone(),
        templates,
        config,
    });
    let app = make_app(state.clone());

    let address = state.config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("🚀 Server started on {address}");

    let (stop, stopped) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            stopped.await.ok();
        })
        .await
    });

    shutdown_signal().await;
    info!("Shutting down server...");
    stop.send(()).ok();

    match tokio::time::timeout(SHUTDOWN_GRACE, server).await {
        Ok(joined) => joined?.context("server error while draining connections")?,
        Err(_) => warn!("Server forced to shutdown after {SHUTDOWN_GRACE:?}"),
    }

    service.close().await?;
    info!("Server shutdown correctly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
