use dotenv::dotenv;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};

use product_search::{
    api::router,
    telemetry::init_tracing,
    Dependencies, ServiceError, Settings,
};
use product_search_sync::StartupOutcome;

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    dotenv().ok();

    let settings = Settings::from_env()?;
    init_tracing(settings.log_format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        http_addr = %settings.http_addr,
        opensearch_url = %settings.engine.url,
        strategy = %settings.reindex_strategy,
        "Starting product search"
    );

    let deps = Dependencies::new(&settings)?;

    // Serving starts whatever the outcome; search endpoints report what is missing.
    match deps.startup().run().await {
        StartupOutcome::Ready(report) => info!(
            index = %report.index,
            indexed = report.sync.indexed,
            "Product search ready"
        ),
        StartupOutcome::SearchDisabled(reason) => {
            warn!(reason = %reason, "Serving with search disabled")
        }
        StartupOutcome::Degraded { stage, error } => {
            error!(stage = %stage, error = %error, "Serving with a degraded index")
        }
    }

    let listener = TcpListener::bind(settings.http_addr).await?;
    info!("HTTP server listening on http://{}", settings.http_addr);

    axum::serve(listener, router(deps.app_state()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    deps.clients.release().await;
    info!("Product search stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, draining connections");
}
