use std::sync::Arc;
use std::time::Duration;

use http::HeaderValue;
use tower_http::cors::CorsLayer;

mod config;
mod error;
mod i18n;
mod models;
mod routes;
mod services;

use config::Config;
use services::{init, session::Session};

pub struct AppState {
    pub config: Config,
    pub session: Session,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first: the log format is part of it
    let config = Config::from_env()?;

    init::init_tracing(&config.logging);

    let lang = i18n::init_language(&config.ui.lang);
    tracing::info!("Starting {} (language: {})", i18n::t("app.name"), lang);

    let scheduler = init::init_scheduler_api(&config)?;

    let app_state = Arc::new(AppState {
        session: Session::from_config(&config, Arc::new(scheduler)),
        config: config.clone(),
    });

    let (shutdown_tx, _shutdown_rx) = tokio::sync::broadcast::channel::<()>(1);

    // Student count is fetched once; the schedule when its screen opens
    let mount_handle = init::spawn_mount(app_state.clone(), shutdown_tx.clone());

    let frontend_origin = config
        .server
        .frontend_url
        .parse::<HeaderValue>()
        .map_err(|e| anyhow::anyhow!("Invalid FRONTEND_URL for CORS: {}", e))?;

    let app = routes::app(app_state.clone()).layer(
        CorsLayer::new()
            .allow_origin(frontend_origin)
            .allow_methods([
                http::Method::GET,
                http::Method::POST,
                http::Method::PUT,
                http::Method::DELETE,
                http::Method::OPTIONS,
            ])
            .allow_headers([http::header::CONTENT_TYPE, http::header::ACCEPT]),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Server listening on {}", addr);

    // Select between the server and the signal listener. On a signal the
    // mount task is notified and the server future is dropped.
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let server_fut = axum::serve(listener, app);

    let shutdown_tx_clone = shutdown_tx.clone();
    let signal_fut = async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut term) => {
                    tokio::select! {
                        _ = ctrl_c => {},
                        _ = term.recv() => {},
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to bind SIGTERM, waiting for Ctrl+C only: {}", e);
                    let _ = ctrl_c.await;
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
        }

        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx_clone.send(());
    };

    tokio::select! {
        res = server_fut => {
            if let Err(e) = res {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = signal_fut => {
            tracing::info!("Server future dropped, no longer accepting connections");
        }
    }

    let shutdown_wait = Duration::from_secs(5);
    if tokio::time::timeout(shutdown_wait, mount_handle).await.is_err() {
        tracing::warn!(
            "Mount task did not exit within {}s",
            shutdown_wait.as_secs()
        );
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
