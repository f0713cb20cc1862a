use std::path::Path;

use axum::{
    response::Redirect,
    routing::{delete, get, get_service, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::database::seed::{self, SeedError};
use crate::database::ActivityDirectory;
use crate::web::routes::{activities, health};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error("could not bind {host}:{port} and there is no fallback port: {source}")]
    Bind {
        host: String,
        port: u16,
        source: std::io::Error,
    },
    #[error("could not bind {host}:{port} or fallback port {fallback}: {source}")]
    BindFallback {
        host: String,
        port: u16,
        fallback: u16,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Builds the full application router around a shared directory.
pub fn router(directory: ActivityDirectory, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::temporary("/static/index.html") }))
        .route("/health", get(health::health_handler))
        .route("/activities", get(activities::activities_handler))
        .route(
            "/activities/:activity_name/signup",
            post(activities::signup_handler),
        )
        .route(
            "/activities/:activity_name/unregister",
            delete(activities::unregister_handler),
        )
        .nest_service(
            "/static",
            get_service(ServeDir::new(static_dir.as_ref())),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(directory)
}

/// Seeds the directory, binds the listener and serves until Ctrl-C or SIGTERM.
pub async fn run(config: Config) -> Result<(), StartupError> {
    let activities = seed::initial_activities(config.seed_file.as_deref())?;
    match &config.seed_file {
        Some(path) => info!("Loaded {} activities from {}", activities.len(), path.display()),
        None => info!("Loaded {} builtin activities", activities.len()),
    }

    let app = router(ActivityDirectory::new(activities), &config.static_dir);
    let listener = bind_with_fallback(&config.host, config.port).await?;

    let bound_addr = listener.local_addr().map_err(StartupError::Serve)?;
    info!("Server listening on http://{}", bound_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    info!("Server stopped");
    Ok(())
}

async fn bind_with_fallback(host: &str, port: u16) -> Result<TcpListener, StartupError> {
    let e = match TcpListener::bind((host, port)).await {
        Ok(listener) => return Ok(listener),
        Err(e) => e,
    };
    let Some(fallback) = port.checked_add(1) else {
        return Err(StartupError::Bind {
            host: host.to_string(),
            port,
            source: e,
        });
    };

    warn!(
        "Could not bind {}:{}: {}. Trying fallback {}:{}",
        host, port, e, host, fallback
    );
    TcpListener::bind((host, fallback))
        .await
        .map_err(|source| StartupError::BindFallback {
            host: host.to_string(),
            port,
            fallback,
            source,
        })
}

/// Resolves on Ctrl-C, or on SIGTERM where that exists.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Could not listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn falls_back_to_next_port_when_taken() {
        let taken = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = taken.local_addr().unwrap().port();
        let next = port.checked_add(1).unwrap();

        match bind_with_fallback("127.0.0.1", port).await {
            Ok(listener) => assert_eq!(listener.local_addr().unwrap().port(), next),
            // next port already in use on this machine
            Err(StartupError::BindFallback { port: p, fallback, .. }) => {
                assert_eq!(p, port);
                assert_eq!(fallback, next);
            }
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    #[tokio::test]
    async fn highest_port_has_no_fallback() {
        // Held by us or by someone else; either way the bind below fails.
        let _held = TcpListener::bind(("127.0.0.1", u16::MAX)).await;

        let err = bind_with_fallback("127.0.0.1", u16::MAX).await.unwrap_err();
        assert!(
            matches!(err, StartupError::Bind { port: u16::MAX, .. }),
            "unexpected error: {}",
            err
        );
        assert!(err.to_string().contains("no fallback port"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn sigterm_triggers_shutdown() {
        let waiter = tokio::spawn(shutdown_signal());
        // let the task install its handlers before signalling
        tokio::time::sleep(Duration::from_millis(200)).await;

        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("shutdown did not fire on SIGTERM")
            .unwrap();
    }
}
