// Signal handling module
//
// Supported signals:
// - SIGHUP:  Reload the route snapshot from the config file
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)
//
// The routing table itself is never rebuilt; a new access mode needs a restart.

use std::sync::Arc;
use tokio::sync::Notify;

use crate::api::RouteSnapshot;
use crate::config::Config;
use crate::logger;

/// Where SIGHUP reads routes from and where it publishes them
pub struct RouteReload {
    pub config_path: String,
    pub snapshot: RouteSnapshot,
}

impl RouteReload {
    /// Re-read the config file and swap in its routes
    ///
    /// A broken file keeps the current snapshot.
    pub async fn reload(&self) {
        match Config::load_from(&self.config_path) {
            Ok(config) => {
                let count = config.registry.routes.len();
                self.snapshot.replace(config.registry.routes).await;
                logger::log_routes_reloaded(count);
            }
            Err(e) => logger::log_error(&format!(
                "Failed to reload routes from '{}': {e}",
                self.config_path
            )),
        }
    }
}

/// Start signal handlers (Unix only)
///
/// | Signal  | Action           |
/// |---------|------------------|
/// | SIGHUP  | Reload routes    |
/// | SIGTERM | Graceful stop    |
/// | SIGINT  | Graceful stop    |
#[cfg(unix)]
pub fn start_signal_handler(shutdown: Arc<Notify>, reload: RouteReload) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let registered = (
            signal(SignalKind::hangup()),
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        );
        let (mut sighup, mut sigterm, mut sigint) = match registered {
            (Ok(hup), Ok(term), Ok(int)) => (hup, term, int),
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                logger::log_error(&format!("Failed to register signal handlers: {e}"));
                return;
            }
        };

        tracing::debug!(pid = std::process::id(), "signal handlers registered");

        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    tracing::info!("SIGHUP received, reloading routes");
                    reload.reload().await;
                }
                _ = sigterm.recv() => {
                    tracing::info!("SIGTERM received");
                    break;
                }
                _ = sigint.recv() => {
                    tracing::info!("SIGINT received");
                    break;
                }
            }
        }

        logger::log_shutdown();
        shutdown.notify_one();
    });
}

/// Non-unix fallback, only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: Arc<Notify>, _reload: RouteReload) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_shutdown();
            shutdown.notify_one();
        }
    });
}
