use std::sync::Arc;

mod admin;
mod api;
mod config;
mod error;
mod handler;
mod http;
mod logger;
mod routing;
mod server;
mod ui;

use admin::Collaborators;
use routing::AccessMode;

/// Config file used when no path is given, resolved without extension
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg);

    // Worker count comes from config, defaulting to one per core
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, config_path))
}

async fn async_main(
    cfg: config::Config,
    config_path: String,
) -> Result<(), Box<dyn std::error::Error>> {
    if cfg.admin.access_mode()? == AccessMode::Disabled {
        logger::log_admin_disabled();
        return Ok(());
    }

    let collaborators = Collaborators {
        registry: Arc::new(api::MemoryRegistry::new()),
        snapshot: api::RouteSnapshot::new(cfg.registry.routes.clone()),
    };
    let table = admin::build_admin_table(&cfg, env!("CARGO_PKG_VERSION"), &collaborators)?;
    logger::log_route_table(&table);

    let addr = cfg.get_socket_addr()?;
    let listener = server::bind_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(config::AppState::new(cfg, table));
    server::start_signal_handler(
        Arc::clone(&state.shutdown),
        server::RouteReload {
            config_path,
            snapshot: collaborators.snapshot,
        },
    );

    server::start_server_loop(listener, state).await;
    Ok(())
}
