use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    let port = cli_port(std::env::args().nth(1), cfg.server.port);

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, port))
}

/// Resolve the listen port from the optional positional argument.
///
/// An unparsable value logs a warning and falls back to the configured
/// default.
fn cli_port(arg: Option<String>, default_port: u16) -> u16 {
    match arg {
        Some(raw) => match raw.parse::<u16>() {
            Ok(port) => port,
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid port number: '{raw}' (using default {default_port})"
                ));
                default_port
            }
        },
        None => default_port,
    }
}

async fn async_main(cfg: config::Config, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr(port)?;

    // Bind failure is fatal: no retry, no alternate port
    let listener = match server::create_listener(addr) {
        Ok(listener) => listener,
        Err(e) => {
            logger::log_bind_failed(&addr, &e);
            std::process::exit(1);
        }
    };

    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(config::AppState::new(cfg));
    let shutdown = server::signal::start_signal_handler();

    server::run_server_loop(listener, state, shutdown).await
}
