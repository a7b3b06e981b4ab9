//! BFHL API server entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI args
//!   3. Load config
//!   4. Resolve effective log level (CLI `-v` flags > env > config)
//!   5. Init logger once
//!   6. Spawn Ctrl-C / SIGTERM → shutdown signal watcher
//!   7. Serve until the shutdown token is cancelled

use bfhl_api::{config, error, logger, server::HttpServer};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), error::AppError> {
    // Load .env if present; the file is optional.
    let _ = dotenvy::dotenv();

    let args = parse_cli_args();

    let mut config = config::load(args.config_path.as_deref())?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    let effective_log_level = args.log_level.unwrap_or(config.log_level.as_str());
    logger::init(effective_log_level, args.log_level.is_some())?;

    info!(
        bind = %config.server.bind,
        cors = config.server.cors,
        user_id = %config.identity.user_id,
        configured_log_level = %config.log_level,
        effective_log_level = %effective_log_level,
        "config loaded"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    let server = HttpServer::new(&config);
    println!("✓ BFHL API listening on http://{}", server.bind_addr());
    server.run(shutdown).await
}

/// Cancel `shutdown` on Ctrl-C, or SIGTERM on unix.
async fn watch_signals(shutdown: CancellationToken) {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("ctrl-c received, initiating shutdown"),
        () = terminate => info!("SIGTERM received, initiating shutdown"),
    }
    shutdown.cancel();
}

struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
    bind: Option<String>,
}

fn parse_cli_args() -> CliArgs {
    let mut verbosity = 0u8;
    let mut config_path = None;
    let mut bind = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => {
                println!("Usage: bfhl-api [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help                 Print help");
                println!("  -f, --config <PATH>        Path to configuration file (default: config/default.toml)");
                println!("  -b, --bind <ADDR>          Listen address, e.g. 0.0.0.0:8000 (overrides config and BFHL_BIND)");
                println!("  -v, -vv, -vvv, -vvvv       Increase logging verbosity");
                std::process::exit(0);
            }
            "-f" | "--config" => match iter.next() {
                Some(path) => config_path = Some(path),
                None => {
                    eprintln!("error: -f/--config requires a path argument");
                    std::process::exit(1);
                }
            },
            "-b" | "--bind" => match iter.next() {
                Some(addr) => bind = Some(addr),
                None => {
                    eprintln!("error: -b/--bind requires an address argument");
                    std::process::exit(1);
                }
            },
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            _ => {}
        }
    }

    //   -v      → warn
    //   -vv     → info
    //   -vvv    → debug  (dropped tokens, per-request counts)
    //   -vvvv+  → trace  (full request/response spans)
    let log_level = match verbosity {
        0 => None,
        1 => Some("warn"),
        2 => Some("info"),
        3 => Some("debug"),
        _ => Some("trace"),
    };

    CliArgs { log_level, config_path, bind }
}
