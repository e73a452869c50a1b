//! Quantia tool server
//!
//! Reads one JSON-RPC 2.0 request per line on stdin and writes one response
//! per line on stdout. Logs go to stderr.
//!
//! Environment:
//! - QUANTIA_LOG: log level (error, warn, info, debug, trace; default info)
//! - QUANTIA_UNITS_PATH: JSON array of extra dimension definitions

mod config;
mod server;

use std::io::{self, BufRead, Write};

use config::Config;
use server::{handle_request, RpcError, RpcRequest, RpcResponse, PARSE_ERROR};
use tracing::{debug, error, info, warn};

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .init();

    info!("Quantia server v{} started", SERVER_VERSION);
    load_configured_dimensions(&config);

    let registry = quantia_units::global();
    info!(dimensions = registry.read().list_dimensions().len(), "Server ready, waiting for requests...");

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("Client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let response = match serde_json::from_str::<RpcRequest>(line) {
                    Ok(request) => {
                        debug!(method = %request.method, "processing");
                        let response = handle_request(registry, &request);
                        // Notifications (no id) get no response
                        if request.id.is_none() {
                            continue;
                        }
                        response
                    }
                    Err(e) => {
                        warn!("Error parsing request: {}", e);
                        RpcResponse::failure(None, RpcError::new(PARSE_ERROR, format!("Parse error: {}", e)))
                    }
                };

                if let Err(e) = write_response(&response) {
                    error!("Error writing response: {}", e);
                    break;
                }
            }
            Err(e) => {
                error!("Error reading input: {}", e);
                break;
            }
        }
    }

    info!("Server shutting down");
}

fn load_configured_dimensions(config: &Config) {
    let Some(path) = &config.units_path else {
        return;
    };

    let definitions = match config::read_dimensions(path) {
        Ok(d) => d,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };

    let (warnings, errors) = config::register_dimensions(&mut quantia_units::global().write(), definitions);
    info!(
        path = %path.display(),
        warnings = warnings.len(),
        rejected = errors.len(),
        "loaded configured dimensions"
    );
}

fn write_response(response: &RpcResponse) -> io::Result<()> {
    let json = serde_json::to_string(response)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    stdout.flush()
}
