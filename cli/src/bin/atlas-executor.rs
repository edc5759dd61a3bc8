//! Executor process for atlas tool calls
//!
//! Reads one JSON request from stdin, runs the named operation against
//! the store, writes one response line to stdout and exits with the
//! boundary status code. Diagnostics go to `executor.log`, never stdout.

use atlas_infrastructure::{
    BoundaryServer, ConfigLoader, FileConfig, OperationRegistry, Store, install_panic_logger,
};
use std::io::Read;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Log filter for the executor (`RUST_LOG` syntax)
const LOG_ENV: &str = "ATLAS_EXECUTOR_LOG";

const LOG_FILE: &str = "executor.log";

fn main() -> ExitCode {
    let loaded = ConfigLoader::load(None);
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => ConfigLoader::load_defaults().unwrap_or_default(),
    };

    let _guard = init_logging(&config);
    install_panic_logger();
    if let Err(e) = loaded {
        warn!("Ignoring invalid configuration: {}", e);
    }

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        error!("Could not read request from stdin: {}", e);
        return ExitCode::from(3);
    }

    let store = Store::new(config.store_config()).with_schema_bootstrap();

    let server = BoundaryServer::new(OperationRegistry::builtin(), store);
    let exit = server.handle(&input);
    info!(exit_code = exit.exit_code, "Request finished");

    if let Some(line) = exit.stdout {
        println!("{}", line);
    }

    ExitCode::from(u8::try_from(exit.exit_code).unwrap_or(3))
}

/// Append to `<log_dir>/executor.log`. Returns `None` if the directory
/// cannot be created, in which case nothing is logged.
///
/// Nothing may reach stderr: the client treats any stderr output as a crash.
fn init_logging(config: &FileConfig) -> Option<WorkerGuard> {
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir).ok()?;

    let appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}
