//! CLI entrypoint for atlas
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use atlas_application::{ChatObserver, ChatSession};
use atlas_infrastructure::{
    ConfigLoader, JsonSchemaToolConverter, OpenAiGateway, OperationRegistry, ProcessToolExecutor,
    Store,
};
use atlas_presentation::{ChatRepl, Cli, ConsoleObserver, SimpleObserver};
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: could not read .env: {}", e);
        }
    }

    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting atlas");

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
    }
    .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    if let Some(model) = &cli.model {
        config.model.name = model.clone();
    }
    if let Some(program) = &cli.executor {
        config.executor.program = Some(program.clone());
    }
    config.validate().context("Invalid configuration")?;

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    // === Store ===
    let store_config = config.store_config();
    let store = Store::new(store_config.clone());
    store
        .initialize_schema()
        .with_context(|| format!("Could not prepare store at {}", store.path().display()))?;
    debug!("Store ready at {}", store.path().display());

    if cli.check_store {
        let projects = store.count_projects()?;
        println!(
            "Store OK: {} ({} proyectos)",
            store.path().display(),
            projects
        );
        return Ok(());
    }

    // === Dependency Injection ===
    let catalog = Arc::new(OperationRegistry::builtin().catalog().clone());
    let gateway = Arc::new(OpenAiGateway::new(&config.gateway_settings()?)?);
    let executor_settings = config.executor_settings(&store_config);
    info!("Executor program: {}", executor_settings.program.display());
    let executor = Arc::new(ProcessToolExecutor::new(executor_settings));

    let observer: Arc<dyn ChatObserver> = if cli.quiet || !config.chat.show_progress {
        Arc::new(SimpleObserver)
    } else {
        Arc::new(ConsoleObserver::new())
    };

    let session = ChatSession::new(
        gateway,
        executor,
        Arc::new(JsonSchemaToolConverter),
        catalog,
        config.session_config(),
    )
    .with_observer(observer);

    let mut repl = ChatRepl::new(session, config.model.name.clone())
        .with_history_path(config.history_file());

    match cli.message {
        Some(message) => {
            if !repl.process_message(&message).await {
                warn!("Session ended by the one-shot message");
            }
        }
        None => repl.run().await?,
    }

    Ok(())
}
