//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for atlas
#[derive(Parser, Debug)]
#[command(name = "atlas")]
#[command(author, version, about = "ATLAS - conversational project and task manager")]
#[command(long_about = r#"
ATLAS is a chat assistant that manages projects and tasks in a local
database. Every action goes through a tool call that runs in a separate
executor process.

Configuration files are loaded from (in priority order):
1. ATLAS_<SECTION>__<KEY>  Environment variables
2. --config <path>         Explicit config file
3. ./atlas.toml            Project-level config
4. ~/.config/atlas/config.toml   Global config

The API token is read from the variable named by model.api_key_env
(GIT_TOKEN by default); a .env file in the working directory is honored.

Example:
  atlas
  atlas "Crea el proyecto Web con las tareas diseño, maqueta y despliegue"
  atlas --check-store
"#)]
pub struct Cli {
    /// Send one message and exit instead of starting the REPL
    pub message: Option<String>,

    /// Model to query (overrides model.name)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Executor program (overrides executor.program)
    #[arg(long, value_name = "PATH")]
    pub executor: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the resolved configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Check that the store is reachable, print the project count, then exit
    #[arg(long)]
    pub check_store: bool,
}
