//! `erp`: command-line client for ERP REST APIs.
//!
//! Manages contexts and runs resource operations with filter criteria
//! compiled client-side.

mod commands;
mod config;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::query::QueryArgs;

#[derive(Parser, Debug)]
#[command(name = "erp", about = "ERP REST API client")]
struct Cli {
    /// Path to client config file (default: ~/.erp/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage contexts.
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Switch the current context.
    Use {
        #[command(subcommand)]
        what: UseWhat,
    },

    /// List a collection or get one record.
    Get {
        /// Collection path (e.g. /items).
        path: String,
        /// Record id for a single get.
        id: Option<String>,
        /// Follow pagination and print every item.
        #[arg(long)]
        all: bool,
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Create a record (POST).
    Create {
        path: String,
        /// JSON body.
        #[arg(long = "json")]
        json_body: Option<String>,
        /// Read JSON from file.
        #[arg(short = 'f', long = "file")]
        file: Option<PathBuf>,
    },

    /// Replace a record (PUT).
    Update {
        path: String,
        id: String,
        #[arg(long = "json")]
        json_body: String,
    },

    /// Partially update a record (PATCH).
    Patch {
        path: String,
        id: String,
        #[arg(long = "json")]
        json_body: String,
    },

    /// Delete a record.
    Delete {
        path: String,
        id: String,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Print the compiled query string without sending anything.
    Query {
        /// Prefix the output with this collection path.
        #[arg(long)]
        path: Option<String>,
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// Create or update a context.
    Set {
        name: String,
        /// API base URL.
        #[arg(long)]
        server: Option<String>,
        /// Bearer token.
        #[arg(long)]
        token: Option<String>,
        /// Request timeout in seconds.
        #[arg(long = "timeout")]
        timeout_secs: Option<u64>,
    },
    /// List all contexts.
    List,
    /// Delete a context.
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum UseWhat {
    /// Switch to a context.
    Context { name: String },
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    eprint!("{} [y/N]: ", prompt);
    std::io::stderr().flush()?;
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().eq_ignore_ascii_case("y"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(config::ClientConfig::default_path);

    match cli.command {
        Commands::Context { action } => match action {
            ContextAction::Set {
                name,
                server,
                token,
                timeout_secs,
            } => {
                commands::context::set(
                    &name,
                    server.as_deref(),
                    token.as_deref(),
                    timeout_secs,
                    &config_path,
                )?;
            }
            ContextAction::List => {
                commands::context::list(&config_path)?;
            }
            ContextAction::Delete { name } => {
                commands::context::delete(&name, &config_path)?;
            }
        },

        Commands::Use { what } => match what {
            UseWhat::Context { name } => {
                commands::context::use_context(&name, &config_path)?;
            }
        },

        Commands::Get { path, id, all, query } => {
            commands::resource::get(&path, id.as_deref(), all, &query, &config_path).await?;
        }

        Commands::Create { path, json_body, file } => {
            let body = if let Some(file) = file {
                std::fs::read_to_string(&file)?
            } else if let Some(json) = json_body {
                json
            } else {
                anyhow::bail!("Provide --json or -f <file>.");
            };
            commands::resource::create(&path, &body, &config_path).await?;
        }

        Commands::Update { path, id, json_body } => {
            commands::resource::update(&path, &id, &json_body, &config_path).await?;
        }

        Commands::Patch { path, id, json_body } => {
            commands::resource::patch(&path, &id, &json_body, &config_path).await?;
        }

        Commands::Delete { path, id, yes } => {
            if !yes && !confirm(&format!("Delete {} {}?", path, id))? {
                println!("Cancelled.");
                return Ok(());
            }
            commands::resource::delete(&path, &id, &config_path).await?;
        }

        Commands::Query { path, query } => {
            commands::query::run(path.as_deref(), &query)?;
        }

        Commands::Version => {
            println!("erp cli v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
