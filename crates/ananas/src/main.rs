// SPDX-FileCopyrightText: 2026 Ananas Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ananas - extension resolution for the pipeline runner.
//!
//! Lists, resolves and verifies the steps available to the runner.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod extensions;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ananas - extension resolution for the pipeline runner.
#[derive(Parser, Debug)]
#[command(name = "ananas", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect built-in and installed extensions.
    Extensions {
        #[command(subcommand)]
        action: ExtensionsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ExtensionsCommand {
    /// List built-in steps and installed extensions.
    List {
        /// Only show entries whose identifier or type name contains this text.
        query: Option<String>,
    },
    /// Show which types run and paginate a step.
    Resolve {
        /// Metadata identifier, e.g. org.ananas.source.file.csv.
        id: String,
        /// Resolve as a remote worker would, ignoring the extension's own search path.
        #[arg(long)]
        remote: bool,
    },
    /// Resolve every installed extension step and report failures.
    Verify,
}

fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => ananas_config::load_and_validate_path(path),
        None => ananas_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            ananas_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.runner.log_level);

    let use_color = !cli.plain && std::io::stdout().is_terminal();
    let result = match cli.command {
        Some(Commands::Extensions { action }) => match action {
            ExtensionsCommand::List { query } => {
                extensions::run_list(&config, query.as_deref(), use_color)
            }
            ExtensionsCommand::Resolve { id, remote } => {
                extensions::run_resolve(&config, &id, remote, use_color)
            }
            ExtensionsCommand::Verify => extensions::run_verify(&config, use_color),
        },
        None => {
            println!("ananas: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("ananas: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so command output stays parseable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ananas={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
