//! Aura CLI - an interactive shell over the Aura virtual file system.
//!
//! Loads layered configuration, wires the store, file system and session
//! into a command dispatcher, and runs a line editor in front of it.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use aura_config::Config;
use aura_terminal::{CommandDispatcher, Session};
use aura_vfs::VirtualFileSystem;
use aura_vfs::path::display_dir;
use clap::Parser;
use tracing::{debug, warn};

mod config_bridge;
mod console;
mod repl;
mod runner;
mod theme;

use console::{ConsoleLauncher, ConsoleSink};
use repl::{LineReader, ReadlineEvent};
use runner::{LineRunner, PROMPT_GRACE};
use theme::{Theme, print_banner};

/// Aura - a terminal over a persistent virtual file system
#[derive(Parser)]
#[command(name = "aura")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Extra configuration file, merged above ~/.aura/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for the file store (overrides storage.data_dir)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is saved
    #[arg(long)]
    memory: bool,

    /// Write logs to daily files in DIR instead of stderr
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Run one line (chains allowed) and exit instead of starting the REPL
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    command: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let resolved = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let cfg = &resolved.config;

    // Set up logging from config, with --verbose and --log-dir overrides.
    let mut log_config = config_bridge::to_log_config(cfg);
    if cli.verbose {
        "debug".clone_into(&mut log_config.level);
    }
    if let Some(dir) = &cli.log_dir {
        log_config = log_config.with_file_logging(dir);
    }
    if let Err(e) = aura_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }
    debug!(files = ?resolved.loaded_files, env = ?resolved.env_applied, "configuration loaded");
    if cfg.vfs.uses_builtin_key() {
        warn!("vfs.default_encryption_key is the built-in value; encrypted files are not private");
    }

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| resolved.data_dir());
    let store = config_bridge::open_store(cfg.storage.backend, &data_dir, cli.memory)
        .with_context(|| format!("failed to open storage at {}", data_dir.display()))?;

    let settings = config_bridge::to_terminal_settings(cfg);
    let vfs = Arc::new(
        VirtualFileSystem::new(Arc::clone(&store), config_bridge::to_vfs_settings(cfg))
            .context("failed to load the file system")?,
    );
    let session = Arc::new(
        Session::load(Arc::clone(&store), &settings).context("failed to load terminal session")?,
    );
    let dispatcher = Arc::new(CommandDispatcher::new(
        vfs,
        Arc::clone(&session),
        Arc::new(ConsoleLauncher),
        settings,
    ));

    if let Some(line) = cli.command {
        dispatcher.run(&line, &ConsoleSink).await;
        return Ok(());
    }

    print_banner();
    run_repl(&dispatcher, &session).await
}

/// Read lines until `exit`, `quit` or Ctrl+D.
///
/// Lines run in the background, so the next line is accepted while an
/// effect sequence is still playing.
async fn run_repl(dispatcher: &Arc<CommandDispatcher>, session: &Session) -> Result<()> {
    let mut reader = LineReader::spawn(Arc::clone(dispatcher)).await?;
    let mut runner = LineRunner::new(Arc::clone(dispatcher), Arc::new(ConsoleSink));

    loop {
        runner.settle(PROMPT_GRACE).await;
        let prompt = Theme::prompt(&display_dir(&session.get().current_directory));
        let input = match reader.read(prompt).await {
            ReadlineEvent::Line(line) => line,
            ReadlineEvent::Interrupted => continue,
            ReadlineEvent::Eof => {
                println!("{}", Theme::dimmed("Goodbye!"));
                break;
            },
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            println!("{}", Theme::dimmed("Goodbye!"));
            break;
        }

        runner.submit(input.to_owned());
    }

    runner.shutdown();
    Ok(())
}
