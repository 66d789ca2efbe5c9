use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pagescroll_core::ScrollConfig;

mod commands;

#[derive(Parser)]
#[command(name = "pagescroll")]
#[command(author, version, about = "Interruptible, namespaced scroll animations in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to ~/.config/pagescroll/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive demo: animated scrolling through a document
    Demo {
        /// Text file to show instead of the built-in sample
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Run one animation headlessly and print every frame
    Simulate(commands::simulate::SimulateArgs),
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file path
    Path,
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The demo owns the screen, so its logs go nowhere
    let interactive = matches!(cli.command, None | Some(Commands::Demo { .. }));
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    );
    if interactive {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::sink),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(ScrollConfig::config_path);

    // Loaded per command so `config path` and `config init` work with a broken file
    let load = || load_config(cli.config.as_deref());

    match cli.command {
        Some(Commands::Demo { ref file }) => commands::demo::run(load()?, file.clone()).await,
        None => commands::demo::run(load()?, None).await,
        Some(Commands::Simulate(ref args)) => commands::simulate::run(load()?, args.clone()).await,
        Some(Commands::Config { ref action }) => match action {
            ConfigAction::Path => commands::config::path(&config_path),
            ConfigAction::Show => commands::config::show(&load()?),
            ConfigAction::Init { force } => commands::config::init(&config_path, *force),
        },
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<ScrollConfig> {
    let config = match path {
        Some(path) => ScrollConfig::load_from(path)?,
        None => ScrollConfig::load()?,
    };

    let invalid = pagescroll_tui::input::invalid_keys(&config.interrupt_keys);
    if !invalid.is_empty() {
        warn!(keys = ?invalid, "Unrecognised interrupt keys in config, they will never match");
    }

    Ok(config)
}
