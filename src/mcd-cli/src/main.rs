mod cli;
mod commands;
mod config;
mod file_io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::*;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Configure {
            key,
            reference,
            show,
        } => {
            commands::configure::handle(key, reference, show)?;
        }

        Commands::Decrypt { input, output, key } => {
            commands::save::decrypt(&input, output.as_deref(), key)?;
        }

        Commands::Encrypt { json, output, key } => {
            commands::save::encrypt(json.as_deref(), &output, key)?;
        }

        Commands::Inspect {
            input,
            key,
            reference,
        } => {
            commands::save::inspect(&input, key, reference.as_deref())?;
        }

        Commands::Items {
            input,
            key,
            location,
        } => {
            commands::items::list(&input, key, location)?;
        }

        Commands::Set(args) => {
            commands::save::set(&args)?;
        }

        Commands::Recent => {
            commands::configure::show_recent()?;
        }
    }

    Ok(())
}
