//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::save::{LocationArg, SetArgs};

#[derive(Parser)]
#[command(name = "mcd")]
#[command(about = "Minecraft Dungeons Save Editor", long_about = None)]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decrypt a .dat save to JSON (stdout or -o file)
    #[command(visible_alias = "d")]
    Decrypt {
        /// Path to .dat file
        input: PathBuf,

        /// Path to output JSON file (uses stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Hex cipher key (uses configured default if not provided)
        #[arg(short, long, env = "MCD_KEY")]
        key: Option<String>,
    },

    /// Encrypt JSON (positional file or stdin) to a .dat save
    #[command(visible_alias = "e")]
    Encrypt {
        /// Path to write the .dat file
        #[arg(short, long)]
        output: PathBuf,

        /// JSON input file (reads stdin if not provided)
        json: Option<PathBuf>,

        /// Hex cipher key (uses configured default if not provided)
        #[arg(short, long, env = "MCD_KEY")]
        key: Option<String>,
    },

    /// Inspect a save file (level, power, currencies, item counts)
    #[command(visible_alias = "i")]
    Inspect {
        /// Path to .dat file
        input: PathBuf,

        /// Hex cipher key (uses configured default if not provided)
        #[arg(short, long, env = "MCD_KEY")]
        key: Option<String>,

        /// Reference data (JSON or YAML) to check item ids against
        #[arg(short, long)]
        reference: Option<PathBuf>,
    },

    /// List items in inventory and storage
    #[command(visible_alias = "l")]
    Items {
        /// Path to .dat file
        input: PathBuf,

        /// Hex cipher key (uses configured default if not provided)
        #[arg(short, long, env = "MCD_KEY")]
        key: Option<String>,

        /// Only list one location
        #[arg(long, value_enum)]
        location: Option<LocationArg>,
    },

    /// Set level or currencies in a save file
    Set(SetArgs),

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set default hex cipher key
        #[arg(long)]
        key: Option<String>,

        /// Set default reference data file
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },

    /// List recently opened save files
    Recent,
}
