//! Save editing CLI definitions

use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct SetArgs {
    /// Path to .dat file
    pub input: PathBuf,

    /// Hex cipher key (uses configured default if not provided)
    #[arg(short, long, env = "MCD_KEY")]
    pub key: Option<String>,

    /// Player level as shown in game
    #[arg(long)]
    pub level: Option<f64>,

    /// Currency amount, e.g. Emerald=5000 (repeatable)
    #[arg(long = "currency", value_name = "TYPE=COUNT", value_parser = parse_currency)]
    pub currencies: Vec<(String, u64)>,

    /// Create backup before modifying
    #[arg(short, long, default_value_t = true)]
    pub backup: bool,
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum LocationArg {
    Inventory,
    Storage,
}

impl From<LocationArg> for mcd::Location {
    fn from(arg: LocationArg) -> Self {
        match arg {
            LocationArg::Inventory => mcd::Location::Inventory,
            LocationArg::Storage => mcd::Location::Storage,
        }
    }
}

fn parse_currency(s: &str) -> Result<(String, u64), String> {
    let (kind, count) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=COUNT, got '{}'", s))?;
    if kind.is_empty() {
        return Err("currency type is empty".to_string());
    }
    let count = count
        .parse()
        .map_err(|e| format!("invalid count '{}': {}", count, e))?;
    Ok((kind.to_string(), count))
}
