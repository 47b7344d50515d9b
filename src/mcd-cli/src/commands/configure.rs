//! Configuration command handlers
//!
//! Handles the `configure` and `recent` subcommands.

use crate::config::Config;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Handle the configure command
pub fn handle(key: Option<String>, reference: Option<PathBuf>, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if key.is_none() && reference.is_none() {
        show_usage();
        return Ok(());
    }

    if let Some(key) = key {
        mcd::parse_key(&key).context("Invalid cipher key")?;
        config.set_key(key);
        println!("Cipher key configured");
    }

    if let Some(reference) = reference {
        super::save::load_reference(&reference)?;
        println!("Reference data configured: {}", reference.display());
        config.reference = Some(reference);
    }

    config.save()?;
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

/// Display current configuration
fn show_config(config: &Config) {
    match config.get_key() {
        Some(key) => println!("Cipher key: {}", mask_key(key)),
        None => println!("No cipher key configured"),
    }

    match &config.reference {
        Some(path) => println!("Reference data: {}", path.display()),
        None => println!("No reference data configured"),
    }

    println!("Recent files: {}", config.recent_files.len());

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Handle the recent command
pub fn show_recent() -> Result<()> {
    let config = Config::load()?;
    if config.recent_files.is_empty() {
        println!("No recent files");
    }
    for (i, path) in config.recent_files.iter().enumerate() {
        println!("{:>2}. {}", i + 1, path.display());
    }
    Ok(())
}

/// Keep the first and last four hex digits
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn usage() -> &'static str {
    concat!(
        "Usage: mcd configure --key HEX_KEY\n",
        "   or: mcd configure --reference PATH\n",
        "   or: mcd configure --show\n",
        "\n",
        "Note: the key is the 16, 24 or 32 byte AES key as hex.",
    )
}

/// Show usage help for the configure command
fn show_usage() {
    println!("{}", usage());
}
