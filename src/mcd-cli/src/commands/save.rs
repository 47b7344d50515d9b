//! Save file command handlers

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::cli::SetArgs;
use crate::config::Config;

/// Resolve the cipher key from argument or config
pub fn resolve_key(provided: Option<String>, config: &Config) -> Result<Vec<u8>> {
    let hex_key = match provided {
        Some(key) => key,
        None => config.get_key().map(String::from).context(
            "Cipher key not provided. Run 'mcd configure --key HEX_KEY' to set a default.",
        )?,
    };
    mcd::parse_key(&hex_key).context("Invalid cipher key")
}

/// Get the cipher key from argument or the saved config
pub fn get_key(provided: Option<String>) -> Result<Vec<u8>> {
    resolve_key(provided, &Config::load()?)
}

/// Load reference data, picking the format from the file extension
pub fn load_reference(path: &Path) -> Result<mcd::ReferenceTable> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read reference data {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let table = if is_yaml {
        mcd::ReferenceTable::from_yaml(&contents)
    } else {
        mcd::ReferenceTable::from_json(&contents)
    };
    table.with_context(|| format!("Failed to parse reference data {}", path.display()))
}

/// Add a save to the recent files list; failures are only logged
pub fn remember(input: &Path) {
    let result = Config::load().and_then(|mut config| {
        config.push_recent(input);
        config.save()
    });
    if let Err(e) = result {
        tracing::warn!("Could not update recent files: {:#}", e);
    }
}

/// Read, decrypt and parse a save file
pub fn open_save(input: &Path, key: &[u8]) -> Result<mcd::SaveState> {
    let encrypted =
        fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let save = mcd::SaveState::from_container(&encrypted, key)
        .with_context(|| format!("Failed to open save file {}", input.display()))?;
    remember(input);
    Ok(save)
}

/// Common pattern for write operations: backup -> open -> modify -> encrypt -> write
pub fn with_save_file(
    input: &Path,
    key: Option<String>,
    backup: bool,
    modify: impl FnOnce(&mut mcd::SaveState) -> Result<()>,
) -> Result<()> {
    let key = get_key(key)?;

    if backup {
        let _ = mcd::smart_backup(input).context("Failed to manage backup")?;
    }

    let mut save = open_save(input, &key)?;

    modify(&mut save)?;

    let encrypted = save
        .to_container(&key)
        .context("Failed to encrypt save file")?;

    fs::write(input, &encrypted)
        .with_context(|| format!("Failed to write {}", input.display()))?;

    if backup {
        mcd::update_after_edit(input).context("Failed to update backup metadata")?;
    }

    Ok(())
}

/// Decrypt a save file, rejecting plaintext that is not a save document
pub fn decrypt_file(input: &Path, key: &[u8]) -> Result<Vec<u8>> {
    let encrypted =
        fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let json_data = mcd::decrypt_dat(&encrypted, key).context("Failed to decrypt save file")?;
    mcd::SaveState::from_json(&json_data)
        .with_context(|| format!("Failed to decrypt {} (wrong key?)", input.display()))?;
    Ok(json_data)
}

/// Handle `decrypt` command
pub fn decrypt(input: &Path, output: Option<&Path>, key: Option<String>) -> Result<()> {
    let key = get_key(key)?;
    let json_data = decrypt_file(input, &key)?;
    remember(input);
    crate::file_io::write_output(output, &json_data)
}

/// Handle `encrypt` command
pub fn encrypt(json_input: Option<&Path>, dat_path: &Path, key: Option<String>) -> Result<()> {
    let key = get_key(key)?;
    let json_data = crate::file_io::read_input(json_input)?;

    // Input must be a loadable save
    mcd::SaveState::from_json(&json_data).context("Input is not a valid save document")?;

    let encrypted = mcd::encrypt_dat(&json_data, &key).context("Failed to encrypt JSON data")?;
    fs::write(dat_path, &encrypted)
        .with_context(|| format!("Failed to write {}", dat_path.display()))?;
    Ok(())
}

/// Handle `inspect` command
pub fn inspect(input: &Path, key: Option<String>, reference: Option<&Path>) -> Result<()> {
    let config = Config::load()?;
    let key = resolve_key(key, &config)?;
    let save = open_save(input, &key)?;

    print!("{}", summary(&save));

    let reference = reference.map(Path::to_path_buf).or(config.reference);
    if let Some(path) = reference {
        let table = load_reference(&path)?;
        let unknown = save.unknown_references(&table);
        println!();
        if unknown.is_empty() {
            println!("All ids found in {}", path.display());
        } else {
            println!("Missing from {}:", path.display());
            for (kind, id) in unknown {
                println!("  {}: {}", kind, id);
            }
        }
    }

    Ok(())
}

fn summary(save: &mcd::SaveState) -> String {
    let mut out = String::new();
    out.push_str(&format!("Level: {} ({} XP)\n", save.level(), save.xp()));
    out.push_str(&format!("Power: {}\n", save.player_power()));
    out.push_str(&format!(
        "Enchantment points spent: {}\n",
        save.spent_enchantment_points()
    ));

    out.push_str("\nCurrencies:\n");
    if save.currencies().is_empty() {
        out.push_str("  (none)\n");
    }
    for currency in save.currencies() {
        out.push_str(&format!("  {}: {}\n", currency.kind, currency.count));
    }

    out.push_str(&format!(
        "\nInventory: {}/{}{}\n",
        save.inventory().len(),
        mcd::INVENTORY_CAPACITY,
        if save.no_space_available() { " (full)" } else { "" }
    ));
    out.push_str(&format!("Storage: {}\n", save.storage().len()));

    out.push_str("\nEquipped:\n");
    for slot in mcd::EquipmentSlot::ALL {
        if let Some(item) = save.equipped(slot) {
            out.push_str(&format!(
                "  {}: {} ({})\n",
                slot,
                item.item_type,
                item.in_game_power()
            ));
        }
    }
    out
}

/// Handle `set` command
pub fn set(args: &SetArgs) -> Result<()> {
    if args.level.is_none() && args.currencies.is_empty() {
        bail!("Nothing to set. Pass --level and/or --currency TYPE=COUNT.");
    }

    with_save_file(&args.input, args.key.clone(), args.backup, |save| {
        if let Some(level) = args.level {
            save.set_level(level);
            eprintln!("Level set to {} ({} XP)", save.level(), save.xp());
        }
        for (kind, count) in &args.currencies {
            save.set_currency(kind, *count);
            eprintln!("{} set to {}", kind, count);
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f";

    fn sample_save() -> mcd::SaveState {
        let json = r#"{
            "xp": 500,
            "currencies": [ { "type": "Emerald", "count": 1200 } ],
            "items": [
                { "type": "Sword", "rarity": "Common", "power": 11.0, "equipmentSlot": "MeleeGear",
                  "enchantments": [ { "id": "Unset", "level": 0, "investedPoints": 0 } ] },
                { "type": "Axe", "rarity": "Common", "power": 2.0, "inventoryIndex": 0,
                  "enchantments": [ { "id": "Sharpness", "level": 2, "investedPoints": 3 } ] }
            ]
        }"#;
        mcd::SaveState::from_json(json.as_bytes()).unwrap()
    }

    #[test]
    fn test_resolve_key_prefers_argument() {
        let mut config = Config::default();
        config.set_key("ff".repeat(16));
        let key = resolve_key(Some(KEY_HEX.to_string()), &config).unwrap();
        assert_eq!(key[0], 0x00);
        assert_eq!(key.len(), 16);
    }

    #[test]
    fn test_resolve_key_from_config() {
        let mut config = Config::default();
        config.set_key("ff".repeat(16));
        let key = resolve_key(None, &config).unwrap();
        assert_eq!(key, vec![0xFF; 16]);
    }

    #[test]
    fn test_resolve_key_missing() {
        let err = resolve_key(None, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("mcd configure --key"));
    }

    #[test]
    fn test_resolve_key_invalid() {
        assert!(resolve_key(Some("abc".to_string()), &Config::default()).is_err());
    }

    #[test]
    fn test_load_reference_by_extension() {
        let temp_dir = tempfile::tempdir().unwrap();

        let json_path = temp_dir.path().join("reference.json");
        fs::write(&json_path, r#"{ "items": { "Sword": { "variant": "Melee" } } }"#).unwrap();
        assert_eq!(load_reference(&json_path).unwrap().len(), 1);

        let yaml_path = temp_dir.path().join("reference.yml");
        fs::write(&yaml_path, "items:\n  Bow:\n    variant: Ranged\n").unwrap();
        assert_eq!(load_reference(&yaml_path).unwrap().len(), 1);
    }

    fn write_dat(dir: &Path, json: &[u8], key: &[u8]) -> std::path::PathBuf {
        let path = dir.join("save.dat");
        fs::write(&path, mcd::encrypt_dat(json, key).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_decrypt_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dat = write_dat(temp_dir.path(), br#"{"xp":1}"#, &[0x11; 16]);
        assert_eq!(decrypt_file(&dat, &[0x11; 16]).unwrap(), br#"{"xp":1}"#);
    }

    #[test]
    fn test_decrypt_wrong_key_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dat = write_dat(temp_dir.path(), br#"{"xp":1}"#, &[0x11; 16]);
        let out = temp_dir.path().join("save.json");

        let err = decrypt(&dat, Some(&out), Some("22".repeat(16))).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<mcd::SaveError>(),
            Some(mcd::SaveError::Content(_))
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_summary() {
        let text = summary(&sample_save());
        assert!(text.contains("Level: 2 (500 XP)"));
        assert!(text.contains("Emerald: 1200"));
        assert!(text.contains("Enchantment points spent: 3"));
        assert!(text.contains("Inventory: 2/300\n"));
        assert!(text.contains("melee: Sword (101)"));
    }
}
