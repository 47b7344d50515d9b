//! Item listing command handler

use anyhow::Result;
use std::path::Path;

use crate::cli::LocationArg;
use mcd::{Item, Location, SaveState};

/// Handle `items` command
pub fn list(input: &Path, key: Option<String>, only: Option<LocationArg>) -> Result<()> {
    let key = super::save::get_key(key)?;
    let save = super::save::open_save(input, &key)?;

    let locations = match only {
        Some(location) => vec![Location::from(location)],
        None => vec![Location::Inventory, Location::Storage],
    };

    for (i, location) in locations.into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", table(&save, location));
    }
    Ok(())
}

fn items_in(save: &SaveState, location: Location) -> &[Item] {
    match location {
        Location::Inventory => save.inventory(),
        Location::Storage => save.storage(),
    }
}

fn table(save: &SaveState, location: Location) -> String {
    let items = items_in(save, location);
    let mut out = format!("{} ({} items)\n", location, items.len());
    out.push_str(&format!(
        "  {:<10} {:<28} {:<8} {:>7} {:>6}  {}\n",
        "Slot", "Type", "Rarity", "Power", "Points", "Enchantments"
    ));
    for item in items {
        out.push_str(&format!("  {}\n", row(item)));
    }
    out
}

fn row(item: &Item) -> String {
    let slot = match (item.equipment_slot, item.inventory_index) {
        (Some(slot), _) => slot.to_string(),
        (None, Some(index)) => format!("#{}", index),
        (None, None) => "-".to_string(),
    };
    let mut rarity = item.rarity.to_string();
    if item.is_gilded() {
        rarity.push('+');
    }
    format!(
        "{:<10} {:<28} {:<8} {:>7.2} {:>6}  {}",
        slot,
        item.item_type,
        rarity,
        item.in_game_power(),
        item.spent_points(),
        enchantment_list(item)
    )
}

fn enchantment_list(item: &Item) -> String {
    let mut parts: Vec<String> = item
        .enchantments()
        .iter()
        .filter(|e| !e.is_unset())
        .map(|e| format!("{} {}", e.id, e.level))
        .collect();
    if let Some(netherite) = item.netherite_enchant().filter(|e| !e.is_unset()) {
        parts.push(format!("[{} {}]", netherite.id, netherite.level));
    }
    parts.join(", ")
}
