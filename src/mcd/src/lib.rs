//! # mcd
//!
//! Minecraft Dungeons save editor library - encryption, decryption, and inventory editing.
//!
//! This library provides functionality to:
//! - Decrypt and encrypt `.dat` save containers
//! - Parse the decrypted JSON into items, currencies and progression
//! - Move, duplicate, create and delete items between inventory and storage
//! - Re-enchant items while keeping invested points consistent
//!
//! ## Example
//!
//! ```no_run
//! use std::fs;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let key = mcd::parse_key("00112233445566778899aabbccddeeff")?;
//! let encrypted = fs::read("2533274790395904.dat")?;
//!
//! let mut save = mcd::SaveState::from_container(&encrypted, &key)?;
//! println!("Level: {}", save.level());
//! println!("Emeralds: {}", save.currency("Emerald"));
//!
//! save.set_currency("Emerald", 99_999);
//! if let Some(item) = save.storage().first().map(|item| item.id()) {
//!     save.transfer(item)?;
//! }
//!
//! fs::write("2533274790395904.dat", save.to_container(&key)?)?;
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod crypto;
pub mod items;
pub mod numeric;
pub mod reference;
pub mod save;
pub mod selection;

// Re-export commonly used items
#[doc(inline)]
pub use backup::{smart_backup, update_after_edit, BackupError};
#[doc(inline)]
pub use crypto::{decrypt_dat, encrypt_dat, parse_key, CryptoError};
#[doc(inline)]
pub use items::{
    ArmorProperty, Enchantment, EnchantmentSlot, EquipmentSlot, Item, ItemId, PropertyRarity,
    Rarity, UNSET_ENCHANTMENT,
};
#[doc(inline)]
pub use reference::{
    EnchantmentRecord, ItemRecord, ItemVariant, ReferenceData, ReferenceError, ReferenceTable,
};
#[doc(inline)]
pub use save::{Currency, Location, SaveError, SaveState, INVENTORY_CAPACITY};
#[doc(inline)]
pub use selection::{SelectionSlot, SelectionState};
