//! Save file parsing, querying, and modification.
//!
//! [`SaveState`] is the decoded save document. Items, currencies and
//! experience are modelled; every other top-level field is carried through
//! untouched.

mod enchant;
mod inventory;

pub use inventory::{Location, EQUIPPED_SLOT_COUNT, INVENTORY_CAPACITY};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::crypto::{self, CryptoError};
use crate::items::{EquipmentSlot, Item, ItemId};
use crate::numeric;
use crate::reference::{ReferenceData, ReferenceKind};

#[derive(Error, Debug)]
pub enum SaveError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("Save content is not valid JSON (wrong key?): {0}")]
    Content(#[source] serde_json::Error),

    #[error("Unknown {kind} id: {id}")]
    UnknownReference { kind: ReferenceKind, id: String },

    #[error("Item {0} not found in inventory or storage")]
    NotFound(ItemId),

    #[error("Item {0} is equipped")]
    Equipped(ItemId),

    #[error("Enchantment level {0} out of range (0-3)")]
    InvalidLevel(u32),

    #[error("Item {item} has no {slot}")]
    NoSuchEnchantment {
        item: ItemId,
        slot: crate::items::EnchantmentSlot,
    },
}

impl SaveError {
    pub(crate) fn unknown(kind: ReferenceKind, id: &str) -> Self {
        SaveError::UnknownReference {
            kind,
            id: id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A loaded save document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveState {
    // Absent sections stay absent on write
    /// Inventory, equipped items included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    items: Option<Vec<Item>>,

    #[serde(rename = "storageChestItems", default, skip_serializing_if = "Option::is_none")]
    storage_items: Option<Vec<Item>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    currencies: Option<Vec<Currency>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    xp: Option<i64>,

    #[serde(flatten)]
    extra: Map<String, Value>,

    #[serde(skip)]
    next_id: u64,
}

impl SaveState {
    /// Parse a save from decrypted JSON
    pub fn from_json(json_data: &[u8]) -> Result<Self, SaveError> {
        let mut save: SaveState = serde_json::from_slice(json_data).map_err(SaveError::Content)?;

        let items = save.items.iter_mut().flatten();
        for item in items.chain(save.storage_items.iter_mut().flatten()) {
            save.next_id += 1;
            item.id = ItemId(save.next_id);
            item.mark_netherite_slot();
        }

        tracing::debug!(
            inventory = save.inventory().len(),
            storage = save.storage().len(),
            "parsed save"
        );
        Ok(save)
    }

    /// Serialize the save back to compact JSON
    pub fn to_json(&self) -> Result<Vec<u8>, SaveError> {
        serde_json::to_vec(self).map_err(SaveError::Content)
    }

    /// Decrypt and parse a `.dat` container
    pub fn from_container(encrypted: &[u8], key: &[u8]) -> Result<Self, SaveError> {
        let json_data = crypto::decrypt_dat(encrypted, key)?;
        Self::from_json(&json_data)
    }

    /// Serialize and encrypt into a `.dat` container
    pub fn to_container(&self, key: &[u8]) -> Result<Vec<u8>, SaveError> {
        let json_data = self.to_json()?;
        Ok(crypto::encrypt_dat(&json_data, key)?)
    }

    pub(crate) fn allocate_id(&mut self) -> ItemId {
        self.next_id += 1;
        ItemId(self.next_id)
    }

    /// Inventory items, equipped ones included
    pub fn inventory(&self) -> &[Item] {
        self.items.as_deref().unwrap_or(&[])
    }

    pub fn storage(&self) -> &[Item] {
        self.storage_items.as_deref().unwrap_or(&[])
    }

    /// Every item in inventory then storage
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.inventory().iter().chain(self.storage().iter())
    }

    pub fn item(&self, id: ItemId) -> Result<&Item, SaveError> {
        self.all_items()
            .find(|item| item.id == id)
            .ok_or(SaveError::NotFound(id))
    }

    pub fn item_mut(&mut self, id: ItemId) -> Result<&mut Item, SaveError> {
        self.items
            .iter_mut()
            .flatten()
            .chain(self.storage_items.iter_mut().flatten())
            .find(|item| item.id == id)
            .ok_or(SaveError::NotFound(id))
    }

    /// The inventory item occupying an equipment slot
    pub fn equipped(&self, slot: EquipmentSlot) -> Option<&Item> {
        self.inventory()
            .iter()
            .find(|item| item.equipment_slot == Some(slot))
    }

    /// Unmodelled top-level fields
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Experience points; a missing entry counts as zero
    pub fn xp(&self) -> i64 {
        self.xp.unwrap_or(0)
    }

    pub fn set_xp(&mut self, xp: i64) {
        self.xp = Some(xp);
    }

    /// Player level as shown in game
    pub fn level(&self) -> f64 {
        numeric::level_to_in_game(self.xp())
    }

    /// Set experience from an in-game level
    pub fn set_level(&mut self, level: f64) {
        self.xp = Some(numeric::level_to_serialized(level));
    }

    pub fn currencies(&self) -> &[Currency] {
        self.currencies.as_deref().unwrap_or(&[])
    }

    /// Amount of a currency; a missing entry counts as zero
    pub fn currency(&self, kind: &str) -> u64 {
        self.currencies()
            .iter()
            .find(|c| c.kind == kind)
            .map_or(0, |c| c.count)
    }

    pub fn set_currency(&mut self, kind: &str, count: u64) {
        let currencies = self.currencies.get_or_insert_with(Vec::new);
        match currencies.iter_mut().find(|c| c.kind == kind) {
            Some(currency) => currency.count = count,
            None => currencies.push(Currency {
                kind: kind.to_string(),
                count,
                extra: Map::new(),
            }),
        }
    }

    /// Sum of invested enchantment points over inventory and storage
    pub fn spent_enchantment_points(&self) -> u32 {
        self.all_items().map(Item::spent_points).sum()
    }

    /// Player power from equipped items
    ///
    /// Melee, armor and ranged each weigh a quarter and every hotbar artifact
    /// a twelfth. Empty slots contribute nothing.
    pub fn player_power(&self) -> u32 {
        let (gear, artifacts) = EquipmentSlot::ALL
            .iter()
            .filter_map(|slot| self.equipped(*slot).map(|item| (slot, item.in_game_power())))
            .fold((0.0, 0.0), |(gear, artifacts), (slot, power)| {
                if slot.is_hotbar() {
                    (gear, artifacts + power)
                } else {
                    (gear + power, artifacts)
                }
            });
        (gear / 4.0 + artifacts / 12.0) as u32
    }

    /// Ids used by the save that `reference` does not know, in document order
    pub fn unknown_references(
        &self,
        reference: &dyn ReferenceData,
    ) -> Vec<(ReferenceKind, String)> {
        let mut unknown: Vec<(ReferenceKind, String)> = Vec::new();
        let mut note = |kind: ReferenceKind, id: &str| {
            if !unknown.iter().any(|(k, i)| *k == kind && i == id) {
                unknown.push((kind, id.to_string()));
            }
        };

        for item in self.all_items() {
            if reference.item(&item.item_type).is_none() {
                note(ReferenceKind::Item, &item.item_type);
            }
            for enchantment in item.all_enchantments().filter(|e| !e.is_unset()) {
                if reference.enchantment(&enchantment.id).is_none() {
                    note(ReferenceKind::Enchantment, &enchantment.id);
                }
            }
            for property in item.armor_properties.iter().flatten() {
                if reference.armor_property(&property.id).is_none() {
                    note(ReferenceKind::ArmorProperty, &property.id);
                }
            }
        }

        if !unknown.is_empty() {
            tracing::warn!(count = unknown.len(), "save uses ids missing from reference data");
        }
        unknown
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    // Test fixture: minimal save document
    pub(crate) fn test_save_json() -> &'static str {
        r#"{
            "version": 7,
            "playerId": "ABC123",
            "xp": 500,
            "currencies": [
                { "type": "Emerald", "count": 1200 },
                { "type": "Gold", "count": 35 }
            ],
            "items": [
                { "type": "Sword", "rarity": "Common", "power": 11.0, "equipmentSlot": "MeleeGear",
                  "enchantments": [ { "id": "Unset", "level": 0, "investedPoints": 0 } ],
                  "markedNew": false },
                { "type": "HuntersArmor", "rarity": "Rare", "power": 11.0, "equipmentSlot": "ArmorGear",
                  "armorproperties": [ { "id": "PetBat", "rarity": "Common" } ],
                  "enchantments": [ { "id": "Unset", "level": 0, "investedPoints": 0 } ],
                  "markedNew": false },
                { "type": "Bow", "rarity": "Common", "power": 11.0, "equipmentSlot": "RangedGear",
                  "enchantments": [ { "id": "Power", "level": 1, "investedPoints": 1 } ],
                  "markedNew": false },
                { "type": "TotemOfRegeneration", "rarity": "Common", "power": 7.0, "equipmentSlot": "HotbarSlot1",
                  "markedNew": false },
                { "type": "Sword", "rarity": "Unique", "power": 3.0, "inventoryIndex": 0,
                  "enchantments": [ { "id": "Sharpness", "level": 2, "investedPoints": 3 } ],
                  "markedNew": true },
                { "type": "Axe", "rarity": "Common", "power": 2.0, "inventoryIndex": 1,
                  "enchantments": [], "markedNew": false }
            ],
            "storageChestItems": [
                { "type": "Bow", "rarity": "Rare", "power": 4.0, "inventoryIndex": 0,
                  "enchantments": [ { "id": "Power", "level": 3, "investedPoints": 6 } ],
                  "netheriteEnchant": { "id": "Unset", "level": 0, "investedPoints": 0 },
                  "markedNew": false }
            ],
            "progress": { "squidcoast": { "completedDifficulty": "Default" } }
        }"#
    }

    pub(crate) fn test_save() -> SaveState {
        SaveState::from_json(test_save_json().as_bytes()).unwrap()
    }

    const KEY: [u8; 32] = [0x5A; 32];

    #[test]
    fn test_from_json() {
        let save = test_save();
        assert_eq!(save.inventory().len(), 6);
        assert_eq!(save.storage().len(), 1);
        assert_eq!(save.xp(), 500);
        assert_eq!(save.level(), 2.0);
    }

    #[test]
    fn test_ids_are_unique() {
        let save = test_save();
        let mut ids: Vec<ItemId> = save.all_items().map(Item::id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 7);
    }

    #[test]
    fn test_netherite_flag_set_on_parse() {
        let save = test_save();
        let bow = &save.storage()[0];
        assert!(bow.netherite_enchant().unwrap().is_netherite());
        assert!(!bow.enchantments()[0].is_netherite());
    }

    #[test]
    fn test_passthrough_fields_roundtrip() {
        let save = test_save();
        assert_eq!(save.extra().get("playerId"), Some(&Value::from("ABC123")));

        let json = save.to_json().unwrap();
        let original: Value = serde_json::from_str(test_save_json()).unwrap();
        let written: Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(original, written);
    }

    #[test]
    fn test_passthrough_survives_mutation() {
        let mut save = test_save();
        save.set_currency("Gold", 99);
        save.set_xp(4000);

        let written: Value = serde_json::from_slice(&save.to_json().unwrap()).unwrap();
        assert_eq!(written["version"], 7);
        assert_eq!(written["progress"]["squidcoast"]["completedDifficulty"], "Default");
        assert_eq!(written["xp"], 4000);
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let json = r#"{
            "items": [
                { "type": "Sword", "rarity": "Common", "power": 2.0, "inventoryIndex": 0,
                  "modified": false },
                { "type": "Axe", "rarity": "Common", "power": 2.0, "inventoryIndex": 1,
                  "markedNew": false, "timesmodified": 2, "modified": true }
            ],
            "version": 7
        }"#;
        let save = SaveState::from_json(json.as_bytes()).unwrap();
        assert_eq!(save.xp(), 0);
        assert_eq!(save.currency("Emerald"), 0);
        assert!(save.storage().is_empty());

        let original: Value = serde_json::from_str(json).unwrap();
        let written: Value = serde_json::from_slice(&save.to_json().unwrap()).unwrap();
        assert_eq!(original, written);
    }

    #[test]
    fn test_setters_create_missing_fields() {
        let mut save = SaveState::from_json(b"{}").unwrap();
        save.set_xp(100);
        save.set_currency("Gold", 3);

        let written: Value = serde_json::from_slice(&save.to_json().unwrap()).unwrap();
        assert_eq!(written["xp"], 100);
        assert_eq!(written["currencies"][0]["type"], "Gold");
        assert!(written.get("items").is_none());
    }

    #[test]
    fn test_container_roundtrip() {
        let save = test_save();
        let encrypted = save.to_container(&KEY).unwrap();
        let loaded = SaveState::from_container(&encrypted, &KEY).unwrap();

        let before: Value = serde_json::from_slice(&save.to_json().unwrap()).unwrap();
        let after: Value = serde_json::from_slice(&loaded.to_json().unwrap()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_container_wrong_key_is_content_error() {
        let encrypted = test_save().to_container(&KEY).unwrap();
        let mut wrong = KEY;
        wrong[31] ^= 0x80;
        let result = SaveState::from_container(&encrypted, &wrong);
        assert!(matches!(result, Err(SaveError::Content(_))));
    }

    #[test]
    fn test_container_bad_header_is_format_error() {
        let mut encrypted = test_save().to_container(&KEY).unwrap();
        for byte in &mut encrypted[..4] {
            *byte = !*byte;
        }
        match SaveState::from_container(&encrypted, &KEY) {
            Err(SaveError::Crypto(err)) => assert!(err.is_format_error()),
            other => panic!("expected format error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_invalid_json() {
        let result = SaveState::from_json(b"{\"items\": [ {\"type\": 3} ]}");
        assert!(matches!(result, Err(SaveError::Content(_))));
    }

    #[test]
    fn test_currency() {
        let mut save = test_save();
        assert_eq!(save.currency("Emerald"), 1200);
        assert_eq!(save.currency("EyeOfEnder"), 0);

        save.set_currency("EyeOfEnder", 3);
        save.set_currency("Emerald", 5);
        assert_eq!(save.currency("EyeOfEnder"), 3);
        assert_eq!(save.currency("Emerald"), 5);
        assert_eq!(save.currencies().len(), 3);
    }

    #[test]
    fn test_set_level() {
        let mut save = test_save();
        save.set_level(10.0);
        assert_eq!(save.xp(), 100 * 9 * 29);
        assert_eq!(save.level(), 10.0);
    }

    #[test]
    fn test_item_lookup() {
        let save = test_save();
        let first = save.inventory()[0].id();
        assert_eq!(save.item(first).unwrap().item_type, "Sword");
        assert!(matches!(
            save.item(ItemId(999)),
            Err(SaveError::NotFound(ItemId(999)))
        ));
        assert_eq!(
            save.equipped(EquipmentSlot::Ranged).map(|i| i.item_type.as_str()),
            Some("Bow")
        );
        assert!(save.equipped(EquipmentSlot::HotBar3).is_none());
    }

    #[test]
    fn test_spent_enchantment_points() {
        // 1 (equipped bow) + 3 (inventory sword) + 6 (stored bow)
        assert_eq!(test_save().spent_enchantment_points(), 10);
    }

    #[test]
    fn test_player_power() {
        // gear: 3 x 101 / 4 = 75.75, artifact: 61 / 12 = 5.08
        assert_eq!(test_save().player_power(), 80);
    }

    #[test]
    fn test_unknown_references() {
        use crate::reference::{EnchantmentRecord, ItemVariant, ReferenceTable};

        let reference = ReferenceTable::new()
            .with_item("Sword", ItemVariant::Melee)
            .with_item("Bow", ItemVariant::Ranged)
            .with_item("Axe", ItemVariant::Melee)
            .with_item("TotemOfRegeneration", ItemVariant::Artifact)
            .with_enchantment("Power", EnchantmentRecord::new(&[ItemVariant::Ranged]));

        let unknown = test_save().unknown_references(&reference);
        assert_eq!(
            unknown,
            vec![
                (ReferenceKind::Item, "HuntersArmor".to_string()),
                (ReferenceKind::ArmorProperty, "PetBat".to_string()),
                (ReferenceKind::Enchantment, "Sharpness".to_string()),
            ]
        );
    }

    #[test]
    fn test_player_power_empty() {
        let save = SaveState::from_json(b"{}").unwrap();
        assert_eq!(save.player_power(), 0);
        assert_eq!(save.spent_enchantment_points(), 0);
    }
}
