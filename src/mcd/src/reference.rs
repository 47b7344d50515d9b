//! Reference data lookup
//!
//! Static descriptions of item types, enchantments and armor properties.
//! The editor core only reads this data; loading it from the game's asset
//! archives is done elsewhere and handed over as a [`ReferenceTable`] (or any
//! other [`ReferenceData`] implementation).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::save::SaveError;

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Failed to parse reference JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse reference YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Broad item category, decides which slots and attachments an item has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemVariant {
    Melee,
    Ranged,
    Armor,
    Artifact,
}

impl fmt::Display for ItemVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Melee => write!(f, "melee"),
            Self::Ranged => write!(f, "ranged"),
            Self::Armor => write!(f, "armor"),
            Self::Artifact => write!(f, "artifact"),
        }
    }
}

/// Which table a reference id was looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Item,
    Enchantment,
    ArmorProperty,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item => write!(f, "item"),
            Self::Enchantment => write!(f, "enchantment"),
            Self::ArmorProperty => write!(f, "armor property"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub variant: ItemVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnchantmentRecord {
    /// Powerful enchantments cost one extra point per level
    #[serde(default)]
    pub powerful: bool,
    /// Whether the same enchantment may appear more than once on an item
    #[serde(default)]
    pub multiple_allowed: bool,
    pub applicable_variants: Vec<ItemVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EnchantmentRecord {
    pub fn new(applicable_variants: &[ItemVariant]) -> Self {
        EnchantmentRecord {
            powerful: false,
            multiple_allowed: false,
            applicable_variants: applicable_variants.to_vec(),
            name: None,
        }
    }

    pub fn powerful(mut self) -> Self {
        self.powerful = true;
        self
    }

    pub fn multiple_allowed(mut self) -> Self {
        self.multiple_allowed = true;
        self
    }

    pub fn applies_to(&self, variant: ItemVariant) -> bool {
        self.applicable_variants.contains(&variant)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorPropertyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Read-only lookup of static game data by id
///
/// A miss from one of the `require_*` methods is an error: it means the save
/// file and the reference data disagree.
pub trait ReferenceData {
    fn item(&self, id: &str) -> Option<&ItemRecord>;

    fn enchantment(&self, id: &str) -> Option<&EnchantmentRecord>;

    fn armor_property(&self, id: &str) -> Option<&ArmorPropertyRecord>;

    fn require_item(&self, id: &str) -> Result<&ItemRecord, SaveError> {
        self.item(id)
            .ok_or_else(|| SaveError::unknown(ReferenceKind::Item, id))
    }

    fn require_enchantment(&self, id: &str) -> Result<&EnchantmentRecord, SaveError> {
        self.enchantment(id)
            .ok_or_else(|| SaveError::unknown(ReferenceKind::Enchantment, id))
    }

    fn require_armor_property(&self, id: &str) -> Result<&ArmorPropertyRecord, SaveError> {
        self.armor_property(id)
            .ok_or_else(|| SaveError::unknown(ReferenceKind::ArmorProperty, id))
    }
}

/// In-memory reference data keyed by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceTable {
    #[serde(default)]
    items: HashMap<String, ItemRecord>,
    #[serde(default)]
    enchantments: HashMap<String, EnchantmentRecord>,
    #[serde(default)]
    armor_properties: HashMap<String, ArmorPropertyRecord>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from JSON
    pub fn from_json(json: &str) -> Result<Self, ReferenceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a table from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, ReferenceError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn with_item(mut self, id: &str, variant: ItemVariant) -> Self {
        self.items
            .insert(id.to_string(), ItemRecord { variant, name: None });
        self
    }

    pub fn with_enchantment(mut self, id: &str, record: EnchantmentRecord) -> Self {
        self.enchantments.insert(id.to_string(), record);
        self
    }

    pub fn with_armor_property(mut self, id: &str) -> Self {
        self.armor_properties
            .insert(id.to_string(), ArmorPropertyRecord::default());
        self
    }

    /// Number of records across all tables
    pub fn len(&self) -> usize {
        self.items.len() + self.enchantments.len() + self.armor_properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReferenceData for ReferenceTable {
    fn item(&self, id: &str) -> Option<&ItemRecord> {
        self.items.get(id)
    }

    fn enchantment(&self, id: &str) -> Option<&EnchantmentRecord> {
        self.enchantments.get(id)
    }

    fn armor_property(&self, id: &str) -> Option<&ArmorPropertyRecord> {
        self.armor_properties.get(id)
    }
}
