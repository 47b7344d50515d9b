//! Items, enchantments and armor properties
//!
//! These mirror the item objects of the save JSON. Field names follow the
//! game's spelling on the wire; anything the editor does not model is kept in
//! the `extra` map of each type so it survives a load/save cycle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::numeric;
use crate::reference::{ItemVariant, ReferenceData};
use crate::save::SaveError;

/// Enchantment id marking an empty slot
pub const UNSET_ENCHANTMENT: &str = "Unset";

/// Enchantment entries on a fresh non-artifact item (three slots of three choices)
pub const ENCHANTMENT_SLOTS: usize = 9;

/// Editor-assigned identity of an item within a loaded save
///
/// Ids are handed out by [`crate::SaveState`] and never written to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Unique,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Common => write!(f, "Common"),
            Self::Rare => write!(f, "Rare"),
            Self::Unique => write!(f, "Unique"),
        }
    }
}

/// Armor properties only come in two rarities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyRarity {
    Common,
    Unique,
}

/// The six equipment slots; an item holding one is equipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    #[serde(rename = "MeleeGear")]
    Melee,
    #[serde(rename = "RangedGear")]
    Ranged,
    #[serde(rename = "ArmorGear")]
    Armor,
    #[serde(rename = "HotbarSlot1")]
    HotBar1,
    #[serde(rename = "HotbarSlot2")]
    HotBar2,
    #[serde(rename = "HotbarSlot3")]
    HotBar3,
}

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; 6] = [
        EquipmentSlot::Melee,
        EquipmentSlot::Ranged,
        EquipmentSlot::Armor,
        EquipmentSlot::HotBar1,
        EquipmentSlot::HotBar2,
        EquipmentSlot::HotBar3,
    ];

    /// Hotbar slots hold artifacts
    pub fn is_hotbar(&self) -> bool {
        matches!(self, Self::HotBar1 | Self::HotBar2 | Self::HotBar3)
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Melee => write!(f, "melee"),
            Self::Ranged => write!(f, "ranged"),
            Self::Armor => write!(f, "armor"),
            Self::HotBar1 => write!(f, "hotbar 1"),
            Self::HotBar2 => write!(f, "hotbar 2"),
            Self::HotBar3 => write!(f, "hotbar 3"),
        }
    }
}

/// Addresses one enchantment on an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnchantmentSlot {
    /// Position in the item's enchantment list
    Normal(usize),
    /// The separate netherite (gilded) enchantment
    Netherite,
}

impl fmt::Display for EnchantmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(index) => write!(f, "enchantment {}", index),
            Self::Netherite => write!(f, "netherite enchantment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enchantment {
    pub id: String,
    pub level: u32,
    #[serde(rename = "investedPoints", default)]
    invested_points: u32,
    #[serde(skip)]
    is_netherite: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Enchantment {
    pub(crate) fn new(id: &str, is_netherite: bool) -> Self {
        Enchantment {
            id: id.to_string(),
            level: 0,
            invested_points: 0,
            is_netherite,
            extra: Map::new(),
        }
    }

    pub fn is_unset(&self) -> bool {
        self.id == UNSET_ENCHANTMENT
    }

    pub fn is_netherite(&self) -> bool {
        self.is_netherite
    }

    /// Points spent on the current level; maintained by the leveling operations
    pub fn invested_points(&self) -> u32 {
        self.invested_points
    }

    pub(crate) fn set_invested_points(&mut self, points: u32) {
        self.invested_points = points;
    }

    pub(crate) fn mark_netherite(&mut self) {
        self.is_netherite = true;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorProperty {
    pub id: String,
    pub rarity: PropertyRarity,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ArmorProperty {
    pub fn new(id: &str, rarity: PropertyRarity) -> Self {
        ArmorProperty {
            id: id.to_string(),
            rarity,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    #[serde(skip)]
    pub(crate) id: ItemId,

    #[serde(rename = "type")]
    pub item_type: String,

    pub rarity: Rarity,

    /// Serialized power; see [`Item::in_game_power`]
    pub power: f64,

    #[serde(rename = "equipmentSlot", default, skip_serializing_if = "Option::is_none")]
    pub equipment_slot: Option<EquipmentSlot>,

    #[serde(rename = "inventoryIndex", default, skip_serializing_if = "Option::is_none")]
    pub inventory_index: Option<u32>,

    #[serde(rename = "armorproperties", default, skip_serializing_if = "Option::is_none")]
    pub armor_properties: Option<Vec<ArmorProperty>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    enchantments: Option<Vec<Enchantment>>,

    #[serde(rename = "netheriteEnchant", default, skip_serializing_if = "Option::is_none")]
    netherite_enchant: Option<Enchantment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<bool>,

    #[serde(rename = "timesmodified", default, skip_serializing_if = "Option::is_none")]
    pub times_modified: Option<u32>,

    #[serde(rename = "markedNew", default, skip_serializing_if = "Option::is_none")]
    pub marked_new: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Create a fresh item of `item_type`
    ///
    /// Armor gets an empty armor property list and every non-artifact gets
    /// [`ENCHANTMENT_SLOTS`] unset enchantments. The item has no identity
    /// until it is added to a save.
    pub fn new(
        item_type: &str,
        rarity: Rarity,
        power: f64,
        reference: &dyn ReferenceData,
    ) -> Result<Self, SaveError> {
        let variant = reference.require_item(item_type)?.variant;

        let armor_properties = (variant == ItemVariant::Armor).then(Vec::new);
        let enchantments = (variant != ItemVariant::Artifact).then(|| {
            (0..ENCHANTMENT_SLOTS)
                .map(|_| Enchantment::new(UNSET_ENCHANTMENT, false))
                .collect()
        });

        Ok(Item {
            id: ItemId::default(),
            item_type: item_type.to_string(),
            rarity,
            power,
            equipment_slot: None,
            inventory_index: None,
            armor_properties,
            enchantments,
            netherite_enchant: None,
            modified: None,
            times_modified: None,
            marked_new: Some(true),
            extra: Map::new(),
        })
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn variant(&self, reference: &dyn ReferenceData) -> Result<ItemVariant, SaveError> {
        Ok(reference.require_item(&self.item_type)?.variant)
    }

    pub fn is_equipped(&self) -> bool {
        self.equipment_slot.is_some()
    }

    /// Gilded items carry an active netherite enchantment
    pub fn is_gilded(&self) -> bool {
        self.netherite_enchant
            .as_ref()
            .is_some_and(|enchantment| !enchantment.is_unset())
    }

    pub fn in_game_power(&self) -> f64 {
        numeric::power_to_in_game(self.power)
    }

    pub fn set_in_game_power(&mut self, in_game: f64) {
        self.power = numeric::power_to_serialized(in_game);
    }

    /// The enchantment list, empty for items without one
    pub fn enchantments(&self) -> &[Enchantment] {
        self.enchantments.as_deref().unwrap_or(&[])
    }

    pub fn has_enchantment_list(&self) -> bool {
        self.enchantments.is_some()
    }

    pub fn netherite_enchant(&self) -> Option<&Enchantment> {
        self.netherite_enchant.as_ref()
    }

    pub fn enchantment(&self, slot: EnchantmentSlot) -> Option<&Enchantment> {
        match slot {
            EnchantmentSlot::Normal(index) => self.enchantments().get(index),
            EnchantmentSlot::Netherite => self.netherite_enchant.as_ref(),
        }
    }

    pub(crate) fn enchantment_mut(&mut self, slot: EnchantmentSlot) -> Option<&mut Enchantment> {
        match slot {
            EnchantmentSlot::Normal(index) => self
                .enchantments
                .as_mut()
                .and_then(|list| list.get_mut(index)),
            EnchantmentSlot::Netherite => self.netherite_enchant.as_mut(),
        }
    }

    /// Put `enchantment` into `slot`, creating the netherite slot if needed
    pub(crate) fn replace_enchantment(&mut self, slot: EnchantmentSlot, enchantment: Enchantment) {
        match slot {
            EnchantmentSlot::Normal(index) => {
                if let Some(existing) = self
                    .enchantments
                    .as_mut()
                    .and_then(|list| list.get_mut(index))
                {
                    *existing = enchantment;
                }
            }
            EnchantmentSlot::Netherite => self.netherite_enchant = Some(enchantment),
        }
    }

    pub(crate) fn enchantments_mut(&mut self) -> &mut [Enchantment] {
        self.enchantments.as_deref_mut().unwrap_or(&mut [])
    }

    /// Every enchantment on the item, netherite last
    pub fn all_enchantments(&self) -> impl Iterator<Item = &Enchantment> {
        self.enchantments().iter().chain(self.netherite_enchant.iter())
    }

    /// Sum of invested points over every enchantment on the item
    pub fn spent_points(&self) -> u32 {
        self.all_enchantments()
            .map(Enchantment::invested_points)
            .sum()
    }

    /// Flag the deserialized netherite enchantment, which has no marker on disk
    pub(crate) fn mark_netherite_slot(&mut self) {
        if let Some(enchantment) = self.netherite_enchant.as_mut() {
            enchantment.mark_netherite();
        }
    }
}
