//! Inventory and storage bookkeeping
//!
//! Items move between the inventory list and the storage chest. After every
//! change the `inventoryIndex` of each unequipped item in the touched lists
//! is rewritten to its position, so indices stay contiguous from zero.
//!
//! The 300 item inventory cap is not enforced here. Callers check
//! [`SaveState::no_space_available`] first and decide how to report it.

use std::fmt;

use super::{SaveError, SaveState};
use crate::items::{Item, ItemId, Rarity};
use crate::reference::ReferenceData;

/// Most items the inventory list may hold, equipped ones included
pub const INVENTORY_CAPACITY: usize = 300;

/// New inventory items go after this many leading entries (the equipment slots)
pub const EQUIPPED_SLOT_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Inventory,
    Storage,
}

impl Location {
    pub fn other(self) -> Self {
        match self {
            Self::Inventory => Self::Storage,
            Self::Storage => Self::Inventory,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inventory => write!(f, "inventory"),
            Self::Storage => write!(f, "storage"),
        }
    }
}

impl SaveState {
    fn list(&self, location: Location) -> &[Item] {
        match location {
            Location::Inventory => self.inventory(),
            Location::Storage => self.storage(),
        }
    }

    /// The list at `location`, created if the save had none
    fn list_mut(&mut self, location: Location) -> &mut Vec<Item> {
        let list = match location {
            Location::Inventory => &mut self.items,
            Location::Storage => &mut self.storage_items,
        };
        list.get_or_insert_with(Vec::new)
    }

    fn position(&self, id: ItemId) -> Result<(Location, usize), SaveError> {
        [Location::Inventory, Location::Storage]
            .into_iter()
            .find_map(|location| {
                self.list(location)
                    .iter()
                    .position(|item| item.id == id)
                    .map(|index| (location, index))
            })
            .ok_or(SaveError::NotFound(id))
    }

    /// Where an item currently lives
    pub fn location_of(&self, id: ItemId) -> Result<Location, SaveError> {
        self.position(id).map(|(location, _)| location)
    }

    /// True once the inventory holds [`INVENTORY_CAPACITY`] items
    pub fn no_space_available(&self) -> bool {
        self.inventory().len() >= INVENTORY_CAPACITY
    }

    fn insert_at_front(&mut self, item: Item, location: Location) {
        let list = self.list_mut(location);
        let at = match location {
            Location::Inventory => EQUIPPED_SLOT_COUNT.min(list.len()),
            Location::Storage => 0,
        };
        list.insert(at, item);
    }

    /// Rewrite `inventoryIndex` of every unequipped item in `location`
    fn reindex(&mut self, location: Location) {
        let unequipped = self
            .list_mut(location)
            .iter_mut()
            .filter(|item| !item.is_equipped());
        for (index, item) in (0u32..).zip(unequipped) {
            item.inventory_index = Some(index);
        }
    }

    /// Add an item, giving it a fresh id
    ///
    /// The item lands unequipped at the front of `location`: inventory items
    /// after the equipment slots, storage items first.
    pub fn add(&mut self, mut item: Item, location: Location) -> ItemId {
        let id = self.allocate_id();
        item.id = id;
        item.equipment_slot = None;

        tracing::debug!(%id, item_type = %item.item_type, %location, "adding item");
        self.insert_at_front(item, location);
        self.reindex(location);
        id
    }

    /// Build a new item from reference data and add it
    pub fn create(
        &mut self,
        item_type: &str,
        rarity: Rarity,
        power: f64,
        location: Location,
        reference: &dyn ReferenceData,
    ) -> Result<ItemId, SaveError> {
        let item = Item::new(item_type, rarity, power, reference)?;
        Ok(self.add(item, location))
    }

    /// Delete an item, returning it
    pub fn remove(&mut self, id: ItemId) -> Result<Item, SaveError> {
        let (location, index) = self.position(id)?;

        tracing::debug!(%id, %location, "removing item");
        let item = self.list_mut(location).remove(index);
        self.reindex(location);
        Ok(item)
    }

    /// Copy an item into the same location, returning the copy's id
    pub fn duplicate(&mut self, id: ItemId) -> Result<ItemId, SaveError> {
        let (location, index) = self.position(id)?;
        let copy = self.list(location)[index].clone();

        tracing::debug!(%id, %location, "duplicating item");
        Ok(self.add(copy, location))
    }

    /// Move an item between inventory and storage, returning its new location
    ///
    /// Equipped items cannot be moved.
    pub fn transfer(&mut self, id: ItemId) -> Result<Location, SaveError> {
        let (from, index) = self.position(id)?;
        if self.list(from)[index].is_equipped() {
            return Err(SaveError::Equipped(id));
        }

        let to = from.other();
        tracing::debug!(%id, %from, %to, "transferring item");

        let item = self.list_mut(from).remove(index);
        self.insert_at_front(item, to);
        self.reindex(Location::Inventory);
        self.reindex(Location::Storage);
        Ok(to)
    }
}
