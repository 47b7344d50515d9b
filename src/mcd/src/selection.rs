//! Editor selection
//!
//! Two slots, primary and secondary, each holding at most one item. An item
//! occupies at most one slot at a time. Selection is session state and is
//! never written to the save.

use crate::items::ItemId;
use crate::save::SaveState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionSlot {
    Primary,
    Secondary,
}

impl SelectionSlot {
    fn other(self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    primary: Option<ItemId>,
    secondary: Option<ItemId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: SelectionSlot) -> Option<ItemId> {
        match slot {
            SelectionSlot::Primary => self.primary,
            SelectionSlot::Secondary => self.secondary,
        }
    }

    fn slot_mut(&mut self, slot: SelectionSlot) -> &mut Option<ItemId> {
        match slot {
            SelectionSlot::Primary => &mut self.primary,
            SelectionSlot::Secondary => &mut self.secondary,
        }
    }

    pub fn is_selected(&self, item: ItemId) -> bool {
        self.primary == Some(item) || self.secondary == Some(item)
    }

    /// Toggle `item` in `slot`
    ///
    /// Selecting the current occupant clears the slot. Otherwise the item
    /// replaces whatever was in `slot`, leaving the other slot alone unless it
    /// held this same item.
    pub fn select(&mut self, item: ItemId, slot: SelectionSlot) {
        if self.get(slot) == Some(item) {
            *self.slot_mut(slot) = None;
            return;
        }
        let other = self.slot_mut(slot.other());
        if *other == Some(item) {
            *other = None;
        }
        *self.slot_mut(slot) = Some(item);
    }

    /// Point every slot holding `old` at `new`
    pub fn replace(&mut self, old: ItemId, new: ItemId) {
        for slot in [SelectionSlot::Primary, SelectionSlot::Secondary] {
            let current = self.slot_mut(slot);
            if *current == Some(old) {
                *current = Some(new);
            }
        }
        if self.primary.is_some() && self.primary == self.secondary {
            self.secondary = None;
        }
    }

    /// Clear any slot holding `item`
    pub fn deselect(&mut self, item: ItemId) {
        for slot in [SelectionSlot::Primary, SelectionSlot::Secondary] {
            let current = self.slot_mut(slot);
            if *current == Some(item) {
                *current = None;
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Drop selections of items no longer in `save`
    pub fn prune(&mut self, save: &SaveState) {
        for slot in [SelectionSlot::Primary, SelectionSlot::Secondary] {
            let current = self.slot_mut(slot);
            if current.is_some_and(|id| save.location_of(id).is_err()) {
                *current = None;
            }
        }
    }
}
