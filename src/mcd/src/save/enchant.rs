//! Enchantment leveling
//!
//! Invested points are never edited directly. They follow from the level,
//! whether the enchantment is powerful, and whether the item is gilded, so
//! every change here recomputes them. Replacing the netherite enchantment can
//! flip the gilded state, which re-prices every other enchantment on the item.

use super::{SaveError, SaveState};
use crate::items::{Enchantment, EnchantmentSlot, Item, ItemId, UNSET_ENCHANTMENT};
use crate::numeric::{self, MAX_ENCHANTMENT_LEVEL};
use crate::reference::ReferenceData;

/// Points an enchantment costs at `level` on an item with the given gilded state
fn cost(
    id: &str,
    is_netherite: bool,
    level: u32,
    gilded: bool,
    reference: &dyn ReferenceData,
) -> Result<u32, SaveError> {
    if is_netherite {
        return Ok(0);
    }
    let powerful = if id == UNSET_ENCHANTMENT {
        false
    } else {
        reference.require_enchantment(id)?.powerful
    };
    Ok(numeric::invested_points(level, powerful, gilded))
}

/// Costs of every normal enchantment at its current level
fn normal_costs(
    item: &Item,
    gilded: bool,
    reference: &dyn ReferenceData,
) -> Result<Vec<u32>, SaveError> {
    item.enchantments()
        .iter()
        .map(|e| cost(&e.id, false, e.level, gilded, reference))
        .collect()
}

fn check_level(slot: EnchantmentSlot, level: u32) -> Result<(), SaveError> {
    match slot {
        EnchantmentSlot::Normal(_) if level > MAX_ENCHANTMENT_LEVEL => {
            Err(SaveError::InvalidLevel(level))
        }
        _ => Ok(()),
    }
}

impl SaveState {
    /// Set an enchantment's level and recompute its invested points
    ///
    /// Returns the new invested points.
    pub fn apply_level(
        &mut self,
        item_id: ItemId,
        slot: EnchantmentSlot,
        level: u32,
        reference: &dyn ReferenceData,
    ) -> Result<u32, SaveError> {
        check_level(slot, level)?;

        let item = self.item_mut(item_id)?;
        let gilded = item.is_gilded();
        let enchantment = item
            .enchantment(slot)
            .ok_or(SaveError::NoSuchEnchantment { item: item_id, slot })?;
        let points = cost(
            &enchantment.id,
            enchantment.is_netherite(),
            level,
            gilded,
            reference,
        )?;

        if let Some(enchantment) = item.enchantment_mut(slot) {
            enchantment.level = level;
            enchantment.set_invested_points(points);
        }
        tracing::debug!(item = %item_id, %slot, level, points, "leveled enchantment");
        Ok(points)
    }

    /// Replace the enchantment in `slot` with a new one of `new_id`
    ///
    /// The replacement keeps the previous level, except that choosing the
    /// unset id resets it to 0 and filling an empty netherite slot starts at
    /// level 1. Touching the netherite slot of an item without one creates it.
    pub fn change_enchantment(
        &mut self,
        item_id: ItemId,
        slot: EnchantmentSlot,
        new_id: &str,
        reference: &dyn ReferenceData,
    ) -> Result<(), SaveError> {
        if new_id != UNSET_ENCHANTMENT {
            reference.require_enchantment(new_id)?;
        }

        let item = self.item_mut(item_id)?;
        let is_netherite = slot == EnchantmentSlot::Netherite;

        let (previous_id, previous_level) = match item.enchantment(slot) {
            Some(previous) => (previous.id.as_str(), previous.level),
            None if is_netherite => (UNSET_ENCHANTMENT, 0),
            None => return Err(SaveError::NoSuchEnchantment { item: item_id, slot }),
        };

        let level = if new_id == UNSET_ENCHANTMENT {
            0
        } else if is_netherite && previous_id == UNSET_ENCHANTMENT {
            1
        } else {
            previous_level
        };
        check_level(slot, level)?;

        let gilded = if is_netherite {
            new_id != UNSET_ENCHANTMENT
        } else {
            item.is_gilded()
        };

        // All lookups happen before the item is modified.
        let points = cost(new_id, is_netherite, level, gilded, reference)?;
        let sibling_costs = if is_netherite {
            Some(normal_costs(item, gilded, reference)?)
        } else {
            None
        };

        let mut replacement = Enchantment::new(new_id, is_netherite);
        replacement.level = level;
        replacement.set_invested_points(points);
        item.replace_enchantment(slot, replacement);

        if let Some(costs) = sibling_costs {
            for (enchantment, points) in item.enchantments_mut().iter_mut().zip(costs) {
                enchantment.set_invested_points(points);
            }
        }

        tracing::debug!(item = %item_id, %slot, id = new_id, level, gilded, "changed enchantment");
        Ok(())
    }

    /// Whether `enchantment_id` may be put on the item
    ///
    /// The enchantment must apply to the item's variant, and unless it allows
    /// duplicates the item must not carry it already.
    pub fn can_enchant(
        &self,
        item_id: ItemId,
        enchantment_id: &str,
        reference: &dyn ReferenceData,
    ) -> Result<bool, SaveError> {
        let item = self.item(item_id)?;
        let variant = item.variant(reference)?;
        let record = reference.require_enchantment(enchantment_id)?;

        if !record.applies_to(variant) {
            return Ok(false);
        }
        let already_present = item
            .all_enchantments()
            .any(|enchantment| enchantment.id == enchantment_id);
        Ok(record.multiple_allowed || !already_present)
    }
}
