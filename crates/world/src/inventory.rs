//! Inventory system for player and container storage.
//!
//! A fixed number of slots, each holding at most one [`ItemStack`]. Stacks of
//! the same stackable item merge up to the item's stack size; non-stackable
//! weapons and armor carry an [`InstanceId`] pointing at a durability record
//! in the [`ItemRegistry`] and never merge.
//!
//! Every operation either applies fully or leaves the slots untouched, except
//! `add`/`remove`, which report how many units they actually moved.

use larder_core::{InstanceId, ItemCatalog, ItemId, ItemRegistry};
use std::cmp::Reverse;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Stack size the inventory assumes for ids missing from the catalog.
pub const UNKNOWN_ITEM_STACK_SIZE: u32 = 1;

/// Represents a stack of items in an inventory slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    /// Item identifier.
    pub item_id: ItemId,
    /// Number of units, always at least 1 while stored in a slot.
    pub qty: u32,
    /// Durability record for non-stackable weapons and armor.
    pub instance: Option<InstanceId>,
}

impl ItemStack {
    /// Create a plain stack with no instance identity.
    pub fn new(item_id: impl Into<ItemId>, qty: u32) -> Self {
        Self {
            item_id: item_id.into(),
            qty,
            instance: None,
        }
    }

    /// Create a single unit bound to a durability record.
    pub fn with_instance(item_id: impl Into<ItemId>, instance: InstanceId) -> Self {
        Self {
            item_id: item_id.into(),
            qty: 1,
            instance: Some(instance),
        }
    }
}

/// Errors from seeding slots directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Slot index past the end of the inventory.
    #[error("slot {index} out of range (capacity {capacity})")]
    SlotOutOfRange {
        /// Requested slot.
        index: usize,
        /// Inventory capacity.
        capacity: usize,
    },
    /// Item id missing from the catalog.
    #[error("unknown item '{0}'")]
    UnknownItem(ItemId),
    /// Seeding zero units.
    #[error("cannot seed '{0}' with a quantity of 0")]
    ZeroQuantity(ItemId),
    /// Non-stackable weapons and armor occupy exactly one unit per slot.
    #[error("non-stackable item '{item_id}' must be seeded with qty = 1, got {qty}")]
    NonStackableQuantity {
        /// Item being seeded.
        item_id: ItemId,
        /// Rejected quantity.
        qty: u32,
    },
    /// Quantity larger than the item's stack size.
    #[error("'{item_id}' stacks to {max_stack}, cannot seed {qty}")]
    ExceedsStackSize {
        /// Item being seeded.
        item_id: ItemId,
        /// Rejected quantity.
        qty: u32,
        /// Declared stack size.
        max_stack: u32,
    },
}

/// Player or container inventory with a fixed number of slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
}

impl Inventory {
    /// Create an empty inventory with `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Stack size used by inventories; unknown ids stack to 1.
    pub fn stack_limit(catalog: &ItemCatalog, item_id: &str) -> u32 {
        catalog
            .stack_size(item_id)
            .unwrap_or(UNKNOWN_ITEM_STACK_SIZE)
    }

    /// Two stacks merge only when both are plain units of the same stackable item.
    pub fn can_stack(catalog: &ItemCatalog, a: &ItemStack, b: &ItemStack) -> bool {
        a.item_id == b.item_id
            && a.instance.is_none()
            && b.instance.is_none()
            && Self::stack_limit(catalog, &a.item_id) > 1
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// All slots in index order.
    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Get the stack in a slot.
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Get the number of empty slots.
    pub fn empty_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    /// Check if the inventory is completely empty.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Total quantity of `item_id` across all slots.
    pub fn count(&self, item_id: &str) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| stack.item_id == item_id)
            .map(|stack| stack.qty)
            .sum()
    }

    /// Add up to `qty` units, returning how many were placed.
    ///
    /// Tops up existing mergeable stacks left to right, then fills empty
    /// slots left to right. Each unit of a non-stackable weapon or armor gets
    /// its own durability record. Unknown ids are rejected without mutation.
    pub fn add(&mut self, registry: &mut ItemRegistry, item_id: &str, qty: u32) -> u32 {
        if qty == 0 {
            return 0;
        }
        let Some(max_stack) = registry.catalog().stack_size(item_id) else {
            warn!(item_id, "add rejected: unknown item");
            return 0;
        };

        let mut remaining = qty;

        // First pass: top up existing stacks.
        if max_stack > 1 {
            for stack in self.slots.iter_mut().flatten() {
                if stack.item_id != item_id || stack.instance.is_some() {
                    continue;
                }
                let take = max_stack.saturating_sub(stack.qty).min(remaining);
                stack.qty += take;
                remaining -= take;
                if remaining == 0 {
                    return qty;
                }
            }
        }

        // Second pass: fill empty slots.
        for slot in self.slots.iter_mut().filter(|slot| slot.is_none()) {
            let (place, instance) = if max_stack > 1 {
                (max_stack.min(remaining), None)
            } else {
                (1, registry.new_instance(item_id, None))
            };
            *slot = Some(ItemStack {
                item_id: item_id.to_string(),
                qty: place,
                instance,
            });
            remaining -= place;
            if remaining == 0 {
                return qty;
            }
        }

        qty - remaining
    }

    /// Remove up to `qty` units, returning how many were taken.
    ///
    /// Slots are drained right to left, so the rightmost stack (and its
    /// durability record) goes first.
    pub fn remove(&mut self, registry: &mut ItemRegistry, item_id: &str, qty: u32) -> u32 {
        let mut remaining = qty;

        for slot in self.slots.iter_mut().rev() {
            if remaining == 0 {
                break;
            }
            let drained = match slot {
                Some(stack) if stack.item_id == item_id => {
                    let take = stack.qty.min(remaining);
                    stack.qty -= take;
                    remaining -= take;
                    stack.qty == 0
                }
                _ => false,
            };
            if drained {
                clear_slot(registry, slot);
            }
        }

        qty - remaining
    }

    /// Move, merge or swap the stack at `src` with the one at `dst`.
    ///
    /// - `dst` empty: the stack relocates.
    /// - `src` empty: the stack at `dst` relocates into `src`.
    /// - same stackable item with room at `dst`: merges as much as fits.
    /// - anything else (including a full `dst`): the two stacks swap.
    ///
    /// Returns `false` for invalid or identical indices and when both slots
    /// are empty.
    pub fn move_stack(&mut self, registry: &mut ItemRegistry, src: usize, dst: usize) -> bool {
        if src >= self.capacity() || dst >= self.capacity() || src == dst {
            return false;
        }

        match (self.slots[src].is_some(), self.slots[dst].is_some()) {
            (false, false) => false,
            (true, false) => {
                self.slots[dst] = self.slots[src].take();
                true
            }
            (false, true) => {
                self.slots[src] = self.slots[dst].take();
                true
            }
            (true, true) => {
                if let Some(moved) = self.merge_amount(registry.catalog(), src, dst) {
                    if let Some(destination) = self.slots[dst].as_mut() {
                        destination.qty += moved;
                    }
                    let drained = self.slots[src].as_mut().is_some_and(|source| {
                        source.qty -= moved;
                        source.qty == 0
                    });
                    if drained {
                        clear_slot(registry, &mut self.slots[src]);
                    }
                    return true;
                }
                self.slots.swap(src, dst);
                true
            }
        }
    }

    /// Units that would merge from `src` into `dst`, if the stacks merge and
    /// `dst` has room.
    fn merge_amount(&self, catalog: &ItemCatalog, src: usize, dst: usize) -> Option<u32> {
        let source = self.slots[src].as_ref()?;
        let destination = self.slots[dst].as_ref()?;
        if !Self::can_stack(catalog, source, destination) {
            return None;
        }
        let space = Self::stack_limit(catalog, &destination.item_id).saturating_sub(destination.qty);
        if space == 0 {
            return None;
        }
        Some(space.min(source.qty))
    }

    /// Move `amount` units from `src` into the empty slot `dst`.
    ///
    /// The moved amount is capped at the item's stack size. Fails without
    /// mutation when `dst` is occupied or `src` holds fewer than `amount`.
    /// A durability record travels with the moved units.
    pub fn split(&mut self, registry: &ItemRegistry, src: usize, dst: usize, amount: u32) -> bool {
        if amount == 0 || src >= self.capacity() || dst >= self.capacity() || src == dst {
            return false;
        }
        if self.slots[dst].is_some() {
            return false;
        }
        let Some(source) = self.slots[src].as_mut() else {
            return false;
        };
        if source.qty < amount {
            return false;
        }

        let max_stack = Self::stack_limit(registry.catalog(), &source.item_id);
        let move_qty = amount.min(source.qty).min(max_stack);
        if move_qty == 0 {
            return false;
        }

        let moved = ItemStack {
            item_id: source.item_id.clone(),
            qty: move_qty,
            instance: source.instance.take(),
        };
        source.qty -= move_qty;
        if source.qty == 0 {
            self.slots[src] = None;
        }
        self.slots[dst] = Some(moved);
        true
    }

    /// Split half of the stack at `src` (rounded down) into the empty slot `dst`.
    pub fn split_half(&mut self, registry: &ItemRegistry, src: usize, dst: usize) -> bool {
        if src >= self.capacity() || dst >= self.capacity() || src == dst {
            return false;
        }
        let amount = match &self.slots[src] {
            Some(source) if source.qty >= 2 => source.qty / 2,
            _ => return false,
        };
        self.split(registry, src, dst, amount)
    }

    /// Rebuild the inventory: merge, order and pack from slot 0.
    ///
    /// Plain stackable units are pooled per item and re-split into full
    /// stacks plus at most one remainder. Everything else (instance-bound or
    /// non-stackable) is kept as-is. Stacks are then ordered by display name
    /// (case-insensitive), full before partial, item id, and larger quantity
    /// first.
    pub fn sort(&mut self, registry: &ItemRegistry) {
        let catalog = registry.catalog();
        let mut totals: Vec<(ItemId, u32)> = Vec::new();
        let mut stacks: Vec<ItemStack> = Vec::new();

        for stack in self.slots.iter_mut().filter_map(Option::take) {
            let mergeable =
                stack.instance.is_none() && Self::stack_limit(catalog, &stack.item_id) > 1;
            if !mergeable {
                stacks.push(stack);
                continue;
            }
            match totals.iter_mut().find(|(id, _)| *id == stack.item_id) {
                Some((_, total)) => *total += stack.qty,
                None => totals.push((stack.item_id, stack.qty)),
            }
        }

        for (item_id, total) in totals {
            let max_stack = Self::stack_limit(catalog, &item_id);
            let (full, rem) = (total / max_stack, total % max_stack);
            for _ in 0..full {
                stacks.push(ItemStack::new(item_id.clone(), max_stack));
            }
            if rem > 0 {
                stacks.push(ItemStack::new(item_id, rem));
            }
        }

        stacks.sort_by_cached_key(|stack| {
            let is_full = stack.qty >= Self::stack_limit(catalog, &stack.item_id);
            (
                catalog.name_of(&stack.item_id).to_lowercase(),
                !is_full,
                stack.item_id.clone(),
                Reverse(stack.qty),
            )
        });

        debug!(stacks = stacks.len(), capacity = self.capacity(), "inventory sorted");
        for (slot, stack) in self.slots.iter_mut().zip(stacks) {
            *slot = Some(stack);
        }
    }

    /// Place a stack directly, bypassing merge rules.
    ///
    /// Non-stackable weapons and armor get a fresh durability record
    /// (starting at `current_durability` when given) and must be seeded one
    /// unit at a time. Any record held by the replaced stack is destroyed.
    pub fn set_slot(
        &mut self,
        registry: &mut ItemRegistry,
        index: usize,
        item_id: &str,
        qty: u32,
        current_durability: Option<f32>,
    ) -> Result<(), InventoryError> {
        if index >= self.capacity() {
            return Err(InventoryError::SlotOutOfRange {
                index,
                capacity: self.capacity(),
            });
        }
        let Some(def) = registry.def(item_id) else {
            return Err(InventoryError::UnknownItem(item_id.to_string()));
        };
        if qty == 0 {
            return Err(InventoryError::ZeroQuantity(item_id.to_string()));
        }
        let tracked = def.tracks_instances();
        if tracked && qty != 1 {
            return Err(InventoryError::NonStackableQuantity {
                item_id: item_id.to_string(),
                qty,
            });
        }
        if qty > def.stack_size {
            return Err(InventoryError::ExceedsStackSize {
                item_id: item_id.to_string(),
                qty,
                max_stack: def.stack_size,
            });
        }

        clear_slot(registry, &mut self.slots[index]);
        let instance = if tracked {
            registry.new_instance(item_id, current_durability)
        } else {
            None
        };
        self.slots[index] = Some(ItemStack {
            item_id: item_id.to_string(),
            qty,
            instance,
        });
        Ok(())
    }

    /// Human-readable attribute line for a slot, or `None` past the end.
    pub fn describe_slot(&self, registry: &ItemRegistry, index: usize) -> Option<String> {
        let slot = self.slots.get(index)?;
        let Some(stack) = slot else {
            return Some(format!("{index:02} : empty"));
        };

        let def = registry.def(&stack.item_id);
        let name = def.map(|d| d.name.as_str()).unwrap_or(&stack.item_id);
        let stack_size = def.map(|d| d.stack_size).unwrap_or(UNKNOWN_ITEM_STACK_SIZE);
        let weight = def.map(|d| d.weight).unwrap_or(0.0);
        let tags = def.map(|d| d.tags.join(", ")).unwrap_or_default();

        let mut attrs = vec![
            format!("{index:02} : {name} (id={})", stack.item_id),
            format!("qty = {}/{stack_size}", stack.qty),
            format!("weight = {weight:.2}"),
            format!("tags = [{tags}]"),
        ];

        if let Some(def) = def {
            if let Some(damage) = def.base_damage {
                attrs.push(format!("damage = {damage}"));
            }
            if let Some(protection) = def.base_protection {
                attrs.push(format!("protection = {protection}"));
            }
            if !def.status_effects.is_empty() {
                attrs.push(format!("effects = [{}]", def.status_effects.join(", ")));
            }
        }

        let current = stack.instance.and_then(|iid| registry.durability(iid));
        let ratio = stack.instance.and_then(|iid| registry.durability_ratio(iid));
        let max = def.and_then(|d| d.max_durability);
        let current_txt = current.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"));
        let max_txt = max.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"));
        let ratio_txt = ratio.map_or_else(|| "n/a".to_string(), |r| format!("{:.1}%", r * 100.0));
        attrs.push(format!("dur = {current_txt}/{max_txt} ({ratio_txt})"));

        Some(attrs.join(" | "))
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            match slot {
                Some(stack) => write!(f, "{i:02}: {} x{}", stack.item_id, stack.qty)?,
                None => write!(f, "{i:02}: empty")?,
            }
        }
        Ok(())
    }
}

/// Empty a slot, destroying any durability record it held.
fn clear_slot(registry: &mut ItemRegistry, slot: &mut Option<ItemStack>) {
    if let Some(iid) = slot.take().and_then(|stack| stack.instance) {
        registry.destroy_instance(iid);
    }
}

/// Move, merge or swap a stack between two different inventories.
///
/// Same rules as [`Inventory::move_stack`], except the source slot must be
/// occupied. Durability records travel with their stacks.
pub fn transfer(
    registry: &ItemRegistry,
    src_inv: &mut Inventory,
    src_idx: usize,
    dst_inv: &mut Inventory,
    dst_idx: usize,
) -> bool {
    if src_idx >= src_inv.capacity() || dst_idx >= dst_inv.capacity() {
        return false;
    }
    let Some(mut source) = src_inv.slots[src_idx].take() else {
        return false;
    };
    let Some(mut destination) = dst_inv.slots[dst_idx].take() else {
        dst_inv.slots[dst_idx] = Some(source);
        return true;
    };

    let catalog = registry.catalog();
    if Inventory::can_stack(catalog, &source, &destination) {
        let space =
            Inventory::stack_limit(catalog, &destination.item_id).saturating_sub(destination.qty);
        if space > 0 {
            let moved = space.min(source.qty);
            destination.qty += moved;
            source.qty -= moved;
            dst_inv.slots[dst_idx] = Some(destination);
            src_inv.slots[src_idx] = (source.qty > 0).then_some(source);
            return true;
        }
    }

    src_inv.slots[src_idx] = Some(destination);
    dst_inv.slots[dst_idx] = Some(source);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn qty_at(inv: &Inventory, slot: usize) -> Option<(&str, u32)> {
        inv.get(slot).map(|s| (s.item_id.as_str(), s.qty))
    }

    #[test]
    fn add_tops_up_then_fills_empties() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(4);

        assert_eq!(inv.add(&mut reg, "wood", 50), 50);
        assert_eq!(inv.add(&mut reg, "wood", 60), 60);
        assert_eq!(qty_at(&inv, 0), Some(("wood", 99)));
        assert_eq!(qty_at(&inv, 1), Some(("wood", 11)));
        assert_eq!(inv.count("wood"), 110);
    }

    #[test]
    fn add_reports_partial_placement() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(2);

        assert_eq!(inv.add(&mut reg, "apple", 40), 32);
        assert_eq!(inv.count("apple"), 32);
        assert_eq!(inv.empty_slots(), 0);
        assert_eq!(inv.add(&mut reg, "apple", 1), 0);
    }

    #[test]
    fn add_unknown_item_is_a_no_op() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(3);

        assert_eq!(inv.add(&mut reg, "phlogiston", 5), 0);
        assert!(inv.is_empty());
        assert_eq!(inv.add(&mut reg, "wood", 0), 0);
        assert!(inv.is_empty());
    }

    #[test]
    fn add_weapons_allocates_one_instance_per_unit() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(4);

        assert_eq!(inv.add(&mut reg, "iron_sword", 3), 3);
        let ids: Vec<_> = (0..3).map(|i| inv.get(i).unwrap().instance.unwrap()).collect();
        assert_eq!(reg.instance_count(), 3);
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_eq!(reg.durability(ids[0]), Some(250.0));
    }

    #[test]
    fn remove_drains_rightmost_first() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(3);
        inv.set_slot(&mut reg, 0, "wood", 99, None).unwrap();
        inv.set_slot(&mut reg, 1, "wood", 20, None).unwrap();

        assert_eq!(inv.remove(&mut reg, "wood", 10), 10);
        assert_eq!(qty_at(&inv, 0), Some(("wood", 99)));
        assert_eq!(qty_at(&inv, 1), Some(("wood", 10)));

        assert_eq!(inv.remove(&mut reg, "wood", 15), 15);
        assert!(inv.get(1).is_none());
        assert_eq!(qty_at(&inv, 0), Some(("wood", 94)));
    }

    #[test]
    fn remove_caps_at_available_and_destroys_instances() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(3);
        inv.add(&mut reg, "iron_sword", 2);
        let left = inv.get(0).unwrap().instance.unwrap();
        let right = inv.get(1).unwrap().instance.unwrap();

        assert_eq!(inv.remove(&mut reg, "iron_sword", 1), 1);
        assert!(reg.contains_instance(left));
        assert!(!reg.contains_instance(right));

        assert_eq!(inv.remove(&mut reg, "iron_sword", 5), 1);
        assert_eq!(reg.instance_count(), 0);
        assert!(inv.is_empty());
    }

    #[test]
    fn move_into_empty_and_back() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(4);
        inv.set_slot(&mut reg, 0, "apple", 5, None).unwrap();

        assert!(inv.move_stack(&mut reg, 0, 3));
        assert_eq!(qty_at(&inv, 3), Some(("apple", 5)));
        assert!(inv.get(0).is_none());

        // Empty source pulls the destination stack back.
        assert!(inv.move_stack(&mut reg, 0, 3));
        assert_eq!(qty_at(&inv, 0), Some(("apple", 5)));
        assert!(inv.get(3).is_none());
    }

    #[test]
    fn move_rejects_bad_indices() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(2);
        inv.set_slot(&mut reg, 0, "apple", 5, None).unwrap();

        assert!(!inv.move_stack(&mut reg, 0, 0));
        assert!(!inv.move_stack(&mut reg, 0, 2));
        assert!(!inv.move_stack(&mut reg, 5, 0));

        let mut empty = Inventory::new(2);
        assert!(!empty.move_stack(&mut reg, 0, 1));
    }

    #[test]
    fn move_merges_up_to_stack_size() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(3);
        inv.set_slot(&mut reg, 0, "wood", 95, None).unwrap();
        inv.set_slot(&mut reg, 1, "wood", 20, None).unwrap();

        assert!(inv.move_stack(&mut reg, 1, 0));
        assert_eq!(qty_at(&inv, 0), Some(("wood", 99)));
        assert_eq!(qty_at(&inv, 1), Some(("wood", 16)));

        inv.set_slot(&mut reg, 2, "wood", 50, None).unwrap();
        assert!(inv.move_stack(&mut reg, 1, 2));
        assert!(inv.get(1).is_none());
        assert_eq!(qty_at(&inv, 2), Some(("wood", 66)));
    }

    #[test]
    fn move_full_same_item_swaps() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(2);
        inv.set_slot(&mut reg, 0, "wood", 40, None).unwrap();
        inv.set_slot(&mut reg, 1, "wood", 99, None).unwrap();

        assert!(inv.move_stack(&mut reg, 0, 1));
        assert_eq!(qty_at(&inv, 0), Some(("wood", 99)));
        assert_eq!(qty_at(&inv, 1), Some(("wood", 40)));
    }

    #[test]
    fn move_swaps_instances_with_their_durability() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(2);
        inv.set_slot(&mut reg, 0, "iron_sword", 1, Some(237.5)).unwrap();
        inv.set_slot(&mut reg, 1, "iron_sword", 1, Some(125.0)).unwrap();
        let first = inv.get(0).unwrap().instance;

        assert!(inv.move_stack(&mut reg, 0, 1));
        assert_eq!(inv.get(1).unwrap().instance, first);
        assert_eq!(reg.durability(first.unwrap()), Some(237.5));
        let second = inv.get(0).unwrap().instance.unwrap();
        assert_eq!(reg.durability(second), Some(125.0));
        assert_eq!(reg.instance_count(), 2);
    }

    #[test]
    fn move_different_items_swaps() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(2);
        inv.set_slot(&mut reg, 0, "iron_sword", 1, None).unwrap();
        inv.set_slot(&mut reg, 1, "wood", 99, None).unwrap();

        assert!(inv.move_stack(&mut reg, 0, 1));
        assert_eq!(qty_at(&inv, 0), Some(("wood", 99)));
        assert_eq!(qty_at(&inv, 1), Some(("iron_sword", 1)));
    }

    #[test]
    fn split_requires_empty_destination() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(4);
        inv.set_slot(&mut reg, 0, "wood", 16, None).unwrap();
        inv.set_slot(&mut reg, 2, "apple", 5, None).unwrap();

        assert!(inv.split(&reg, 0, 3, 8));
        assert_eq!(qty_at(&inv, 0), Some(("wood", 8)));
        assert_eq!(qty_at(&inv, 3), Some(("wood", 8)));

        let before = inv.clone();
        assert!(!inv.split(&reg, 2, 0, 2));
        assert!(!inv.split(&reg, 2, 1, 6));
        assert!(!inv.split(&reg, 1, 2, 1));
        assert!(!inv.split(&reg, 2, 1, 0));
        assert_eq!(inv, before);
    }

    #[test]
    fn split_whole_stack_relocates() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(2);
        inv.set_slot(&mut reg, 0, "apple", 5, None).unwrap();

        assert!(inv.split(&reg, 0, 1, 5));
        assert!(inv.get(0).is_none());
        assert_eq!(qty_at(&inv, 1), Some(("apple", 5)));
    }

    #[test]
    fn split_single_instance_keeps_identity() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(2);
        inv.set_slot(&mut reg, 0, "iron_sword", 1, Some(80.0)).unwrap();
        let iid = inv.get(0).unwrap().instance;

        assert!(inv.split(&reg, 0, 1, 1));
        assert!(inv.get(0).is_none());
        assert_eq!(inv.get(1).unwrap().instance, iid);
        assert_eq!(reg.durability(iid.unwrap()), Some(80.0));
    }

    #[test]
    fn split_half_rounds_down() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(7);
        inv.set_slot(&mut reg, 0, "wood", 99, None).unwrap();
        inv.set_slot(&mut reg, 1, "apple", 1, None).unwrap();

        assert!(inv.split_half(&reg, 0, 6));
        assert_eq!(qty_at(&inv, 0), Some(("wood", 50)));
        assert_eq!(qty_at(&inv, 6), Some(("wood", 49)));

        assert!(!inv.split_half(&reg, 1, 2));
        assert!(!inv.split_half(&reg, 3, 2));
        assert!(!inv.split_half(&reg, 0, 0));
    }

    #[test]
    fn sort_merges_orders_and_packs() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(8);
        inv.set_slot(&mut reg, 1, "wood", 60, None).unwrap();
        inv.set_slot(&mut reg, 2, "iron_sword", 1, None).unwrap();
        inv.set_slot(&mut reg, 4, "apple", 3, None).unwrap();
        inv.set_slot(&mut reg, 5, "wood", 50, None).unwrap();
        inv.set_slot(&mut reg, 7, "apple", 10, None).unwrap();
        let sword = inv.get(2).unwrap().instance;

        inv.sort(&reg);

        assert_eq!(qty_at(&inv, 0), Some(("apple", 13)));
        assert_eq!(qty_at(&inv, 1), Some(("iron_sword", 1)));
        assert_eq!(inv.get(1).unwrap().instance, sword);
        assert_eq!(qty_at(&inv, 2), Some(("wood", 99)));
        assert_eq!(qty_at(&inv, 3), Some(("wood", 11)));
        assert!(inv.slots()[4..].iter().all(Option::is_none));
        assert_eq!(reg.instance_count(), 1);
    }

    #[test]
    fn sort_is_idempotent() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(6);
        inv.add(&mut reg, "cloth_armor", 2);
        inv.set_slot(&mut reg, 3, "bread", 7, None).unwrap();
        inv.set_slot(&mut reg, 4, "bread", 16, None).unwrap();
        inv.set_slot(&mut reg, 5, "stick", 3, None).unwrap();

        inv.sort(&reg);
        let once = inv.clone();
        inv.sort(&reg);
        assert_eq!(inv, once);
    }

    #[test]
    fn set_slot_validates_seed() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(2);

        assert_eq!(
            inv.set_slot(&mut reg, 2, "wood", 1, None),
            Err(InventoryError::SlotOutOfRange {
                index: 2,
                capacity: 2
            })
        );
        assert!(matches!(
            inv.set_slot(&mut reg, 0, "iron_sword", 2, None),
            Err(InventoryError::NonStackableQuantity { qty: 2, .. })
        ));
        assert!(matches!(
            inv.set_slot(&mut reg, 0, "wood", 0, None),
            Err(InventoryError::ZeroQuantity(_))
        ));
        assert!(matches!(
            inv.set_slot(&mut reg, 0, "apple", 17, None),
            Err(InventoryError::ExceedsStackSize { max_stack: 16, .. })
        ));
        assert!(matches!(
            inv.set_slot(&mut reg, 0, "nope", 1, None),
            Err(InventoryError::UnknownItem(_))
        ));
        assert!(inv.is_empty());
        assert_eq!(reg.instance_count(), 0);
    }

    #[test]
    fn set_slot_replacing_instance_destroys_old_record() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(1);
        inv.set_slot(&mut reg, 0, "iron_sword", 1, None).unwrap();
        let old = inv.get(0).unwrap().instance.unwrap();

        inv.set_slot(&mut reg, 0, "wood", 4, None).unwrap();
        assert!(!reg.contains_instance(old));
        assert_eq!(reg.instance_count(), 0);
    }

    #[test]
    fn describe_slot_includes_durability() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(3);
        inv.set_slot(&mut reg, 0, "iron_sword", 1, Some(125.0)).unwrap();
        inv.set_slot(&mut reg, 1, "wood", 5, None).unwrap();

        assert_eq!(
            inv.describe_slot(&reg, 0).unwrap(),
            "00 : Iron Sword (id=iron_sword) | qty = 1/1 | weight = 3.50 | tags = [weapon] \
             | damage = 6 | dur = 125.00/250.00 (50.0%)"
        );
        assert_eq!(
            inv.describe_slot(&reg, 1).unwrap(),
            "01 : Wood (id=wood) | qty = 5/99 | weight = 0.50 | tags = [] | dur = n/a/n/a (n/a)"
        );
        assert_eq!(inv.describe_slot(&reg, 2).unwrap(), "02 : empty");
        assert_eq!(inv.describe_slot(&reg, 3), None);
    }

    #[test]
    fn display_lists_every_slot() {
        let mut reg = fixtures::registry();
        let mut inv = Inventory::new(3);
        inv.set_slot(&mut reg, 1, "wood", 5, None).unwrap();
        assert_eq!(inv.to_string(), "00: empty | 01: wood x5 | 02: empty");
    }

    #[test]
    fn transfer_between_inventories() {
        let mut reg = fixtures::registry();
        let mut player = Inventory::new(2);
        let mut chest = Inventory::new(2);
        player.set_slot(&mut reg, 0, "wood", 90, None).unwrap();
        chest.set_slot(&mut reg, 0, "wood", 30, None).unwrap();
        chest.set_slot(&mut reg, 1, "iron_sword", 1, None).unwrap();

        // Merge until the destination is full.
        assert!(transfer(&reg, &mut chest, 0, &mut player, 0));
        assert_eq!(qty_at(&player, 0), Some(("wood", 99)));
        assert_eq!(qty_at(&chest, 0), Some(("wood", 21)));

        // Full destination swaps.
        assert!(transfer(&reg, &mut chest, 0, &mut player, 0));
        assert_eq!(qty_at(&player, 0), Some(("wood", 21)));
        assert_eq!(qty_at(&chest, 0), Some(("wood", 99)));

        // Into an empty slot.
        let sword = chest.get(1).unwrap().instance;
        assert!(transfer(&reg, &mut chest, 1, &mut player, 1));
        assert_eq!(player.get(1).unwrap().instance, sword);
        assert!(chest.get(1).is_none());

        // Empty source or bad index.
        assert!(!transfer(&reg, &mut chest, 1, &mut player, 0));
        assert!(!transfer(&reg, &mut chest, 0, &mut player, 9));
    }
}
