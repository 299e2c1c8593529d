//! Named inventory holders: the player and storage containers.

use crate::inventory::{Inventory, InventoryError};
use larder_core::ItemRegistry;
use std::fmt::Write as _;

/// Render an inventory under a heading, either one line or one slot per line.
fn render(heading: &str, inv: &Inventory, registry: &ItemRegistry, detailed: bool) -> String {
    let mut out = format!("== {heading} ==\n");
    if detailed {
        for index in 0..inv.capacity() {
            if let Some(line) = inv.describe_slot(registry, index) {
                let _ = writeln!(out, "{line}");
            }
        }
    } else {
        let _ = writeln!(out, "{inv}");
    }
    out
}

/// A player and the inventory they carry.
#[derive(Debug, Clone)]
pub struct Player {
    name: String,
    inventory: Inventory,
}

impl Player {
    /// Create a player with an empty inventory of `capacity` slots.
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            inventory: Inventory::new(capacity),
        }
    }

    /// Player name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The carried inventory.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Mutable access for stations and crafting.
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// See [`Inventory::add`].
    pub fn add(&mut self, registry: &mut ItemRegistry, item_id: &str, qty: u32) -> u32 {
        self.inventory.add(registry, item_id, qty)
    }

    /// See [`Inventory::remove`].
    pub fn remove(&mut self, registry: &mut ItemRegistry, item_id: &str, qty: u32) -> u32 {
        self.inventory.remove(registry, item_id, qty)
    }

    /// See [`Inventory::move_stack`].
    pub fn move_stack(&mut self, registry: &mut ItemRegistry, src: usize, dst: usize) -> bool {
        self.inventory.move_stack(registry, src, dst)
    }

    /// See [`Inventory::split`].
    pub fn split(&mut self, registry: &ItemRegistry, src: usize, dst: usize, amount: u32) -> bool {
        self.inventory.split(registry, src, dst, amount)
    }

    /// See [`Inventory::split_half`].
    pub fn split_half(&mut self, registry: &ItemRegistry, src: usize, dst: usize) -> bool {
        self.inventory.split_half(registry, src, dst)
    }

    /// See [`Inventory::sort`].
    pub fn sort(&mut self, registry: &ItemRegistry) {
        self.inventory.sort(registry);
    }

    /// See [`Inventory::count`].
    pub fn count(&self, item_id: &str) -> u32 {
        self.inventory.count(item_id)
    }

    /// See [`Inventory::set_slot`].
    pub fn set_slot(
        &mut self,
        registry: &mut ItemRegistry,
        index: usize,
        item_id: &str,
        qty: u32,
        current_durability: Option<f32>,
    ) -> Result<(), InventoryError> {
        self.inventory
            .set_slot(registry, index, item_id, qty, current_durability)
    }

    /// Inventory listing; `detailed` gives one described slot per line.
    pub fn show(&self, registry: &ItemRegistry, detailed: bool) -> String {
        render(
            &format!("{}'s Inventory", self.name),
            &self.inventory,
            registry,
            detailed,
        )
    }
}

/// A named storage container such as a chest.
#[derive(Debug, Clone)]
pub struct Storage {
    name: String,
    inventory: Inventory,
}

impl Storage {
    /// Create an empty container of `capacity` slots.
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            inventory: Inventory::new(capacity),
        }
    }

    /// Container name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stored inventory.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Mutable access for transfers.
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// See [`Inventory::add`].
    pub fn add(&mut self, registry: &mut ItemRegistry, item_id: &str, qty: u32) -> u32 {
        self.inventory.add(registry, item_id, qty)
    }

    /// See [`Inventory::remove`].
    pub fn remove(&mut self, registry: &mut ItemRegistry, item_id: &str, qty: u32) -> u32 {
        self.inventory.remove(registry, item_id, qty)
    }

    /// See [`Inventory::move_stack`].
    pub fn move_stack(&mut self, registry: &mut ItemRegistry, src: usize, dst: usize) -> bool {
        self.inventory.move_stack(registry, src, dst)
    }

    /// See [`Inventory::split`].
    pub fn split(&mut self, registry: &ItemRegistry, src: usize, dst: usize, amount: u32) -> bool {
        self.inventory.split(registry, src, dst, amount)
    }

    /// See [`Inventory::count`].
    pub fn count(&self, item_id: &str) -> u32 {
        self.inventory.count(item_id)
    }

    /// See [`Inventory::sort`].
    pub fn sort(&mut self, registry: &ItemRegistry) {
        self.inventory.sort(registry);
    }

    /// See [`Inventory::set_slot`].
    pub fn set_slot(
        &mut self,
        registry: &mut ItemRegistry,
        index: usize,
        item_id: &str,
        qty: u32,
        current_durability: Option<f32>,
    ) -> Result<(), InventoryError> {
        self.inventory
            .set_slot(registry, index, item_id, qty, current_durability)
    }

    /// Contents listing; `detailed` gives one described slot per line.
    pub fn show(&self, registry: &ItemRegistry, detailed: bool) -> String {
        render(&self.name, &self.inventory, registry, detailed)
    }
}
