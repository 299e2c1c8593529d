#![warn(missing_docs)]
//! Inventories, cooking stations and crafting built on `larder-core` items.

pub mod cooking;
pub mod crafting;
pub mod holder;
pub mod inventory;

#[cfg(test)]
mod fixtures;

pub use cooking::{
    CookingCatalog, CookingCatalogError, CookingRecipe, CookingStation, RecipeInput, RecipeOption,
    RecipeOutput, SelectError, Selection, SlotContents, StationConfig, STATION_UNKNOWN_STACK_SIZE,
};
pub use crafting::{CraftError, CraftReadiness, CraftingBook, CraftingRecipe, Shortage};
pub use holder::{Player, Storage};
pub use inventory::{
    transfer, Inventory, InventoryError, ItemStack, UNKNOWN_ITEM_STACK_SIZE,
};
