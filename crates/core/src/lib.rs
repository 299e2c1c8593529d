#![warn(missing_docs)]
//! Core item primitives shared across the workspace.

pub mod item;
pub mod registry;

// Re-export commonly used types
pub use item::{
    CatalogError, ItemCatalog, ItemDef, ItemId, ARMOR_TAG, CRAFTABLE_TAG, FALLBACK_DURABILITY,
    WEAPON_TAG,
};
pub use registry::{InstanceId, ItemRegistry};
