//! Shared catalogs for unit tests.

use crate::cooking::{CookingCatalog, CookingRecipe};
use larder_core::{ItemCatalog, ItemDef, ItemRegistry};
use std::sync::Arc;

pub(crate) fn catalog() -> Arc<ItemCatalog> {
    let defs = vec![
        ItemDef::new("wood", "Wood", 99).with_weight(0.5),
        ItemDef::new("stick", "Stick", 64),
        ItemDef::new("apple", "Apple", 16).with_tags(&["food"]),
        ItemDef::new("bread", "Bread", 16).with_tags(&["food"]),
        ItemDef::new("iron_ingot", "Iron Ingot", 64),
        ItemDef::new("cooked_apple", "Cooked Apple", 16).with_tags(&["food"]),
        ItemDef::new("burned_apple", "Burned Apple", 16),
        ItemDef::new("apple_pie", "Apple Pie", 4).with_tags(&["food"]),
        ItemDef::new("burned_apple_pie", "Burned Apple Pie", 4),
        ItemDef::new("iron_sword", "Iron Sword", 1)
            .with_tags(&["weapon"])
            .with_weight(3.5)
            .with_damage(6)
            .with_max_durability(250.0),
        ItemDef::new("cloth_armor", "Cloth Armor", 1)
            .with_tags(&["armor"])
            .with_protection(2.5)
            .with_max_durability(60.0),
        ItemDef::new("wooden_pickaxe", "Wooden Pickaxe", 1).with_tags(&["tool", "craftable"]),
        ItemDef::new("iron_pickaxe", "Iron Pickaxe", 1).with_tags(&["tool"]),
        ItemDef::new("torch", "Torch", 64).with_tags(&["craftable"]),
    ];
    Arc::new(ItemCatalog::new(defs).expect("fixture catalog is valid"))
}

pub(crate) fn registry() -> ItemRegistry {
    ItemRegistry::new(catalog())
}

pub(crate) fn cooking_catalog() -> Arc<CookingCatalog> {
    let recipes = vec![
        CookingRecipe::new(
            "cooked_apple",
            &[("apple", 1)],
            ("cooked_apple", 1),
            ("burned_apple", 1),
            5.0,
            5.0,
        ),
        CookingRecipe::new(
            "apple_pie",
            &[("apple", 1), ("bread", 1)],
            ("apple_pie", 1),
            ("burned_apple_pie", 1),
            10.0,
            10.0,
        ),
    ];
    Arc::new(CookingCatalog::new(recipes).expect("fixture recipes are valid"))
}
