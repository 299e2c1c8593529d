use anyhow::{Context, Result};
use larder_core::ItemCatalog;
use larder_world::{CookingCatalog, CraftingBook, StationConfig};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/larder.toml";

const BUILTIN_ITEMS: &str = include_str!("../data/items.json");
const BUILTIN_COOKING_RECIPES: &str = include_str!("../data/cooking_recipes.json");
const BUILTIN_CRAFTING_RECIPES: &str = include_str!("../data/crafting_recipes.json");

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LarderConfig {
    pub inventory_capacity: usize,
    pub storage_capacity: usize,
    pub station: StationConfig,
    /// Seconds per `advance` call in scripted cooking runs.
    pub tick_seconds: f64,
    pub items_path: Option<PathBuf>,
    pub cooking_recipes_path: Option<PathBuf>,
    pub crafting_recipes_path: Option<PathBuf>,
}

impl Default for LarderConfig {
    fn default() -> Self {
        Self {
            inventory_capacity: 16,
            storage_capacity: 16,
            station: StationConfig::default(),
            tick_seconds: 0.5,
            items_path: None,
            cooking_recipes_path: None,
            crafting_recipes_path: None,
        }
    }
}

impl LarderConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<LarderConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    LarderConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!("Config not found at {}. Using defaults", path.display());
                }
                LarderConfig::default()
            }
        }
    }
}

/// Catalogs the scenarios run against.
pub struct Catalogs {
    pub items: Arc<ItemCatalog>,
    pub cooking: Arc<CookingCatalog>,
    pub crafting: CraftingBook,
}

/// Load every catalog, preferring configured files over the built-in data.
pub fn load_catalogs(config: &LarderConfig) -> Result<Catalogs> {
    let items = match &config.items_path {
        Some(path) => ItemCatalog::from_file(path)
            .with_context(|| format!("Failed to load items from {}", path.display()))?,
        None => ItemCatalog::from_json_str(BUILTIN_ITEMS).context("Built-in item data is invalid")?,
    };
    let items = Arc::new(items);

    let cooking = match &config.cooking_recipes_path {
        Some(path) => CookingCatalog::load_from_file(path)
            .with_context(|| format!("Failed to load cooking recipes from {}", path.display()))?,
        None => CookingCatalog::load_from_str(BUILTIN_COOKING_RECIPES)?,
    };

    let crafting = match &config.crafting_recipes_path {
        Some(path) => CraftingBook::load_from_file(Arc::clone(&items), path)
            .with_context(|| format!("Failed to load crafting recipes from {}", path.display()))?,
        None => CraftingBook::load_from_str(Arc::clone(&items), BUILTIN_CRAFTING_RECIPES)?,
    };

    cooking
        .check_stack_sizes(&items)
        .context("Cooking recipe output does not fit its item's stack")?;
    for recipe in cooking.iter() {
        let outputs = [&recipe.cooked.item_id, &recipe.burned.item_id];
        for item_id in recipe.inputs.iter().map(|i| &i.item_id).chain(outputs) {
            if !items.contains(item_id) {
                warn!(recipe = %recipe.key, item_id = %item_id, "cooking recipe references unknown item");
            }
        }
    }

    Ok(Catalogs {
        items,
        cooking: Arc::new(cooking),
        crafting,
    })
}
