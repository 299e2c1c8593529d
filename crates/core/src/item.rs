//! Item definitions - static per-item data and the catalog that indexes it.
//!
//! The catalog is loaded once (usually from a JSON pack) and shared read-only
//! between inventories, cooking stations and crafting books.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Item identifier (e.g., `"wood"`, `"iron_sword"`).
pub type ItemId = String;

/// Tag marking combat weapons.
pub const WEAPON_TAG: &str = "weapon";
/// Tag marking wearable armor.
pub const ARMOR_TAG: &str = "armor";
/// Tag marking items intended to come out of a crafting recipe.
pub const CRAFTABLE_TAG: &str = "craftable";

/// Starting durability for weapons and armor that declare no maximum.
pub const FALLBACK_DURABILITY: f32 = 100.0;

/// Static definition of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    /// Unique identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Maximum units per inventory slot.
    #[serde(default = "default_stack_size")]
    pub stack_size: u32,
    /// Weight of a single unit.
    #[serde(default)]
    pub weight: f32,
    /// Free-form classification tags (`weapon`, `armor`, `food`, ...).
    #[serde(default)]
    pub tags: Vec<String>,
    /// Base damage for weapons.
    #[serde(default)]
    pub base_damage: Option<u32>,
    /// Maximum durability for items with per-instance wear.
    #[serde(default)]
    pub max_durability: Option<f32>,
    /// Base protection for armor.
    #[serde(default)]
    pub base_protection: Option<f32>,
    /// Status effects applied on use or hit.
    #[serde(default)]
    pub status_effects: Vec<String>,
}

fn default_stack_size() -> u32 {
    1
}

impl ItemDef {
    /// Create a plain definition with no tags or combat stats.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, stack_size: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stack_size,
            weight: 0.0,
            tags: Vec::new(),
            base_damage: None,
            max_durability: None,
            base_protection: None,
            status_effects: Vec::new(),
        }
    }

    /// Replace the tag list.
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Set the unit weight.
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Set the maximum durability.
    pub fn with_max_durability(mut self, max_durability: f32) -> Self {
        self.max_durability = Some(max_durability);
        self
    }

    /// Set the base damage.
    pub fn with_damage(mut self, damage: u32) -> Self {
        self.base_damage = Some(damage);
        self
    }

    /// Set the base protection.
    pub fn with_protection(mut self, protection: f32) -> Self {
        self.base_protection = Some(protection);
        self
    }

    /// Check whether the item carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Weapon items carry the `weapon` tag.
    pub fn is_weapon(&self) -> bool {
        self.has_tag(WEAPON_TAG)
    }

    /// Armor items carry the `armor` tag.
    pub fn is_armor(&self) -> bool {
        self.has_tag(ARMOR_TAG)
    }

    /// Non-stackable weapons and armor get a durability record per unit.
    pub fn tracks_instances(&self) -> bool {
        self.stack_size <= 1 && (self.is_weapon() || self.is_armor())
    }
}

/// Errors emitted while building or loading an item catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Wrap IO errors when reading item packs.
    #[error("failed to read item catalog: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse item catalog: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two definitions share an id.
    #[error("duplicate item id '{0}'")]
    DuplicateItem(ItemId),
    /// A definition declares a stack size of zero.
    #[error("item '{0}' has a stack size of 0")]
    InvalidStackSize(ItemId),
}

/// Read-only index of item definitions keyed by id.
///
/// Iteration is ordered by id so anything derived from the catalog is stable
/// across runs.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    defs: BTreeMap<ItemId, ItemDef>,
}

impl ItemCatalog {
    /// Build a catalog, rejecting duplicate ids and zero stack sizes.
    pub fn new(defs: Vec<ItemDef>) -> Result<Self, CatalogError> {
        let mut map = BTreeMap::new();
        for def in defs {
            if def.stack_size == 0 {
                return Err(CatalogError::InvalidStackSize(def.id));
            }
            if map.contains_key(&def.id) {
                return Err(CatalogError::DuplicateItem(def.id));
            }
            map.insert(def.id.clone(), def);
        }
        Ok(Self { defs: map })
    }

    /// Parse a JSON array of item definitions.
    pub fn from_json_str(input: &str) -> Result<Self, CatalogError> {
        let defs: Vec<ItemDef> = serde_json::from_str(input)?;
        Self::new(defs)
    }

    /// Load a JSON array of item definitions from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Look up a definition.
    pub fn get(&self, item_id: &str) -> Option<&ItemDef> {
        self.defs.get(item_id)
    }

    /// Check whether an id is known.
    pub fn contains(&self, item_id: &str) -> bool {
        self.defs.contains_key(item_id)
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Iterate definitions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemDef> {
        self.defs.values()
    }

    /// Declared stack size, or `None` for unknown items.
    ///
    /// Callers pick their own fallback for unknown ids.
    pub fn stack_size(&self, item_id: &str) -> Option<u32> {
        self.defs.get(item_id).map(|d| d.stack_size)
    }

    /// Display name, falling back to the id itself.
    pub fn name_of<'a>(&'a self, item_id: &'a str) -> &'a str {
        self.defs
            .get(item_id)
            .map(|d| d.name.as_str())
            .unwrap_or(item_id)
    }

    /// True if the item has the `weapon` tag.
    pub fn is_weapon(&self, item_id: &str) -> bool {
        self.defs.get(item_id).is_some_and(ItemDef::is_weapon)
    }

    /// True if the item has the `armor` tag.
    pub fn is_armor(&self, item_id: &str) -> bool {
        self.defs.get(item_id).is_some_and(ItemDef::is_armor)
    }

    /// True if placing a unit of this item allocates a durability record.
    pub fn tracks_instances(&self, item_id: &str) -> bool {
        self.defs.get(item_id).is_some_and(ItemDef::tracks_instances)
    }

    /// Base protection (0.0 when absent).
    pub fn protection(&self, item_id: &str) -> f32 {
        self.defs
            .get(item_id)
            .and_then(|d| d.base_protection)
            .unwrap_or(0.0)
    }

    /// Status effects (empty when absent).
    pub fn effects(&self, item_id: &str) -> &[String] {
        self.defs
            .get(item_id)
            .map(|d| d.status_effects.as_slice())
            .unwrap_or(&[])
    }

    /// Starting durability for weapons and armor.
    ///
    /// Uses `max_durability` when declared, [`FALLBACK_DURABILITY`] otherwise.
    /// Returns `None` for everything else.
    pub fn initial_durability(&self, item_id: &str) -> Option<f32> {
        let def = self.defs.get(item_id)?;
        if !def.is_weapon() && !def.is_armor() {
            return None;
        }
        Some(def.max_durability.unwrap_or(FALLBACK_DURABILITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACK: &str = r#"
    [
      { "id": "wood", "name": "Wood", "stack_size": 99, "weight": 0.5 },
      { "id": "iron_sword", "name": "Iron Sword", "tags": ["weapon"],
        "base_damage": 6, "max_durability": 250 },
      { "id": "cloth_armor", "name": "Cloth Armor", "tags": ["armor"],
        "base_protection": 2.5, "status_effects": ["warm"] },
      { "id": "stick", "name": "Stick" }
    ]
    "#;

    #[test]
    fn parses_pack_with_defaults() {
        let catalog = ItemCatalog::from_json_str(PACK).unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.stack_size("wood"), Some(99));
        assert_eq!(catalog.stack_size("stick"), Some(1));
        assert_eq!(catalog.stack_size("missing"), None);
        assert_eq!(catalog.get("stick").unwrap().weight, 0.0);
        assert!(catalog.get("stick").unwrap().tags.is_empty());
    }

    #[test]
    fn tag_queries() {
        let catalog = ItemCatalog::from_json_str(PACK).unwrap();
        assert!(catalog.is_weapon("iron_sword"));
        assert!(!catalog.is_armor("iron_sword"));
        assert!(catalog.is_armor("cloth_armor"));
        assert!(catalog.tracks_instances("iron_sword"));
        assert!(!catalog.tracks_instances("wood"));
        assert!(!catalog.tracks_instances("stick"));
        assert!(!catalog.is_weapon("missing"));
    }

    #[test]
    fn combat_stats_and_fallbacks() {
        let catalog = ItemCatalog::from_json_str(PACK).unwrap();
        assert_eq!(catalog.protection("cloth_armor"), 2.5);
        assert_eq!(catalog.protection("wood"), 0.0);
        assert_eq!(catalog.effects("cloth_armor"), ["warm".to_string()]);
        assert!(catalog.effects("missing").is_empty());
        assert_eq!(catalog.initial_durability("iron_sword"), Some(250.0));
        assert_eq!(
            catalog.initial_durability("cloth_armor"),
            Some(FALLBACK_DURABILITY)
        );
        assert_eq!(catalog.initial_durability("wood"), None);
    }

    #[test]
    fn name_falls_back_to_id() {
        let catalog = ItemCatalog::from_json_str(PACK).unwrap();
        assert_eq!(catalog.name_of("wood"), "Wood");
        assert_eq!(catalog.name_of("mystery"), "mystery");
    }

    #[test]
    fn rejects_duplicates_and_zero_stacks() {
        let dup = vec![ItemDef::new("a", "A", 1), ItemDef::new("a", "A2", 5)];
        assert!(matches!(
            ItemCatalog::new(dup),
            Err(CatalogError::DuplicateItem(id)) if id == "a"
        ));

        let zero = vec![ItemDef::new("b", "B", 0)];
        assert!(matches!(
            ItemCatalog::new(zero),
            Err(CatalogError::InvalidStackSize(_))
        ));

        assert!(matches!(
            ItemCatalog::from_json_str("{ not json"),
            Err(CatalogError::Parse(_))
        ));
    }
}
