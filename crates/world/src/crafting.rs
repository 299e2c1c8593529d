//! Crafting book: recipes keyed by output item, checked and applied against an inventory.
//!
//! Crafting is a one-shot, all-or-nothing conversion applied directly to an
//! [`Inventory`]: either every input is consumed and every output placed, or
//! the inventory ends up holding what it held before.

use crate::cooking::RecipeInput;
use crate::inventory::Inventory;
use anyhow::{Context, Result};
use larder_core::{ItemCatalog, ItemId, ItemRegistry, CRAFTABLE_TAG};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

fn default_output_qty() -> u32 {
    1
}

/// Crafting recipe definition, keyed by its output item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftingRecipe {
    /// Item produced by this recipe.
    pub output_id: ItemId,
    /// Amount of output produced per craft.
    #[serde(default = "default_output_qty")]
    pub output_qty: u32,
    /// Items consumed per craft.
    pub inputs: Vec<RecipeInput>,
}

impl CraftingRecipe {
    /// Build a recipe from `(item, qty)` pairs.
    pub fn new(output_id: &str, output_qty: u32, inputs: &[(&str, u32)]) -> Self {
        Self {
            output_id: output_id.to_string(),
            output_qty,
            inputs: inputs
                .iter()
                .map(|(item, qty)| RecipeInput {
                    item_id: item.to_string(),
                    qty: *qty,
                })
                .collect(),
        }
    }

    /// Per-item totals for `times` crafts, in first-listed order.
    fn needed(&self, times: u32) -> Vec<(&str, u32)> {
        let mut needed: Vec<(&str, u32)> = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            let amount = input.qty.saturating_mul(times);
            match needed.iter_mut().find(|(id, _)| *id == input.item_id) {
                Some((_, total)) => *total = total.saturating_add(amount),
                None => needed.push((&input.item_id, amount)),
            }
        }
        needed
    }
}

/// One missing ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortage {
    /// Ingredient item.
    pub item_id: ItemId,
    /// Units required for the requested number of crafts.
    pub need: u32,
    /// Units the inventory holds.
    pub have: u32,
}

impl fmt::Display for Shortage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: need {}, have {} (short {})",
            self.item_id,
            self.need,
            self.have,
            self.need - self.have
        )
    }
}

fn join_shortages(shortages: &[Shortage]) -> String {
    shortages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn craft_hint(max_craftable: &u32) -> String {
    if *max_craftable > 0 {
        format!(" You can craft at most {max_craftable} right now.")
    } else {
        String::new()
    }
}

/// Reasons a craft is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftError {
    /// No recipe produces this item.
    #[error("No recipe for '{0}'.")]
    UnknownRecipe(ItemId),
    /// A craft count of zero was requested.
    #[error("Craft count must be at least 1.")]
    ZeroTimes,
    /// Ingredients fall short.
    #[error("Missing materials: {}.{}", join_shortages(.shortages), craft_hint(.max_craftable))]
    MissingMaterials {
        /// Every ingredient that falls short.
        shortages: Vec<Shortage>,
        /// Crafts the current inventory could cover.
        max_craftable: u32,
    },
    /// Outputs would not fit.
    #[error("Not enough space to place crafted items.")]
    NoSpace,
    /// Inputs or outputs fell short mid-craft; the inventory was restored.
    #[error("Crafting '{0}' failed and was rolled back.")]
    RolledBack(ItemId),
}

/// Outcome of a successful readiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraftReadiness {
    /// Everything is in place.
    Ready,
    /// Craftable, but the output lacks the `craftable` tag.
    Untagged,
}

impl fmt::Display for CraftReadiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CraftReadiness::Ready => write!(f, "Yes"),
            CraftReadiness::Untagged => write!(f, "Item not tagged craftable, but recipe exists."),
        }
    }
}

/// Crafting recipes keyed by output item.
#[derive(Debug, Clone)]
pub struct CraftingBook {
    items: Arc<ItemCatalog>,
    recipes: BTreeMap<ItemId, CraftingRecipe>,
}

impl CraftingBook {
    /// Create an empty book.
    pub fn new(items: Arc<ItemCatalog>) -> Self {
        Self {
            items,
            recipes: BTreeMap::new(),
        }
    }

    /// Load recipes from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(items: Arc<ItemCatalog>, path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read crafting recipe file")?;
        Self::load_from_str(items, &content)
    }

    /// Load recipes from a JSON string.
    pub fn load_from_str(items: Arc<ItemCatalog>, content: &str) -> Result<Self> {
        let recipes: Vec<CraftingRecipe> =
            serde_json::from_str(content).context("Failed to parse crafting recipe JSON")?;

        let mut book = Self::new(items);
        for recipe in recipes {
            book.add_recipe(recipe);
        }
        Ok(book)
    }

    /// Add a recipe, replacing any existing recipe for the same output.
    pub fn add_recipe(&mut self, recipe: CraftingRecipe) {
        self.recipes.insert(recipe.output_id.clone(), recipe);
    }

    /// Get the recipe producing `output_id`.
    pub fn get(&self, output_id: &str) -> Option<&CraftingRecipe> {
        self.recipes.get(output_id)
    }

    /// Iterate recipes in output order.
    pub fn iter(&self) -> impl Iterator<Item = &CraftingRecipe> {
        self.recipes.values()
    }

    /// Number of recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Check if the book is empty.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Check whether `times` crafts of `output_id` would succeed.
    ///
    /// Reports every missing ingredient, not just the first.
    pub fn can_craft(
        &self,
        inv: &Inventory,
        output_id: &str,
        times: u32,
    ) -> Result<CraftReadiness, CraftError> {
        let recipe = self
            .recipes
            .get(output_id)
            .ok_or_else(|| CraftError::UnknownRecipe(output_id.to_string()))?;
        if times == 0 {
            return Err(CraftError::ZeroTimes);
        }

        let shortages: Vec<Shortage> = recipe
            .needed(times)
            .into_iter()
            .filter_map(|(item_id, need)| {
                let have = inv.count(item_id);
                (have < need).then(|| Shortage {
                    item_id: item_id.to_string(),
                    need,
                    have,
                })
            })
            .collect();
        if !shortages.is_empty() {
            let max_craftable = recipe
                .inputs
                .iter()
                .map(|input| inv.count(&input.item_id).checked_div(input.qty).unwrap_or(0))
                .min()
                .unwrap_or(0);
            return Err(CraftError::MissingMaterials {
                shortages,
                max_craftable,
            });
        }

        let total_out = recipe.output_qty.saturating_mul(times);
        if !self.can_fit(inv, &recipe.output_id, total_out) {
            return Err(CraftError::NoSpace);
        }

        if self
            .items
            .get(&recipe.output_id)
            .is_some_and(|def| def.has_tag(CRAFTABLE_TAG))
        {
            Ok(CraftReadiness::Ready)
        } else {
            Ok(CraftReadiness::Untagged)
        }
    }

    /// Craft `times` of `output_id`, all or nothing.
    pub fn craft(
        &self,
        inv: &mut Inventory,
        registry: &mut ItemRegistry,
        output_id: &str,
        times: u32,
    ) -> Result<(), CraftError> {
        self.can_craft(inv, output_id, times)?;
        let recipe = self
            .recipes
            .get(output_id)
            .ok_or_else(|| CraftError::UnknownRecipe(output_id.to_string()))?;

        let mut removed: Vec<(&str, u32)> = Vec::new();
        for (item_id, need) in recipe.needed(times) {
            let got = inv.remove(registry, item_id, need);
            removed.push((item_id, got));
            if got < need {
                warn!(output = output_id, ingredient = item_id, "ingredient fell short, rolling back");
                restore(inv, registry, &removed);
                return Err(CraftError::RolledBack(output_id.to_string()));
            }
        }

        let total_out = recipe.output_qty.saturating_mul(times);
        let added = inv.add(registry, &recipe.output_id, total_out);
        if added < total_out {
            warn!(output = output_id, added, total_out, "output did not fit, rolling back");
            inv.remove(registry, &recipe.output_id, added);
            restore(inv, registry, &removed);
            return Err(CraftError::RolledBack(output_id.to_string()));
        }

        debug!(output = output_id, times, qty = total_out, "crafted");
        Ok(())
    }

    /// Stack-fit estimate: free space in same-item stacks plus empty slots.
    fn can_fit(&self, inv: &Inventory, item_id: &str, qty: u32) -> bool {
        let max_stack = Inventory::stack_limit(&self.items, item_id);
        let mut space: u64 = 0;
        if max_stack > 1 {
            space += inv
                .slots()
                .iter()
                .flatten()
                .filter(|stack| stack.item_id == item_id)
                .map(|stack| u64::from(max_stack.saturating_sub(stack.qty)))
                .sum::<u64>();
        }
        space += inv.empty_slots() as u64 * u64::from(max_stack);
        space >= u64::from(qty)
    }
}

fn restore(inv: &mut Inventory, registry: &mut ItemRegistry, removed: &[(&str, u32)]) {
    for &(item_id, qty) in removed {
        if qty > 0 {
            inv.add(registry, item_id, qty);
        }
    }
}
