//! Cooking station and cooking recipes.
//!
//! A station holds a row of ingredient slots, one running job, and separate
//! cooked and burned output slots. Time only moves inside
//! [`CookingStation::advance`]; finished food that sits uncollected for a
//! recipe's burn window turns into its burned counterpart one unit at a time.

use crate::inventory::Inventory;
use anyhow::{Context, Result};
use larder_core::{ItemCatalog, ItemId, ItemRegistry};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Stack size the station assumes for ids missing from the item catalog.
pub const STATION_UNKNOWN_STACK_SIZE: u32 = 99;

/// One ingredient requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeInput {
    /// Ingredient item.
    pub item_id: ItemId,
    /// Units consumed per job.
    pub qty: u32,
}

/// An item and quantity produced by a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeOutput {
    /// Produced item.
    pub item_id: ItemId,
    /// Units produced.
    pub qty: u32,
}

/// A cooking recipe: ingredients in, one cooked output, one burned output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookingRecipe {
    /// Unique recipe key.
    pub key: String,
    /// Ingredients consumed when a job starts.
    pub inputs: Vec<RecipeInput>,
    /// Output deposited when a job completes.
    pub cooked: RecipeOutput,
    /// Output a cooked unit turns into after the burn window.
    pub burned: RecipeOutput,
    /// Seconds per job.
    pub cook_time: f64,
    /// Seconds a cooked unit may wait before one unit burns.
    pub burn_time: f64,
}

impl CookingRecipe {
    /// Build a recipe from `(item, qty)` pairs.
    pub fn new(
        key: &str,
        inputs: &[(&str, u32)],
        cooked: (&str, u32),
        burned: (&str, u32),
        cook_time: f64,
        burn_time: f64,
    ) -> Self {
        Self {
            key: key.to_string(),
            inputs: inputs
                .iter()
                .map(|(item, qty)| RecipeInput {
                    item_id: item.to_string(),
                    qty: *qty,
                })
                .collect(),
            cooked: RecipeOutput {
                item_id: cooked.0.to_string(),
                qty: cooked.1,
            },
            burned: RecipeOutput {
                item_id: burned.0.to_string(),
                qty: burned.1,
            },
            cook_time,
            burn_time,
        }
    }

    /// Total ingredient units consumed per job.
    pub fn total_units(&self) -> u32 {
        self.inputs.iter().map(|input| input.qty).sum()
    }

    /// Units needed per distinct ingredient, in first-listed order.
    ///
    /// An ingredient listed more than once needs the sum of its entries.
    pub fn requirements(&self) -> Vec<(&str, u32)> {
        let mut needed: Vec<(&str, u32)> = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            match needed.iter_mut().find(|(id, _)| *id == input.item_id) {
                Some((_, qty)) => *qty += input.qty,
                None => needed.push((input.item_id.as_str(), input.qty)),
            }
        }
        needed
    }

    /// Ranking key: bigger recipes first, key as the final tie-break.
    pub fn specificity(&self) -> (u32, usize, &str) {
        (self.total_units(), self.requirements().len(), &self.key)
    }
}

/// Reasons a cooking recipe set is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CookingCatalogError {
    /// Two recipes share a key.
    #[error("duplicate cooking recipe '{0}'")]
    DuplicateKey(String),
    /// A recipe lists no ingredients.
    #[error("cooking recipe '{0}' has no ingredients")]
    NoInputs(String),
    /// An ingredient or output quantity is zero.
    #[error("cooking recipe '{0}' has a zero quantity")]
    ZeroQuantity(String),
    /// Cook time must be positive and burn time non-negative.
    #[error("cooking recipe '{0}' has an invalid cook or burn time")]
    InvalidTiming(String),
    /// Burning looks up parameters by the cooked item's id, so that id must
    /// itself be a recipe key.
    #[error("cooked output '{cooked_id}' of recipe '{key}' is not a recipe key")]
    UnresolvedBurnKey {
        /// Recipe key.
        key: String,
        /// Cooked output id that has no recipe of its own.
        cooked_id: ItemId,
    },
    /// One job's output would not fit in a single stack of the item.
    #[error("recipe '{key}' makes {qty} '{item_id}' per job but it stacks to {max_stack}")]
    OutputExceedsStack {
        /// Recipe key.
        key: String,
        /// Cooked or burned output id.
        item_id: ItemId,
        /// Units produced per job or burn.
        qty: u32,
        /// Stack size of the output item.
        max_stack: u32,
    },
}

/// Read-only set of cooking recipes keyed by recipe key.
#[derive(Debug, Clone, Default)]
pub struct CookingCatalog {
    recipes: BTreeMap<String, CookingRecipe>,
}

impl CookingCatalog {
    /// Validate and index a recipe list.
    pub fn new(recipes: Vec<CookingRecipe>) -> Result<Self, CookingCatalogError> {
        let mut map = BTreeMap::new();
        for recipe in recipes {
            validate_recipe(&recipe)?;
            if map.contains_key(&recipe.key) {
                return Err(CookingCatalogError::DuplicateKey(recipe.key));
            }
            map.insert(recipe.key.clone(), recipe);
        }
        for recipe in map.values() {
            if !map.contains_key(&recipe.cooked.item_id) {
                return Err(CookingCatalogError::UnresolvedBurnKey {
                    key: recipe.key.clone(),
                    cooked_id: recipe.cooked.item_id.clone(),
                });
            }
        }
        Ok(Self { recipes: map })
    }

    /// Load recipes from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read cooking recipe file")?;
        Self::load_from_str(&content)
    }

    /// Load recipes from a JSON string.
    pub fn load_from_str(content: &str) -> Result<Self> {
        let recipes: Vec<CookingRecipe> =
            serde_json::from_str(content).context("Failed to parse cooking recipe JSON")?;
        Ok(Self::new(recipes)?)
    }

    /// Get a recipe by key.
    pub fn get(&self, key: &str) -> Option<&CookingRecipe> {
        self.recipes.get(key)
    }

    /// Check whether a key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.recipes.contains_key(key)
    }

    /// Iterate recipes in key order.
    pub fn iter(&self) -> impl Iterator<Item = &CookingRecipe> {
        self.recipes.values()
    }

    /// Number of recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Check that every cooked and burned output fits in one stack of its item.
    ///
    /// Ids missing from `items` are checked against the station default.
    pub fn check_stack_sizes(&self, items: &ItemCatalog) -> Result<(), CookingCatalogError> {
        for recipe in self.recipes.values() {
            for output in [&recipe.cooked, &recipe.burned] {
                let max_stack = items
                    .stack_size(&output.item_id)
                    .unwrap_or(STATION_UNKNOWN_STACK_SIZE);
                if output.qty > max_stack {
                    return Err(CookingCatalogError::OutputExceedsStack {
                        key: recipe.key.clone(),
                        item_id: output.item_id.clone(),
                        qty: output.qty,
                        max_stack,
                    });
                }
            }
        }
        Ok(())
    }

    /// Burn parameters for a cooked item sitting in an output slot.
    pub fn burn_profile(&self, cooked_id: &str) -> Option<&CookingRecipe> {
        self.recipes.get(cooked_id)
    }
}

fn validate_recipe(recipe: &CookingRecipe) -> Result<(), CookingCatalogError> {
    if recipe.inputs.is_empty() {
        return Err(CookingCatalogError::NoInputs(recipe.key.clone()));
    }
    let zero_input = recipe.inputs.iter().any(|input| input.qty == 0);
    if zero_input || recipe.cooked.qty == 0 || recipe.burned.qty == 0 {
        return Err(CookingCatalogError::ZeroQuantity(recipe.key.clone()));
    }
    if !(recipe.cook_time > 0.0) || !(recipe.burn_time >= 0.0) {
        return Err(CookingCatalogError::InvalidTiming(recipe.key.clone()));
    }
    Ok(())
}

/// Station layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Number of ingredient slots.
    pub inputs: usize,
    /// Number of cooked output slots (and, separately, burned output slots).
    pub outputs: usize,
    /// Whether uncollected food burns.
    pub burn_enabled: bool,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            inputs: 5,
            outputs: 1,
            burn_enabled: true,
        }
    }
}

/// Contents of a station slot. Stations hold plain quantities only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotContents {
    /// Item in the slot.
    pub item_id: ItemId,
    /// Units held.
    pub qty: u32,
}

impl SlotContents {
    /// Create slot contents.
    pub fn new(item_id: impl Into<ItemId>, qty: u32) -> Self {
        Self {
            item_id: item_id.into(),
            qty,
        }
    }
}

/// Successful recipe selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Selected and the cooked output has room.
    Ready,
    /// Selected, but nothing can be produced until output is collected.
    NoOutputRoom,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Ready => write!(f, "Selected."),
            Selection::NoOutputRoom => {
                write!(f, "Selected; note: cooked output has no room right now.")
            }
        }
    }
}

/// Reasons a recipe selection is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// A job is in progress.
    #[error("Busy: wait until current item finishes.")]
    Busy,
    /// No recipe with that key.
    #[error("Unknown recipe key '{0}'.")]
    UnknownRecipe(String),
    /// Current ingredients cannot cover one job.
    #[error("Insufficient ingredients for that recipe.")]
    InsufficientIngredients,
    /// Option index past the end of [`CookingStation::recipe_options`].
    #[error("Invalid option index {0}.")]
    InvalidOption(usize),
}

/// A recipe the current ingredients can make, with how many.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeOption {
    /// Recipe key.
    pub key: String,
    /// Display name of the cooked output.
    pub name: String,
    /// Seconds per job.
    pub cook_time: f64,
    /// Burn window in seconds.
    pub burn_time: f64,
    /// Jobs the ingredients cover.
    pub max_by_mats: u32,
    /// Jobs the cooked output slots can absorb.
    pub max_by_capacity: u32,
    /// `min(max_by_mats, max_by_capacity)`.
    pub max_now: u32,
    /// Total ingredient units per job.
    pub total_units: u32,
    /// Distinct ingredients per job.
    pub distinct_inputs: usize,
}

impl RecipeOption {
    /// Ranking key, compared descending.
    pub fn specificity(&self) -> (u32, usize, &str) {
        (self.total_units, self.distinct_inputs, &self.key)
    }
}

impl fmt::Display for RecipeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (key = {}): cook = {:.1}s, burn = {:.1}s, can make now = {} (by mats {}, by cap {})",
            self.name,
            self.key,
            self.cook_time,
            self.burn_time,
            self.max_now,
            self.max_by_mats,
            self.max_by_capacity
        )
    }
}

/// A timed, recipe-driven cooking station.
#[derive(Debug, Clone)]
pub struct CookingStation {
    items: Arc<ItemCatalog>,
    recipes: Arc<CookingCatalog>,
    inputs: Vec<Option<SlotContents>>,
    cooked_out: Vec<Option<SlotContents>>,
    burned_out: Vec<Option<SlotContents>>,
    active_recipe: Option<String>,
    /// Elapsed seconds of the running job; `None` while idle.
    job_elapsed: Option<f64>,
    burn_elapsed: f64,
    burn_enabled: bool,
}

impl CookingStation {
    /// Create an idle station with empty slots.
    pub fn new(items: Arc<ItemCatalog>, recipes: Arc<CookingCatalog>, config: StationConfig) -> Self {
        Self {
            items,
            recipes,
            inputs: vec![None; config.inputs],
            cooked_out: vec![None; config.outputs],
            burned_out: vec![None; config.outputs],
            active_recipe: None,
            job_elapsed: None,
            burn_elapsed: 0.0,
            burn_enabled: config.burn_enabled,
        }
    }

    /// Recipes this station cooks from.
    pub fn recipes(&self) -> &CookingCatalog {
        &self.recipes
    }

    /// Ingredient slots.
    pub fn inputs(&self) -> &[Option<SlotContents>] {
        &self.inputs
    }

    /// Cooked output slots.
    pub fn cooked_out(&self) -> &[Option<SlotContents>] {
        &self.cooked_out
    }

    /// Burned output slots.
    pub fn burned_out(&self) -> &[Option<SlotContents>] {
        &self.burned_out
    }

    /// Currently selected recipe key.
    pub fn active_recipe(&self) -> Option<&str> {
        self.active_recipe.as_deref()
    }

    /// Elapsed seconds of the running job.
    pub fn job_elapsed(&self) -> Option<f64> {
        self.job_elapsed
    }

    /// Seconds accumulated toward the next burn conversion.
    pub fn burn_elapsed(&self) -> f64 {
        self.burn_elapsed
    }

    /// Whether uncollected food burns.
    pub fn burn_enabled(&self) -> bool {
        self.burn_enabled
    }

    /// True while a job is running.
    pub fn is_cooking(&self) -> bool {
        self.active_recipe.is_some() && self.job_elapsed.is_some()
    }

    /// Fraction of the running job completed, for progress bars.
    pub fn job_progress(&self) -> Option<f64> {
        let elapsed = self.job_elapsed?;
        let recipe = self.recipes.get(self.active_recipe.as_deref()?)?;
        Some((elapsed / recipe.cook_time).clamp(0.0, 1.0))
    }

    /// Toggle burning. Any burn progress is discarded.
    pub fn set_burning_enabled(&mut self, enabled: bool) {
        self.burn_enabled = enabled;
        self.burn_elapsed = 0.0;
    }

    /// Select a recipe without checking ingredients.
    ///
    /// Refused while a job is running or if the key is unknown.
    pub fn set_recipe(&mut self, key: &str) -> bool {
        if !self.recipes.contains(key) || self.is_cooking() {
            return false;
        }
        self.active_recipe = Some(key.to_string());
        true
    }

    fn max_stack(&self, item_id: &str) -> u32 {
        self.items
            .stack_size(item_id)
            .unwrap_or(STATION_UNKNOWN_STACK_SIZE)
    }

    /// Put up to `qty` units into ingredient slot `idx`, returning how many fit.
    ///
    /// An empty slot takes up to one stack; a slot holding the same item is
    /// topped up; a slot holding something else refuses.
    pub fn add_ingredient(&mut self, idx: usize, item_id: &str, qty: u32) -> u32 {
        if idx >= self.inputs.len() || qty == 0 {
            return 0;
        }
        let max_stack = self.max_stack(item_id);
        match self.inputs[idx].as_mut() {
            None => {
                let take = qty.min(max_stack);
                self.inputs[idx] = Some(SlotContents::new(item_id, take));
                take
            }
            Some(existing) if existing.item_id == item_id => {
                let take = max_stack.saturating_sub(existing.qty).min(qty);
                existing.qty += take;
                take
            }
            Some(_) => 0,
        }
    }

    /// Take everything out of ingredient slot `idx`.
    pub fn take_ingredient(&mut self, idx: usize) -> Option<SlotContents> {
        self.inputs.get_mut(idx).and_then(Option::take)
    }

    fn input_counts(&self) -> HashMap<&str, u32> {
        let mut counts = HashMap::new();
        for slot in self.inputs.iter().flatten() {
            *counts.entry(slot.item_id.as_str()).or_insert(0) += slot.qty;
        }
        counts
    }

    fn consume_inputs(&mut self, item_id: &str, qty: u32) -> u32 {
        let mut left = qty;
        for slot in &mut self.inputs {
            if left == 0 {
                break;
            }
            let drained = match slot {
                Some(contents) if contents.item_id == item_id => {
                    let take = contents.qty.min(left);
                    contents.qty -= take;
                    left -= take;
                    contents.qty == 0
                }
                _ => false,
            };
            if drained {
                *slot = None;
            }
        }
        qty - left
    }

    /// Consume one job's worth of ingredients and start the timer.
    fn start_one(&mut self) -> bool {
        let recipes = Arc::clone(&self.recipes);
        let Some(recipe) = self.active_recipe.as_deref().and_then(|key| recipes.get(key)) else {
            return false;
        };
        let max_stack = self.max_stack(&recipe.cooked.item_id);
        if !has_room(&self.cooked_out, &recipe.cooked.item_id, recipe.cooked.qty, max_stack) {
            return false;
        }
        if !can_make(recipe, &self.input_counts()) {
            return false;
        }
        for (item_id, qty) in recipe.requirements() {
            self.consume_inputs(item_id, qty);
        }
        self.job_elapsed = Some(0.0);
        debug!(recipe = %recipe.key, "cook job started");
        true
    }

    /// Advance the station by `dt` seconds. Non-positive `dt` does nothing.
    ///
    /// Per call: start a job if idle (so this `dt` counts toward it), run the
    /// job and deposit its output on completion, immediately start the next
    /// job, and otherwise let uncollected cooked food burn.
    pub fn advance(&mut self, dt: f64) {
        if !(dt > 0.0) {
            return;
        }

        if self.active_recipe.is_some() && self.job_elapsed.is_none() && self.start_one() {
            self.burn_elapsed = 0.0;
        }

        let recipes = Arc::clone(&self.recipes);
        let running = self.active_recipe.as_deref().and_then(|key| recipes.get(key));

        let mut did_cook = false;
        if let (Some(recipe), Some(elapsed)) = (running, self.job_elapsed) {
            let elapsed = elapsed + dt;
            if elapsed >= recipe.cook_time {
                self.job_elapsed = None;
                let max_stack = self.max_stack(&recipe.cooked.item_id);
                if deposit(&mut self.cooked_out, &recipe.cooked.item_id, recipe.cooked.qty, max_stack) {
                    self.burn_elapsed = 0.0;
                    did_cook = true;
                    debug!(recipe = %recipe.key, "cook job finished");
                } else {
                    warn!(
                        recipe = %recipe.key,
                        "cooked output full, finished item discarded"
                    );
                }
            } else {
                self.job_elapsed = Some(elapsed);
            }
        }

        let mut started = false;
        if self.active_recipe.is_some() && self.job_elapsed.is_none() {
            started = self.start_one();
            if started {
                self.burn_elapsed = 0.0;
            }
        }

        let may_burn = !started
            && !did_cook
            && self.job_elapsed.is_none()
            && self.burn_enabled
            && self.active_recipe.is_some();
        if may_burn {
            let burning = self
                .cooked_out
                .iter()
                .enumerate()
                .find_map(|(i, slot)| slot.as_ref().filter(|s| s.qty > 0).map(|s| (i, s)))
                .and_then(|(i, s)| recipes.burn_profile(&s.item_id).map(|profile| (i, profile)));
            if let Some((idx, profile)) = burning {
                self.burn_elapsed += dt;
                if self.burn_elapsed >= profile.burn_time {
                    self.burn_one(idx, profile);
                    self.burn_elapsed = 0.0;
                }
            }
        }

        for slot in &mut self.burned_out {
            if slot.as_ref().is_some_and(|s| s.qty == 0) {
                *slot = None;
            }
        }
    }

    /// Convert one cooked unit in `cooked_idx` into `profile`'s burned output.
    ///
    /// Abandoned (nothing consumed) when the burned output has no room.
    fn burn_one(&mut self, cooked_idx: usize, profile: &CookingRecipe) -> bool {
        let burned = &profile.burned;
        let max_stack = self.max_stack(&burned.item_id);
        if !has_room(&self.burned_out, &burned.item_id, burned.qty, max_stack) {
            debug!(recipe = %profile.key, "burned output full, burn skipped");
            return false;
        }
        let Some(cooked) = self.cooked_out[cooked_idx].as_mut() else {
            return false;
        };
        cooked.qty -= 1;
        if cooked.qty == 0 {
            self.cooked_out[cooked_idx] = None;
        }
        debug!(recipe = %profile.key, burned = %burned.item_id, "cooked item burned");
        deposit(&mut self.burned_out, &burned.item_id, burned.qty, max_stack)
    }

    /// Move up to `qty` (default: all) cooked units from `slot_idx` into `inv`.
    ///
    /// Returns how many the inventory accepted; only that many leave the slot.
    pub fn collect_cooked(
        &mut self,
        inv: &mut Inventory,
        registry: &mut ItemRegistry,
        slot_idx: usize,
        qty: Option<u32>,
    ) -> u32 {
        collect_from(&mut self.cooked_out, inv, registry, slot_idx, qty)
    }

    /// Move up to `qty` (default: all) burned units from `slot_idx` into `inv`.
    pub fn collect_burned(
        &mut self,
        inv: &mut Inventory,
        registry: &mut ItemRegistry,
        slot_idx: usize,
        qty: Option<u32>,
    ) -> u32 {
        collect_from(&mut self.burned_out, inv, registry, slot_idx, qty)
    }

    /// Jobs the cooked output slots can still absorb for `cooked_id`.
    fn output_capacity_units(&self, cooked_id: &str, unit_qty: u32) -> u32 {
        let max_stack = self.max_stack(cooked_id);
        self.cooked_out
            .iter()
            .map(|slot| match slot {
                None => max_stack / unit_qty,
                Some(s) if s.item_id == cooked_id => max_stack.saturating_sub(s.qty) / unit_qty,
                Some(_) => 0,
            })
            .sum()
    }

    /// Recipes the current ingredients can make, most specific first.
    pub fn recipe_options(&self) -> Vec<RecipeOption> {
        let counts = self.input_counts();
        let mut options: Vec<RecipeOption> = self
            .recipes
            .iter()
            .filter(|recipe| can_make(recipe, &counts))
            .map(|recipe| {
                let needed = recipe.requirements();
                let max_by_mats = needed
                    .iter()
                    .map(|(item_id, qty)| counts.get(item_id).copied().unwrap_or(0) / qty)
                    .min()
                    .unwrap_or(0);
                let max_by_capacity =
                    self.output_capacity_units(&recipe.cooked.item_id, recipe.cooked.qty);
                RecipeOption {
                    key: recipe.key.clone(),
                    name: self.items.name_of(&recipe.cooked.item_id).to_string(),
                    cook_time: recipe.cook_time,
                    burn_time: recipe.burn_time,
                    max_by_mats,
                    max_by_capacity,
                    max_now: max_by_mats.min(max_by_capacity),
                    total_units: recipe.total_units(),
                    distinct_inputs: needed.len(),
                }
            })
            .collect();
        options.sort_by(|a, b| b.specificity().cmp(&a.specificity()));
        options
    }

    /// Numbered option list, one per line.
    pub fn format_recipe_options(&self) -> String {
        let options = self.recipe_options();
        if options.is_empty() {
            return "No craftable recipes from current inputs.".to_string();
        }
        options
            .iter()
            .enumerate()
            .map(|(i, option)| format!("[{i}] {option}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Select a recipe the current ingredients can make.
    ///
    /// Clears any burn progress on success.
    pub fn select_recipe_by_key(&mut self, key: &str) -> Result<Selection, SelectError> {
        if self.is_cooking() {
            return Err(SelectError::Busy);
        }
        let recipes = Arc::clone(&self.recipes);
        let recipe = recipes
            .get(key)
            .ok_or_else(|| SelectError::UnknownRecipe(key.to_string()))?;
        if !can_make(recipe, &self.input_counts()) {
            return Err(SelectError::InsufficientIngredients);
        }

        self.active_recipe = Some(key.to_string());
        self.job_elapsed = None;
        self.burn_elapsed = 0.0;

        if self.output_capacity_units(&recipe.cooked.item_id, recipe.cooked.qty) == 0 {
            return Ok(Selection::NoOutputRoom);
        }
        Ok(Selection::Ready)
    }

    /// Select the `index`-th entry of [`Self::recipe_options`].
    pub fn select_recipe_by_index(&mut self, index: usize) -> Result<Selection, SelectError> {
        let key = self
            .recipe_options()
            .into_iter()
            .nth(index)
            .map(|option| option.key)
            .ok_or(SelectError::InvalidOption(index))?;
        self.select_recipe_by_key(&key)
    }

    /// Recipe the station would cook next: the active one if still
    /// satisfiable, else the top-ranked satisfiable one.
    pub fn preview_recipe_key(&self) -> Option<&str> {
        let counts = self.input_counts();
        if let Some(active) = self.active_recipe.as_deref() {
            if self
                .recipes
                .get(active)
                .is_some_and(|recipe| can_make(recipe, &counts))
            {
                return Some(active);
            }
        }
        self.recipes
            .iter()
            .filter(|recipe| can_make(recipe, &counts))
            .max_by(|a, b| a.specificity().cmp(&b.specificity()))
            .map(|recipe| recipe.key.as_str())
    }

    /// Display name of the previewed recipe's cooked output.
    pub fn preview_cooked_name(&self) -> Option<String> {
        let key = self.preview_recipe_key()?;
        let recipe = self.recipes.get(key)?;
        Some(self.items.name_of(&recipe.cooked.item_id).to_string())
    }

    /// One-line summary of state, outputs and preview.
    pub fn status_text(&self) -> String {
        let state = if self.is_cooking() { "COOKING" } else { "IDLE" };
        let mut parts = vec![
            format!("{state}({})", self.active_recipe.as_deref().unwrap_or("none")),
            format_slots("Cooked", &self.cooked_out),
            format_slots("Burned", &self.burned_out),
        ];
        if let Some(preview) = self.preview_cooked_name() {
            parts.push(format!("Preview: {preview}"));
        }
        parts.join(" | ")
    }
}

fn can_make(recipe: &CookingRecipe, counts: &HashMap<&str, u32>) -> bool {
    recipe
        .requirements()
        .into_iter()
        .all(|(item_id, qty)| counts.get(item_id).copied().unwrap_or(0) >= qty)
}

/// A matching slot with room for `qty`, or an empty slot.
fn has_room(slots: &[Option<SlotContents>], item_id: &str, qty: u32, max_stack: u32) -> bool {
    slots.iter().any(|slot| match slot {
        Some(s) => s.item_id == item_id && s.qty + qty <= max_stack,
        None => qty <= max_stack,
    })
}

/// Prefer a matching slot with room, then the first empty slot.
fn deposit(slots: &mut [Option<SlotContents>], item_id: &str, qty: u32, max_stack: u32) -> bool {
    if let Some(existing) = slots
        .iter_mut()
        .flatten()
        .find(|s| s.item_id == item_id && s.qty + qty <= max_stack)
    {
        existing.qty += qty;
        return true;
    }
    if let Some(empty) = slots.iter_mut().find(|slot| slot.is_none()) {
        *empty = Some(SlotContents::new(item_id, qty));
        return true;
    }
    false
}

fn collect_from(
    slots: &mut [Option<SlotContents>],
    inv: &mut Inventory,
    registry: &mut ItemRegistry,
    slot_idx: usize,
    qty: Option<u32>,
) -> u32 {
    let Some(slot) = slots.get_mut(slot_idx) else {
        return 0;
    };
    let Some(contents) = slot.as_mut().filter(|s| s.qty > 0) else {
        return 0;
    };
    let take = qty.map_or(contents.qty, |q| q.min(contents.qty));
    let added = inv.add(registry, &contents.item_id, take);
    contents.qty -= added;
    if contents.qty == 0 {
        *slot = None;
    }
    added
}

fn format_slots(label: &str, slots: &[Option<SlotContents>]) -> String {
    let visible: Vec<String> = slots
        .iter()
        .flatten()
        .map(|s| format!("{} x{}", s.item_id, s.qty))
        .collect();
    if visible.is_empty() {
        format!("{label}[-]")
    } else {
        format!("{label}[{}]", visible.join("; "))
    }
}
