//! Item registry - the shared catalog plus per-instance durability records.
//!
//! Non-stackable weapons and armor get one durability record per unit. The
//! record lives here, keyed by an opaque [`InstanceId`]; inventory slots only
//! hold the id. Records are never collected implicitly: whoever clears the
//! slot calls [`ItemRegistry::destroy_instance`].

use crate::item::{ItemCatalog, ItemDef, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Opaque handle to a durability record.
///
/// Ids are allocated from a per-registry counter, so a replayed session
/// produces the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Raw counter value.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct DurabilityRecord {
    item_id: ItemId,
    current: f32,
}

/// Catalog access plus the durability side table.
#[derive(Debug, Clone)]
pub struct ItemRegistry {
    catalog: Arc<ItemCatalog>,
    instances: HashMap<InstanceId, DurabilityRecord>,
    next_instance: u64,
}

impl ItemRegistry {
    /// Create a registry over a shared catalog with no live instances.
    pub fn new(catalog: Arc<ItemCatalog>) -> Self {
        Self {
            catalog,
            instances: HashMap::new(),
            next_instance: 1,
        }
    }

    /// The shared catalog.
    pub fn catalog(&self) -> &Arc<ItemCatalog> {
        &self.catalog
    }

    /// Look up a definition.
    pub fn def(&self, item_id: &str) -> Option<&ItemDef> {
        self.catalog.get(item_id)
    }

    /// True if the item has the `weapon` tag.
    pub fn is_weapon(&self, item_id: &str) -> bool {
        self.catalog.is_weapon(item_id)
    }

    /// True if the item has the `armor` tag.
    pub fn is_armor(&self, item_id: &str) -> bool {
        self.catalog.is_armor(item_id)
    }

    /// Register a durability record for one unit of `item_id`.
    ///
    /// Only non-stackable weapons and armor get a record; everything else
    /// (including unknown ids) returns `None`. `current` overrides the
    /// starting durability.
    pub fn new_instance(&mut self, item_id: &str, current: Option<f32>) -> Option<InstanceId> {
        if !self.catalog.tracks_instances(item_id) {
            return None;
        }
        let start = current
            .or_else(|| self.catalog.initial_durability(item_id))
            .unwrap_or(0.0);
        let iid = InstanceId(self.next_instance);
        self.next_instance += 1;
        self.instances.insert(
            iid,
            DurabilityRecord {
                item_id: item_id.to_string(),
                current: start,
            },
        );
        debug!(%iid, item_id, durability = start, "instance created");
        Some(iid)
    }

    /// Drop a durability record. Returns `false` if it was already gone.
    pub fn destroy_instance(&mut self, iid: InstanceId) -> bool {
        let removed = self.instances.remove(&iid).is_some();
        if removed {
            debug!(%iid, "instance destroyed");
        }
        removed
    }

    /// Check whether a record is still live.
    pub fn contains_instance(&self, iid: InstanceId) -> bool {
        self.instances.contains_key(&iid)
    }

    /// Number of live durability records.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Item id the record was created for.
    pub fn instance_item(&self, iid: InstanceId) -> Option<&str> {
        self.instances.get(&iid).map(|r| r.item_id.as_str())
    }

    /// Current durability.
    pub fn durability(&self, iid: InstanceId) -> Option<f32> {
        self.instances.get(&iid).map(|r| r.current)
    }

    /// Current durability as a fraction of the item's maximum.
    ///
    /// `None` when the record is gone or the item declares no positive maximum.
    pub fn durability_ratio(&self, iid: InstanceId) -> Option<f32> {
        let record = self.instances.get(&iid)?;
        let max = self.catalog.get(&record.item_id)?.max_durability?;
        if max <= 0.0 {
            return None;
        }
        Some(record.current / max)
    }

    /// Subtract `rate` (negative rates count as 0) and clamp at 0.
    ///
    /// A record at 0 stays registered. Returns the new value.
    pub fn lose_durability(&mut self, iid: InstanceId, rate: f32) -> Option<f32> {
        let record = self.instances.get_mut(&iid)?;
        let loss = rate.max(0.0);
        record.current = (record.current - loss).max(0.0);
        Some(record.current)
    }

    /// Overwrite the durability, clamped at 0. Returns the new value.
    pub fn set_durability(&mut self, iid: InstanceId, value: f32) -> Option<f32> {
        let record = self.instances.get_mut(&iid)?;
        record.current = value.max(0.0);
        Some(record.current)
    }
}
