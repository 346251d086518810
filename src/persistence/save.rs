//! Inventory save/load policy
//!
//! The inventory is stored as flat keys. Loading is all-or-nothing: if any
//! field is missing or malformed the whole save is discarded and the game
//! starts from defaults.

use serde_json::{Value, json};
use thiserror::Error;

use super::store::{KeyValueStore, StoreError};
use crate::burrow::ThingRecord;
use crate::island::Inventory;

pub const KEY_FOOD: &str = "food";
pub const KEY_MAGIC: &str = "magic";
pub const KEY_CUBE: &str = "cube";
pub const KEY_THINGS: &str = "things";

const KEYS: [&str; 4] = [KEY_FOOD, KEY_MAGIC, KEY_CUBE, KEY_THINGS];

/// Why a saved inventory was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("missing key {0:?}")]
    Missing(&'static str),
    #[error("key {key:?}: {reason}")]
    Malformed { key: &'static str, reason: String },
}

/// Write the inventory and flush the store
pub fn save_inventory(store: &mut impl KeyValueStore, inv: &Inventory) -> Result<(), StoreError> {
    store.set(KEY_FOOD, json!(inv.food));
    store.set(KEY_MAGIC, json!(inv.magic));
    store.set(KEY_CUBE, json!(inv.cube));
    store.set(KEY_THINGS, json!(inv.things));
    store.flush()
}

fn counter(store: &impl KeyValueStore, key: &'static str) -> Result<u32, LoadError> {
    let value = store.get(key).ok_or(LoadError::Missing(key))?;
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| LoadError::Malformed {
            key,
            reason: format!("{} is not a count", value),
        })
}

fn things(store: &impl KeyValueStore) -> Result<Vec<String>, LoadError> {
    let malformed = |reason: String| LoadError::Malformed {
        key: KEY_THINGS,
        reason,
    };
    let value = store.get(KEY_THINGS).ok_or(LoadError::Missing(KEY_THINGS))?;
    let Value::Array(items) = value else {
        return Err(malformed(format!("{} is not a list", value)));
    };
    items
        .iter()
        .map(|item| {
            let text = item
                .as_str()
                .ok_or_else(|| malformed(format!("{} is not a string", item)))?;
            text.parse::<ThingRecord>()
                .map_err(|e| malformed(e.to_string()))?;
            Ok(text.to_owned())
        })
        .collect()
}

/// Read a saved inventory. `Ok(None)` when nothing has been saved yet.
pub fn try_load_inventory(store: &impl KeyValueStore) -> Result<Option<Inventory>, LoadError> {
    if KEYS.iter().all(|key| store.get(key).is_none()) {
        return Ok(None);
    }
    Ok(Some(Inventory {
        food: counter(store, KEY_FOOD)?,
        magic: counter(store, KEY_MAGIC)?,
        cube: counter(store, KEY_CUBE)?,
        things: things(store)?,
    }))
}

/// Load the saved inventory, falling back to a fresh one. A damaged save is
/// cleared from the store.
pub fn load_inventory(store: &mut impl KeyValueStore) -> Inventory {
    match try_load_inventory(store) {
        Ok(Some(inv)) => {
            log::info!(
                "Loaded inventory: {} food, {} magic, {} cube, {} things",
                inv.food,
                inv.magic,
                inv.cube,
                inv.things.len()
            );
            inv
        }
        Ok(None) => {
            log::info!("No saved inventory, starting fresh");
            Inventory::new()
        }
        Err(e) => {
            log::warn!("Discarding damaged save ({}) - starting fresh", e);
            store.clear();
            Inventory::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn inventory() -> Inventory {
        Inventory {
            food: 3,
            magic: 1,
            cube: 0,
            things: vec![format!("O000-OOOOC{}-I", "0".repeat(15))],
        }
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        save_inventory(&mut store, &inventory()).unwrap();
        assert_eq!(store.get(KEY_FOOD), Some(&json!(3)));
        assert_eq!(load_inventory(&mut store), inventory());
    }

    #[test]
    fn test_empty_store_is_fresh() {
        let mut store = MemoryStore::new();
        assert_eq!(try_load_inventory(&store), Ok(None));
        assert_eq!(load_inventory(&mut store), Inventory::new());
    }

    #[test]
    fn test_missing_field_discards_everything() {
        let mut store = MemoryStore::new();
        save_inventory(&mut store, &inventory()).unwrap();
        store.remove(KEY_CUBE);
        assert_eq!(try_load_inventory(&store), Err(LoadError::Missing(KEY_CUBE)));
        assert_eq!(load_inventory(&mut store), Inventory::new());
        assert!(store.is_empty());
    }

    #[test]
    fn test_bad_counter_discards_everything() {
        let mut store = MemoryStore::new();
        save_inventory(&mut store, &inventory()).unwrap();
        store.set(KEY_MAGIC, json!(-2));
        assert!(matches!(
            try_load_inventory(&store),
            Err(LoadError::Malformed { key: KEY_MAGIC, .. })
        ));
        assert_eq!(load_inventory(&mut store), Inventory::new());
    }

    #[test]
    fn test_bad_thing_record_discards_everything() {
        let mut store = MemoryStore::new();
        save_inventory(&mut store, &inventory()).unwrap();
        store.set(KEY_THINGS, json!(["not a record"]));
        assert!(try_load_inventory(&store).is_err());

        store.set(KEY_THINGS, json!("O000"));
        assert!(try_load_inventory(&store).is_err());
        assert_eq!(load_inventory(&mut store), Inventory::new());
        assert!(store.get(KEY_FOOD).is_none());
    }
}
