//! Deduplicating asset storage
//!
//! Geometry and materials are stored once per stable [`Uuid`] (see
//! [`asset_uuid`](crate::assets::asset_uuid)) and shared by handle. A second
//! registration of the same named asset returns the existing handle, so
//! resolving one resource twice never grows the store.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use slotmap::{Key, SlotMap};
use std::sync::Arc;
use uuid::Uuid;

struct Entries<H: Key, T> {
    assets: SlotMap<H, Arc<T>>,
    by_uuid: FxHashMap<Uuid, H>,
}

/// Thread-safe store of immutable, shared assets.
pub struct AssetStorage<H: Key, T> {
    entries: RwLock<Entries<H, T>>,
}

impl<H: Key, T> Default for AssetStorage<H, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Key, T> AssetStorage<H, T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries {
                assets: SlotMap::with_key(),
                by_uuid: FxHashMap::default(),
            }),
        }
    }

    /// Stores `asset` under `uuid` unless that identity is already present.
    ///
    /// On a hit the stored asset is kept and `asset` is dropped.
    pub fn insert_unique(&self, uuid: Uuid, asset: T) -> H {
        let mut entries = self.entries.write();
        if let Some(&handle) = entries.by_uuid.get(&uuid) {
            log::trace!("Asset {uuid} already stored, keeping the first copy");
            return handle;
        }
        let handle = entries.assets.insert(Arc::new(asset));
        entries.by_uuid.insert(uuid, handle);
        handle
    }

    #[must_use]
    pub fn get(&self, handle: H) -> Option<Arc<T>> {
        self.entries.read().assets.get(handle).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::new_key_type;

    new_key_type! { struct TestHandle; }

    #[test]
    fn test_insert_unique_keeps_first() {
        let storage = AssetStorage::<TestHandle, String>::new();
        let uuid = Uuid::new_v4();

        let h1 = storage.insert_unique(uuid, "first".to_string());
        let h2 = storage.insert_unique(uuid, "second".to_string());

        assert_eq!(h1, h2);
        assert_eq!(storage.get(h1).unwrap().as_str(), "first");
        assert_eq!(storage.len(), 1);
    }
}
