// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Fetched child lists, keyed by parent node id.
//!
//! Entries live until [`SubtreeCache::clear`] (logout). An optional mirror adapter receives a
//! copy of every list under `"{kind}s_{parent}"` and serves as a fallback on memory misses, so
//! a fresh navigator sharing the same session storage does not refetch. The mirror also keeps
//! an index of every key written to it, so clearing any cache that shares the mirror wipes
//! all of them.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::warn;

use crate::model::{EntityKind, EntityList, NodeId};
use crate::store::PersistenceAdapter;

#[derive(Default)]
pub struct SubtreeCache {
    entries: HashMap<NodeId, EntityList>,
    mirror: Option<Arc<dyn PersistenceAdapter>>,
    mirrored_keys: BTreeSet<String>,
}

impl std::fmt::Debug for SubtreeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubtreeCache")
            .field("entries", &self.entries.len())
            .field("mirrored", &self.mirror.is_some())
            .finish()
    }
}

/// Mirror key listing every key the mirrored caches have written.
pub const MIRROR_INDEX_KEY: &str = "subtree_cache_index";

pub fn mirror_key(kind: EntityKind, parent: &NodeId) -> String {
    format!("{kind}s_{parent}")
}

impl SubtreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mirror(mirror: Arc<dyn PersistenceAdapter>) -> Self {
        Self {
            mirror: Some(mirror),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, parent: &NodeId) -> bool {
        self.entries.contains_key(parent)
    }

    /// The `kind` list cached for `parent`, from memory or else from the mirror.
    ///
    /// A mirror hit is promoted into memory. Unreadable or mismatched mirror entries count as
    /// misses.
    pub fn get(&mut self, parent: &NodeId, kind: EntityKind) -> Option<&EntityList> {
        if !self.entries.contains_key(parent) {
            let restored = self.read_mirror(parent, kind)?;
            self.mirrored_keys.insert(mirror_key(kind, parent));
            self.entries.insert(parent.clone(), restored);
        }
        self.entries.get(parent).filter(|list| list.kind() == kind)
    }

    /// Memory-only lookup.
    pub fn peek(&self, parent: &NodeId) -> Option<&EntityList> {
        self.entries.get(parent)
    }

    pub fn insert(&mut self, parent: NodeId, list: EntityList) {
        if let Some(mirror) = &self.mirror {
            let key = mirror_key(list.kind(), &parent);
            match serde_json::to_string(&list) {
                Ok(raw) => match mirror.set(&key, &raw) {
                    Ok(()) => {
                        self.mirrored_keys.insert(key);
                        self.write_index();
                    }
                    Err(err) => warn!(key = %key, error = %err, "cache mirror write failed"),
                },
                Err(err) => warn!(key = %key, error = %err, "cache mirror encode failed"),
            }
        }
        self.entries.insert(parent, list);
    }

    /// Drops every entry, and every list any cache sharing the mirror has written to it.
    pub fn clear(&mut self) {
        let mut keys = std::mem::take(&mut self.mirrored_keys);
        keys.extend(self.entries.iter().map(|(parent, list)| mirror_key(list.kind(), parent)));
        self.entries.clear();

        let Some(mirror) = &self.mirror else {
            return;
        };
        keys.extend(self.read_index());
        keys.insert(MIRROR_INDEX_KEY.to_owned());
        for key in keys {
            if let Err(err) = mirror.remove(&key) {
                warn!(key = %key, error = %err, "cache mirror remove failed");
            }
        }
    }

    fn read_index(&self) -> BTreeSet<String> {
        let Some(mirror) = &self.mirror else {
            return BTreeSet::new();
        };
        let raw = match mirror.get(MIRROR_INDEX_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeSet::new(),
            Err(err) => {
                warn!(error = %err, "cache mirror index read failed");
                return BTreeSet::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(error = %err, "ignoring corrupt cache mirror index");
            BTreeSet::new()
        })
    }

    fn write_index(&self) {
        let Some(mirror) = &self.mirror else {
            return;
        };
        let mut index = self.read_index();
        let before = index.len();
        index.extend(self.mirrored_keys.iter().cloned());
        if index.len() == before {
            return;
        }
        let result = serde_json::to_string(&index)
            .map_err(|err| err.to_string())
            .and_then(|raw| mirror.set(MIRROR_INDEX_KEY, &raw).map_err(|err| err.to_string()));
        if let Err(err) = result {
            warn!(error = %err, "cache mirror index write failed");
        }
    }

    fn read_mirror(&self, parent: &NodeId, kind: EntityKind) -> Option<EntityList> {
        let mirror = self.mirror.as_ref()?;
        let key = mirror_key(kind, parent);
        let raw = match mirror.get(&key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(key = %key, error = %err, "cache mirror read failed");
                return None;
            }
        };
        match serde_json::from_str::<EntityList>(&raw) {
            Ok(list) if list.kind() == kind => Some(list),
            Ok(list) => {
                warn!(key = %key, found = %list.kind(), "cache mirror entry has the wrong kind");
                None
            }
            Err(err) => {
                warn!(key = %key, error = %err, "ignoring corrupt cache mirror entry");
                None
            }
        }
    }
}
