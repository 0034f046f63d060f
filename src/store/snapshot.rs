// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::{PersistenceAdapter, StoreError};
use crate::model::{CohortId, NavigationContext, NodeId, ProjectId, SessionId, UserId};

const SNAPSHOT_VERSION: u32 = 0;

/// The navigation fields that survive a reload.
///
/// Stored as `{"state": {...}, "version": 0}`; the expanded set is written as a sorted array
/// and read back into a set by the navigator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedNavigation {
    #[serde(default)]
    pub is_dark_mode: bool,
    #[serde(default)]
    pub current_project_id: Option<ProjectId>,
    #[serde(default)]
    pub current_cohort_id: Option<CohortId>,
    #[serde(default)]
    pub current_user_id: Option<UserId>,
    #[serde(default)]
    pub current_session_id: Option<SessionId>,
    #[serde(default)]
    pub expanded_nodes: Vec<NodeId>,
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    state: T,
    #[serde(default)]
    version: u32,
}

impl PersistedNavigation {
    pub fn new(
        context: &NavigationContext,
        expanded: impl IntoIterator<Item = NodeId>,
        is_dark_mode: bool,
    ) -> Self {
        let mut expanded_nodes: Vec<NodeId> = expanded.into_iter().collect();
        expanded_nodes.sort();
        expanded_nodes.dedup();
        Self {
            is_dark_mode,
            current_project_id: context.project_id.clone(),
            current_cohort_id: context.cohort_id.clone(),
            current_user_id: context.user_id.clone(),
            current_session_id: context.session_id.clone(),
            expanded_nodes,
        }
    }

    pub fn context(&self) -> NavigationContext {
        NavigationContext {
            project_id: self.current_project_id.clone(),
            cohort_id: self.current_cohort_id.clone(),
            user_id: self.current_user_id.clone(),
            session_id: self.current_session_id.clone(),
        }
    }

    /// Reads the snapshot stored under `key`; `Ok(None)` when nothing was stored yet.
    pub fn load(storage: &dyn PersistenceAdapter, key: &str) -> Result<Option<Self>, StoreError> {
        let Some(raw) = storage.get(key)? else {
            return Ok(None);
        };
        let envelope: Envelope<Self> = serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            key: key.to_owned(),
            source,
        })?;
        Ok(Some(envelope.state))
    }

    pub fn save(&self, storage: &dyn PersistenceAdapter, key: &str) -> Result<(), StoreError> {
        let envelope = Envelope {
            state: self,
            version: SNAPSHOT_VERSION,
        };
        let raw = serde_json::to_string(&envelope).map_err(|source| StoreError::Json {
            key: key.to_owned(),
            source,
        })?;
        storage.set(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::PersistedNavigation;
    use crate::model::{CohortId, NavigationContext, NodeId, ProjectId};
    use crate::store::{MemoryStorage, PersistenceAdapter, StoreError};

    #[test]
    fn snapshot_round_trips_through_storage() {
        let storage = MemoryStorage::new();
        let context = NavigationContext::project(ProjectId::new("p1").unwrap())
            .with_cohort(CohortId::new("c1").unwrap());
        let expanded = [NodeId::new("p1-c1").unwrap(), NodeId::new("p1").unwrap()];

        PersistedNavigation::new(&context, expanded, true)
            .save(&storage, "navigation-store")
            .unwrap();
        let restored = PersistedNavigation::load(&storage, "navigation-store").unwrap().unwrap();

        assert!(restored.is_dark_mode);
        assert_eq!(restored.context(), context);
        assert_eq!(
            restored.expanded_nodes,
            vec![NodeId::new("p1").unwrap(), NodeId::new("p1-c1").unwrap()]
        );
    }

    #[test]
    fn wire_shape_uses_camel_case_fields_and_an_array() {
        let storage = MemoryStorage::new();
        let context = NavigationContext::project(ProjectId::new("p1").unwrap());
        PersistedNavigation::new(&context, [NodeId::new("p1").unwrap()], false)
            .save(&storage, "k")
            .unwrap();

        let raw: serde_json::Value = serde_json::from_str(&storage.get("k").unwrap().unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({
                "state": {
                    "isDarkMode": false,
                    "currentProjectId": "p1",
                    "currentCohortId": null,
                    "currentUserId": null,
                    "currentSessionId": null,
                    "expandedNodes": ["p1"],
                },
                "version": 0,
            })
        );
    }

    #[test]
    fn missing_and_corrupt_snapshots() {
        let storage = MemoryStorage::new();
        assert_eq!(PersistedNavigation::load(&storage, "k").unwrap(), None);

        storage.set("k", "{\"state\":").unwrap();
        assert!(matches!(
            PersistedNavigation::load(&storage, "k"),
            Err(StoreError::Json { .. })
        ));
    }
}
