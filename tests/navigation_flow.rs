// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! End-to-end navigation through the public API with a canned JSON backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use dashnav::gateway::{DataGateway, GatewayError, Identity, MemoryHistory};
use dashnav::model::{EntityKind, EntityList, Level, NavigationContext, NodeId};
use dashnav::store::{MemoryStorage, PersistedNavigation, PersistenceAdapter};
use dashnav::tree::count_active;
use dashnav::{Navigator, NavigatorConfig, NavigatorServices};

/// Serves raw API payloads keyed by `kind` and the id of the parent they hang under.
struct JsonBackend {
    payloads: HashMap<(EntityKind, &'static str), &'static str>,
    requests: Mutex<Vec<String>>,
}

impl JsonBackend {
    fn new() -> Self {
        let payloads = HashMap::from([
            (
                (EntityKind::Project, ""),
                r#"[{"projectId": 41, "projectName": "Onboarding", "companyName": "Acme"},
                    {"projectId": "42", "projectName": "Retention", "companyName": "Acme"}]"#,
            ),
            ((EntityKind::Cohort, "42"), r#"[{"id": 7, "cohortName": "Spring", "users": [1, 2]}]"#),
            ((EntityKind::User, "7"), r#"[{"id": "u9", "email": "u9@example.test"}]"#),
            ((EntityKind::Session, "u9"), r#"[{"sessionId": "s1", "sessionName": "Kickoff"}]"#),
        ]);
        Self {
            payloads,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataGateway for JsonBackend {
    async fn fetch_entities(
        &self,
        kind: EntityKind,
        parent: &NavigationContext,
        _identity: &Identity,
    ) -> Result<EntityList, GatewayError> {
        let parent_id = match kind {
            EntityKind::Project => "",
            EntityKind::Cohort => parent.project_id.as_ref().map_or("", |id| id.as_str()),
            EntityKind::User => parent.cohort_id.as_ref().map_or("", |id| id.as_str()),
            EntityKind::Session => parent.user_id.as_ref().map_or("", |id| id.as_str()),
        };
        self.requests.lock().unwrap().push(format!("{kind}:{parent_id}"));

        let payload = self
            .payloads
            .iter()
            .find(|((candidate, id), _)| *candidate == kind && *id == parent_id)
            .map(|(_, payload)| *payload)
            .unwrap_or("[]");
        EntityList::from_json(kind, payload.as_bytes())
            .map_err(|source| GatewayError::Decode { kind, source })
    }
}

fn node_id(value: &str) -> NodeId {
    NodeId::new(value).unwrap()
}

#[tokio::test]
async fn deep_link_then_sign_out() {
    let backend = Arc::new(JsonBackend::new());
    let history = Arc::new(MemoryHistory::new());
    let storage = Arc::new(MemoryStorage::new());
    let navigator = Navigator::new(
        NavigatorConfig::default(),
        NavigatorServices::new(backend.clone(), history.clone(), storage.clone()),
    );
    navigator.sign_in(Identity::new("analyst@example.test", "token")).await;

    navigator.observe_route("/app/projects/42/cohorts/7/users/u9/sessions/s1").await.unwrap();

    assert_eq!(backend.requests(), vec!["project:", "cohort:42", "user:7", "session:u9"]);
    let view = navigator.view().await;
    assert_eq!(view.current_level, Level::Session);
    assert_eq!(view.breadcrumbs.len(), 5);
    assert_eq!(view.active_node_id, Some(node_id("42-7-u9-s1")));
    assert_eq!(count_active(&view.tree), 1);
    assert_eq!(view.tree[0].name(), "Acme");
    assert_eq!(view.tree[0].children().len(), 2);
    assert_eq!(view.user_email.as_deref(), Some("analyst@example.test"));

    let session = navigator.find_node(&node_id("42-7-u9-s1")).await.unwrap();
    assert_eq!(session.name(), "Kickoff");
    assert_eq!(session.href(), "/app/projects/42/cohorts/7/users/u9/sessions/s1");
    assert_eq!(
        navigator.active_path().await,
        vec![NodeId::company(), node_id("42"), node_id("42-7"), node_id("42-7-u9"), node_id("42-7-u9-s1")]
    );

    let saved = PersistedNavigation::load(storage.as_ref() as &dyn PersistenceAdapter, "navigation-store")
        .unwrap()
        .unwrap();
    assert_eq!(saved.current_session_id.as_ref().map(|id| id.as_str()), Some("s1"));
    assert!(saved.expanded_nodes.contains(&node_id("42-7-u9")));

    let up = navigator.navigate_up().await.unwrap();
    assert_eq!(up.as_deref(), Some("/app/projects/42/cohorts/7/users/u9"));
    assert_eq!(history.last().as_deref(), Some("/app/projects/42/cohorts/7/users/u9"));

    navigator.sign_out().await;

    let view = navigator.view().await;
    assert!(view.tree.is_empty());
    assert!(view.expanded.is_empty());
    assert_eq!(view.current_level, Level::Company);
    assert_eq!(view.user_email, None);
    let saved = PersistedNavigation::load(storage.as_ref() as &dyn PersistenceAdapter, "navigation-store")
        .unwrap()
        .unwrap();
    assert!(saved.expanded_nodes.is_empty());
    assert_eq!(saved.current_project_id, None);
}

#[tokio::test]
async fn unknown_project_still_shows_the_company() {
    let backend = Arc::new(JsonBackend::new());
    let navigator = Navigator::new(
        NavigatorConfig::default(),
        NavigatorServices::new(backend.clone(), Arc::new(MemoryHistory::new()), Arc::new(MemoryStorage::new())),
    );
    navigator.sign_in(Identity::new("analyst@example.test", "token")).await;

    navigator.observe_route("/app/projects/99").await.unwrap();

    assert_eq!(backend.requests(), vec!["project:"]);
    let view = navigator.view().await;
    assert_eq!(view.tree[0].children().len(), 2);
    assert_eq!(view.breadcrumbs.len(), 2);
    assert_eq!(count_active(&view.tree), 0);
    assert!(navigator.current_node().await.is_none());
}
