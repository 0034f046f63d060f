// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::breadcrumbs::Breadcrumbs;
use crate::model::{Level, NavigationContext, NodeId, NodeRef};

/// Read-only snapshot of everything a navigation view renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationView {
    pub tree: Vec<NodeRef>,
    pub breadcrumbs: Breadcrumbs,
    pub current_context: NavigationContext,
    pub current_level: Level,
    pub active_node_id: Option<NodeId>,
    /// The company list is loading.
    pub is_loading: bool,
    pub expanded: Vec<NodeId>,
    /// Parents whose child list is disclosed ("projects" under the company, "cohorts" per
    /// project).
    pub list_expanded: Vec<NodeId>,
    /// Human-readable fetch errors keyed by the parent whose list failed to load.
    pub errors: BTreeMap<NodeId, String>,
    pub is_dark_mode: bool,
    pub user_email: Option<String>,
}

impl NavigationView {
    pub fn error_for(&self, node_id: &NodeId) -> Option<&str> {
        self.errors.get(node_id).map(String::as_str)
    }

    pub fn is_list_expanded(&self, node_id: &NodeId) -> bool {
        self.list_expanded.contains(node_id)
    }
}
