// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use serde::Serialize;

use super::context::Level;
use super::ids::NodeId;

/// Shared handle to a tree node. Untouched subtrees are shared between successive trees.
pub type NodeRef = Arc<NavigationNode>;

/// One entry of the navigation tree.
///
/// Nodes are immutable once published: every tree mutation builds new nodes along the changed
/// path and reuses the untouched ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationNode {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) kind: Level,
    pub(crate) href: String,
    pub(crate) level: u8,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeRef>,
    pub(crate) is_expanded: bool,
    pub(crate) is_active: bool,
    pub(crate) is_loading: bool,
    pub(crate) metadata: NodeMetadata,
}

impl NavigationNode {
    pub fn new(
        id: NodeId,
        name: impl Into<String>,
        kind: Level,
        href: impl Into<String>,
        parent: Option<NodeId>,
        metadata: NodeMetadata,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            href: href.into(),
            level: kind.depth(),
            parent,
            children: Vec::new(),
            is_expanded: false,
            is_active: false,
            is_loading: false,
            metadata,
        }
    }

    pub fn with_children(mut self, children: Vec<NavigationNode>) -> Self {
        self.children = children.into_iter().map(Arc::new).collect();
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Level {
        self.kind
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn parent(&self) -> Option<&NodeId> {
        self.parent.as_ref()
    }

    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_expanded(&self) -> bool {
        self.is_expanded
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }
}

/// Per-level metadata carried by a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeMetadata {
    Company(CompanyMetadata),
    Project(ProjectMetadata),
    Cohort(CohortMetadata),
    User(UserMetadata),
    Session(SessionMetadata),
}

impl NodeMetadata {
    /// The child count shown next to the node, when the backend reported one.
    pub fn count(&self) -> Option<u32> {
        match self {
            Self::Company(meta) => Some(meta.project_count),
            Self::Project(meta) => meta.cohort_count,
            Self::Cohort(meta) => meta.user_count,
            Self::User(meta) => meta.session_count,
            Self::Session(_) => None,
        }
    }

    pub fn status(&self) -> Option<&str> {
        match self {
            Self::Project(meta) => meta.status.as_deref(),
            Self::Session(meta) => meta.status.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMetadata {
    pub project_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub cohort_count: Option<u32>,
    pub user_count: Option<u32>,
    pub session_count: Option<u32>,
    pub status: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortMetadata {
    pub user_count: Option<u32>,
    pub version: Option<String>,
    pub start_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetadata {
    pub session_count: Option<u32>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub status: Option<String>,
    pub start_date: Option<String>,
}
