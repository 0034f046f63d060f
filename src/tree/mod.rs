// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The navigation tree and its per-node UI flags.
//!
//! [`TreeStore`] is the single source of truth for tree shape, the expanded-node set, the active
//! node and per-node loading flags. The expanded set and the active id are authoritative; the
//! `is_expanded`/`is_active` flags on nodes are a projection refreshed on every mutation.
//!
//! Updates never mutate a published node. Nodes on the path to a change are rebuilt and every
//! untouched subtree is shared with the previous tree, so an operation that changes nothing
//! (for example one aimed at an unknown id) returns the very same nodes.

pub mod factory;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::model::{EntityKind, IdError, NavigationNode, NodeId, NodeRef};

pub use factory::{build_child_nodes, build_company_node};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    KindMismatch {
        parent: NodeId,
        expected: Option<EntityKind>,
        actual: EntityKind,
    },
    InvalidId {
        parent: NodeId,
        segment: String,
        source: IdError,
    },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KindMismatch {
                parent,
                expected: Some(expected),
                actual,
            } => write!(f, "node {parent} holds {expected} children, got {actual} list"),
            Self::KindMismatch {
                parent,
                expected: None,
                actual,
            } => write!(f, "node {parent} cannot hold children, got {actual} list"),
            Self::InvalidId {
                parent,
                segment,
                source,
            } => write!(f, "invalid child id {segment:?} under {parent}: {source}"),
        }
    }
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::KindMismatch { .. } => None,
            Self::InvalidId { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TreeStore {
    roots: Vec<NodeRef>,
    expanded: BTreeSet<NodeId>,
    active: Option<NodeId>,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store that remembers previously expanded ids (e.g. restored from storage).
    pub fn with_expanded(expanded: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            expanded: expanded.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn tree(&self) -> &[NodeRef] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn expanded(&self) -> &BTreeSet<NodeId> {
        &self.expanded
    }

    pub fn is_expanded(&self, node_id: &NodeId) -> bool {
        self.expanded.contains(node_id)
    }

    pub fn active_node_id(&self) -> Option<&NodeId> {
        self.active.as_ref()
    }

    pub fn find(&self, node_id: &NodeId) -> Option<&NodeRef> {
        find_node(&self.roots, node_id)
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.find(node_id).is_some()
    }

    /// Wholesale replacement (company reload, logout).
    ///
    /// Expanded ids that do not exist in the new tree are dropped; flags on the incoming nodes
    /// are overwritten by the store's expanded set and active id.
    pub fn replace_root(&mut self, tree: Vec<NavigationNode>) -> &[NodeRef] {
        self.roots = tree.into_iter().map(Arc::new).collect();
        self.prune_expanded();
        self.refresh_expansion_and_active();
        &self.roots
    }

    pub fn toggle_expansion(&mut self, node_id: &NodeId) -> &[NodeRef] {
        if !self.expanded.remove(node_id) {
            self.expanded.insert(node_id.clone());
        }
        self.refresh_expansion()
    }

    pub fn expand(&mut self, node_id: &NodeId) -> &[NodeRef] {
        self.expanded.insert(node_id.clone());
        self.refresh_expansion()
    }

    pub fn collapse(&mut self, node_id: &NodeId) -> &[NodeRef] {
        self.expanded.remove(node_id);
        self.refresh_expansion()
    }

    /// Expands every id in order. Never collapses anything.
    pub fn expand_path(&mut self, node_ids: &[NodeId]) -> &[NodeRef] {
        for node_id in node_ids {
            self.expand(node_id);
        }
        &self.roots
    }

    pub fn collapse_all(&mut self) -> &[NodeRef] {
        self.expanded.clear();
        self.refresh_expansion()
    }

    pub fn set_loading(&mut self, node_id: &NodeId, is_loading: bool) -> &[NodeRef] {
        let mut rewrite = |node: &NavigationNode| NodeFlags {
            is_loading: if node.id() == node_id { is_loading } else { node.is_loading },
            ..NodeFlags::of(node)
        };
        self.apply(&mut rewrite)
    }

    /// Marks `node_id` active and every other node inactive.
    ///
    /// An id that is not in the tree yet is still recorded as the active id: no node is flagged
    /// until a node with that id arrives through [`TreeStore::attach_children`] or
    /// [`TreeStore::replace_root`], which is how a deep link activates a node before its parent
    /// list has loaded. The tree then has zero active nodes in between.
    pub fn set_active(&mut self, node_id: &NodeId) -> &[NodeRef] {
        self.active = Some(node_id.clone());
        let mut rewrite = |node: &NavigationNode| NodeFlags {
            is_active: node.id() == node_id,
            ..NodeFlags::of(node)
        };
        self.apply(&mut rewrite)
    }

    /// Replaces the children of `node_id`. Unknown ids are ignored.
    ///
    /// The new children get their expanded/active flags from the store before they are
    /// attached, so ids expanded ahead of the data show up expanded.
    pub fn attach_children(&mut self, node_id: &NodeId, children: Vec<NavigationNode>) -> &[NodeRef] {
        let mut children: Vec<NodeRef> = children.into_iter().map(Arc::new).collect();
        let expanded = &self.expanded;
        let active = self.active.as_ref();
        let mut project = |node: &NavigationNode| NodeFlags {
            is_expanded: expanded.contains(node.id()),
            is_active: active == Some(node.id()),
            is_loading: node.is_loading,
        };
        if let Some(projected) = rewrite_flags(&children, &mut project) {
            children = projected;
        }

        if let Some(roots) = replace_children(&self.roots, node_id, &mut Some(children)) {
            self.roots = roots;
        }
        &self.roots
    }

    /// Drops expanded ids that are not present in the current tree.
    pub fn prune_expanded(&mut self) {
        let present = node_ids(&self.roots);
        self.expanded.retain(|node_id| present.contains(node_id));
    }

    /// Expanded ids restricted to nodes that currently exist, in sorted order.
    pub fn live_expanded(&self) -> Vec<NodeId> {
        let present = node_ids(&self.roots);
        self.expanded.iter().filter(|id| present.contains(*id)).cloned().collect()
    }

    /// Ids from a root down to the active node; empty when nothing is active.
    pub fn active_path(&self) -> Vec<NodeId> {
        active_path(&self.roots)
    }

    fn refresh_expansion(&mut self) -> &[NodeRef] {
        let expanded = &self.expanded;
        let mut rewrite = |node: &NavigationNode| NodeFlags {
            is_expanded: expanded.contains(node.id()),
            ..NodeFlags::of(node)
        };
        if let Some(roots) = rewrite_flags(&self.roots, &mut rewrite) {
            self.roots = roots;
        }
        &self.roots
    }

    fn refresh_expansion_and_active(&mut self) {
        let expanded = &self.expanded;
        let active = self.active.as_ref();
        let mut rewrite = |node: &NavigationNode| NodeFlags {
            is_expanded: expanded.contains(node.id()),
            is_active: active == Some(node.id()),
            is_loading: node.is_loading,
        };
        if let Some(roots) = rewrite_flags(&self.roots, &mut rewrite) {
            self.roots = roots;
        }
    }

    fn apply(&mut self, rewrite: &mut impl FnMut(&NavigationNode) -> NodeFlags) -> &[NodeRef] {
        if let Some(roots) = rewrite_flags(&self.roots, rewrite) {
            self.roots = roots;
        }
        &self.roots
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeFlags {
    is_expanded: bool,
    is_active: bool,
    is_loading: bool,
}

impl NodeFlags {
    fn of(node: &NavigationNode) -> Self {
        Self {
            is_expanded: node.is_expanded,
            is_active: node.is_active,
            is_loading: node.is_loading,
        }
    }
}

/// Rewrites flags over the whole tree. Returns `None` when no node changed.
fn rewrite_flags<F>(nodes: &[NodeRef], flags: &mut F) -> Option<Vec<NodeRef>>
where
    F: FnMut(&NavigationNode) -> NodeFlags,
{
    let mut changed = false;
    let out: Vec<NodeRef> = nodes
        .iter()
        .map(|node| {
            let children = rewrite_flags(&node.children, flags);
            let next = flags(node);
            if children.is_none() && next == NodeFlags::of(node) {
                return Arc::clone(node);
            }
            changed = true;
            let mut rebuilt = NavigationNode::clone(node);
            rebuilt.is_expanded = next.is_expanded;
            rebuilt.is_active = next.is_active;
            rebuilt.is_loading = next.is_loading;
            if let Some(children) = children {
                rebuilt.children = children;
            }
            Arc::new(rebuilt)
        })
        .collect();
    changed.then_some(out)
}

/// Swaps in `children` under `node_id`, rebuilding only the path down to it.
fn replace_children(
    nodes: &[NodeRef],
    node_id: &NodeId,
    children: &mut Option<Vec<NodeRef>>,
) -> Option<Vec<NodeRef>> {
    for (index, node) in nodes.iter().enumerate() {
        let rebuilt = if node.id() == node_id {
            let mut rebuilt = NavigationNode::clone(node);
            rebuilt.children = children.take()?;
            Some(rebuilt)
        } else {
            replace_children(&node.children, node_id, children).map(|grandchildren| {
                let mut rebuilt = NavigationNode::clone(node);
                rebuilt.children = grandchildren;
                rebuilt
            })
        };

        if let Some(rebuilt) = rebuilt {
            let mut out = nodes.to_vec();
            out[index] = Arc::new(rebuilt);
            return Some(out);
        }
    }
    None
}

/// Depth-first lookup by composite id.
pub fn find_node<'a>(nodes: &'a [NodeRef], node_id: &NodeId) -> Option<&'a NodeRef> {
    for node in nodes {
        if node.id() == node_id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, node_id) {
            return Some(found);
        }
    }
    None
}

/// Every id in the tree.
pub fn node_ids(nodes: &[NodeRef]) -> BTreeSet<NodeId> {
    let mut out = BTreeSet::new();
    let mut stack: Vec<&NodeRef> = nodes.iter().collect();
    while let Some(node) = stack.pop() {
        out.insert(node.id().clone());
        stack.extend(node.children.iter());
    }
    out
}

/// Ids from a root down to the first node flagged active.
pub fn active_path(nodes: &[NodeRef]) -> Vec<NodeId> {
    fn walk(nodes: &[NodeRef], path: &mut Vec<NodeId>) -> bool {
        for node in nodes {
            path.push(node.id().clone());
            if node.is_active || walk(&node.children, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    let mut path = Vec::new();
    walk(nodes, &mut path);
    path
}

/// Number of nodes flagged active.
pub fn count_active(nodes: &[NodeRef]) -> usize {
    nodes.iter().map(|node| usize::from(node.is_active) + count_active(&node.children)).sum()
}

#[cfg(test)]
mod tests;
