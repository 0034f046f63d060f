// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

use super::{active_path, count_active, find_node, node_ids, TreeStore};
use crate::model::{
    CohortId, CohortSummary, EntityList, NavigationNode, NodeId, NodeRef, ProjectId,
    ProjectSummary, SessionId, SessionSummary, UserId, UserSummary,
};
use crate::tree::{build_child_nodes, build_company_node};

fn node_id(value: &str) -> NodeId {
    NodeId::new(value).unwrap()
}

fn project(id: &str) -> ProjectSummary {
    ProjectSummary {
        project_id: ProjectId::new(id).unwrap(),
        project_name: format!("Project {id}"),
        project_website: None,
        overall_status: None,
        company_name: Some("Acme".to_owned()),
        cohort_count: Some(1),
        user_count: None,
        session_count: None,
    }
}

fn cohorts(ids: &[&str]) -> EntityList {
    EntityList::Cohorts(
        ids.iter()
            .map(|id| CohortSummary {
                id: CohortId::new(*id).unwrap(),
                cohort_name: format!("Cohort {id}"),
                version: None,
                start_date: None,
                user_count: Some(1),
            })
            .collect(),
    )
}

fn users(ids: &[&str]) -> EntityList {
    EntityList::Users(
        ids.iter()
            .map(|id| UserSummary {
                id: UserId::new(*id).unwrap(),
                display_name: None,
                full_name: Some(format!("User {id}")),
                email: None,
                session_count: Some(1),
            })
            .collect(),
    )
}

fn sessions(ids: &[&str]) -> EntityList {
    EntityList::Sessions(
        ids.iter()
            .map(|id| SessionSummary {
                session_id: SessionId::new(*id).unwrap(),
                session_name: None,
                status: Some("done".to_owned()),
                start_date: None,
            })
            .collect(),
    )
}

fn children_of(store: &TreeStore, parent: &str, entities: &EntityList) -> Vec<NavigationNode> {
    let parent = store.find(&node_id(parent)).unwrap();
    build_child_nodes(parent, entities).unwrap()
}

/// company > p1, p2; p1 > p1-c1, p1-c2; p1-c1 > p1-c1-u1; p1-c1-u1 > p1-c1-u1-s1
#[fixture]
fn store() -> TreeStore {
    let mut store = TreeStore::new();
    store.replace_root(vec![build_company_node(&[project("p1"), project("p2")])]);

    let cohort_nodes = children_of(&store, "p1", &cohorts(&["c1", "c2"]));
    store.attach_children(&node_id("p1"), cohort_nodes);
    let user_nodes = children_of(&store, "p1-c1", &users(&["u1"]));
    store.attach_children(&node_id("p1-c1"), user_nodes);
    let session_nodes = children_of(&store, "p1-c1-u1", &sessions(&["s1"]));
    store.attach_children(&node_id("p1-c1-u1"), session_nodes);
    store
}

fn expanded_flags(nodes: &[NodeRef]) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack: Vec<&NodeRef> = nodes.iter().collect();
    while let Some(node) = stack.pop() {
        if node.is_expanded() {
            out.push(node.id().clone());
        }
        stack.extend(node.children());
    }
    out.sort();
    out
}

#[rstest]
fn session_node_is_found_by_its_composite_id(store: TreeStore) {
    let session = find_node(store.tree(), &node_id("p1-c1-u1-s1")).unwrap();

    assert_eq!(session.id().as_str(), "p1-c1-u1-s1");
    assert_eq!(session.href(), "/app/projects/p1/cohorts/c1/users/u1/sessions/s1");
    assert_eq!(session.parent(), Some(&node_id("p1-c1-u1")));
    assert_eq!(session.level(), 4);
}

#[rstest]
fn expand_path_never_collapses_earlier_expansions(mut store: TreeStore) {
    store.expand_path(&[node_id("p1"), node_id("p1-c1"), node_id("p1-c1-u1")]);
    store.expand_path(&[node_id("p2")]);

    let expected = vec![node_id("p1"), node_id("p1-c1"), node_id("p1-c1-u1"), node_id("p2")];
    assert_eq!(store.expanded().iter().cloned().collect::<Vec<_>>(), expected);
    assert_eq!(expanded_flags(store.tree()), expected);
}

#[rstest]
fn toggle_expansion_flips_membership_and_flags(mut store: TreeStore) {
    store.toggle_expansion(&node_id("p1"));
    assert!(store.find(&node_id("p1")).unwrap().is_expanded());

    store.toggle_expansion(&node_id("p1"));
    assert!(!store.find(&node_id("p1")).unwrap().is_expanded());
    assert!(store.expanded().is_empty());
}

#[rstest]
#[case::company("company")]
#[case::project("p2")]
#[case::cohort("p1-c2")]
#[case::session("p1-c1-u1-s1")]
fn exactly_one_node_is_active_after_any_set_active(mut store: TreeStore, #[case] target: &str) {
    store.set_active(&node_id("p1"));
    store.set_active(&node_id(target));

    assert_eq!(count_active(store.tree()), 1);
    assert!(store.find(&node_id(target)).unwrap().is_active());
    assert_eq!(store.active_node_id(), Some(&node_id(target)));
}

/// At most one node is active. Zero is possible only while the active id names a node that has
/// not been loaded yet.
#[rstest]
fn activating_a_missing_node_waits_for_it_to_arrive(mut store: TreeStore) {
    store.set_active(&node_id("p1"));

    store.set_active(&node_id("p2-c7"));

    assert_eq!(count_active(store.tree()), 0);
    assert_eq!(store.active_node_id(), Some(&node_id("p2-c7")));

    let cohort_nodes = children_of(&store, "p2", &cohorts(&["c6", "c7"]));
    store.attach_children(&node_id("p2"), cohort_nodes);

    assert_eq!(count_active(store.tree()), 1);
    assert!(store.find(&node_id("p2-c7")).unwrap().is_active());
    assert!(!store.find(&node_id("p2-c6")).unwrap().is_active());
}

#[rstest]
fn active_path_runs_from_root_to_active_node(mut store: TreeStore) {
    assert!(active_path(store.tree()).is_empty());

    store.set_active(&node_id("p1-c1-u1"));

    assert_eq!(
        store.active_path(),
        vec![node_id("company"), node_id("p1"), node_id("p1-c1"), node_id("p1-c1-u1")]
    );
}

#[rstest]
fn set_loading_targets_a_single_node(mut store: TreeStore) {
    store.set_loading(&node_id("p1-c2"), true);
    assert!(store.find(&node_id("p1-c2")).unwrap().is_loading());
    assert!(!store.find(&node_id("p1-c1")).unwrap().is_loading());

    store.set_loading(&node_id("p1-c2"), false);
    assert!(!store.find(&node_id("p1-c2")).unwrap().is_loading());
}

#[rstest]
fn unknown_ids_leave_the_tree_untouched(mut store: TreeStore) {
    let before: Vec<NodeRef> = store.tree().to_vec();

    store.set_loading(&node_id("ghost"), true);
    store.set_active(&node_id("ghost"));
    store.attach_children(&node_id("ghost"), Vec::new());

    assert_eq!(store.tree().len(), before.len());
    assert!(Arc::ptr_eq(&store.tree()[0], &before[0]));
    assert_eq!(count_active(store.tree()), 0);
}

#[rstest]
fn flag_updates_share_untouched_subtrees(mut store: TreeStore) {
    let before_p2 = Arc::clone(store.find(&node_id("p2")).unwrap());
    let before_c2 = Arc::clone(store.find(&node_id("p1-c2")).unwrap());
    let before_root = Arc::clone(&store.tree()[0]);

    store.set_loading(&node_id("p1-c1"), true);

    assert!(!Arc::ptr_eq(&store.tree()[0], &before_root));
    assert!(Arc::ptr_eq(store.find(&node_id("p2")).unwrap(), &before_p2));
    assert!(Arc::ptr_eq(store.find(&node_id("p1-c2")).unwrap(), &before_c2));
}

#[rstest]
fn attach_children_replaces_only_the_matched_node(mut store: TreeStore) {
    let before_p1_c1 = Arc::clone(store.find(&node_id("p1-c1")).unwrap());
    let replacement = children_of(&store, "p2", &cohorts(&["c9"]));

    store.attach_children(&node_id("p2"), replacement);

    let p2 = store.find(&node_id("p2")).unwrap();
    assert_eq!(p2.children().len(), 1);
    assert_eq!(p2.children()[0].id().as_str(), "p2-c9");
    assert!(Arc::ptr_eq(store.find(&node_id("p1-c1")).unwrap(), &before_p1_c1));
}

#[rstest]
fn attached_children_pick_up_existing_expansion_and_active_state() {
    let mut store = TreeStore::new();
    store.replace_root(vec![build_company_node(&[project("p1")])]);
    store.expand_path(&[node_id("p1"), node_id("p1-c1")]);
    store.set_active(&node_id("p1-c1"));

    let nodes = children_of(&store, "p1", &cohorts(&["c1", "c2"]));
    store.attach_children(&node_id("p1"), nodes);

    let cohort = store.find(&node_id("p1-c1")).unwrap();
    assert!(cohort.is_expanded());
    assert!(cohort.is_active());
    assert_eq!(count_active(store.tree()), 1);
}

#[rstest]
fn replacing_the_root_with_nothing_clears_expansions(mut store: TreeStore) {
    store.expand_path(&[node_id("p1"), node_id("p1-c1")]);

    store.replace_root(Vec::new());

    assert!(store.tree().is_empty());
    assert!(store.expanded().is_empty());
    assert!(store.live_expanded().is_empty());
}

#[rstest]
fn live_expanded_skips_ids_without_a_node(mut store: TreeStore) {
    store.expand_path(&[node_id("p1"), node_id("p7-c1")]);

    assert_eq!(store.live_expanded(), vec![node_id("p1")]);
    store.prune_expanded();
    assert_eq!(store.expanded().len(), 1);
}

#[rstest]
fn collapse_all_clears_every_flag(mut store: TreeStore) {
    store.expand_path(&[node_id("company"), node_id("p1"), node_id("p1-c1")]);

    store.collapse_all();

    assert!(expanded_flags(store.tree()).is_empty());
}

#[rstest]
fn node_ids_lists_every_node(store: TreeStore) {
    let ids = node_ids(store.tree());

    assert_eq!(ids.len(), 7);
    assert!(ids.contains(&node_id("company")));
    assert!(ids.contains(&node_id("p1-c1-u1-s1")));
}

#[test]
fn restored_expansions_survive_until_a_tree_arrives() {
    let mut store = TreeStore::with_expanded([node_id("p1")]);
    assert!(store.is_expanded(&node_id("p1")));

    store.replace_root(vec![build_company_node(&[project("p1")])]);

    assert!(store.find(&node_id("p1")).unwrap().is_expanded());
}
