// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use serde_json::json;

use dashnav::model::{EntityKind, EntityList, NodeId};
use dashnav::tree::{build_child_nodes, build_company_node, count_active, TreeStore};

mod profiler;

// Benchmark identity (keep stable):
// - Group name in this file: `tree.flags`
// - Case IDs (the string after the `/`) must remain stable so results stay comparable
//   (e.g. `small`, `large`).
struct Shape {
    name: &'static str,
    projects: usize,
    cohorts: usize,
    users: usize,
}

const SHAPES: &[Shape] = &[
    Shape { name: "small", projects: 5, cohorts: 5, users: 10 },
    Shape { name: "large", projects: 40, cohorts: 20, users: 25 },
];

fn entity_list(kind: EntityKind, items: serde_json::Value) -> EntityList {
    let payload = serde_json::to_vec(&items).expect("bench payload");
    EntityList::from_json(kind, &payload).expect("bench entity list")
}

fn build_store(shape: &Shape) -> (TreeStore, usize) {
    let projects = entity_list(
        EntityKind::Project,
        (0..shape.projects)
            .map(|p| json!({ "projectId": format!("p{p}"), "projectName": format!("Project {p}") }))
            .collect(),
    );
    let EntityList::Projects(projects) = projects else {
        unreachable!("projects payload decodes as projects");
    };

    let mut store = TreeStore::new();
    store.replace_root(vec![build_company_node(&projects)]);
    let mut nodes = 1 + shape.projects;

    for p in 0..shape.projects {
        let project_id = NodeId::company().child(&format!("p{p}")).expect("project node id");
        let cohorts = entity_list(
            EntityKind::Cohort,
            (0..shape.cohorts)
                .map(|c| json!({ "id": format!("c{c}"), "cohortName": format!("Cohort {c}") }))
                .collect(),
        );
        let parent = store.find(&project_id).expect("project node").clone();
        let children = build_child_nodes(&parent, &cohorts).expect("cohort nodes");
        nodes += children.len();
        store.attach_children(&project_id, children);

        for c in 0..shape.cohorts {
            let cohort_id = project_id.child(&format!("c{c}")).expect("cohort node id");
            let users = entity_list(
                EntityKind::User,
                (0..shape.users)
                    .map(|u| json!({ "id": format!("u{u}"), "email": format!("u{u}@example.test") }))
                    .collect(),
            );
            let parent = store.find(&cohort_id).expect("cohort node").clone();
            let children = build_child_nodes(&parent, &users).expect("user nodes");
            nodes += children.len();
            store.attach_children(&cohort_id, children);
        }
    }

    (store, nodes)
}

fn bench_tree_flags(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree.flags");

    for shape in SHAPES {
        let (store, nodes) = build_store(shape);
        let last = shape.projects - 1;
        let deep_user = NodeId::compose([
            format!("p{last}").as_str(),
            format!("c{}", shape.cohorts - 1).as_str(),
            format!("u{}", shape.users - 1).as_str(),
        ])
        .expect("deep user id");
        let project = NodeId::company().child(&format!("p{last}")).expect("project id");

        group.throughput(Throughput::Elements(nodes as u64));

        group.bench_function(format!("set_active/{}", shape.name), |b| {
            b.iter_batched(
                || store.clone(),
                |mut store| {
                    store.set_active(black_box(&deep_user));
                    black_box(count_active(store.tree()))
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("toggle_expansion/{}", shape.name), |b| {
            b.iter_batched(
                || store.clone(),
                |mut store| {
                    store.toggle_expansion(black_box(&project));
                    black_box(store.is_expanded(&project))
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("set_loading/{}", shape.name), |b| {
            b.iter_batched(
                || store.clone(),
                |mut store| {
                    store.set_loading(black_box(&deep_user), true);
                    store.set_loading(black_box(&deep_user), false);
                    black_box(store.tree().len())
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = bench_tree_flags
}
criterion_main!(benches);
