// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Builds tree nodes from fetched entity lists.

use crate::model::{
    CohortMetadata, CompanyMetadata, EntityKind, EntityList, Level, NavigationNode, NodeId,
    NodeMetadata, ProjectMetadata, ProjectSummary, SessionMetadata, UserMetadata,
};
use crate::routes;

use super::TreeError;

const DEFAULT_COMPANY_NAME: &str = "Company";

/// The company root with one (lazy, childless) node per project.
///
/// The company name comes from the first project that reports one; an empty list still yields
/// a root, just without children.
pub fn build_company_node(projects: &[ProjectSummary]) -> NavigationNode {
    let name = projects
        .iter()
        .find_map(|project| project.company_name.as_deref())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(DEFAULT_COMPANY_NAME);

    let company_id = NodeId::company();
    let project_count = u32::try_from(projects.len()).unwrap_or(u32::MAX);
    let company = NavigationNode::new(
        company_id.clone(),
        name,
        Level::Company,
        routes::COMPANY_PATH,
        None,
        NodeMetadata::Company(CompanyMetadata { project_count }),
    );

    let children = projects
        .iter()
        .filter_map(|project| {
            let href = routes::child_href(routes::COMPANY_PATH, Level::Company, project.project_id.as_str())?;
            Some(NavigationNode::new(
                company_id.child(project.project_id.as_str()).ok()?,
                project.project_name.clone(),
                Level::Project,
                href,
                Some(company_id.clone()),
                NodeMetadata::Project(ProjectMetadata {
                    cohort_count: project.cohort_count,
                    user_count: project.user_count,
                    session_count: project.session_count,
                    status: project.overall_status.clone(),
                    website: project.project_website.clone(),
                }),
            ))
        })
        .collect();

    company.with_children(children)
}

/// Child nodes of `parent` built from `entities`.
///
/// Each child id is the parent's composite id extended with the entity id, and each child starts
/// collapsed, inactive, not loading and without children. `entities` must be the kind that
/// lives directly below `parent`.
pub fn build_child_nodes(
    parent: &NavigationNode,
    entities: &EntityList,
) -> Result<Vec<NavigationNode>, TreeError> {
    let expected = EntityKind::children_of(parent.kind());
    if expected != Some(entities.kind()) {
        return Err(TreeError::KindMismatch {
            parent: parent.id().clone(),
            expected,
            actual: entities.kind(),
        });
    }

    let child = |segment: &str, name: &str, metadata: NodeMetadata| -> Result<NavigationNode, TreeError> {
        let id = parent.id().child(segment).map_err(|source| TreeError::InvalidId {
            parent: parent.id().clone(),
            segment: segment.to_owned(),
            source,
        })?;
        let href = routes::child_href(parent.href(), parent.kind(), segment).ok_or_else(|| {
            TreeError::KindMismatch {
                parent: parent.id().clone(),
                expected,
                actual: entities.kind(),
            }
        })?;
        Ok(NavigationNode::new(
            id,
            name,
            entities.kind().level(),
            href,
            Some(parent.id().clone()),
            metadata,
        ))
    };

    match entities {
        EntityList::Projects(projects) => projects
            .iter()
            .map(|project| {
                child(
                    project.project_id.as_str(),
                    &project.project_name,
                    NodeMetadata::Project(ProjectMetadata {
                        cohort_count: project.cohort_count,
                        user_count: project.user_count,
                        session_count: project.session_count,
                        status: project.overall_status.clone(),
                        website: project.project_website.clone(),
                    }),
                )
            })
            .collect(),
        EntityList::Cohorts(cohorts) => cohorts
            .iter()
            .map(|cohort| {
                child(
                    cohort.id.as_str(),
                    &cohort.cohort_name,
                    NodeMetadata::Cohort(CohortMetadata {
                        user_count: cohort.user_count,
                        version: cohort.version.clone(),
                        start_date: cohort.start_date.clone(),
                    }),
                )
            })
            .collect(),
        EntityList::Users(users) => users
            .iter()
            .map(|user| {
                child(
                    user.id.as_str(),
                    user.label(),
                    NodeMetadata::User(UserMetadata {
                        session_count: user.session_count,
                        email: user.email.clone(),
                    }),
                )
            })
            .collect(),
        EntityList::Sessions(sessions) => sessions
            .iter()
            .map(|session| {
                child(
                    session.session_id.as_str(),
                    session.label(),
                    NodeMetadata::Session(SessionMetadata {
                        status: session.status.clone(),
                        start_date: session.start_date.clone(),
                    }),
                )
            })
            .collect(),
    }
}
