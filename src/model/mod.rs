// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A navigation context (ids parsed from the URL) selects a path through the company →
//! project → cohort → user → session tree; breadcrumbs and tree nodes are derived from it.

pub mod breadcrumb;
pub mod context;
pub mod entity;
pub mod ids;
pub mod node;

pub use breadcrumb::Breadcrumb;
pub use context::{Level, LevelPaths, NavigationContext, ParseLevelError};
pub use entity::{
    CohortSummary, EntityKind, EntityList, ProjectSummary, SessionSummary, UserSummary,
};
pub use ids::{CohortId, Id, IdError, NodeId, ProjectId, SessionId, UserId};
pub use node::{
    CohortMetadata, CompanyMetadata, NavigationNode, NodeMetadata, NodeRef, ProjectMetadata,
    SessionMetadata, UserMetadata,
};
