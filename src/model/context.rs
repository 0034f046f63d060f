// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::ids::{CohortId, NodeId, ProjectId, SessionId, UserId};
use crate::routes;

/// One level of the drill-down hierarchy. Also used as the node type in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Company,
    Project,
    Cohort,
    User,
    Session,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Company,
        Level::Project,
        Level::Cohort,
        Level::User,
        Level::Session,
    ];

    /// Ancestor depth; the company root is 0.
    pub fn depth(self) -> u8 {
        match self {
            Self::Company => 0,
            Self::Project => 1,
            Self::Cohort => 2,
            Self::User => 3,
            Self::Session => 4,
        }
    }

    pub fn parent(self) -> Option<Level> {
        match self {
            Self::Company => None,
            Self::Project => Some(Self::Company),
            Self::Cohort => Some(Self::Project),
            Self::User => Some(Self::Cohort),
            Self::Session => Some(Self::User),
        }
    }

    pub fn child(self) -> Option<Level> {
        match self {
            Self::Company => Some(Self::Project),
            Self::Project => Some(Self::Cohort),
            Self::Cohort => Some(Self::User),
            Self::User => Some(Self::Session),
            Self::Session => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Project => "project",
            Self::Cohort => "cohort",
            Self::User => "user",
            Self::Session => "session",
        }
    }

    /// Display name used for breadcrumbs.
    pub fn title(self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::Project => "Project",
            Self::Cohort => "Cohort",
            Self::User => "User",
            Self::Session => "Session",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError {
    value: String,
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown navigation level {:?}", self.value)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ParseLevelError { value: s.to_owned() })
    }
}

/// The ids implied by the current URL.
///
/// The fields are stored as parsed. Consumers that need the hierarchy (breadcrumbs, active
/// node, expansion path) only look at the *resolved prefix*: a cohort id without a project id
/// is carried but never resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cohort_id: Option<CohortId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

/// Canonical href per level for a context; `None` where the level is not resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelPaths {
    pub company: String,
    pub project: Option<String>,
    pub cohort: Option<String>,
    pub user: Option<String>,
    pub session: Option<String>,
}

impl NavigationContext {
    pub fn company() -> Self {
        Self::default()
    }

    pub fn project(project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            ..Self::default()
        }
    }

    pub fn with_cohort(mut self, cohort_id: CohortId) -> Self {
        self.cohort_id = Some(cohort_id);
        self
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.project_id.is_none()
            && self.cohort_id.is_none()
            && self.user_id.is_none()
            && self.session_id.is_none()
    }

    /// True when no child id is present without all of its ancestor ids.
    pub fn is_well_formed(&self) -> bool {
        (self.cohort_id.is_none() || self.project_id.is_some())
            && (self.user_id.is_none() || self.cohort_id.is_some())
            && (self.session_id.is_none() || self.user_id.is_some())
            && *self == self.resolved()
    }

    /// The longest ancestor-complete prefix of this context.
    pub fn resolved(&self) -> NavigationContext {
        let mut out = NavigationContext::default();
        let Some(project_id) = &self.project_id else {
            return out;
        };
        out.project_id = Some(project_id.clone());
        let Some(cohort_id) = &self.cohort_id else {
            return out;
        };
        out.cohort_id = Some(cohort_id.clone());
        let Some(user_id) = &self.user_id else {
            return out;
        };
        out.user_id = Some(user_id.clone());
        out.session_id = self.session_id.clone();
        out
    }

    /// Deepest resolved level; `Company` for an empty context.
    pub fn level(&self) -> Level {
        let resolved = self.resolved();
        if resolved.session_id.is_some() {
            Level::Session
        } else if resolved.user_id.is_some() {
            Level::User
        } else if resolved.cohort_id.is_some() {
            Level::Cohort
        } else if resolved.project_id.is_some() {
            Level::Project
        } else {
            Level::Company
        }
    }

    /// Number of resolved ids below the company root.
    pub fn depth(&self) -> usize {
        usize::from(self.level().depth())
    }

    /// Resolved id segments from the project down, in hierarchy order.
    pub fn segments(&self) -> SmallVec<[&str; 4]> {
        let mut out = SmallVec::new();
        let Some(project_id) = &self.project_id else {
            return out;
        };
        out.push(project_id.as_str());
        let Some(cohort_id) = &self.cohort_id else {
            return out;
        };
        out.push(cohort_id.as_str());
        let Some(user_id) = &self.user_id else {
            return out;
        };
        out.push(user_id.as_str());
        if let Some(session_id) = &self.session_id {
            out.push(session_id.as_str());
        }
        out
    }

    /// The resolved context cut down to `level` (levels deeper than the context stay unset).
    pub fn truncated(&self, level: Level) -> NavigationContext {
        let mut out = self.resolved();
        if level < Level::Session {
            out.session_id = None;
        }
        if level < Level::User {
            out.user_id = None;
        }
        if level < Level::Cohort {
            out.cohort_id = None;
        }
        if level < Level::Project {
            out.project_id = None;
        }
        out
    }

    /// Context one level above the deepest resolved level, or `None` at the company root.
    pub fn parent(&self) -> Option<NavigationContext> {
        let parent = self.level().parent()?;
        Some(self.truncated(parent))
    }

    /// Composite node id for `level`, or `None` when that level is not resolved.
    pub fn node_id_at(&self, level: Level) -> Option<NodeId> {
        if level == Level::Company {
            return Some(NodeId::company());
        }
        if level > self.level() {
            return None;
        }
        let segments = self.segments();
        NodeId::compose(segments.iter().take(usize::from(level.depth())).copied()).ok()
    }

    /// Node that must be active for this context.
    pub fn active_node_id(&self) -> NodeId {
        self.node_id_at(self.level()).unwrap_or_else(NodeId::company)
    }

    /// Node ids to expand so the active node becomes visible: every resolved level from the
    /// project down, stopping above sessions (sessions are leaves).
    pub fn expansion_path(&self) -> Vec<NodeId> {
        let deepest = self.level().min(Level::User);
        [Level::Project, Level::Cohort, Level::User]
            .into_iter()
            .filter(|level| *level <= deepest)
            .filter_map(|level| self.node_id_at(level))
            .collect()
    }

    /// Canonical href of the deepest resolved level.
    pub fn href(&self) -> String {
        routes::href_for(self, self.level()).unwrap_or_else(|| routes::COMPANY_PATH.to_owned())
    }

    pub fn paths(&self) -> LevelPaths {
        LevelPaths {
            company: routes::COMPANY_PATH.to_owned(),
            project: routes::href_for(self, Level::Project),
            cohort: routes::href_for(self, Level::Cohort),
            user: routes::href_for(self, Level::User),
            session: routes::href_for(self, Level::Session),
        }
    }
}
