// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Route parsing and canonical hrefs.
//!
//! Dashboard routes have the shape
//! `/app/projects/<project>/cohorts/<cohort>/users/<user>/sessions/<session>`; the company
//! summary lives at `/app/index`.

use crate::model::{CohortId, Level, NavigationContext, ProjectId, SessionId, UserId};

pub const APP_ROOT: &str = "/app";
pub const COMPANY_PATH: &str = "/app/index";

const PROJECTS_MARKER: &str = "projects";
const COHORTS_MARKER: &str = "cohorts";
const USERS_MARKER: &str = "users";
const SESSIONS_MARKER: &str = "sessions";

/// Derives a [`NavigationContext`] from a URL path.
///
/// Each field is taken from the segment following the first occurrence of its marker. Empty
/// segments (double or trailing slashes) are dropped before indexing, and a marker without a
/// following segment leaves its field unset. Ids are not otherwise validated.
pub fn parse_route(path: &str) -> NavigationContext {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();

    NavigationContext {
        project_id: segment_after(&segments, PROJECTS_MARKER).and_then(|s| ProjectId::new(s).ok()),
        cohort_id: segment_after(&segments, COHORTS_MARKER).and_then(|s| CohortId::new(s).ok()),
        user_id: segment_after(&segments, USERS_MARKER).and_then(|s| UserId::new(s).ok()),
        session_id: segment_after(&segments, SESSIONS_MARKER).and_then(|s| SessionId::new(s).ok()),
    }
}

/// Path marker that introduces an id of `level`; the company root has none.
pub fn marker_for(level: Level) -> Option<&'static str> {
    match level {
        Level::Company => None,
        Level::Project => Some(PROJECTS_MARKER),
        Level::Cohort => Some(COHORTS_MARKER),
        Level::User => Some(USERS_MARKER),
        Level::Session => Some(SESSIONS_MARKER),
    }
}

/// Href of a child with id `segment` one level below a node at `parent_level` with
/// `parent_href`.
pub fn child_href(parent_href: &str, parent_level: Level, segment: &str) -> Option<String> {
    let marker = marker_for(parent_level.child()?)?;
    let base = if parent_level == Level::Company { APP_ROOT } else { parent_href };
    Some(format!("{base}/{marker}/{segment}"))
}

fn segment_after<'a>(segments: &[&'a str], marker: &str) -> Option<&'a str> {
    let index = segments.iter().position(|segment| *segment == marker)?;
    segments.get(index + 1).copied()
}

/// Canonical href for `level`, built from the resolved ids of `context`.
///
/// Returns `None` when `context` does not resolve down to `level`.
pub fn href_for(context: &NavigationContext, level: Level) -> Option<String> {
    if level == Level::Company {
        return Some(COMPANY_PATH.to_owned());
    }
    if level > context.level() {
        return None;
    }

    let markers = [PROJECTS_MARKER, COHORTS_MARKER, USERS_MARKER, SESSIONS_MARKER];
    let mut href = String::from(APP_ROOT);
    for (marker, id) in markers.iter().zip(context.segments()).take(usize::from(level.depth())) {
        href.push('/');
        href.push_str(marker);
        href.push('/');
        href.push_str(id);
    }
    Some(href)
}

/// Href used by `navigate_to`: the canonical href for `level`, or [`APP_ROOT`] when the ids
/// for that level are incomplete.
pub fn navigation_target(level: Level, ids: &NavigationContext) -> String {
    href_for(ids, level).unwrap_or_else(|| APP_ROOT.to_owned())
}
