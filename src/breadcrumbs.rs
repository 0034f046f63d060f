// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Breadcrumb trail derived from the navigation context.

use smallvec::SmallVec;

use crate::model::{Breadcrumb, Level, NavigationContext};
use crate::routes;

/// Breadcrumbs for one context; a full trail is five entries.
pub type Breadcrumbs = SmallVec<[Breadcrumb; 5]>;

/// Builds the trail for `context`: always the company crumb, then one crumb per resolved level.
///
/// A level is only emitted when all of its ancestors are present, so a context with a cohort
/// but no project yields the company crumb alone. The last crumb is marked active.
pub fn generate(context: &NavigationContext) -> Breadcrumbs {
    let deepest = context.level();
    let mut crumbs: Breadcrumbs = Level::ALL
        .into_iter()
        .take_while(|level| *level <= deepest)
        .filter_map(|level| {
            routes::href_for(context, level).map(|href| Breadcrumb::new(level.title(), href))
        })
        .collect();

    if let Some(last) = crumbs.last_mut() {
        last.is_active = true;
    }
    crumbs
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::generate;
    use crate::routes::parse_route;

    #[rstest]
    #[case("/app/index", 1)]
    #[case("/app/projects/p1", 2)]
    #[case("/app/projects/p1/cohorts/c1", 3)]
    #[case("/app/projects/p1/cohorts/c1/users/u1", 4)]
    #[case("/app/projects/p1/cohorts/c1/users/u1/sessions/s1", 5)]
    fn length_is_one_plus_context_depth(#[case] path: &str, #[case] expected: usize) {
        let ctx = parse_route(path);
        let crumbs = generate(&ctx);
        assert_eq!(crumbs.len(), expected);
        assert_eq!(crumbs.len(), 1 + ctx.depth());
    }

    #[test]
    fn trail_names_and_hrefs_follow_the_hierarchy() {
        let crumbs = generate(&parse_route("/app/projects/p1/cohorts/c1"));
        let names: Vec<_> = crumbs.iter().map(|c| c.name.as_str()).collect();
        let hrefs: Vec<_> = crumbs.iter().map(|c| c.href.as_str()).collect();
        assert_eq!(names, ["Company", "Project", "Cohort"]);
        assert_eq!(hrefs, ["/app/index", "/app/projects/p1", "/app/projects/p1/cohorts/c1"]);
        assert_eq!(crumbs.iter().filter(|c| c.is_active).count(), 1);
        assert!(crumbs[2].is_active);
    }

    #[test]
    fn orphan_ids_do_not_produce_crumbs() {
        let crumbs = generate(&parse_route("/app/users/u1/sessions/s1"));
        assert_eq!(crumbs.len(), 1);
        assert_eq!(crumbs[0].name, "Company");
        assert!(crumbs[0].is_active);
    }
}
