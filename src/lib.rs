// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Dashnav: navigation state for a multi-tenant analytics dashboard.
//!
//! The dashboard drills down company → project → cohort → user → session. This crate keeps a
//! lazily populated tree, breadcrumbs and the active node in sync with the current URL:
//!
//! - [`routes`] parses paths into a [`model::NavigationContext`] and builds canonical hrefs.
//! - [`breadcrumbs`] derives the trail for a context.
//! - [`tree`] holds the immutable, structurally shared tree and its expansion/active/loading
//!   flags.
//! - [`nav::Navigator`] reconciles route changes, fetches missing lists through a
//!   [`gateway::DataGateway`], and persists preferences through a
//!   [`store::PersistenceAdapter`].

pub mod breadcrumbs;
pub mod cache;
pub mod config;
pub mod gateway;
pub mod loading;
pub mod model;
pub mod nav;
pub mod routes;
pub mod store;
pub mod tree;

pub use config::NavigatorConfig;
pub use nav::{NavigationError, NavigationView, Navigator, NavigatorServices};
