// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Seams to the outside world: entity fetches, credential refresh and route transitions.
//!
//! The navigator talks to these traits only. [`http::HttpGateway`] is the production data
//! source; tests drive the navigator with in-memory fakes.

pub mod http;

use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::model::{EntityKind, EntityList, NavigationContext};

pub use http::HttpGateway;

/// A signed-in user as seen by the dashboard: an email for display and a bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub token: String,
}

impl Identity {
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("email", &self.email)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug)]
pub enum GatewayError {
    /// The backend rejected the token (HTTP 401).
    Unauthorized,
    Status {
        status: u16,
        reason: String,
    },
    Transport {
        message: String,
    },
    Decode {
        kind: EntityKind,
        source: serde_json::Error,
    },
    /// `parent` lacks the id needed to list `kind`.
    MissingParent {
        kind: EntityKind,
    },
    KindMismatch {
        expected: EntityKind,
        actual: EntityKind,
    },
}

impl GatewayError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => f.write_str("not authorized"),
            Self::Status { status, reason } if reason.is_empty() => {
                write!(f, "request failed with status {status}")
            }
            Self::Status { status, reason } => {
                write!(f, "request failed with status {status}: {reason}")
            }
            Self::Transport { message } => write!(f, "request failed: {message}"),
            Self::Decode { kind, source } => write!(f, "cannot decode {kind} list: {source}"),
            Self::MissingParent { kind } => write!(f, "no parent id to list {kind}s"),
            Self::KindMismatch { expected, actual } => {
                write!(f, "expected a {expected} list, got {actual}")
            }
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteError {
    pub href: String,
    pub message: String,
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "navigation to {} failed: {}", self.href, self.message)
    }
}

impl std::error::Error for RouteError {}

/// Lists the children of one level for an authenticated user.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// `parent` carries the ids down to the level directly above `kind` (empty for projects).
    async fn fetch_entities(
        &self,
        kind: EntityKind,
        parent: &NavigationContext,
        identity: &Identity,
    ) -> Result<EntityList, GatewayError>;
}

/// Exchanges an expired identity for a fresh one.
#[async_trait]
pub trait CredentialRefresher: Send + Sync {
    async fn refresh(&self, identity: &Identity) -> Result<Identity, GatewayError>;
}

/// The host router. A successful push is followed by a route observation from the host.
#[async_trait]
pub trait RouteHost: Send + Sync {
    async fn push(&self, href: &str) -> Result<(), RouteError>;
}

/// Refresher for hosts without a refresh capability: every attempt fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRefresh;

#[async_trait]
impl CredentialRefresher for NoRefresh {
    async fn refresh(&self, _identity: &Identity) -> Result<Identity, GatewayError> {
        Err(GatewayError::Unauthorized)
    }
}

/// Route host that only records pushed hrefs, in order.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<String>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().map(|entries| entries.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.entries.lock().ok().and_then(|entries| entries.last().cloned())
    }
}

#[async_trait]
impl RouteHost for MemoryHistory {
    async fn push(&self, href: &str) -> Result<(), RouteError> {
        let mut entries = self.entries.lock().map_err(|_| RouteError {
            href: href.to_owned(),
            message: "history lock poisoned".to_owned(),
        })?;
        entries.push(href.to_owned());
        Ok(())
    }
}
