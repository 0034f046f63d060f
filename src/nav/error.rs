// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use crate::gateway::{GatewayError, RouteError};
use crate::model::NodeId;
use crate::tree::TreeError;

#[derive(Debug)]
pub enum NavigationError {
    /// Loading the children of `node_id` failed.
    Gateway {
        node_id: NodeId,
        source: GatewayError,
    },
    /// A fetched list could not be turned into child nodes of `node_id`.
    Tree {
        node_id: NodeId,
        source: TreeError,
    },
    /// The host router refused a transition.
    Route(RouteError),
    /// The token was rejected and could not be refreshed; the host was sent to the login page.
    SessionExpired,
    /// A fetch was needed but nobody is signed in.
    NotSignedIn,
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gateway { node_id, source } => write!(f, "failed to load {node_id}: {source}"),
            Self::Tree { node_id, source } => write!(f, "bad data for {node_id}: {source}"),
            Self::Route(err) => err.fmt(f),
            Self::SessionExpired => f.write_str("session expired, please sign in again"),
            Self::NotSignedIn => f.write_str("not signed in"),
        }
    }
}

impl std::error::Error for NavigationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gateway { source, .. } => Some(source),
            Self::Tree { source, .. } => Some(source),
            Self::Route(err) => Some(err),
            Self::SessionExpired | Self::NotSignedIn => None,
        }
    }
}

impl From<RouteError> for NavigationError {
    fn from(err: RouteError) -> Self {
        Self::Route(err)
    }
}
