// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Separator used to build composite node ids (`p1-c1-u1`).
pub const COMPOSITE_SEPARATOR: char = '-';

/// A stable identifier used across routes, tree nodes and persisted state.
///
/// Ids are opaque strings handed out by the analytics backend. The only rule enforced here is
/// that an id is a non-empty *path segment* (no `/`), because every id ends up inside a route
/// like `/app/projects/<project_id>/...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id_segment(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
    ContainsSlash,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("id must not be empty"),
            Self::ContainsSlash => f.write_str("id must not contain '/'"),
        }
    }
}

impl std::error::Error for IdError {}

fn validate_id_segment(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.contains('/') {
        return Err(IdError::ContainsSlash);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProjectIdTag {}
pub type ProjectId = Id<ProjectIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CohortIdTag {}
pub type CohortId = Id<CohortIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserIdTag {}
pub type UserId = Id<UserIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionIdTag {}
pub type SessionId = Id<SessionIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeIdTag {}

/// Composite id of a tree node: the node's own id joined with all of its ancestors' ids.
///
/// The company root is the only node whose id is not composed (`company`).
pub type NodeId = Id<NodeIdTag>;

pub const COMPANY_NODE_ID: &str = "company";

impl NodeId {
    pub fn company() -> Self {
        Self {
            value: COMPANY_NODE_ID.to_owned(),
            _marker: PhantomData,
        }
    }

    pub fn is_company(&self) -> bool {
        self.value == COMPANY_NODE_ID
    }

    /// Joins `segments` with [`COMPOSITE_SEPARATOR`]. Every segment must itself be a valid id.
    pub fn compose<'a>(segments: impl IntoIterator<Item = &'a str>) -> Result<Self, IdError> {
        let mut value = String::new();
        for segment in segments {
            validate_id_segment(segment)?;
            if !value.is_empty() {
                value.push(COMPOSITE_SEPARATOR);
            }
            value.push_str(segment);
        }
        Self::new(value)
    }

    /// Id of a child node whose own id is `segment`. Children of the company root are not
    /// prefixed with `company`.
    pub fn child(&self, segment: &str) -> Result<Self, IdError> {
        if self.is_company() {
            return Self::new(segment);
        }
        Self::compose([self.as_str(), segment])
    }
}
