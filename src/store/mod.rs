// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Key/value persistence for navigation preferences.
//!
//! The navigator only needs string get/set/remove (the shape of browser local/session
//! storage). [`MemoryStorage`] backs tests and session-scoped mirrors; [`FileStorage`] keeps a
//! single JSON document on disk and replaces it atomically on every write.

mod file;
mod memory;
mod snapshot;

use std::fmt;
use std::io;
use std::path::PathBuf;

pub use file::{FileStorage, WriteDurability};
pub use memory::MemoryStorage;
pub use snapshot::PersistedNavigation;

/// String key/value storage.
///
/// Implementations must be cheap to call from inside the navigator's critical sections: they
/// are synchronous and never awaited.
pub trait PersistenceAdapter: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        key: String,
        source: serde_json::Error,
    },
    Poisoned,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { key, source } => write!(f, "json error in {key:?}: {source}"),
            Self::Poisoned => f.write_str("storage lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Poisoned => None,
        }
    }
}
