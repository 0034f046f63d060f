// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runtime configuration, read from `DASHNAV_*` environment variables.

use std::env;
use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::loading::SkeletonTimings;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_API_VERSION: &str = "1.0.0";
pub const DEFAULT_STORAGE_KEY: &str = "navigation-store";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const ENV_API_BASE_URL: &str = "DASHNAV_API_BASE_URL";
const ENV_API_VERSION: &str = "DASHNAV_API_VERSION";
const ENV_STORAGE_KEY: &str = "DASHNAV_STORAGE_KEY";
const ENV_REQUEST_TIMEOUT_MS: &str = "DASHNAV_REQUEST_TIMEOUT_MS";
const ENV_SKELETON_DELAY_MS: &str = "DASHNAV_SKELETON_DELAY_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorConfig {
    /// Analytics REST API root, without a trailing slash.
    pub api_base_url: String,
    /// Sent as the `hippo-api-version` header.
    pub api_version: String,
    /// Storage key of the persisted navigation snapshot.
    pub storage_key: String,
    /// Where the host is sent when credentials cannot be refreshed.
    pub login_path: String,
    pub request_timeout: Duration,
    pub skeleton: SkeletonTimings,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            skeleton: SkeletonTimings::default(),
        }
    }
}

impl NavigatorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name))
    }

    /// Like [`NavigatorConfig::from_env`], reading variables through `lookup`. Unset or blank
    /// variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let mut config = Self::default();

        if let Some(url) = read(&lookup, ENV_API_BASE_URL)? {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidEnv {
                    name: ENV_API_BASE_URL.to_owned(),
                    value: url,
                });
            }
            config.api_base_url = url.trim_end_matches('/').to_owned();
        }
        if let Some(version) = read(&lookup, ENV_API_VERSION)? {
            config.api_version = version;
        }
        if let Some(key) = read(&lookup, ENV_STORAGE_KEY)? {
            config.storage_key = key;
        }
        if let Some(timeout) = read_millis(&lookup, ENV_REQUEST_TIMEOUT_MS)? {
            config.request_timeout = timeout;
        }
        if let Some(delay) = read_millis(&lookup, ENV_SKELETON_DELAY_MS)? {
            config.skeleton.fast_delay = delay;
        }

        Ok(config)
    }
}

fn read<F>(lookup: &F, name: &str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Result<String, env::VarError>,
{
    match lookup(name) {
        Ok(value) => {
            let trimmed = value.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_owned()))
        }
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidEnv {
            name: name.to_owned(),
            value: "<non-unicode>".to_owned(),
        }),
    }
}

fn read_millis<F>(lookup: &F, name: &str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Result<String, env::VarError>,
{
    let Some(value) = read(lookup, name)? else {
        return Ok(None);
    };
    let millis = value.parse::<u64>().map_err(|error| ConfigError::InvalidEnv {
        name: name.to_owned(),
        value: format!("{value} ({error})"),
    })?;
    Ok(Some(Duration::from_millis(millis)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ConfigError {}
