// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! [`DataGateway`] over the analytics REST API.
//!
//! | kind    | request                                        |
//! |---------|------------------------------------------------|
//! | project | `GET /project`                                 |
//! | cohort  | `GET /cohort/searchByProject?projectId=<id>`   |
//! | user    | `GET /users/cohort/<cohortId>`                 |
//! | session | `GET /session/user/<userId>`                   |
//!
//! Every request carries `Authorization: Bearer <token>` and the `hippo-api-version` header.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use tracing::debug;

use super::{DataGateway, GatewayError, Identity};
use crate::config::NavigatorConfig;
use crate::model::{EntityKind, EntityList, NavigationContext};

const API_VERSION_HEADER: HeaderName = HeaderName::from_static("hippo-api-version");

#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: Url,
    api_version: HeaderValue,
}

impl HttpGateway {
    pub fn new(config: &NavigatorConfig) -> Result<Self, GatewayError> {
        let base_url = Url::parse(&config.api_base_url).map_err(|err| GatewayError::Transport {
            message: format!("invalid base url {:?}: {err}", config.api_base_url),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Transport {
                message: format!("invalid base url {:?}", config.api_base_url),
            });
        }
        let api_version =
            HeaderValue::from_str(&config.api_version).map_err(|err| GatewayError::Transport {
                message: format!("invalid api version {:?}: {err}", config.api_version),
            })?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(transport)?;
        Ok(Self {
            http,
            base_url,
            api_version,
        })
    }

    /// Request URL listing `kind` under `parent`.
    pub fn endpoint(&self, kind: EntityKind, parent: &NavigationContext) -> Result<Url, GatewayError> {
        let parent = parent.resolved();
        let missing = || GatewayError::MissingParent { kind };

        let mut url = self.base_url.clone();
        let (segments, query): (Vec<&str>, Option<(&str, &str)>) = match kind {
            EntityKind::Project => (vec!["project"], None),
            EntityKind::Cohort => {
                let project = parent.project_id.as_ref().ok_or_else(missing)?;
                (vec!["cohort", "searchByProject"], Some(("projectId", project.as_str())))
            }
            EntityKind::User => {
                let cohort = parent.cohort_id.as_ref().ok_or_else(missing)?;
                (vec!["users", "cohort", cohort.as_str()], None)
            }
            EntityKind::Session => {
                let user = parent.user_id.as_ref().ok_or_else(missing)?;
                (vec!["session", "user", user.as_str()], None)
            }
        };

        url.path_segments_mut()
            .map_err(|()| GatewayError::Transport {
                message: format!("invalid base url {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        if let Some((name, value)) = query {
            url.query_pairs_mut().append_pair(name, value);
        }
        Ok(url)
    }

    fn headers(&self, identity: &Identity) -> Result<HeaderMap, GatewayError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", identity.token))
            .map_err(|_| GatewayError::Unauthorized)?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(API_VERSION_HEADER, self.api_version.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl DataGateway for HttpGateway {
    async fn fetch_entities(
        &self,
        kind: EntityKind,
        parent: &NavigationContext,
        identity: &Identity,
    ) -> Result<EntityList, GatewayError> {
        let url = self.endpoint(kind, parent)?;
        debug!(%url, %kind, "fetching entities");

        let resp = self
            .http
            .get(url)
            .headers(self.headers(identity)?)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(GatewayError::Unauthorized);
        }
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_owned(),
            });
        }

        let body = resp.bytes().await.map_err(transport)?;
        EntityList::from_json(kind, &body).map_err(|source| GatewayError::Decode { kind, source })
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport {
        message: err.to_string(),
    }
}
