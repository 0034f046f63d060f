// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Entity summaries returned by the analytics API.
//!
//! Only the fields the navigation tree needs are decoded; everything else in the payload is
//! ignored. The backend is inconsistent about id types (projects use strings, cohorts/users/
//! sessions use integers) so ids accept both.

use std::fmt;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use super::context::Level;
use super::ids::{CohortId, Id, ProjectId, SessionId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Project,
    Cohort,
    User,
    Session,
}

impl EntityKind {
    /// Tree level that entities of this kind populate.
    pub fn level(self) -> Level {
        match self {
            Self::Project => Level::Project,
            Self::Cohort => Level::Cohort,
            Self::User => Level::User,
            Self::Session => Level::Session,
        }
    }

    /// Kind of the children of a node at `level`, if that level has children.
    pub fn children_of(level: Level) -> Option<Self> {
        match level {
            Level::Company => Some(Self::Project),
            Level::Project => Some(Self::Cohort),
            Level::Cohort => Some(Self::User),
            Level::User => Some(Self::Session),
            Level::Session => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Cohort => "cohort",
            Self::User => "user",
            Self::Session => "session",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub project_id: ProjectId,
    pub project_name: String,
    #[serde(default)]
    pub project_website: Option<String>,
    #[serde(default)]
    pub overall_status: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub cohort_count: Option<u32>,
    #[serde(default)]
    pub user_count: Option<u32>,
    #[serde(default)]
    pub session_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortSummary {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: CohortId,
    pub cohort_name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default, alias = "users", deserialize_with = "count_or_list")]
    pub user_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: UserId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "sessions", deserialize_with = "count_or_list")]
    pub session_count: Option<u32>,
}

impl UserSummary {
    /// Best available label: display name, full name, email, then the raw id.
    pub fn label(&self) -> &str {
        [&self.display_name, &self.full_name, &self.email]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    #[serde(alias = "id", deserialize_with = "id_from_string_or_number")]
    pub session_id: SessionId,
    #[serde(default)]
    pub session_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
}

impl SessionSummary {
    pub fn label(&self) -> &str {
        self.session_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.session_id.as_str())
    }
}

/// A fetched, ordered list of children for one parent node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum EntityList {
    Projects(Vec<ProjectSummary>),
    Cohorts(Vec<CohortSummary>),
    Users(Vec<UserSummary>),
    Sessions(Vec<SessionSummary>),
}

impl EntityList {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Projects(_) => EntityKind::Project,
            Self::Cohorts(_) => EntityKind::Cohort,
            Self::Users(_) => EntityKind::User,
            Self::Sessions(_) => EntityKind::Session,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Projects(items) => items.len(),
            Self::Cohorts(items) => items.len(),
            Self::Users(items) => items.len(),
            Self::Sessions(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decodes a raw API payload (a JSON array) as a list of `kind`.
    pub fn from_json(kind: EntityKind, payload: &[u8]) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            EntityKind::Project => Self::Projects(serde_json::from_slice(payload)?),
            EntityKind::Cohort => Self::Cohorts(serde_json::from_slice(payload)?),
            EntityKind::User => Self::Users(serde_json::from_slice(payload)?),
            EntityKind::Session => Self::Sessions(serde_json::from_slice(payload)?),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

fn id_from_string_or_number<'de, D, T>(deserializer: D) -> Result<Id<T>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match RawId::deserialize(deserializer)? {
        RawId::Text(value) => value,
        RawId::Unsigned(value) => value.to_string(),
        RawId::Signed(value) => value.to_string(),
    };
    Id::new(raw).map_err(serde::de::Error::custom)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountOrList {
    Count(u32),
    List(Vec<IgnoredAny>),
}

fn count_or_list<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<CountOrList>::deserialize(deserializer)? {
        Some(CountOrList::Count(count)) => Some(count),
        Some(CountOrList::List(items)) => Some(u32::try_from(items.len()).unwrap_or(u32::MAX)),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::{EntityKind, EntityList};

    #[test]
    fn projects_decode_string_ids_and_counts() {
        let payload = br#"[{
            "projectId": "42",
            "projectName": "Onboarding",
            "projectWebsite": "https://example.test",
            "overallStatus": "active",
            "companyName": "Acme",
            "cohortCount": 3,
            "userCount": 12,
            "sessionCount": 40,
            "hasGraphs": false
        }]"#;
        let EntityList::Projects(projects) =
            EntityList::from_json(EntityKind::Project, payload).expect("decode")
        else {
            panic!("expected projects");
        };
        assert_eq!(projects[0].project_id.as_str(), "42");
        assert_eq!(projects[0].cohort_count, Some(3));
        assert_eq!(projects[0].company_name.as_deref(), Some("Acme"));
    }

    #[test]
    fn cohorts_accept_numeric_ids_and_count_embedded_users() {
        let payload = br#"[{"id": 7, "cohortName": "Spring", "version": "v2",
            "users": [{"id": 1}, {"id": 2}], "stages": []}]"#;
        let EntityList::Cohorts(cohorts) =
            EntityList::from_json(EntityKind::Cohort, payload).expect("decode")
        else {
            panic!("expected cohorts");
        };
        assert_eq!(cohorts[0].id.as_str(), "7");
        assert_eq!(cohorts[0].user_count, Some(2));
    }

    #[test]
    fn users_fall_back_through_label_candidates() {
        let payload = br#"[{"id": 5, "displayName": " ", "fullName": "Ada Lovelace"},
            {"id": 6}]"#;
        let EntityList::Users(users) =
            EntityList::from_json(EntityKind::User, payload).expect("decode")
        else {
            panic!("expected users");
        };
        assert_eq!(users[0].label(), "Ada Lovelace");
        assert_eq!(users[1].label(), "6");
        assert_eq!(users[1].session_count, None);
    }

    #[test]
    fn sessions_accept_plain_id_alias() {
        let payload = br#"[{"id": 9, "sessionName": "Kickoff", "status": "done"}]"#;
        let list = EntityList::from_json(EntityKind::Session, payload).expect("decode");
        let EntityList::Sessions(sessions) = &list else {
            panic!("expected sessions");
        };
        assert_eq!(sessions[0].session_id.as_str(), "9");
        assert_eq!(sessions[0].label(), "Kickoff");
        assert_eq!(list.kind(), EntityKind::Session);
    }

    #[test]
    fn empty_id_is_rejected() {
        assert!(EntityList::from_json(EntityKind::Cohort, br#"[{"id": "", "cohortName": "x"}]"#)
            .is_err());
    }

    #[test]
    fn cached_list_round_trips_through_json() {
        let payload = br#"[{"id": 7, "cohortName": "Spring", "users": [{}, {}, {}]}]"#;
        let list = EntityList::from_json(EntityKind::Cohort, payload).expect("decode");
        let mirrored = serde_json::to_string(&list).expect("encode");
        let back: EntityList = serde_json::from_str(&mirrored).expect("decode mirror");
        assert_eq!(back, list);
    }
}
