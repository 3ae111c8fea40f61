use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::Role;
use super::responses::ResponseSet;

/// Typed key into the result store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    Result { role: Role, user_id: String },
    Combined { user_id: String },
    Progress { role: Role, user_id: String },
    Report { report_id: String },
    /// Every report id ever issued, in issue order.
    ReportIndex,
}

impl StoreKey {
    pub fn result(role: Role, user_id: &str) -> Self {
        Self::Result {
            role,
            user_id: user_id.to_string(),
        }
    }

    pub fn combined(user_id: &str) -> Self {
        Self::Combined {
            user_id: user_id.to_string(),
        }
    }

    pub fn progress(role: Role, user_id: &str) -> Self {
        Self::Progress {
            role,
            user_id: user_id.to_string(),
        }
    }

    pub fn report(report_id: &str) -> Self {
        Self::Report {
            report_id: report_id.to_string(),
        }
    }

    pub fn report_index() -> Self {
        Self::ReportIndex
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKey::Result { role, user_id } => write!(f, "result:{role}:{user_id}"),
            StoreKey::Combined { user_id } => write!(f, "combined:{user_id}"),
            StoreKey::Progress { role, user_id } => write!(f, "progress:{role}:{user_id}"),
            StoreKey::Report { report_id } => write!(f, "report:{report_id}"),
            StoreKey::ReportIndex => f.write_str("reports"),
        }
    }
}

/// Key-value persistence collaborator holding JSON blobs.
pub trait ResultStore: Send + Sync {
    fn put(&self, key: &StoreKey, value: Value) -> Result<(), StoreError>;
    fn get(&self, key: &StoreKey) -> Result<Option<Value>, StoreError>;
    /// Returns whether a value was removed.
    fn delete(&self, key: &StoreKey) -> Result<bool, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("result store unavailable: {0}")]
    Unavailable(String),
    #[error("stored value under '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Saved in-progress answers for one respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireProgress {
    pub user_id: String,
    pub role: Role,
    pub current_question: usize,
    pub responses: ResponseSet,
    pub updated_at: DateTime<Utc>,
}

/// Where a report id points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportIndexEntry {
    pub report_id: String,
    pub user_id: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

pub(crate) fn write<S: ResultStore + ?Sized, T: Serialize>(
    store: &S,
    key: &StoreKey,
    value: &T,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(value).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    store.put(key, value)
}

pub(crate) fn read<S: ResultStore + ?Sized, T: for<'de> Deserialize<'de>>(
    store: &S,
    key: &StoreKey,
) -> Result<Option<T>, StoreError> {
    store
        .get(key)?
        .map(|value| {
            serde_json::from_value(value).map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_render_namespaced_strings() {
        assert_eq!(
            StoreKey::result(Role::Parent, "u1").to_string(),
            "result:parent:u1"
        );
        assert_eq!(StoreKey::combined("u1").to_string(), "combined:u1");
        assert_eq!(
            StoreKey::progress(Role::Student, "u1").to_string(),
            "progress:student:u1"
        );
        assert_eq!(
            StoreKey::report("RPT-A-B").to_string(),
            "report:RPT-A-B"
        );
        assert_eq!(StoreKey::report_index().to_string(), "reports");
    }
}
