//! App records, app summaries and users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Audit, Id, Record, Version, EDIT_VERSION};

/// An app and its version counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub id: Id,
    pub name: String,

    /// Version most recently released. Mirrors `mainline_version`.
    pub release_version: Version,

    /// Highest published snapshot number.
    pub mainline_version: Version,

    #[serde(flatten)]
    pub audit: Audit,
}

impl App {
    /// A not-yet-inserted app with draft counters.
    pub fn new(name: impl Into<String>, audit: Audit) -> Self {
        Self {
            id: 0,
            name: name.into(),
            release_version: EDIT_VERSION,
            mainline_version: EDIT_VERSION,
            audit,
        }
    }

    /// The mutable draft version. Always zero.
    pub fn edit_version(&self) -> Version {
        EDIT_VERSION
    }

    /// Whether `version` exists for this app.
    pub fn has_version(&self, version: Version) -> bool {
        version <= self.mainline_version
    }

    /// Summary with the given modifier nickname.
    pub fn summary(&self, modifier: impl Into<String>) -> AppSummary {
        AppSummary {
            id: self.id,
            name: self.name.clone(),
            release_version: self.release_version,
            mainline_version: self.mainline_version,
            updated_by: self.audit.updated_by,
            updated_at: self.audit.updated_at,
            activity: AppActivity {
                modifier: modifier.into(),
                modified_at: self.audit.updated_at,
            },
        }
    }
}

impl Record for App {
    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// Last modification info shown next to an app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppActivity {
    pub modifier: String,
    pub modified_at: DateTime<Utc>,
}

/// The client-facing view of an app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSummary {
    #[serde(rename = "appId")]
    pub id: Id,
    #[serde(rename = "appName")]
    pub name: String,
    pub release_version: Version,
    pub mainline_version: Version,
    #[serde(rename = "updatedBy")]
    pub updated_by: Id,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "appActivity")]
    pub activity: AppActivity,
}

/// A user, referenced by audit fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(nickname: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            nickname: nickname.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for User {
    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_app_starts_at_draft() {
        let app = App::new("demo", Audit::now(1));
        assert_eq!(app.mainline_version, 0);
        assert_eq!(app.release_version, 0);
        assert_eq!(app.edit_version(), 0);
        assert!(app.has_version(0));
        assert!(!app.has_version(1));
    }

    #[test]
    fn summary_serializes_client_field_names() {
        let mut app = App::new("demo", Audit::now(4));
        app.id = 12;
        app.mainline_version = 2;
        app.release_version = 2;
        let value = serde_json::to_value(app.summary("alice")).unwrap();

        assert_eq!(value["appId"], 12);
        assert_eq!(value["appName"], "demo");
        assert_eq!(value["mainline_version"], 2);
        assert_eq!(value["release_version"], 2);
        assert_eq!(value["updatedBy"], 4);
        assert_eq!(value["appActivity"]["modifier"], "alice");
        assert!(value["appActivity"]["modifiedAt"].is_string());
    }
}
