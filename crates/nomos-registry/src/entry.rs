//! Registry records for allocated namespaces and URNs.

use chrono::{DateTime, Utc};
use nomos_spec::WritePolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status shared by namespace and URN entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Active,
    Deprecated,
    /// System-owned; never allocatable and never transitioned.
    Reserved,
}

impl EntryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryStatus::Active => "active",
            EntryStatus::Deprecated => "deprecated",
            EntryStatus::Reserved => "reserved",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(EntryStatus::Active),
            "deprecated" => Ok(EntryStatus::Deprecated),
            "reserved" => Ok(EntryStatus::Reserved),
            other => Err(format!(
                "unknown status `{other}` (expected active, deprecated, reserved)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    #[default]
    Internal,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Internal => "internal",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "internal" => Ok(Visibility::Internal),
            "private" => Ok(Visibility::Private),
            other => Err(format!(
                "unknown visibility `{other}` (expected public, internal, private)"
            )),
        }
    }
}

fn default_write_policy() -> WritePolicy {
    WritePolicy::Writable
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceEntry {
    pub namespace: String,
    pub owner: String,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    pub status: EntryStatus,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default = "default_write_policy")]
    pub write_policy: WritePolicy,
    /// Repository-relative directory this namespace maps to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl NamespaceEntry {
    pub fn new(namespace: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            owner: owner.into(),
            created: Utc::now(),
            updated: None,
            status: EntryStatus::Active,
            visibility: Visibility::default(),
            write_policy: default_write_policy(),
            directory: None,
            description: String::new(),
        }
    }

    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = status;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrnEntry {
    pub urn: String,
    /// Storage location the URN resolves to.
    pub location: String,
    pub owner: String,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    pub status: EntryStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl UrnEntry {
    pub fn new(
        urn: impl Into<String>,
        location: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            urn: urn.into(),
            location: location.into(),
            owner: owner.into(),
            created: Utc::now(),
            updated: None,
            status: EntryStatus::Active,
            description: String::new(),
        }
    }

    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_entry_defaults_optional_fields() {
        let line = r#"{"namespace":"acme.core","owner":"platform","created":"2025-01-01T00:00:00Z","status":"active"}"#;
        let entry: NamespaceEntry = serde_json::from_str(line).expect("entry parses");
        assert_eq!(entry.visibility, Visibility::Internal);
        assert_eq!(entry.write_policy, WritePolicy::Writable);
        assert!(entry.directory.is_none());
        assert!(entry.updated.is_none());
    }

    #[test]
    fn urn_entry_omits_empty_optional_fields() {
        let entry = UrnEntry::new("urn:acme:module:core:v1.0.0", "workspace/core", "platform");
        let json = serde_json::to_string(&entry).expect("serialize");
        assert!(!json.contains("updated"));
        assert!(!json.contains("description"));
        assert!(json.contains("\"status\":\"active\""));
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Deprecated".parse::<EntryStatus>(), Ok(EntryStatus::Deprecated));
        assert!("retired".parse::<EntryStatus>().is_err());
    }
}
