//! Closed vocabularies shared by specification documents, registries, and
//! validators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rule category of one specification document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Naming,
    Namespace,
    Urn,
    Paths,
}

impl RuleCategory {
    pub const ALL: [RuleCategory; 4] = [
        RuleCategory::Naming,
        RuleCategory::Namespace,
        RuleCategory::Urn,
        RuleCategory::Paths,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleCategory::Naming => "naming",
            RuleCategory::Namespace => "namespace",
            RuleCategory::Urn => "urn",
            RuleCategory::Paths => "paths",
        }
    }

    /// Conventional file name of the document inside a specifications directory.
    pub fn document_file_name(self) -> &'static str {
        match self {
            RuleCategory::Naming => "naming.toml",
            RuleCategory::Namespace => "namespace.toml",
            RuleCategory::Urn => "urn.toml",
            RuleCategory::Paths => "paths.toml",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of string the naming validator is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    File,
    Directory,
    Identifier,
    Version,
    UrnFragment,
}

impl TargetType {
    pub const ALL: [TargetType; 5] = [
        TargetType::File,
        TargetType::Directory,
        TargetType::Identifier,
        TargetType::Version,
        TargetType::UrnFragment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TargetType::File => "file",
            TargetType::Directory => "directory",
            TargetType::Identifier => "identifier",
            TargetType::Version => "version",
            TargetType::UrnFragment => "urn_fragment",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "file" => Ok(TargetType::File),
            "directory" | "dir" => Ok(TargetType::Directory),
            "identifier" | "id" => Ok(TargetType::Identifier),
            "version" => Ok(TargetType::Version),
            "urn_fragment" => Ok(TargetType::UrnFragment),
            other => Err(format!(
                "unknown target type `{other}` (expected file, directory, identifier, version, urn_fragment)"
            )),
        }
    }
}

/// Mutability classification of a path region.
///
/// Variants are declared from least to most strict so `Ord` compares
/// strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    Writable,
    Restricted,
    Immutable,
}

impl WritePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            WritePolicy::Writable => "writable",
            WritePolicy::Restricted => "restricted",
            WritePolicy::Immutable => "immutable",
        }
    }
}

impl fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WritePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "writable" => Ok(WritePolicy::Writable),
            "restricted" => Ok(WritePolicy::Restricted),
            "immutable" => Ok(WritePolicy::Immutable),
            other => Err(format!(
                "unknown write policy `{other}` (expected immutable, restricted, writable)"
            )),
        }
    }
}

/// Operation a caller intends to perform on a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathOperation {
    Read,
    Create,
    #[default]
    Modify,
    Delete,
}

impl PathOperation {
    pub fn is_write(self) -> bool {
        !matches!(self, PathOperation::Read)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PathOperation::Read => "read",
            PathOperation::Create => "create",
            PathOperation::Modify => "modify",
            PathOperation::Delete => "delete",
        }
    }
}

impl fmt::Display for PathOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read" => Ok(PathOperation::Read),
            "create" => Ok(PathOperation::Create),
            "modify" => Ok(PathOperation::Modify),
            "delete" => Ok(PathOperation::Delete),
            other => Err(format!(
                "unknown path operation `{other}` (expected read, create, modify, delete)"
            )),
        }
    }
}

/// The closed set of resource types a URN may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Module,
    Agent,
    Service,
    Config,
    Workflow,
    Command,
    Policy,
    Schema,
    Template,
    Validator,
}

impl ResourceType {
    pub const ALL: [ResourceType; 10] = [
        ResourceType::Module,
        ResourceType::Agent,
        ResourceType::Service,
        ResourceType::Config,
        ResourceType::Workflow,
        ResourceType::Command,
        ResourceType::Policy,
        ResourceType::Schema,
        ResourceType::Template,
        ResourceType::Validator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Module => "module",
            ResourceType::Agent => "agent",
            ResourceType::Service => "service",
            ResourceType::Config => "config",
            ResourceType::Workflow => "workflow",
            ResourceType::Command => "command",
            ResourceType::Policy => "policy",
            ResourceType::Schema => "schema",
            ResourceType::Template => "template",
            ResourceType::Validator => "validator",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| format!("unknown resource type `{s}`"))
    }
}
