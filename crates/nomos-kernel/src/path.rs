//! Path validator: normalization, first-match policy resolution, root-area
//! crossing, and write-policy conflicts.

use crate::context::ValidationContext;
use crate::outcome::{CheckOutcome, IssueClass, rule_id};
use nomos_spec::{PathOperation, WritePolicy};
use serde::{Deserialize, Serialize};

/// Normalize a repository-relative path.
///
/// `\` becomes `/`, `.` components and duplicate or trailing slashes are
/// dropped. Absolute paths, `..` components, and empty paths are rejected.
pub fn normalize_path(raw: &str) -> Result<String, String> {
    let unified = raw.trim().replace('\\', "/");
    if unified.is_empty() {
        return Err("path is empty".to_string());
    }
    let is_drive = unified.len() >= 2
        && unified.as_bytes()[1] == b':'
        && unified.as_bytes()[0].is_ascii_alphabetic();
    if unified.starts_with('/') || is_drive {
        return Err(format!("`{raw}` is absolute; paths are repository-relative"));
    }
    let mut parts = Vec::new();
    for component in unified.split('/') {
        match component {
            "" | "." => continue,
            ".." => return Err(format!("`{raw}` escapes the repository with `..`")),
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return Err(format!("`{raw}` names the repository root, not a path"));
    }
    Ok(parts.join("/"))
}

/// Whether normalized `child` lies strictly below normalized `parent`.
pub fn is_strictly_within(child: &str, parent: &str) -> bool {
    let child: Vec<&str> = child.split('/').collect();
    let parent: Vec<&str> = parent.split('/').collect();
    child.len() > parent.len() && child[..parent.len()] == parent[..]
}

/// How a path resolved against the path rule-set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResolution {
    pub path: String,
    /// `None` when the default policy applied.
    pub rule: Option<String>,
    pub order: Option<u32>,
    pub policy: WritePolicy,
    pub area: Option<String>,
}

/// Everything a path check can be asked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathCheck {
    pub value: String,
    #[serde(default)]
    pub operation: PathOperation,
    #[serde(default)]
    pub check_write_policy: bool,
    /// A restricted-path write with approval passes with a warning.
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub declared_policy: Option<WritePolicy>,
}

impl PathCheck {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn writing(mut self, operation: PathOperation) -> Self {
        self.operation = operation;
        self.check_write_policy = true;
        self
    }
}

/// `validate_path(path, check_write_policy)` with the default `modify`
/// operation.
pub fn validate_path(
    ctx: &ValidationContext<'_>,
    path: &str,
    check_write_policy: bool,
) -> CheckOutcome {
    let check = PathCheck {
        check_write_policy,
        ..PathCheck::new(path)
    };
    check_path(ctx, &check).0
}

/// Resolve a path to its rule and policy without judging any operation.
pub fn resolve_path(
    ctx: &ValidationContext<'_>,
    raw: &str,
    out: &mut CheckOutcome,
) -> Option<PathResolution> {
    let spec = &ctx.spec.paths;
    let path = match normalize_path(raw) {
        Ok(path) => path,
        Err(message) => {
            out.error(rule_id::PATH_PARSE, IssueClass::Parse, message);
            return None;
        }
    };
    let area = spec.area_for(&path).map(|area| area.name.clone());
    if let Some(hit) = spec.first_match(&path) {
        return Some(PathResolution {
            path,
            rule: Some(hit.rule.name.clone()),
            order: Some(hit.order),
            policy: hit.policy,
            area,
        });
    }
    match spec.default_policy {
        Some(policy) => {
            out.warn(
                rule_id::PATH_DEFAULT_POLICY,
                IssueClass::RuleViolation,
                format!("no path rule matches `{path}`; default policy `{policy}` applies"),
            );
            Some(PathResolution {
                path,
                rule: None,
                order: None,
                policy,
                area,
            })
        }
        None => {
            out.error(
                rule_id::PATH_ROOT_STRUCTURE,
                IssueClass::RuleViolation,
                format!("`{path}` is outside every declared path rule"),
            );
            None
        }
    }
}

pub fn check_path(
    ctx: &ValidationContext<'_>,
    check: &PathCheck,
) -> (CheckOutcome, Option<PathResolution>) {
    let mut out = CheckOutcome::new();
    let Some(resolution) = resolve_path(ctx, &check.value, &mut out) else {
        return (out, None);
    };
    let path = &resolution.path;
    let rule_name = resolution.rule.as_deref().unwrap_or("default");

    if let Some(area) = ctx.spec.paths.area_for(path) {
        if resolution.policy < area.policy {
            out.error(
                rule_id::PATH_ROOT_STRUCTURE,
                IssueClass::PolicyViolation,
                format!(
                    "rule `{rule_name}` makes `{path}` {} inside area `{}` declared {}",
                    resolution.policy, area.name, area.policy
                ),
            );
        }
    }

    if let Some(declared) = check.declared_policy {
        if declared != resolution.policy {
            out.error(
                rule_id::PATH_DECLARED_POLICY,
                IssueClass::PolicyViolation,
                format!(
                    "`{path}` is tagged {declared} but resolves to {} (rule `{rule_name}`)",
                    resolution.policy
                ),
            );
        }
    }

    if check.check_write_policy && check.operation.is_write() {
        let operation = check.operation;
        match resolution.policy {
            WritePolicy::Writable => {}
            WritePolicy::Immutable => out.error(
                rule_id::PATH_WRITE_POLICY,
                IssueClass::PolicyViolation,
                format!("{operation} of `{path}` conflicts with immutable rule `{rule_name}`"),
            ),
            WritePolicy::Restricted if check.approved => out.warn(
                rule_id::PATH_WRITE_POLICY,
                IssueClass::PolicyViolation,
                format!("approved {operation} of restricted `{path}` (rule `{rule_name}`)"),
            ),
            WritePolicy::Restricted => out.error(
                rule_id::PATH_WRITE_POLICY,
                IssueClass::PolicyViolation,
                format!(
                    "{operation} of `{path}` needs approval under restricted rule `{rule_name}`"
                ),
            ),
        }
    }

    (out, Some(resolution))
}
