use super::ErrorCode;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Category of a single schema violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required field is absent
    Missing,
    /// A field holds a value of the wrong type
    InvalidType,
    /// A value has the right type but falls outside its allowed range
    OutOfRange,
    /// An optional group is present but missing one of its sub-fields
    IncompleteGroup,
    /// The same field was supplied under its name and its alias
    Duplicate,
}

impl ViolationKind {
    pub fn code(self) -> u16 {
        match self {
            Self::Missing => ErrorCode::VALIDATION_REQUIRED_FIELD,
            Self::InvalidType => ErrorCode::VALIDATION_INVALID_TYPE,
            Self::OutOfRange => ErrorCode::VALIDATION_OUT_OF_RANGE,
            Self::IncompleteGroup => ErrorCode::VALIDATION_INCOMPLETE_GROUP,
            Self::Duplicate => ErrorCode::VALIDATION_DUPLICATE_VALUE,
        }
    }
}

/// One schema violation, qualified by the path of the offending field
/// (`domainName`, `twilio.phoneTo`, `extraTcpPorts[2]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn missing(path: impl Into<String>) -> Self {
        Self::new(path, ViolationKind::Missing, "required field is missing")
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "<root>"
        } else {
            self.path.as_str()
        };
        write!(f, "[E{:04}] {}: {}", self.kind.code(), path, self.message)
    }
}

/// Every violation found in a document, in document order.
///
/// Normalization never stops at the first problem, so an operator can fix
/// the whole document in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} validation error(s):\n{}", .violations.len(), render_violations(.violations))]
pub struct ValidationFailure {
    violations: Vec<Violation>,
}

impl ValidationFailure {
    /// Returns `None` when there is nothing to report.
    pub fn from_violations(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    pub fn single(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Paths of all violations, in the order they were found.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.path.as_str())
    }

    pub fn has_violation_at(&self, path: &str) -> bool {
        self.paths().any(|p| p == path)
    }
}

fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_violation_list_is_not_a_failure() {
        assert!(ValidationFailure::from_violations(Vec::new()).is_none());
    }

    #[test]
    fn test_failure_lists_every_violation() {
        let failure = ValidationFailure::from_violations(vec![
            Violation::missing("domainName"),
            Violation::new(
                "taskCpu",
                ViolationKind::InvalidType,
                "expected a positive integer, found string",
            ),
        ])
        .unwrap();

        let rendered = failure.to_string();
        assert!(rendered.starts_with("2 validation error(s):"));
        assert!(rendered.contains("[E7001] domainName: required field is missing"));
        assert!(rendered.contains("[E7002] taskCpu: expected a positive integer"));
        assert!(failure.has_violation_at("taskCpu"));
        assert!(!failure.has_violation_at("taskMemory"));
    }

    #[test]
    fn test_root_violation_renders_placeholder_path() {
        let violation = Violation::new("", ViolationKind::InvalidType, "expected a mapping");
        assert_eq!(violation.to_string(), "[E7002] <root>: expected a mapping");
    }
}
