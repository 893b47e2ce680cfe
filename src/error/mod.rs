use std::path::PathBuf;
use thiserror::Error;

pub mod codes;
pub mod validation;

pub use codes::{describe_error_code, ErrorCode};
pub use validation::{ValidationFailure, Violation, ViolationKind};

/// The document is not well-formed YAML.
///
/// Kept apart from [`ValidationFailure`] so a caller can always tell a
/// syntax problem from a schema problem.
#[derive(Error, Debug)]
#[error(
    "Unable to parse yaml file at path {}. Canceling deploy so that you can fix these errors.\n\nParser Error: {message}",
    path.display()
)]
pub struct ParseError {
    pub path: PathBuf,
    pub message: String,
    #[source]
    source: serde_yaml::Error,
}

impl ParseError {
    pub fn new(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self {
            path: path.into(),
            message: source.to_string(),
            source,
        }
    }
}

/// A validated config that still cannot be turned into a plan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error(
        "taskMemory of {task_memory} MiB is too small: {overhead} MiB is reserved for the watchdog and the server needs more than {headroom} MiB of what remains"
    )]
    InsufficientMemory {
        task_memory: u32,
        overhead: u32,
        headroom: u32,
    },
}

impl PlanError {
    pub fn code(&self) -> u16 {
        match self {
            Self::InsufficientMemory { .. } => ErrorCode::PLAN_INSUFFICIENT_MEMORY,
        }
    }
}

/// An out-of-band identifier lookup failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("parameter '{name}' is not available in {region}")]
    Unavailable { name: String, region: String },

    #[error("parameter '{name}' resolved to an empty value")]
    Empty { name: String },
}

/// The unified error type for loading a document and deriving a plan
#[derive(Error, Debug)]
pub enum OnDemandError {
    #[error("[E{code:04}] Unable to read configuration file at {}: {source}", .path.display(), code = ErrorCode::CONFIG_NOT_FOUND)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[E{code:04}] {0}", code = ErrorCode::CONFIG_PARSE_ERROR)]
    Parse(#[from] ParseError),

    #[error(
        "[E{code:04}] Invalid yaml file at path {}. Canceling deploy so that you can fix these errors.\n\nValidation Errors: {source}",
        .path.display(),
        code = ErrorCode::CONFIG_VALIDATION_FAILED
    )]
    Validation {
        path: PathBuf,
        #[source]
        source: ValidationFailure,
    },

    #[error("[E{code:04}] Cannot derive deployment plan: {0}", code = .0.code())]
    Plan(#[from] PlanError),

    #[error("[E{code:04}] Cannot resolve external identifier: {0}", code = ErrorCode::CONFIG_RESOLVE_FAILED)]
    Resolve(#[from] ResolveError),
}

impl OnDemandError {
    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Io { .. } => ErrorCode::CONFIG_NOT_FOUND,
            Self::Parse(_) => ErrorCode::CONFIG_PARSE_ERROR,
            Self::Validation { .. } => ErrorCode::CONFIG_VALIDATION_FAILED,
            Self::Plan(err) => err.code(),
            Self::Resolve(_) => ErrorCode::CONFIG_RESOLVE_FAILED,
        }
    }

    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { .. } | Self::Parse(_) => 2,
            Self::Validation { .. } => 3,
            Self::Plan(_) => 4,
            Self::Resolve(_) => 5,
        }
    }

    /// The schema violations, when this is a validation failure.
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            Self::Validation { source, .. } => Some(source.violations()),
            _ => None,
        }
    }
}

/// Result type alias using OnDemandError
pub type Result<T> = std::result::Result<T, OnDemandError>;
