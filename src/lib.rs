//! # mc-ondemand
//!
//! Turns a single `config.yml` into a deterministic deployment plan for an
//! on-demand, auto-stopping Minecraft server on Fargate.
//!
//! ## Pipeline
//!
//! ```text
//! config.yml ──ConfigLoader──▶ RawDocument ──normalize──▶ ValidatedConfig ──derive──▶ DeploymentPlan
//! ```
//!
//! Both `normalize` and `derive` are pure. Reading the file, resolving the
//! hosted zone and topic identifiers, and probing for a container runtime
//! happen around them.
//!
//! ## Modules
//!
//! - `config` - Document schema, defaults, the server-environment transform, and loading
//! - `plan` - Deployment plan types and derivation
//! - `resolve` - Identifier resolution seam for out-of-band lookups
//! - `probe` - Local container runtime detection
//! - `error` - Error taxonomy and error codes
pub mod config;
pub mod error;
pub mod plan;
pub mod probe;
pub mod resolve;

pub use config::{normalize, ConfigLoader, RawDocument, ValidatedConfig};
pub use error::{OnDemandError, ParseError, PlanError, Result, ValidationFailure, Violation};
pub use plan::{derive, DeploymentPlan};
