//! Configuration document schema, normalization, and loading.
//!
//! The pipeline is `ConfigLoader` (read + YAML parse) → [`normalize`]
//! (schema + defaults + transforms) → [`ValidatedConfig`].

pub mod environment;
pub mod loader;
pub mod normalizer;
pub mod schema;

pub use environment::{
    is_multi_value_key, transform_server_environment, EnvValue, EnvironmentBuilder,
    EnvironmentMap, MULTI_VALUE_KEYS,
};
pub use loader::{parse_document, ConfigLoader, DEFAULT_CONFIG_FILE};
pub use normalizer::{normalize, RawDocument};
pub use schema::{DiscordConfig, TwilioConfig, ValidatedConfig};
