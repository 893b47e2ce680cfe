//! Schema validation and normalization of the raw configuration document.
//!
//! `normalize` walks the parsed YAML once, applies defaults for absent
//! fields, checks every present field against its declared shape, and
//! collects every violation before giving up. It never touches the
//! filesystem and never mutates its input.

use super::environment::{transform_server_environment, EnvValue, EnvironmentMap};
use super::schema::{
    keys, DiscordConfig, TwilioConfig, ValidatedConfig, DEFAULT_DEBUG, DEFAULT_SERVER_REGION,
    DEFAULT_SHUTDOWN_MINUTES, DEFAULT_STARTUP_MINUTES, DEFAULT_SUBDOMAIN_PART, DEFAULT_TASK_CPU,
    DEFAULT_TASK_MEMORY, DEFAULT_USE_FARGATE_SPOT,
};
use crate::error::{ValidationFailure, Violation, ViolationKind};
use serde_yaml::{Mapping, Number, Value};
use tracing::{debug, trace, warn};

/// A parsed but unvalidated configuration document.
pub type RawDocument = Value;

const TWILIO_FIELDS: [&str; 4] = ["phoneFrom", "phoneTo", "accountId", "authCode"];
const DISCORD_WEBHOOK_URLS: &str = "webhookUrls";

/// Validate `raw` against the configuration schema and fill in defaults.
pub fn normalize(raw: &RawDocument) -> Result<ValidatedConfig, ValidationFailure> {
    debug!("Normalizing configuration document");

    let Some(root) = raw.as_mapping() else {
        let violation = Violation::new(
            "",
            ViolationKind::InvalidType,
            format!(
                "expected a mapping at the document root, found {}",
                type_name(raw)
            ),
        );
        return Err(ValidationFailure::single(violation));
    };

    let mut fields = Fields::new(root);
    fields.report_unknown_keys();

    let config = ValidatedConfig {
        domain_name: fields.domain_name(),
        subdomain_part: fields.string_or(keys::SUBDOMAIN_PART, DEFAULT_SUBDOMAIN_PART),
        server_region: fields.string_or(keys::SERVER_REGION, DEFAULT_SERVER_REGION),
        startup_minutes: fields.count_or(keys::STARTUP_MINUTES, DEFAULT_STARTUP_MINUTES, 0),
        shutdown_minutes: fields.count_or(keys::SHUTDOWN_MINUTES, DEFAULT_SHUTDOWN_MINUTES, 0),
        use_fargate_spot: fields.bool_or(keys::USE_FARGATE_SPOT, DEFAULT_USE_FARGATE_SPOT),
        task_cpu: fields.count_or(keys::TASK_CPU, DEFAULT_TASK_CPU, 1),
        task_memory: fields.count_or(keys::TASK_MEMORY, DEFAULT_TASK_MEMORY, 1),
        vpc_id: fields.optional_string(keys::VPC_ID),
        // An empty address turns notifications off.
        sns_email_address: fields
            .optional_string(keys::SNS_EMAIL_ADDRESS)
            .filter(|email| !email.is_empty()),
        twilio: fields.twilio(),
        discord: fields.discord(),
        server_environment: fields.server_environment(),
        debug: fields.bool_or(keys::DEBUG, DEFAULT_DEBUG),
        extra_tcp_ports: fields.ports(keys::EXTRA_TCP_PORTS),
        extra_udp_ports: fields.ports(keys::EXTRA_UDP_PORTS),
    };

    match ValidationFailure::from_violations(fields.violations) {
        Some(failure) => {
            debug!(
                violations = failure.violations().len(),
                "Configuration document rejected"
            );
            Err(failure)
        }
        None => {
            debug!(server_name = %config.server_name(), "Configuration document normalized");
            Ok(config)
        }
    }
}

/// Field accessors over the document root that record violations as they go.
struct Fields<'a> {
    root: &'a Mapping,
    violations: Vec<Violation>,
}

impl<'a> Fields<'a> {
    fn new(root: &'a Mapping) -> Self {
        Self {
            root,
            violations: Vec::new(),
        }
    }

    fn report_unknown_keys(&self) {
        for key in self.root.keys() {
            match key.as_str() {
                Some(name) if keys::ALL.contains(&name) => {}
                Some(name) => warn!(key = name, "Ignoring unknown configuration key"),
                None => warn!(key = ?key, "Ignoring non-string configuration key"),
            }
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.root.get(key)
    }

    fn push(&mut self, violation: Violation) {
        trace!(path = %violation.path, message = %violation.message, "Schema violation");
        self.violations.push(violation);
    }

    fn domain_name(&mut self) -> String {
        let Some(value) = self.get(keys::DOMAIN_NAME) else {
            self.push(Violation::missing(keys::DOMAIN_NAME));
            return String::new();
        };
        match expect_string(keys::DOMAIN_NAME, value, &mut self.violations) {
            Some(name) if name.trim().is_empty() => {
                self.push(Violation::new(
                    keys::DOMAIN_NAME,
                    ViolationKind::OutOfRange,
                    "must not be empty",
                ));
                String::new()
            }
            Some(name) => name,
            None => String::new(),
        }
    }

    fn string_or(&mut self, key: &str, default: &str) -> String {
        self.optional_string(key)
            .unwrap_or_else(|| default.to_string())
    }

    fn optional_string(&mut self, key: &str) -> Option<String> {
        let value = self.get(key)?;
        expect_string(key, value, &mut self.violations)
    }

    fn bool_or(&mut self, key: &str, default: bool) -> bool {
        match self.get(key) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                self.push(type_mismatch(key, "a boolean", other));
                default
            }
        }
    }

    fn count_or(&mut self, key: &str, default: u32, min: u32) -> u32 {
        match self.get(key) {
            None => default,
            Some(value) => expect_count(key, value, min, &mut self.violations).unwrap_or(default),
        }
    }

    fn ports(&mut self, key: &str) -> Vec<u16> {
        match self.get(key) {
            None => Vec::new(),
            Some(Value::Sequence(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(idx, item)| {
                    expect_port(&format!("{key}[{idx}]"), item, &mut self.violations)
                })
                .collect(),
            Some(other) => {
                self.push(type_mismatch(key, "a list of port numbers", other));
                Vec::new()
            }
        }
    }

    /// Finds an optional group under its key or its alias.
    fn group(
        &mut self,
        key: &'static str,
        alias: &'static str,
    ) -> Option<(&'static str, &'a Value)> {
        match (self.get(key), self.get(alias)) {
            (Some(value), Some(_)) => {
                self.push(Violation::new(
                    alias,
                    ViolationKind::Duplicate,
                    format!("'{alias}' is an alias of '{key}'; supply only one of them"),
                ));
                Some((key, value))
            }
            (Some(value), None) => Some((key, value)),
            (None, Some(value)) => Some((alias, value)),
            (None, None) => None,
        }
    }

    fn group_mapping(
        &mut self,
        key: &'static str,
        alias: &'static str,
    ) -> Option<(&'static str, &'a Mapping)> {
        let (name, value) = self.group(key, alias)?;
        match value.as_mapping() {
            Some(mapping) => Some((name, mapping)),
            None => {
                self.push(type_mismatch(name, "a mapping", value));
                None
            }
        }
    }

    fn twilio(&mut self) -> Option<TwilioConfig> {
        let (name, group) = self.group_mapping(keys::TWILIO, keys::TWILIO_ALIAS)?;

        let [phone_from, phone_to, account_id, auth_code] = TWILIO_FIELDS.map(|field| {
            let path = format!("{name}.{field}");
            match group.get(field) {
                Some(value) => expect_string(&path, value, &mut self.violations),
                None => {
                    self.violations.push(incomplete_group(&path, name));
                    None
                }
            }
        });

        Some(TwilioConfig {
            phone_from: phone_from?,
            phone_to: phone_to?,
            account_id: account_id?,
            auth_code: auth_code?,
        })
    }

    fn discord(&mut self) -> Option<DiscordConfig> {
        let (name, group) = self.group_mapping(keys::DISCORD, keys::DISCORD_ALIAS)?;
        let path = format!("{name}.{DISCORD_WEBHOOK_URLS}");

        let Some(value) = group.get(DISCORD_WEBHOOK_URLS) else {
            self.push(incomplete_group(&path, name));
            return None;
        };
        let Some(items) = value.as_sequence() else {
            self.push(type_mismatch(&path, "a list of strings", value));
            return None;
        };

        let before = self.violations.len();
        let webhook_urls: Vec<String> = items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| {
                expect_string(&format!("{path}[{idx}]"), item, &mut self.violations)
            })
            .collect();

        (self.violations.len() == before).then_some(DiscordConfig { webhook_urls })
    }

    fn server_environment(&mut self) -> EnvironmentMap {
        let key = keys::SERVER_ENVIRONMENT;
        let Some(value) = self.get(key) else {
            self.push(Violation::missing(key));
            return EnvironmentMap::default();
        };
        let Some(mapping) = value.as_mapping() else {
            self.push(type_mismatch(key, "a mapping of environment variables", value));
            return EnvironmentMap::default();
        };

        let mut entries = Vec::with_capacity(mapping.len());
        for (env_key, env_value) in mapping {
            let Some(name) = env_key.as_str() else {
                self.push(Violation::new(
                    key,
                    ViolationKind::InvalidType,
                    format!("environment keys must be strings, found {}", type_name(env_key)),
                ));
                continue;
            };
            match EnvValue::from_yaml(env_value) {
                Ok(parsed) => entries.push((name.to_string(), parsed)),
                Err(message) => self.push(Violation::new(
                    format!("{key}.{name}"),
                    ViolationKind::InvalidType,
                    message,
                )),
            }
        }

        transform_server_environment(entries)
    }
}

fn expect_string(path: &str, value: &Value, violations: &mut Vec<Violation>) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        other => {
            violations.push(type_mismatch(path, "a string", other));
            None
        }
    }
}

fn expect_count(
    path: &str,
    value: &Value,
    min: u32,
    violations: &mut Vec<Violation>,
) -> Option<u32> {
    let expected = if min == 0 {
        "a non-negative integer"
    } else {
        "a positive integer"
    };
    let Value::Number(n) = value else {
        violations.push(type_mismatch(path, expected, value));
        return None;
    };

    match whole_number(n) {
        Some(v) if v >= f64::from(min) && v <= f64::from(u32::MAX) => Some(v as u32),
        Some(_) => {
            violations.push(Violation::new(
                path,
                ViolationKind::OutOfRange,
                format!("expected {expected}, found {n}"),
            ));
            None
        }
        None => {
            violations.push(Violation::new(
                path,
                ViolationKind::InvalidType,
                format!("expected {expected}, found {n}"),
            ));
            None
        }
    }
}

fn expect_port(path: &str, value: &Value, violations: &mut Vec<Violation>) -> Option<u16> {
    let Value::Number(n) = value else {
        violations.push(type_mismatch(path, "a port number", value));
        return None;
    };
    match whole_number(n) {
        Some(v) if (1.0..=f64::from(u16::MAX)).contains(&v) => Some(v as u16),
        Some(_) => {
            violations.push(Violation::new(
                path,
                ViolationKind::OutOfRange,
                format!("expected a port number between 1 and 65535, found {n}"),
            ));
            None
        }
        None => {
            violations.push(Violation::new(
                path,
                ViolationKind::InvalidType,
                format!("expected a whole port number, found {n}"),
            ));
            None
        }
    }
}

/// Integral value of `n`; floats count only when they have no fractional part.
fn whole_number(n: &Number) -> Option<f64> {
    match (n.as_u64(), n.as_i64(), n.as_f64()) {
        (Some(u), _, _) => Some(u as f64),
        (None, Some(i), _) => Some(i as f64),
        (None, None, Some(f)) if f.is_finite() && f.fract() == 0.0 => Some(f),
        _ => None,
    }
}

fn type_mismatch(path: &str, expected: &str, found: &Value) -> Violation {
    Violation::new(
        path,
        ViolationKind::InvalidType,
        format!("expected {expected}, found {}", type_name(found)),
    )
}

fn incomplete_group(path: &str, group: &str) -> Violation {
    Violation::new(
        path,
        ViolationKind::IncompleteGroup,
        format!("required when '{group}' is present"),
    )
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
