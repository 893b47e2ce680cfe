//! Container environment maps and the `serverEnvironment` transform.
//!
//! Environment maps keep insertion order so generated task definitions are
//! byte-for-byte reproducible. The transform is pure: the same sequence of
//! document entries always yields the same map.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_yaml::Value;
use std::fmt;

/// Keys whose list values are collapsed into one comma-separated string.
pub const MULTI_VALUE_KEYS: &[&str] = &["MODS", "PLUGINS"];

pub fn is_multi_value_key(key: &str) -> bool {
    MULTI_VALUE_KEYS.contains(&key)
}

/// An ordered set of environment variables.
///
/// Keys are unique; setting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentMap {
    entries: Vec<(String, String)>,
}

impl EnvironmentMap {
    pub fn builder() -> EnvironmentBuilder {
        EnvironmentBuilder::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K, V> FromIterator<(K, V)> for EnvironmentMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        EnvironmentBuilder::default().extend(iter).build()
    }
}

impl Serialize for EnvironmentMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Accumulates environment entries by value; nothing is observable until
/// [`EnvironmentBuilder::build`].
#[derive(Debug, Default)]
#[must_use]
pub struct EnvironmentBuilder {
    entries: Vec<(String, String)>,
}

impl EnvironmentBuilder {
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn extend<I, K, V>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        entries
            .into_iter()
            .fold(self, |builder, (key, value)| builder.set(key, value))
    }

    pub fn build(self) -> EnvironmentMap {
        EnvironmentMap {
            entries: self.entries,
        }
    }
}

/// A `serverEnvironment` value as written in the document.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvValue {
    Null,
    Bool(bool),
    Integer(i128),
    Float(f64),
    Text(String),
    List(Vec<EnvValue>),
}

impl EnvValue {
    /// Converts a YAML value, rejecting shapes with no string form.
    pub fn from_yaml(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Number(n) => Ok(if let Some(i) = n.as_i64() {
                Self::Integer(i.into())
            } else if let Some(u) = n.as_u64() {
                Self::Integer(u.into())
            } else {
                Self::Float(n.as_f64().unwrap_or(f64::NAN))
            }),
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Sequence(items) => items
                .iter()
                .map(Self::from_yaml)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            Value::Mapping(_) => {
                Err("nested mappings have no environment variable form".to_string())
            }
            Value::Tagged(tagged) => Err(format!(
                "tagged value '{}' has no environment variable form",
                tagged.tag
            )),
        }
    }

    fn join(items: &[EnvValue]) -> String {
        items
            .iter()
            .map(|item| match item {
                // List elements that are null render as nothing.
                EnvValue::Null => String::new(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) if x.is_infinite() => {
                f.write_str(if *x > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Self::Float(x) if x.is_nan() => f.write_str("NaN"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&Self::join(items)),
        }
    }
}

/// Renders one entry: lists under [`MULTI_VALUE_KEYS`] are joined with
/// commas, everything else is stringified.
pub fn render_entry(key: &str, value: &EnvValue) -> String {
    match value {
        EnvValue::List(items) if is_multi_value_key(key) => EnvValue::join(items),
        other => other.to_string(),
    }
}

/// Applies [`render_entry`] to every entry, keeping input order.
pub fn transform_server_environment<I>(entries: I) -> EnvironmentMap
where
    I: IntoIterator<Item = (String, EnvValue)>,
{
    entries
        .into_iter()
        .map(|(key, value)| {
            let rendered = render_entry(&key, &value);
            (key, rendered)
        })
        .collect()
}
