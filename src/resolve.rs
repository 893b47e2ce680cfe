//! Out-of-band identifier lookup.
//!
//! The hosted-zone id and the notification topic are published by a separate
//! domain stack into a shared parameter store. Plan derivation only ever sees
//! the resolved strings; fetching them is the caller's job.

use crate::error::ResolveError;

/// Region the domain stack publishes its parameters in.
pub const DOMAIN_STACK_REGION: &str = "us-east-1";
/// Parameter holding the hosted zone id of the server's domain.
pub const HOSTED_ZONE_PARAMETER: &str = "MinecraftHostedZoneID";

/// Source of identifiers that live outside the configuration document.
pub trait IdentifierResolver {
    /// Hosted zone the watchdog writes the server's DNS record into.
    fn zone_id(&self) -> Result<String, ResolveError>;

    /// Notification topic the watchdog publishes to.
    fn topic_arn(&self) -> Result<String, ResolveError>;
}

/// Identifiers supplied up front, e.g. from command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticIdentifiers {
    zone_id: Option<String>,
    topic_arn: Option<String>,
}

impl StaticIdentifiers {
    pub fn new(zone_id: Option<String>, topic_arn: Option<String>) -> Self {
        Self { zone_id, topic_arn }
    }
}

impl IdentifierResolver for StaticIdentifiers {
    fn zone_id(&self) -> Result<String, ResolveError> {
        non_empty(HOSTED_ZONE_PARAMETER, self.zone_id.as_deref())
    }

    fn topic_arn(&self) -> Result<String, ResolveError> {
        non_empty("notification topic", self.topic_arn.as_deref())
    }
}

fn non_empty(name: &str, value: Option<&str>) -> Result<String, ResolveError> {
    match value {
        None => Err(ResolveError::Unavailable {
            name: name.to_string(),
            region: DOMAIN_STACK_REGION.to_string(),
        }),
        Some(v) if v.trim().is_empty() => Err(ResolveError::Empty {
            name: name.to_string(),
        }),
        Some(v) => Ok(v.to_string()),
    }
}

/// Resolve the two identifiers plan derivation needs.
///
/// The topic is only looked up when `needs_topic` is set; otherwise the
/// empty string stands in for it.
pub fn resolve_identifiers(
    resolver: &dyn IdentifierResolver,
    needs_topic: bool,
) -> Result<(String, String), ResolveError> {
    let zone_id = resolver.zone_id()?;
    let topic_arn = if needs_topic {
        resolver.topic_arn()?
    } else {
        String::new()
    };
    Ok((zone_id, topic_arn))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_identifiers() {
        let ids = StaticIdentifiers::new(Some("Z123".into()), Some("arn:topic".into()));
        assert_eq!(ids.zone_id().unwrap(), "Z123");
        assert_eq!(ids.topic_arn().unwrap(), "arn:topic");
    }

    #[test]
    fn test_missing_zone_is_unavailable() {
        let ids = StaticIdentifiers::default();
        assert_eq!(
            ids.zone_id().unwrap_err(),
            ResolveError::Unavailable {
                name: "MinecraftHostedZoneID".to_string(),
                region: "us-east-1".to_string(),
            }
        );
    }

    #[test]
    fn test_blank_value_is_rejected() {
        let ids = StaticIdentifiers::new(Some("  ".into()), None);
        assert!(matches!(ids.zone_id(), Err(ResolveError::Empty { .. })));
    }

    #[test]
    fn test_topic_skipped_when_not_needed() {
        let ids = StaticIdentifiers::new(Some("Z123".into()), None);
        let (zone, topic) = resolve_identifiers(&ids, false).unwrap();
        assert_eq!(zone, "Z123");
        assert_eq!(topic, "");

        assert!(resolve_identifiers(&ids, true).is_err());
    }
}
