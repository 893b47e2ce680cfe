use super::constants::DEFAULT_GAME_PORT;
use crate::config::ValidatedConfig;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => f.write_str("tcp"),
            Self::Udp => f.write_str("udp"),
        }
    }
}

/// Inbound rule on the service security group. Peers are always any IPv4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IngressRule {
    pub port: u16,
    pub protocol: Protocol,
}

impl IngressRule {
    pub fn tcp(port: u16) -> Self {
        Self {
            port,
            protocol: Protocol::Tcp,
        }
    }

    pub fn udp(port: u16) -> Self {
        Self {
            port,
            protocol: Protocol::Udp,
        }
    }
}

impl fmt::Display for IngressRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.port, self.protocol)
    }
}

/// Container port mapping; host and container ports are always equal on
/// Fargate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    pub container_port: u16,
    pub host_port: u16,
    pub protocol: Protocol,
}

impl From<IngressRule> for PortMapping {
    fn from(rule: IngressRule) -> Self {
        Self {
            container_port: rule.port,
            host_port: rule.port,
            protocol: rule.protocol,
        }
    }
}

/// Default game port first, then extra TCP ports, then extra UDP ports,
/// each group in document order.
pub fn ingress_rules(config: &ValidatedConfig) -> Vec<IngressRule> {
    std::iter::once(IngressRule::tcp(DEFAULT_GAME_PORT))
        .chain(config.extra_tcp_ports.iter().copied().map(IngressRule::tcp))
        .chain(config.extra_udp_ports.iter().copied().map(IngressRule::udp))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::normalize;

    fn config_with_ports(tcp: &str, udp: &str) -> ValidatedConfig {
        let yaml = format!(
            "domainName: example.com\nserverEnvironment: {{}}\nextraTcpPorts: {tcp}\nextraUdpPorts: {udp}\n"
        );
        normalize(&serde_yaml::from_str(&yaml).unwrap()).unwrap()
    }

    #[test]
    fn test_default_port_only() {
        let config = config_with_ports("[]", "[]");
        assert_eq!(ingress_rules(&config), vec![IngressRule::tcp(25565)]);
    }

    #[test]
    fn test_extra_ports_follow_default_in_order() {
        let config = config_with_ports("[25566]", "[19132]");
        assert_eq!(
            ingress_rules(&config),
            vec![
                IngressRule::tcp(25565),
                IngressRule::tcp(25566),
                IngressRule::udp(19132),
            ]
        );
    }

    #[test]
    fn test_udp_rules_come_after_all_tcp_rules() {
        let config = config_with_ports("[8123, 25575]", "[24454, 19132]");
        let rendered: Vec<_> = ingress_rules(&config)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            rendered,
            vec!["25565/tcp", "8123/tcp", "25575/tcp", "24454/udp", "19132/udp"]
        );
    }

    #[test]
    fn test_port_mapping_mirrors_rule() {
        let mapping = PortMapping::from(IngressRule::udp(19132));
        assert_eq!(mapping.container_port, 19132);
        assert_eq!(mapping.host_port, 19132);
        assert_eq!(mapping.protocol, Protocol::Udp);
    }
}
