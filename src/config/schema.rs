//! The validated configuration record and its schema defaults.

use super::environment::EnvironmentMap;
use serde::Serialize;

pub const DEFAULT_SUBDOMAIN_PART: &str = "mc";
pub const DEFAULT_SERVER_REGION: &str = "us-west-1";
pub const DEFAULT_STARTUP_MINUTES: u32 = 10;
pub const DEFAULT_SHUTDOWN_MINUTES: u32 = 20;
pub const DEFAULT_USE_FARGATE_SPOT: bool = false;
pub const DEFAULT_TASK_CPU: u32 = 1024;
pub const DEFAULT_TASK_MEMORY: u32 = 2048;
pub const DEFAULT_DEBUG: bool = false;

/// Document keys, in the order the schema declares them.
pub mod keys {
    pub const DOMAIN_NAME: &str = "domainName";
    pub const SUBDOMAIN_PART: &str = "subdomainPart";
    pub const SERVER_REGION: &str = "serverRegion";
    pub const STARTUP_MINUTES: &str = "startupMinutes";
    pub const SHUTDOWN_MINUTES: &str = "shutdownMinutes";
    pub const USE_FARGATE_SPOT: &str = "useFargateSpot";
    pub const TASK_CPU: &str = "taskCpu";
    pub const TASK_MEMORY: &str = "taskMemory";
    pub const VPC_ID: &str = "vpcId";
    pub const SNS_EMAIL_ADDRESS: &str = "snsEmailAddress";
    pub const TWILIO: &str = "twilio";
    pub const TWILIO_ALIAS: &str = "twilioConfig";
    pub const DISCORD: &str = "discord";
    pub const DISCORD_ALIAS: &str = "discordConfig";
    pub const SERVER_ENVIRONMENT: &str = "serverEnvironment";
    pub const DEBUG: &str = "debug";
    pub const EXTRA_TCP_PORTS: &str = "extraTcpPorts";
    pub const EXTRA_UDP_PORTS: &str = "extraUdpPorts";

    pub const ALL: &[&str] = &[
        DOMAIN_NAME,
        SUBDOMAIN_PART,
        SERVER_REGION,
        STARTUP_MINUTES,
        SHUTDOWN_MINUTES,
        USE_FARGATE_SPOT,
        TASK_CPU,
        TASK_MEMORY,
        VPC_ID,
        SNS_EMAIL_ADDRESS,
        TWILIO,
        TWILIO_ALIAS,
        DISCORD,
        DISCORD_ALIAS,
        SERVER_ENVIRONMENT,
        DEBUG,
        EXTRA_TCP_PORTS,
        EXTRA_UDP_PORTS,
    ];
}

/// The canonical configuration record.
///
/// Produced once by [`crate::config::normalize`] and only ever read after
/// that; plan derivation borrows it immutably.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedConfig {
    pub domain_name: String,
    pub subdomain_part: String,
    pub server_region: String,
    pub startup_minutes: u32,
    pub shutdown_minutes: u32,
    pub use_fargate_spot: bool,
    pub task_cpu: u32,
    pub task_memory: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sns_email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twilio: Option<TwilioConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord: Option<DiscordConfig>,
    pub server_environment: EnvironmentMap,
    pub debug: bool,
    pub extra_tcp_ports: Vec<u16>,
    pub extra_udp_ports: Vec<u16>,
}

impl ValidatedConfig {
    /// Fully-qualified DNS name of the game server.
    pub fn server_name(&self) -> String {
        format!("{}.{}", self.subdomain_part, self.domain_name)
    }

    pub fn notifications_enabled(&self) -> bool {
        self.sns_email_address.is_some()
    }
}

/// SMS notification settings. All four fields are required together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwilioConfig {
    pub phone_from: String,
    pub phone_to: String,
    pub account_id: String,
    pub auth_code: String,
}

/// Discord webhook notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordConfig {
    pub webhook_urls: Vec<String>,
}
