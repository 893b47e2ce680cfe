//! Pure derivation of a deployment plan from a validated config.
//!
//! No I/O and no randomness: identical inputs always produce an identical
//! plan, including the order of ingress rules and environment entries.

use super::constants::{self, env_keys};
use super::image::ImageSource;
use super::ports::{ingress_rules, PortMapping};
use super::{
    CapacityProviderStrategy, ContainerSpec, DeploymentPlan, LogConfig, MountPoint, NetworkSpec,
    NotificationTarget, StorageSpec, TaskSpec,
};
use crate::config::{DiscordConfig, EnvironmentMap, TwilioConfig, ValidatedConfig};
use crate::error::PlanError;
use serde::Serialize;
use tracing::{debug, trace};

/// How the task's memory is divided between the server and the watchdog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySplit {
    pub server_limit_mib: u32,
    pub server_reservation_mib: u32,
    pub watchdog_limit_mib: u32,
    pub watchdog_reservation_mib: u32,
}

impl MemorySplit {
    /// Reserve the watchdog's share first; the server gets the rest.
    ///
    /// Fails when the server's soft reservation would not be positive.
    pub fn for_task(task_memory: u32) -> Result<Self, PlanError> {
        let insufficient = || PlanError::InsufficientMemory {
            task_memory,
            overhead: constants::WATCHDOG_MEMORY_MIB,
            headroom: constants::SERVER_RESERVATION_HEADROOM_MIB,
        };

        let server_limit_mib = task_memory
            .checked_sub(constants::WATCHDOG_MEMORY_MIB)
            .ok_or_else(insufficient)?;
        let server_reservation_mib = server_limit_mib
            .checked_sub(constants::SERVER_RESERVATION_HEADROOM_MIB)
            .filter(|reservation| *reservation > 0)
            .ok_or_else(insufficient)?;

        Ok(Self {
            server_limit_mib,
            server_reservation_mib,
            watchdog_limit_mib: constants::WATCHDOG_MEMORY_MIB,
            watchdog_reservation_mib: constants::WATCHDOG_MEMORY_MIB
                - constants::WATCHDOG_RESERVATION_HEADROOM_MIB,
        })
    }
}

/// Derive the deployment plan.
///
/// `zone_id` is the hosted zone the watchdog updates; `topic_arn` is the
/// notification topic and is only used when the config asks for email
/// notifications.
pub fn derive(
    config: &ValidatedConfig,
    zone_id: &str,
    topic_arn: &str,
) -> Result<DeploymentPlan, PlanError> {
    debug!(
        task_memory = config.task_memory,
        task_cpu = config.task_cpu,
        "Deriving deployment plan"
    );

    let memory = MemorySplit::for_task(config.task_memory)?;
    let ingress = ingress_rules(config);
    trace!(rules = ?ingress, "Derived ingress rules");

    let notification = config
        .sns_email_address
        .as_ref()
        .map(|email| NotificationTarget {
            topic_arn: topic_arn.to_string(),
            display_name: constants::NOTIFICATION_DISPLAY_NAME.to_string(),
            email_subscription: email.clone(),
        });

    let server = ContainerSpec {
        name: constants::SERVER_CONTAINER_NAME.to_string(),
        image: ImageSource::registry(constants::SERVER_IMAGE),
        cpu: constants::CONTAINER_CPU_UNITS,
        memory_limit_mib: memory.server_limit_mib,
        memory_reservation_mib: memory.server_reservation_mib,
        essential: false,
        port_mappings: ingress.iter().copied().map(PortMapping::from).collect(),
        environment: config.server_environment.clone(),
        mount_points: vec![MountPoint {
            container_path: constants::SERVER_DATA_PATH.to_string(),
            source_volume: constants::VOLUME_NAME.to_string(),
            read_only: false,
        }],
        logging: log_config(config, constants::SERVER_CONTAINER_NAME),
    };

    let watchdog = ContainerSpec {
        name: constants::WATCHDOG_CONTAINER_NAME.to_string(),
        image: ImageSource::registry(constants::WATCHDOG_REGISTRY_IMAGE),
        cpu: constants::CONTAINER_CPU_UNITS,
        memory_limit_mib: memory.watchdog_limit_mib,
        memory_reservation_mib: memory.watchdog_reservation_mib,
        essential: true,
        port_mappings: Vec::new(),
        environment: watchdog_environment(config, zone_id, topic_arn),
        mount_points: Vec::new(),
        logging: log_config(config, constants::WATCHDOG_CONTAINER_NAME),
    };

    let plan = DeploymentPlan {
        region: config.server_region.clone(),
        task: TaskSpec {
            cpu: config.task_cpu,
            memory_mib: config.task_memory,
            capacity_provider: CapacityProviderStrategy::for_spot(config.use_fargate_spot),
            desired_count: 0,
            assign_public_ip: true,
        },
        network: network_spec(config),
        storage: storage_spec(),
        ingress,
        server,
        watchdog,
        notification,
    };

    debug!(
        server_memory_mib = plan.server.memory_limit_mib,
        ingress_rules = plan.ingress.len(),
        notifications = plan.notification.is_some(),
        "Deployment plan derived"
    );
    Ok(plan)
}

/// Environment for the watchdog sidecar.
///
/// The operational keys are always present; `SNSTOPIC` is empty when email
/// notifications are off. Discord and Twilio keys appear only when their
/// group is configured.
pub fn watchdog_environment(
    config: &ValidatedConfig,
    zone_id: &str,
    topic_arn: &str,
) -> EnvironmentMap {
    let topic = if config.notifications_enabled() {
        topic_arn
    } else {
        ""
    };

    EnvironmentMap::builder()
        .set(env_keys::CLUSTER, constants::CLUSTER_NAME)
        .set(env_keys::SERVICE, constants::SERVICE_NAME)
        .set(env_keys::DNS_ZONE, zone_id)
        .set(env_keys::SERVER_NAME, config.server_name())
        .set(env_keys::SNS_TOPIC, topic)
        .set(env_keys::STARTUP_MINUTES, config.startup_minutes.to_string())
        .set(env_keys::SHUTDOWN_MINUTES, config.shutdown_minutes.to_string())
        .extend(config.discord.iter().flat_map(discord_entries))
        .extend(config.twilio.iter().flat_map(twilio_entries))
        .build()
}

fn discord_entries(discord: &DiscordConfig) -> [(&'static str, String); 1] {
    [(env_keys::DISCORD_WEBHOOKS, discord.webhook_urls.join(","))]
}

fn twilio_entries(twilio: &TwilioConfig) -> [(&'static str, String); 4] {
    [
        (env_keys::TWILIO_FROM, twilio.phone_from.clone()),
        (env_keys::TWILIO_TO, twilio.phone_to.clone()),
        (env_keys::TWILIO_ACCOUNT_ID, twilio.account_id.clone()),
        (env_keys::TWILIO_AUTH, twilio.auth_code.clone()),
    ]
}

fn log_config(config: &ValidatedConfig, container: &str) -> Option<LogConfig> {
    config.debug.then(|| LogConfig {
        stream_prefix: container.to_string(),
        retention_days: constants::LOG_RETENTION_DAYS,
    })
}

fn network_spec(config: &ValidatedConfig) -> NetworkSpec {
    match &config.vpc_id {
        Some(vpc_id) => NetworkSpec::Existing {
            vpc_id: vpc_id.clone(),
        },
        None => NetworkSpec::Create {
            max_azs: constants::NEW_VPC_MAX_AZS,
            nat_gateways: constants::NEW_VPC_NAT_GATEWAYS,
        },
    }
}

fn storage_spec() -> StorageSpec {
    StorageSpec {
        volume_name: constants::VOLUME_NAME.to_string(),
        access_point_path: constants::ACCESS_POINT_PATH.to_string(),
        posix_uid: constants::ACCESS_POINT_POSIX_ID.to_string(),
        posix_gid: constants::ACCESS_POINT_POSIX_ID.to_string(),
        permissions: constants::ACCESS_POINT_PERMISSIONS.to_string(),
        transit_encryption: true,
    }
}
