//! Deployment plan types and derivation.
//!
//! A [`DeploymentPlan`] is a read-only description of everything the
//! provisioning layer has to create for one server: task sizing, the two
//! containers, ingress rules, storage, network, and the optional
//! notification topic. It is derived by [`derive`] from a
//! [`ValidatedConfig`](crate::config::ValidatedConfig) and two identifiers
//! resolved out of band.

pub mod constants;
pub mod deriver;
pub mod image;
pub mod ports;

pub use deriver::{derive, watchdog_environment, MemorySplit};
pub use image::{watchdog_image, ImageSource};
pub use ports::{ingress_rules, IngressRule, PortMapping, Protocol};

use crate::config::EnvironmentMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentPlan {
    pub region: String,
    pub task: TaskSpec,
    pub network: NetworkSpec,
    pub storage: StorageSpec,
    pub ingress: Vec<IngressRule>,
    pub server: ContainerSpec,
    pub watchdog: ContainerSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationTarget>,
}

impl DeploymentPlan {
    /// Environment handed to the watchdog sidecar.
    pub fn sidecar_environment(&self) -> &EnvironmentMap {
        &self.watchdog.environment
    }

    /// Swap the watchdog image, e.g. for a locally built one.
    pub fn with_watchdog_image(mut self, image: ImageSource) -> Self {
        self.watchdog.image = image;
        self
    }
}

/// Fargate task sizing and scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    pub cpu: u32,
    pub memory_mib: u32,
    pub capacity_provider: CapacityProviderStrategy,
    /// The service starts scaled to zero; the launcher brings it up.
    pub desired_count: u32,
    pub assign_public_ip: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapacityProvider {
    Fargate,
    FargateSpot,
}

impl CapacityProvider {
    pub fn for_spot(use_spot: bool) -> Self {
        if use_spot {
            Self::FargateSpot
        } else {
            Self::Fargate
        }
    }
}

/// The service's single capacity-provider strategy entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapacityProviderStrategy {
    pub provider: CapacityProvider,
    pub weight: u32,
    /// Tasks always placed on this provider before weights apply.
    pub base: u32,
}

impl CapacityProviderStrategy {
    pub fn for_spot(use_spot: bool) -> Self {
        Self {
            provider: CapacityProvider::for_spot(use_spot),
            weight: constants::CAPACITY_PROVIDER_WEIGHT,
            base: constants::CAPACITY_PROVIDER_BASE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    pub name: String,
    pub image: ImageSource,
    pub cpu: u32,
    pub memory_limit_mib: u32,
    pub memory_reservation_mib: u32,
    /// The task stops when an essential container exits.
    pub essential: bool,
    pub port_mappings: Vec<PortMapping>,
    pub environment: EnvironmentMap,
    pub mount_points: Vec<MountPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LogConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MountPoint {
    pub container_path: String,
    pub source_volume: String,
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    pub stream_prefix: String,
    pub retention_days: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NetworkSpec {
    /// Look up an existing VPC.
    Existing { vpc_id: String },
    /// Create a VPC with public subnets only.
    Create { max_azs: u8, nat_gateways: u8 },
}

/// Persistent world storage shared across task restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSpec {
    pub volume_name: String,
    pub access_point_path: String,
    pub posix_uid: String,
    pub posix_gid: String,
    pub permissions: String,
    pub transit_encryption: bool,
}

/// Topic the watchdog publishes start/stop notices to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationTarget {
    pub topic_arn: String,
    pub display_name: String,
    pub email_subscription: String,
}
