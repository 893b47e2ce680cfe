//! Fixed naming and sizing policy for the generated deployment.

/// ECS cluster that hosts the server service.
pub const CLUSTER_NAME: &str = "minecraft";
/// ECS service name; the launcher scales it between 0 and 1.
pub const SERVICE_NAME: &str = "minecraft-server";

pub const SERVER_CONTAINER_NAME: &str = "minecraft-server";
pub const WATCHDOG_CONTAINER_NAME: &str = "minecraft-ecsfargate-watchdog";

pub const SERVER_IMAGE: &str = "itzg/minecraft-server";
pub const WATCHDOG_REGISTRY_IMAGE: &str = "j1mmie/minecraft-ecsfargate-watchdog";
/// Build context for the watchdog image, relative to the deployment project.
pub const WATCHDOG_BUILD_CONTEXT: &str = "../minecraft-ecsfargate-watchdog/";

/// Java edition listens on TCP 25565.
pub const DEFAULT_GAME_PORT: u16 = 25565;

/// Memory carved out of the task for the watchdog sidecar.
pub const WATCHDOG_MEMORY_MIB: u32 = 512;
/// Gap between the server's hard memory limit and its soft reservation.
pub const SERVER_RESERVATION_HEADROOM_MIB: u32 = 256;
/// Gap between the watchdog's hard memory limit and its soft reservation.
pub const WATCHDOG_RESERVATION_HEADROOM_MIB: u32 = 128;
pub const CAPACITY_PROVIDER_WEIGHT: u32 = 1;
pub const CAPACITY_PROVIDER_BASE: u32 = 1;

/// CPU units assigned to each container.
pub const CONTAINER_CPU_UNITS: u32 = 1024;

pub const VOLUME_NAME: &str = "data";
pub const SERVER_DATA_PATH: &str = "/data";
pub const ACCESS_POINT_PATH: &str = "/minecraft";
pub const ACCESS_POINT_POSIX_ID: &str = "1000";
pub const ACCESS_POINT_PERMISSIONS: &str = "0755";

pub const NEW_VPC_MAX_AZS: u8 = 3;
pub const NEW_VPC_NAT_GATEWAYS: u8 = 0;

pub const LOG_RETENTION_DAYS: u16 = 3;

pub const NOTIFICATION_DISPLAY_NAME: &str = "Minecraft Server Notifications";

/// Sidecar environment keys.
pub mod env_keys {
    pub const CLUSTER: &str = "CLUSTER";
    pub const SERVICE: &str = "SERVICE";
    pub const DNS_ZONE: &str = "DNSZONE";
    pub const SERVER_NAME: &str = "SERVERNAME";
    pub const SNS_TOPIC: &str = "SNSTOPIC";
    pub const STARTUP_MINUTES: &str = "STARTUPMIN";
    pub const SHUTDOWN_MINUTES: &str = "SHUTDOWNMIN";
    pub const DISCORD_WEBHOOKS: &str = "DISCORDWEBHOOKS";
    pub const TWILIO_FROM: &str = "TWILIOFROM";
    pub const TWILIO_TO: &str = "TWILIOTO";
    pub const TWILIO_ACCOUNT_ID: &str = "TWILIOAID";
    pub const TWILIO_AUTH: &str = "TWILIOAUTH";

    pub const DISCORD: &[&str] = &[DISCORD_WEBHOOKS];
    pub const TWILIO: &[&str] = &[TWILIO_FROM, TWILIO_TO, TWILIO_ACCOUNT_ID, TWILIO_AUTH];
}
