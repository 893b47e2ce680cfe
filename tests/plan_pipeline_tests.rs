//! End-to-end tests of the load → normalize → derive pipeline through the
//! public library API.

use mc_ondemand::config::ConfigLoader;
use mc_ondemand::error::{OnDemandError, ViolationKind};
use mc_ondemand::plan::{derive, CapacityProvider, IngressRule, NetworkSpec};
use mc_ondemand::resolve::{resolve_identifiers, StaticIdentifiers};
use std::fs;
use tempfile::TempDir;

const ZONE: &str = "Z0123456789";
const TOPIC: &str = "arn:aws:sns:us-west-1:123456789012:minecraft";

fn load(content: &str) -> mc_ondemand::Result<mc_ondemand::ValidatedConfig> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yml");
    fs::write(&path, content).unwrap();
    ConfigLoader::new(path).load()
}

#[test]
fn test_full_document_produces_complete_plan() {
    let config = load(
        r#"
domainName: example.com
subdomainPart: minecraft
serverRegion: eu-central-1
startupMinutes: 15
shutdownMinutes: 30
useFargateSpot: true
taskCpu: 2048
taskMemory: 8192
vpcId: vpc-0abc
snsEmailAddress: ops@example.com
twilioConfig:
  phoneFrom: "+15550000001"
  phoneTo: "+15550000002"
  accountId: AC123
  authCode: secret
discordConfig:
  webhookUrls:
    - https://discord.example/1
    - https://discord.example/2
serverEnvironment:
  EULA: "TRUE"
  TYPE: PAPER
  MEMORY: 6G
  PLUGINS: [one.jar, two.jar]
debug: true
extraTcpPorts: [25575]
extraUdpPorts: [19132, 24454]
"#,
    )
    .unwrap();

    let identifiers = StaticIdentifiers::new(Some(ZONE.into()), Some(TOPIC.into()));
    let (zone_id, topic_arn) =
        resolve_identifiers(&identifiers, config.notifications_enabled()).unwrap();
    let plan = derive(&config, &zone_id, &topic_arn).unwrap();

    assert_eq!(plan.region, "eu-central-1");
    assert_eq!(plan.task.cpu, 2048);
    assert_eq!(plan.task.memory_mib, 8192);
    assert_eq!(
        plan.task.capacity_provider.provider,
        CapacityProvider::FargateSpot
    );
    assert_eq!(plan.server.memory_limit_mib, 7680);
    assert_eq!(plan.server.memory_reservation_mib, 7424);
    assert_eq!(
        plan.network,
        NetworkSpec::Existing {
            vpc_id: "vpc-0abc".into()
        }
    );
    assert_eq!(
        plan.ingress,
        vec![
            IngressRule::tcp(25565),
            IngressRule::tcp(25575),
            IngressRule::udp(19132),
            IngressRule::udp(24454),
        ]
    );
    assert!(plan.server.logging.is_some());
    assert_eq!(plan.server.environment.get("PLUGINS"), Some("one.jar,two.jar"));
    assert_eq!(plan.server.environment.get("MEMORY"), Some("6G"));

    let env = plan.sidecar_environment();
    assert_eq!(env.get("SERVERNAME"), Some("minecraft.example.com"));
    assert_eq!(env.get("DNSZONE"), Some(ZONE));
    assert_eq!(env.get("SNSTOPIC"), Some(TOPIC));
    assert_eq!(env.get("STARTUPMIN"), Some("15"));
    assert_eq!(env.get("SHUTDOWNMIN"), Some("30"));
    assert_eq!(
        env.get("DISCORDWEBHOOKS"),
        Some("https://discord.example/1,https://discord.example/2")
    );
    assert_eq!(env.get("TWILIOAUTH"), Some("secret"));
    assert_eq!(plan.notification.unwrap().email_subscription, "ops@example.com");
}

#[test]
fn test_every_violation_surfaces_through_loader() {
    let err = load(
        r#"
subdomainPart: 5
taskCpu: 0
extraTcpPorts: [70000]
twilio:
  phoneFrom: "+15550000001"
"#,
    )
    .unwrap_err();

    assert_eq!(err.exit_code(), 3);
    let violations = err.violations().unwrap();
    let has = |path: &str, kind: ViolationKind| {
        violations
            .iter()
            .any(|v| v.path == path && v.kind == kind)
    };
    assert!(has("domainName", ViolationKind::Missing));
    assert!(has("serverEnvironment", ViolationKind::Missing));
    assert!(has("subdomainPart", ViolationKind::InvalidType));
    assert!(has("taskCpu", ViolationKind::OutOfRange));
    assert!(has("extraTcpPorts[0]", ViolationKind::OutOfRange));
    assert!(has("twilio.phoneTo", ViolationKind::IncompleteGroup));
}

#[test]
fn test_syntax_error_is_not_reported_as_violation() {
    let err = load("domainName: [unclosed\n").unwrap_err();
    assert!(matches!(err, OnDemandError::Parse(_)));
    assert!(err.violations().is_none());
}

#[test]
fn test_zero_and_false_survive_to_plan() {
    let config = load(
        r#"
domainName: example.com
startupMinutes: 0
shutdownMinutes: 0
useFargateSpot: false
serverEnvironment:
  ENABLE_RCON: false
  MAX_PLAYERS: 0
"#,
    )
    .unwrap();
    let plan = derive(&config, ZONE, "").unwrap();

    let env = plan.sidecar_environment();
    assert_eq!(env.get("STARTUPMIN"), Some("0"));
    assert_eq!(env.get("SHUTDOWNMIN"), Some("0"));
    assert_eq!(plan.task.capacity_provider.provider, CapacityProvider::Fargate);
    assert_eq!(plan.server.environment.get("ENABLE_RCON"), Some("false"));
    assert_eq!(plan.server.environment.get("MAX_PLAYERS"), Some("0"));
}
