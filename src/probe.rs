//! Local capability checks run before deriving a plan.

use std::process::{Command, Stdio};
use tracing::debug;

/// Whether a container runtime is usable on this machine.
///
/// Runs `docker version`; any spawn failure or non-zero exit counts as
/// unavailable.
pub fn container_runtime_available() -> bool {
    runtime_responds("docker")
}

fn runtime_responds(program: &str) -> bool {
    let available = Command::new(program)
        .arg("version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false);
    debug!(program, available, "Probed container runtime");
    available
}
