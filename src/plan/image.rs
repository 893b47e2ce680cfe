use super::constants::{WATCHDOG_BUILD_CONTEXT, WATCHDOG_REGISTRY_IMAGE};
use serde::Serialize;
use std::path::PathBuf;

/// Where a container image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ImageSource {
    /// Pull a published image by name.
    Registry { name: String },
    /// Build locally from a directory and publish as a deployment asset.
    Asset { context: PathBuf },
}

impl ImageSource {
    pub fn registry(name: impl Into<String>) -> Self {
        Self::Registry { name: name.into() }
    }
}

/// Both choices run the same watchdog; a local build only needs a
/// container runtime on the deploying machine.
pub fn watchdog_image(runtime_available: bool) -> ImageSource {
    if runtime_available {
        ImageSource::Asset {
            context: PathBuf::from(WATCHDOG_BUILD_CONTEXT),
        }
    } else {
        ImageSource::registry(WATCHDOG_REGISTRY_IMAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_build_when_runtime_available() {
        assert_eq!(
            watchdog_image(true),
            ImageSource::Asset {
                context: PathBuf::from("../minecraft-ecsfargate-watchdog/")
            }
        );
    }

    #[test]
    fn test_registry_image_without_runtime() {
        assert_eq!(
            watchdog_image(false),
            ImageSource::registry("j1mmie/minecraft-ecsfargate-watchdog")
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ImageSource::registry("itzg/minecraft-server")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"source": "registry", "name": "itzg/minecraft-server"})
        );
    }
}
