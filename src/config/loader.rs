use super::normalizer::{normalize, RawDocument};
use super::schema::ValidatedConfig;
use crate::error::{OnDemandError, ParseError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

/// Reads the configuration document from disk and runs it through the schema.
///
/// Read failures, YAML syntax errors, and schema violations come back as
/// distinct [`OnDemandError`] variants so the caller can report each one
/// differently.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loader for `config.yml` in the current working directory.
    pub fn from_working_dir() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|source| OnDemandError::Io {
            path: PathBuf::from("."),
            source,
        })?;
        Ok(Self::new(cwd.join(DEFAULT_CONFIG_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and syntactically parse the document without validating it.
    pub fn load_document(&self) -> Result<RawDocument> {
        debug!(path = %self.path.display(), "Reading configuration document");
        let contents = fs::read_to_string(&self.path).map_err(|source| OnDemandError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(parse_document(&contents, &self.path)?)
    }

    /// Read, parse, and normalize the document.
    pub fn load(&self) -> Result<ValidatedConfig> {
        let raw = self.load_document()?;
        let config = normalize(&raw).map_err(|source| OnDemandError::Validation {
            path: self.path.clone(),
            source,
        })?;
        info!(
            path = %self.path.display(),
            server_name = %config.server_name(),
            "Loaded configuration"
        );
        Ok(config)
    }
}

/// Parse YAML text into a raw document. `path` only labels the error.
pub fn parse_document(contents: &str, path: &Path) -> std::result::Result<RawDocument, ParseError> {
    serde_yaml::from_str(contents).map_err(|err| ParseError::new(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "domainName: example.com\nserverEnvironment:\n  EULA: 'TRUE'\n",
        );

        let config = ConfigLoader::new(&path).load().unwrap();
        assert_eq!(config.domain_name, "example.com");
        assert_eq!(config.server_environment.get("EULA"), Some("TRUE"));
    }

    #[test]
    fn test_malformed_yaml_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "domainName: [unclosed\n");

        let err = ConfigLoader::new(&path).load().unwrap_err();
        match &err {
            OnDemandError::Parse(parse) => {
                assert_eq!(parse.path, path);
                assert!(!parse.message.is_empty());
            }
            other => panic!("expected parse error, got {other:?}"),
        }
        assert_eq!(err.code(), ErrorCode::CONFIG_PARSE_ERROR);
    }

    #[test]
    fn test_schema_problem_is_a_validation_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "serverEnvironment: {}\n");

        let err = ConfigLoader::new(&path).load().unwrap_err();
        assert!(matches!(err, OnDemandError::Validation { .. }));
        let violations = err.violations().unwrap();
        assert!(violations.iter().any(|v| v.path == "domainName"));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = ConfigLoader::new(dir.path().join("absent.yml"))
            .load()
            .unwrap_err();
        assert!(matches!(err, OnDemandError::Io { .. }));
        assert_eq!(err.code(), ErrorCode::CONFIG_NOT_FOUND);
    }

    #[test]
    fn test_load_document_does_not_validate() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "anything: goes\n");

        let raw = ConfigLoader::new(&path).load_document().unwrap();
        assert!(raw.get("anything").is_some());
    }

    #[test]
    fn test_parse_document_labels_error_with_path() {
        let err = parse_document("a: b: c", Path::new("custom.yml")).unwrap_err();
        assert_eq!(err.path, PathBuf::from("custom.yml"));
    }
}
