//! Generator configuration (`umlforge.yaml`)
//!
//! Every field is optional. Values come from the YAML file first, then
//! environment variables, then whatever the caller (CLI flags) overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "umlforge.yaml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Scratch root for per-request working directories and archives
    pub temp_root: PathBuf,
    /// Java base package; the project segment is appended
    pub base_package: String,
    pub spring_boot_version: String,
    pub java_version: String,
    /// Server URL the generated mobile services call
    pub api_base_url: String,
    /// Port of the HTTP service
    pub server_port: u16,
    pub default_project_name: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            temp_root: std::env::temp_dir().join("umlforge"),
            base_package: "com.example".to_string(),
            spring_boot_version: "2.7.5".to_string(),
            java_version: "11".to_string(),
            api_base_url: "http://localhost:8080".to_string(),
            server_port: 8080,
            default_project_name: "demo".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit path must exist. Without one, `umlforge.yaml` in the
    /// working directory is used when present, defaults otherwise.
    /// Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };
        config.with_env_overrides()
    }

    /// Apply `UMLFORGE_TEMP_DIR`, `UMLFORGE_API_BASE_URL` and `PORT`
    pub fn with_env_overrides(mut self) -> Result<Self, String> {
        if let Ok(dir) = std::env::var("UMLFORGE_TEMP_DIR") {
            self.temp_root = PathBuf::from(dir);
        }
        if let Ok(url) = std::env::var("UMLFORGE_API_BASE_URL") {
            self.api_base_url = url;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.server_port = port
                .parse()
                .map_err(|_| format!("PORT must be a port number, got '{}'", port))?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_package.trim().is_empty() {
            return Err("base_package cannot be empty".to_string());
        }
        let valid_package = self.base_package.split('.').all(|segment| {
            segment
                .chars()
                .next()
                .map(|c| c.is_ascii_alphabetic())
                .unwrap_or(false)
                && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
        if !valid_package {
            return Err(format!("base_package '{}' is not a valid Java package", self.base_package));
        }
        if self.temp_root.as_os_str().is_empty() {
            return Err("temp_root cannot be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: GeneratorConfig = serde_yaml::from_str(
            "base_package: org.acme\njava_version: \"17\"\n",
        )
        .unwrap();
        assert_eq!(config.base_package, "org.acme");
        assert_eq!(config.java_version, "17");
        assert_eq!(config.spring_boot_version, "2.7.5");
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("umlforge.yaml");
        std::fs::write(&path, "temp_root: /var/tmp/gen\napi_base_url: http://10.0.2.2:8080\n").unwrap();

        let config = GeneratorConfig::from_file(&path).unwrap();
        assert_eq!(config.temp_root, PathBuf::from("/var/tmp/gen"));
        assert_eq!(config.api_base_url, "http://10.0.2.2:8080");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = GeneratorConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(err.contains("Failed to read"));
    }

    #[test]
    fn test_validate_rejects_bad_package() {
        let config = GeneratorConfig {
            base_package: "com.1example".to_string(),
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(GeneratorConfig::default().validate().is_ok());
    }
}
