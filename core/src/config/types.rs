use serde::{Deserialize, Serialize};

use crate::platform::Platform;
use crate::util::version::{SiteVersion, VersionError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Platform the site runs on; selects the task registry and client.
    #[serde(default)]
    pub platform: Platform,

    /// Namespace of the site (Kubernetes only).
    #[serde(default)]
    pub namespace: Option<String>,

    /// Release being installed. Defaults to this build's version.
    #[serde(default)]
    pub release_version: Option<String>,

    /// Image tag containers are moved to. Defaults to the release version.
    #[serde(default)]
    pub image_tag: Option<String>,

    #[serde(default)]
    pub clients: ClientConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            namespace: None,
            release_version: None,
            image_tag: None,
            clients: ClientConfig::default(),
            logging: LoggingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn release(&self) -> Result<SiteVersion, VersionError> {
        match self.release_version.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => SiteVersion::parse(v),
            _ => SiteVersion::parse(env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn image_tag(&self) -> Result<String, VersionError> {
        match self.image_tag.as_deref().map(str::trim) {
            Some(tag) if !tag.is_empty() => Ok(tag.to_string()),
            _ => self.release().map(|v| v.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_kubectl_bin")]
    pub kubectl_bin: String,

    #[serde(default = "default_podman_bin")]
    pub podman_bin: String,
}

fn default_kubectl_bin() -> String {
    "kubectl".to_string()
}

fn default_podman_bin() -> String {
    "podman".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            kubectl_bin: default_kubectl_bin(),
            podman_bin: default_podman_bin(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "warn" or "siteup_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// "text" or "jsonl".
    #[serde(default = "default_output_format")]
    pub format: String,

    #[serde(default)]
    pub verbose: bool,
}

fn default_output_format() -> String {
    "text".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            verbose: false,
        }
    }
}
