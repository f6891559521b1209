use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Deployment target family a site runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Kubernetes,
    Podman,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Kubernetes, Platform::Podman];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Kubernetes => "kubernetes",
            Platform::Podman => "podman",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kubernetes" | "kube" | "k8s" => Ok(Platform::Kubernetes),
            "podman" => Ok(Platform::Podman),
            other => Err(format!("unsupported platform: {other}")),
        }
    }
}
