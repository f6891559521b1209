use std::path::PathBuf;

use anyhow::{Context, Result};
use siteup_core::api::ComponentRestarter;
use tracing::{debug, warn};

use super::command::{CommandRunner, SystemCommandRunner};
use super::{PodmanClient, SiteClient};

pub const ROUTER_CONTAINER: &str = "skupper-router";
pub const CONTROLLER_CONTAINER: &str = "skupper-controller-podman";
pub const INTERNAL_VOLUME: &str = "skupper-internal";
pub const SITE_VERSION_FILE: &str = "site-version";

/// [`PodmanClient`] backed by the `podman` binary.
pub struct PodmanCliClient {
    bin: String,
    runner: Box<dyn CommandRunner>,
}

impl PodmanCliClient {
    pub fn new(bin: impl Into<String>) -> Self {
        Self::with_runner(bin, Box::new(SystemCommandRunner::new()))
    }

    pub fn with_runner(bin: impl Into<String>, runner: Box<dyn CommandRunner>) -> Self {
        Self {
            bin: bin.into(),
            runner,
        }
    }

    fn podman(&self, args: &[&str]) -> Result<String> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.runner.run(&self.bin, &args)
    }

    fn site_version_path(&self) -> Result<PathBuf> {
        let out = self.podman(&[
            "volume",
            "inspect",
            "--format",
            "{{.Mountpoint}}",
            INTERNAL_VOLUME,
        ])?;
        Ok(PathBuf::from(out.trim()).join(SITE_VERSION_FILE))
    }

    /// Puts the stopped original back under its own name after a failed clone.
    fn restore_container(&self, previous: &str, container: &str) {
        let restored = self
            .podman(&["rename", previous, container])
            .and_then(|_| self.podman(&["start", container]));
        if let Err(e) = restored {
            warn!(container, error = %format!("{e:#}"), "unable to restore container");
        }
    }
}

impl ComponentRestarter for PodmanCliClient {
    fn restart_router(&mut self) -> Result<()> {
        self.restart_container(ROUTER_CONTAINER)
    }

    fn restart_controller(&mut self) -> Result<()> {
        self.restart_container(CONTROLLER_CONTAINER)
    }
}

impl SiteClient for PodmanCliClient {
    fn site_version(&self) -> Result<String> {
        let path = self.site_version_path()?;
        let version = std::fs::read_to_string(&path)
            .with_context(|| format!("unable to read {}", path.display()))?;
        Ok(version.trim().to_string())
    }

    fn set_site_version(&mut self, version: &str) -> Result<()> {
        let path = self.site_version_path()?;
        std::fs::write(&path, format!("{version}\n"))
            .with_context(|| format!("unable to write {}", path.display()))
    }
}

impl PodmanClient for PodmanCliClient {
    fn container_image(&self, container: &str) -> Result<Option<String>> {
        let filter = format!("name=^{container}$");
        let out = self.podman(&[
            "ps",
            "--all",
            "--filter",
            &filter,
            "--format",
            "{{.Image}}",
        ])?;
        Ok(out
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string))
    }

    fn replace_container_image(&mut self, container: &str, image: &str) -> Result<()> {
        let previous = format!("{container}-previous");
        debug!(container, image, "replacing container image");

        self.podman(&["pull", image])?;
        self.podman(&["stop", container])?;
        self.podman(&["rename", container, &previous])?;
        if let Err(e) = self.podman(&["container", "clone", &previous, container, image]) {
            self.restore_container(&previous, container);
            return Err(e.context(format!("unable to recreate {container}")));
        }
        self.podman(&["rm", &previous])?;
        Ok(())
    }

    fn restart_container(&mut self, container: &str) -> Result<()> {
        self.podman(&["restart", container])?;
        Ok(())
    }

    fn volume_exists(&self, volume: &str) -> Result<bool> {
        let filter = format!("name=^{volume}$");
        let out = self.podman(&["volume", "ls", "--filter", &filter, "--format", "{{.Name}}"])?;
        Ok(out.lines().any(|l| l.trim() == volume))
    }

    fn create_volume(&mut self, volume: &str, labels: &[(&str, &str)]) -> Result<()> {
        let labels: Vec<String> = labels.iter().map(|(k, v)| format!("{k}={v}")).collect();
        let mut args = vec!["volume", "create"];
        for label in &labels {
            args.push("--label");
            args.push(label);
        }
        args.push(volume);
        self.podman(&args)?;
        Ok(())
    }
}
