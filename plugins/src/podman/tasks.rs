use anyhow::anyhow;
use siteup_core::api::{
    less_recent_than, ExecutionContext, Platform, Priority, SiteVersion, TaskOutcome, TaskVersion,
    UpdateTask,
};
use tracing::{debug, info};

use crate::client::{PodmanClient, CONTROLLER_CONTAINER, ROUTER_CONTAINER};

pub const IMAGE_REGISTRY: &str = "quay.io/skupper";
pub const FLOW_COLLECTOR_CONTAINER: &str = "flow-collector";
pub const NETWORK_STATUS_VOLUME: &str = "skupper-network-status";

const PODMAN: &[Platform] = &[Platform::Podman];

/// Site containers and the image repository each one runs.
const COMPONENTS: &[(&str, &str)] = &[
    (ROUTER_CONTAINER, "skupper-router"),
    (CONTROLLER_CONTAINER, "controller-podman"),
    (FLOW_COLLECTOR_CONTAINER, "flow-collector"),
];

/// Moves every site container to the images of the release being installed.
pub struct ContainerImagesTask {
    release: SiteVersion,
    image_tag: String,
}

impl ContainerImagesTask {
    pub fn new(release: SiteVersion, image_tag: impl Into<String>) -> Self {
        Self {
            release,
            image_tag: image_tag.into(),
        }
    }

    pub fn image_for(&self, repository: &str) -> String {
        format!("{IMAGE_REGISTRY}/{repository}:{}", self.image_tag)
    }
}

impl<C: PodmanClient> UpdateTask<C> for ContainerImagesTask {
    fn version(&self) -> TaskVersion {
        TaskVersion::Wildcard
    }

    fn info(&self) -> &str {
        "Update container images"
    }

    fn applies_to(&self, site_version: &str) -> bool {
        less_recent_than(site_version, &self.release.to_string())
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn platforms(&self) -> &[Platform] {
        PODMAN
    }

    fn run(&self, ctx: &mut ExecutionContext<C>) -> TaskOutcome {
        let mut outcome = TaskOutcome::ok();
        let mut failures = Vec::new();

        for (container, repository) in COMPONENTS {
            let image = self.image_for(repository);
            let current = match ctx.client().container_image(container) {
                Ok(Some(current)) => current,
                Ok(None) => {
                    outcome.warnings.push(format!("container {container} not found"));
                    continue;
                }
                Err(e) => {
                    failures.push(format!("unable to inspect {container}: {e:#}"));
                    continue;
                }
            };

            if current == image {
                debug!(container, image = %image, "container image already current");
                continue;
            }

            info!(container, from = %current, to = %image, "replacing container image");
            if let Err(e) = ctx.client_mut().replace_container_image(container, &image) {
                failures.push(format!("unable to update {container}: {e:#}"));
                continue;
            }
            outcome.record_change(format!("{container}: {current} -> {image}"));

            match *container {
                ROUTER_CONTAINER => ctx.request_router_restart(),
                CONTROLLER_CONTAINER => ctx.request_controller_restart(),
                _ => {
                    if let Err(e) = ctx.client_mut().restart_container(container) {
                        failures.push(format!("unable to restart {container}: {e:#}"));
                    }
                }
            }
        }

        if !failures.is_empty() {
            outcome.record_error(anyhow!(failures.join("; ")));
        }
        outcome
    }
}

/// Volume the controller publishes network status through, added in 1.5.4.
#[derive(Debug, Default)]
pub struct NetworkStatusVolumeTask;

impl NetworkStatusVolumeTask {
    fn introduced_in() -> SiteVersion {
        SiteVersion::new(1, 5, 4)
    }
}

impl<C: PodmanClient> UpdateTask<C> for NetworkStatusVolumeTask {
    fn version(&self) -> TaskVersion {
        TaskVersion::Specific(Self::introduced_in())
    }

    fn info(&self) -> &str {
        "Create network status volume"
    }

    fn applies_to(&self, site_version: &str) -> bool {
        less_recent_than(site_version, &Self::introduced_in().to_string())
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn platforms(&self) -> &[Platform] {
        PODMAN
    }

    fn run(&self, ctx: &mut ExecutionContext<C>) -> TaskOutcome {
        let client = ctx.client_mut();
        match client.volume_exists(NETWORK_STATUS_VOLUME) {
            Ok(true) => {
                return TaskOutcome::ok()
                    .with_warning(format!("volume {NETWORK_STATUS_VOLUME} already exists"));
            }
            Ok(false) => {}
            Err(e) => return TaskOutcome::failed(e.context("unable to list volumes")),
        }

        if let Err(e) = client.create_volume(NETWORK_STATUS_VOLUME, &[("application", "skupper")]) {
            return TaskOutcome::failed(e.context("unable to create network status volume"));
        }

        ctx.request_controller_restart();
        TaskOutcome::ok().with_change(format!("volume {NETWORK_STATUS_VOLUME} created"))
    }
}
