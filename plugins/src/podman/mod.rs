//! Podman update tasks.

mod tasks;

use siteup_core::api::{ExecutionContext, Platform, RestartSweepTask, SiteVersion, TaskRegistry};

use crate::client::PodmanClient;
use crate::common::VersionStampTask;

pub use tasks::{
    ContainerImagesTask, NetworkStatusVolumeTask, FLOW_COLLECTOR_CONTAINER, IMAGE_REGISTRY,
    NETWORK_STATUS_VOLUME,
};

pub type PodmanContext = ExecutionContext<Box<dyn PodmanClient>>;

/// Register every Podman task for an update to `release`, moving containers
/// to `image_tag`.
pub fn register_tasks<C: PodmanClient + 'static>(
    registry: &mut TaskRegistry<C>,
    release: &SiteVersion,
    image_tag: &str,
) {
    registry
        .register(ContainerImagesTask::new(release.clone(), image_tag))
        .register(NetworkStatusVolumeTask)
        .register(VersionStampTask::new(release.clone(), [Platform::Podman]))
        .register(RestartSweepTask::new(release.clone(), [Platform::Podman]));
}
