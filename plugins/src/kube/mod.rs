//! Kubernetes update tasks.

mod tasks;

use siteup_core::api::{ExecutionContext, Platform, RestartSweepTask, SiteVersion, TaskRegistry};

use crate::client::KubeClient;
use crate::common::VersionStampTask;

pub use tasks::{
    add_claims_port, enable_flow_collector, migrations, move_claims_port, rename_router_config,
    KubeMigration, CLAIMS_PORT, CLAIMS_PORT_NAME, CONTROLLER_SERVICE, INTERNAL_CONFIG_MAP,
    LEGACY_ROUTER_CONFIG_KEY, ROUTER_CONFIG_KEY, ROUTER_SERVICE,
};

pub type KubeContext = ExecutionContext<Box<dyn KubeClient>>;

/// Register every Kubernetes task for an update to `release`.
pub fn register_tasks<C: KubeClient + 'static>(
    registry: &mut TaskRegistry<C>,
    release: &SiteVersion,
) {
    for migration in migrations() {
        registry.register(migration);
    }
    registry
        .register(VersionStampTask::new(release.clone(), [Platform::Kubernetes]))
        .register(RestartSweepTask::new(release.clone(), [Platform::Kubernetes]));
}
