use anyhow::Context;
use siteup_core::api::{
    less_recent_than, ExecutionContext, Platform, Priority, SiteVersion, TaskOutcome, TaskVersion,
    UpdateTask,
};
use tracing::debug;

use crate::client::{KubeClient, ServicePort, SITE_CONFIG_MAP};

pub const INTERNAL_CONFIG_MAP: &str = "skupper-internal";
pub const LEGACY_ROUTER_CONFIG_KEY: &str = "qdrouterd.json";
pub const ROUTER_CONFIG_KEY: &str = "skrouterd.json";
pub const CONTROLLER_SERVICE: &str = "skupper";
pub const ROUTER_SERVICE: &str = "skupper-router";
pub const CLAIMS_PORT_NAME: &str = "claims";
pub const CLAIMS_PORT: u16 = 8081;

const KUBERNETES: &[Platform] = &[Platform::Kubernetes];

type Apply<C> = fn(&mut ExecutionContext<C>) -> TaskOutcome;

/// A version-gated Kubernetes migration. Pending while the site is older
/// than the version that introduced the change.
pub struct KubeMigration<C> {
    version: SiteVersion,
    priority: Priority,
    info: &'static str,
    apply: Apply<C>,
}

impl<C> KubeMigration<C> {
    pub fn new(version: SiteVersion, priority: Priority, info: &'static str, apply: Apply<C>) -> Self {
        Self {
            version,
            priority,
            info,
            apply,
        }
    }
}

impl<C: KubeClient> UpdateTask<C> for KubeMigration<C> {
    fn version(&self) -> TaskVersion {
        TaskVersion::Specific(self.version.clone())
    }

    fn info(&self) -> &str {
        self.info
    }

    fn applies_to(&self, site_version: &str) -> bool {
        less_recent_than(site_version, &self.version.to_string())
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn platforms(&self) -> &[Platform] {
        KUBERNETES
    }

    fn run(&self, ctx: &mut ExecutionContext<C>) -> TaskOutcome {
        (self.apply)(ctx)
    }
}

/// Every Kubernetes migration, in release order.
pub fn migrations<C: KubeClient>() -> Vec<KubeMigration<C>> {
    vec![
        KubeMigration::new(
            SiteVersion::new(0, 5, 0),
            Priority::High,
            "Rename router configuration key",
            rename_router_config,
        ),
        KubeMigration::new(
            SiteVersion::new(0, 7, 0),
            Priority::High,
            "Expose claims port on the controller service",
            add_claims_port,
        ),
        KubeMigration::new(
            SiteVersion::new(1, 3, 0),
            Priority::Common,
            "Enable flow collector for sites with the console enabled",
            enable_flow_collector,
        ),
        KubeMigration::new(
            SiteVersion::new(1, 5, 0),
            Priority::High,
            "Move claims port to the router service",
            move_claims_port,
        ),
    ]
}

/// The router config was stored under the legacy key before 0.5.0. Every
/// later step assumes the new key, so any client failure stops the run.
pub fn rename_router_config<C: KubeClient>(ctx: &mut ExecutionContext<C>) -> TaskOutcome {
    let client = ctx.client_mut();
    let legacy = match client
        .config_value(INTERNAL_CONFIG_MAP, LEGACY_ROUTER_CONFIG_KEY)
        .context("unable to read router configuration")
    {
        Ok(value) => value,
        Err(e) => return TaskOutcome::fatal(e),
    };

    let Some(config) = legacy else {
        return TaskOutcome::ok().with_warning(format!(
            "{LEGACY_ROUTER_CONFIG_KEY} not found in {INTERNAL_CONFIG_MAP}, nothing to rename"
        ));
    };

    let renamed = client
        .set_config_value(INTERNAL_CONFIG_MAP, ROUTER_CONFIG_KEY, &config)
        .and_then(|_| client.remove_config_key(INTERNAL_CONFIG_MAP, LEGACY_ROUTER_CONFIG_KEY))
        .context("unable to rename router configuration");
    if let Err(e) = renamed {
        return TaskOutcome::fatal(e);
    }

    ctx.request_router_restart();
    TaskOutcome::ok().with_change(format!(
        "{INTERNAL_CONFIG_MAP}: {LEGACY_ROUTER_CONFIG_KEY} renamed to {ROUTER_CONFIG_KEY}"
    ))
}

pub fn add_claims_port<C: KubeClient>(ctx: &mut ExecutionContext<C>) -> TaskOutcome {
    let client = ctx.client_mut();
    let ports = match client.service_ports(CONTROLLER_SERVICE) {
        Ok(ports) => ports,
        Err(e) => return TaskOutcome::failed(e.context("unable to read controller service")),
    };

    if ports.iter().any(|p| p.name == CLAIMS_PORT_NAME) {
        return TaskOutcome::ok().with_warning(format!(
            "service {CONTROLLER_SERVICE} already exposes {CLAIMS_PORT_NAME}"
        ));
    }

    let port = ServicePort::new(CLAIMS_PORT_NAME, CLAIMS_PORT);
    if let Err(e) = client.add_service_port(CONTROLLER_SERVICE, &port) {
        return TaskOutcome::failed(e.context("unable to add claims port"));
    }

    ctx.request_controller_restart();
    TaskOutcome::ok().with_change(format!(
        "service {CONTROLLER_SERVICE}: added port {CLAIMS_PORT_NAME}/{CLAIMS_PORT}"
    ))
}

const CONSOLE_KEY: &str = "enable-console";
const FLOW_COLLECTOR_KEY: &str = "flow-collector";

/// Sites with the console enabled get the flow collector turned on, unless
/// the key was set explicitly.
pub fn enable_flow_collector<C: KubeClient>(ctx: &mut ExecutionContext<C>) -> TaskOutcome {
    let client = ctx.client_mut();
    let read = |key: &str| {
        client
            .config_value(SITE_CONFIG_MAP, key)
            .with_context(|| format!("unable to read {key} from {SITE_CONFIG_MAP}"))
    };

    let console = match read(CONSOLE_KEY) {
        Ok(v) => v.is_some_and(|v| v.trim().eq_ignore_ascii_case("true")),
        Err(e) => return TaskOutcome::failed(e),
    };
    let collector = match read(FLOW_COLLECTOR_KEY) {
        Ok(v) => v,
        Err(e) => return TaskOutcome::failed(e),
    };

    if !console || collector.is_some() {
        debug!(console, configured = collector.is_some(), "flow collector left as is");
        return TaskOutcome::ok();
    }

    if let Err(e) = client
        .set_config_value(SITE_CONFIG_MAP, FLOW_COLLECTOR_KEY, "true")
        .context("unable to enable flow collector")
    {
        return TaskOutcome::failed(e);
    }

    ctx.request_controller_restart();
    TaskOutcome::ok().with_change(format!("{SITE_CONFIG_MAP}: {FLOW_COLLECTOR_KEY} set to true"))
}

/// Claims are served by the router from 1.5.0 on.
pub fn move_claims_port<C: KubeClient>(ctx: &mut ExecutionContext<C>) -> TaskOutcome {
    let client = ctx.client_mut();
    let mut outcome = TaskOutcome::ok();

    let router_ports = match client.service_ports(ROUTER_SERVICE) {
        Ok(ports) => ports,
        Err(e) => return TaskOutcome::failed(e.context("unable to read router service")),
    };
    let controller_ports = match client.service_ports(CONTROLLER_SERVICE) {
        Ok(ports) => ports,
        Err(e) => return TaskOutcome::failed(e.context("unable to read controller service")),
    };

    let claims = controller_ports
        .into_iter()
        .find(|p| p.name == CLAIMS_PORT_NAME);

    if router_ports.iter().any(|p| p.name == CLAIMS_PORT_NAME) {
        outcome.warnings.push(format!(
            "service {ROUTER_SERVICE} already exposes {CLAIMS_PORT_NAME}"
        ));
    } else {
        let port = claims
            .clone()
            .unwrap_or_else(|| ServicePort::new(CLAIMS_PORT_NAME, CLAIMS_PORT));
        if let Err(e) = client.add_service_port(ROUTER_SERVICE, &port) {
            return TaskOutcome::failed(e.context("unable to add claims port to router"));
        }
        outcome.record_change(format!(
            "service {ROUTER_SERVICE}: added port {}/{}",
            port.name, port.port
        ));
    }

    if claims.is_some() {
        match client.remove_service_port(CONTROLLER_SERVICE, CLAIMS_PORT_NAME) {
            Ok(()) => outcome.record_change(format!(
                "service {CONTROLLER_SERVICE}: removed port {CLAIMS_PORT_NAME}"
            )),
            Err(e) => outcome.record_error(e.context("unable to remove claims port from controller")),
        }
    }

    if outcome.changed() {
        ctx.request_router_restart();
        ctx.request_controller_restart();
    }
    outcome
}
