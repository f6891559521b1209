//! Platform clients consumed by update tasks.
//!
//! The orchestrator never talks to a platform itself; tasks reach the site
//! through the client carried by the execution context.

mod command;
mod kubectl;
mod podman;

#[cfg(test)]
pub(crate) mod fake;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use siteup_core::api::ComponentRestarter;

pub use command::{CommandRunner, SystemCommandRunner};
pub use kubectl::{
    KubectlClient, CONTROLLER_DEPLOYMENT, ROUTER_DEPLOYMENT, SITE_CONFIG_MAP,
    SITE_VERSION_ANNOTATION,
};
pub use podman::{PodmanCliClient, CONTROLLER_CONTAINER, ROUTER_CONTAINER};

/// Operations every platform offers on an installed site.
pub trait SiteClient: ComponentRestarter {
    /// Version recorded on the installed site.
    fn site_version(&self) -> Result<String>;
    fn set_site_version(&mut self, version: &str) -> Result<()>;
}

impl<T: SiteClient + ?Sized> SiteClient for Box<T> {
    fn site_version(&self) -> Result<String> {
        (**self).site_version()
    }

    fn set_site_version(&mut self, version: &str) -> Result<()> {
        (**self).set_site_version(version)
    }
}

/// `targetPort` of a service port: a number or the name of a container port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetPort {
    Number(u16),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    #[serde(default)]
    pub name: String,
    pub port: u16,
    /// Kubernetes defaults an omitted target to `port`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_port: Option<TargetPort>,
}

impl ServicePort {
    pub fn new(name: &str, port: u16) -> Self {
        Self {
            name: name.to_string(),
            port,
            target_port: Some(TargetPort::Number(port)),
        }
    }
}

pub trait KubeClient: SiteClient + Send {
    fn namespace(&self) -> &str;

    /// `None` when the config map exists but has no such key.
    fn config_value(&self, config_map: &str, key: &str) -> Result<Option<String>>;
    fn set_config_value(&mut self, config_map: &str, key: &str, value: &str) -> Result<()>;
    fn remove_config_key(&mut self, config_map: &str, key: &str) -> Result<()>;

    fn service_ports(&self, service: &str) -> Result<Vec<ServicePort>>;
    fn add_service_port(&mut self, service: &str, port: &ServicePort) -> Result<()>;
    fn remove_service_port(&mut self, service: &str, name: &str) -> Result<()>;
}

pub trait PodmanClient: SiteClient + Send {
    /// Image of a container, `None` when the container does not exist.
    fn container_image(&self, container: &str) -> Result<Option<String>>;

    /// Recreate `container` from `image`, keeping its configuration. The new
    /// container is left stopped.
    fn replace_container_image(&mut self, container: &str, image: &str) -> Result<()>;
    fn restart_container(&mut self, container: &str) -> Result<()>;

    fn volume_exists(&self, volume: &str) -> Result<bool>;
    fn create_volume(&mut self, volume: &str, labels: &[(&str, &str)]) -> Result<()>;
}

impl<T: KubeClient + ?Sized> KubeClient for Box<T> {
    fn namespace(&self) -> &str {
        (**self).namespace()
    }

    fn config_value(&self, config_map: &str, key: &str) -> Result<Option<String>> {
        (**self).config_value(config_map, key)
    }

    fn set_config_value(&mut self, config_map: &str, key: &str, value: &str) -> Result<()> {
        (**self).set_config_value(config_map, key, value)
    }

    fn remove_config_key(&mut self, config_map: &str, key: &str) -> Result<()> {
        (**self).remove_config_key(config_map, key)
    }

    fn service_ports(&self, service: &str) -> Result<Vec<ServicePort>> {
        (**self).service_ports(service)
    }

    fn add_service_port(&mut self, service: &str, port: &ServicePort) -> Result<()> {
        (**self).add_service_port(service, port)
    }

    fn remove_service_port(&mut self, service: &str, name: &str) -> Result<()> {
        (**self).remove_service_port(service, name)
    }
}

impl<T: PodmanClient + ?Sized> PodmanClient for Box<T> {
    fn container_image(&self, container: &str) -> Result<Option<String>> {
        (**self).container_image(container)
    }

    fn replace_container_image(&mut self, container: &str, image: &str) -> Result<()> {
        (**self).replace_container_image(container, image)
    }

    fn restart_container(&mut self, container: &str) -> Result<()> {
        (**self).restart_container(container)
    }

    fn volume_exists(&self, volume: &str) -> Result<bool> {
        (**self).volume_exists(volume)
    }

    fn create_volume(&mut self, volume: &str, labels: &[(&str, &str)]) -> Result<()> {
        (**self).create_volume(volume, labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn service_ports_accept_named_and_missing_targets() {
        let ports: Vec<ServicePort> = serde_json::from_str(
            r#"[
                {"name": "amqps", "port": 5671, "targetPort": "amqps", "protocol": "TCP"},
                {"name": "api", "port": 8080, "targetPort": 8080},
                {"port": 8081}
            ]"#,
        )
        .unwrap();

        assert_eq!(ports[0].target_port, Some(TargetPort::Name("amqps".to_string())));
        assert_eq!(ports[1].target_port, Some(TargetPort::Number(8080)));
        assert_eq!(ports[2].name, "");
        assert_eq!(ports[2].target_port, None);
    }

    #[test]
    fn new_port_targets_itself() {
        let value = serde_json::to_value(ServicePort::new("claims", 8081)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "claims", "port": 8081, "targetPort": 8081})
        );
    }
}
