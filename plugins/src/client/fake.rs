//! In-memory platform clients for task tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, bail, Result};
use siteup_core::api::{ComponentRestarter, ExecutionContext};

use super::{KubeClient, PodmanClient, ServicePort, SiteClient};

#[derive(Debug, Default)]
pub struct KubeState {
    pub site_version: String,
    pub config_maps: BTreeMap<String, BTreeMap<String, String>>,
    pub services: BTreeMap<String, Vec<ServicePort>>,
    pub router_restarts: usize,
    pub controller_restarts: usize,
    /// Operations (by method name) that fail.
    pub failing: HashSet<&'static str>,
}

/// Cloning shares the state, so a test can inspect it after the context is gone.
#[derive(Clone, Default)]
pub struct FakeKube {
    state: Arc<Mutex<KubeState>>,
}

impl FakeKube {
    pub fn at(site_version: &str) -> Self {
        let fake = Self::default();
        fake.state().site_version = site_version.to_string();
        fake
    }

    pub fn with_config(self, config_map: &str, key: &str, value: &str) -> Self {
        self.state()
            .config_maps
            .entry(config_map.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_config_map(self, config_map: &str) -> Self {
        self.state()
            .config_maps
            .entry(config_map.to_string())
            .or_default();
        self
    }

    pub fn with_ports(self, service: &str, ports: &[(&str, u16)]) -> Self {
        self.state().services.insert(
            service.to_string(),
            ports.iter().map(|(n, p)| ServicePort::new(n, *p)).collect(),
        );
        self
    }

    pub fn failing(self, operation: &'static str) -> Self {
        self.state().failing.insert(operation);
        self
    }

    pub fn state(&self) -> MutexGuard<'_, KubeState> {
        self.state.lock().unwrap()
    }

    pub fn context(&self) -> ExecutionContext<Self> {
        ExecutionContext::new(self.clone())
    }

    fn check(&self, operation: &'static str) -> Result<()> {
        if self.state().failing.contains(operation) {
            bail!("{operation} refused by the api server");
        }
        Ok(())
    }

    pub fn port_names(&self, service: &str) -> Vec<String> {
        self.state()
            .services
            .get(service)
            .map(|ports| ports.iter().map(|p| p.name.clone()).collect())
            .unwrap_or_default()
    }
}

impl ComponentRestarter for FakeKube {
    fn restart_router(&mut self) -> Result<()> {
        self.check("restart_router")?;
        self.state().router_restarts += 1;
        Ok(())
    }

    fn restart_controller(&mut self) -> Result<()> {
        self.check("restart_controller")?;
        self.state().controller_restarts += 1;
        Ok(())
    }
}

impl SiteClient for FakeKube {
    fn site_version(&self) -> Result<String> {
        Ok(self.state().site_version.clone())
    }

    fn set_site_version(&mut self, version: &str) -> Result<()> {
        self.check("set_site_version")?;
        self.state().site_version = version.to_string();
        Ok(())
    }
}

impl KubeClient for FakeKube {
    fn namespace(&self) -> &str {
        "test"
    }

    fn config_value(&self, config_map: &str, key: &str) -> Result<Option<String>> {
        self.check("config_value")?;
        let state = self.state();
        let data = state
            .config_maps
            .get(config_map)
            .ok_or_else(|| anyhow!("configmaps \"{config_map}\" not found"))?;
        Ok(data.get(key).cloned())
    }

    fn set_config_value(&mut self, config_map: &str, key: &str, value: &str) -> Result<()> {
        self.check("set_config_value")?;
        let mut state = self.state();
        let data = state
            .config_maps
            .get_mut(config_map)
            .ok_or_else(|| anyhow!("configmaps \"{config_map}\" not found"))?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_config_key(&mut self, config_map: &str, key: &str) -> Result<()> {
        self.check("remove_config_key")?;
        let mut state = self.state();
        state
            .config_maps
            .get_mut(config_map)
            .and_then(|data| data.remove(key))
            .map(|_| ())
            .ok_or_else(|| anyhow!("key {key} not found in configmap {config_map}"))
    }

    fn service_ports(&self, service: &str) -> Result<Vec<ServicePort>> {
        self.check("service_ports")?;
        self.state()
            .services
            .get(service)
            .cloned()
            .ok_or_else(|| anyhow!("services \"{service}\" not found"))
    }

    fn add_service_port(&mut self, service: &str, port: &ServicePort) -> Result<()> {
        self.check("add_service_port")?;
        let mut state = self.state();
        let ports = state
            .services
            .get_mut(service)
            .ok_or_else(|| anyhow!("services \"{service}\" not found"))?;
        ports.push(port.clone());
        Ok(())
    }

    fn remove_service_port(&mut self, service: &str, name: &str) -> Result<()> {
        self.check("remove_service_port")?;
        let mut state = self.state();
        let ports = state
            .services
            .get_mut(service)
            .ok_or_else(|| anyhow!("services \"{service}\" not found"))?;
        ports.retain(|p| p.name != name);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct PodmanState {
    pub site_version: String,
    pub containers: BTreeMap<String, String>,
    pub restarted: Vec<String>,
    pub volumes: BTreeMap<String, Vec<(String, String)>>,
    pub failing: HashSet<&'static str>,
}

#[derive(Clone, Default)]
pub struct FakePodman {
    state: Arc<Mutex<PodmanState>>,
}

impl FakePodman {
    pub fn at(site_version: &str) -> Self {
        let fake = Self::default();
        fake.state().site_version = site_version.to_string();
        fake
    }

    pub fn with_container(self, name: &str, image: &str) -> Self {
        self.state()
            .containers
            .insert(name.to_string(), image.to_string());
        self
    }

    pub fn with_volume(self, name: &str) -> Self {
        self.state().volumes.insert(name.to_string(), Vec::new());
        self
    }

    pub fn failing(self, operation: &'static str) -> Self {
        self.state().failing.insert(operation);
        self
    }

    pub fn state(&self) -> MutexGuard<'_, PodmanState> {
        self.state.lock().unwrap()
    }

    pub fn context(&self) -> ExecutionContext<Self> {
        ExecutionContext::new(self.clone())
    }

    fn check(&self, operation: &'static str) -> Result<()> {
        if self.state().failing.contains(operation) {
            bail!("{operation} failed");
        }
        Ok(())
    }
}

impl ComponentRestarter for FakePodman {
    fn restart_router(&mut self) -> Result<()> {
        self.restart_container(super::podman::ROUTER_CONTAINER)
    }

    fn restart_controller(&mut self) -> Result<()> {
        self.restart_container(super::podman::CONTROLLER_CONTAINER)
    }
}

impl SiteClient for FakePodman {
    fn site_version(&self) -> Result<String> {
        Ok(self.state().site_version.clone())
    }

    fn set_site_version(&mut self, version: &str) -> Result<()> {
        self.check("set_site_version")?;
        self.state().site_version = version.to_string();
        Ok(())
    }
}

impl PodmanClient for FakePodman {
    fn container_image(&self, container: &str) -> Result<Option<String>> {
        self.check("container_image")?;
        Ok(self.state().containers.get(container).cloned())
    }

    fn replace_container_image(&mut self, container: &str, image: &str) -> Result<()> {
        self.check("replace_container_image")?;
        let mut state = self.state();
        let current = state
            .containers
            .get_mut(container)
            .ok_or_else(|| anyhow!("no container with name or ID \"{container}\""))?;
        *current = image.to_string();
        Ok(())
    }

    fn restart_container(&mut self, container: &str) -> Result<()> {
        self.check("restart_container")?;
        self.state().restarted.push(container.to_string());
        Ok(())
    }

    fn volume_exists(&self, volume: &str) -> Result<bool> {
        self.check("volume_exists")?;
        Ok(self.state().volumes.contains_key(volume))
    }

    fn create_volume(&mut self, volume: &str, labels: &[(&str, &str)]) -> Result<()> {
        self.check("create_volume")?;
        let labels = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.state().volumes.insert(volume.to_string(), labels);
        Ok(())
    }
}
