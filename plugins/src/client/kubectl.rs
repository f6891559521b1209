use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};
use siteup_core::api::ComponentRestarter;

use super::command::{CommandRunner, SystemCommandRunner};
use super::{KubeClient, ServicePort, SiteClient};

pub const ROUTER_DEPLOYMENT: &str = "skupper-router";
pub const CONTROLLER_DEPLOYMENT: &str = "skupper-service-controller";
pub const SITE_CONFIG_MAP: &str = "skupper-site";
pub const SITE_VERSION_ANNOTATION: &str = "skupper.io/site-version";

/// [`KubeClient`] backed by the `kubectl` binary.
pub struct KubectlClient {
    bin: String,
    namespace: String,
    runner: Box<dyn CommandRunner>,
}

impl KubectlClient {
    pub fn new(bin: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::with_runner(bin, namespace, Box::new(SystemCommandRunner::new()))
    }

    pub fn with_runner(
        bin: impl Into<String>,
        namespace: impl Into<String>,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            bin: bin.into(),
            namespace: namespace.into(),
            runner,
        }
    }

    fn kubectl(&self, args: &[&str]) -> Result<String> {
        let mut full = vec!["--namespace".to_string(), self.namespace.clone()];
        full.extend(args.iter().map(|a| a.to_string()));
        self.runner.run(&self.bin, &full)
    }

    fn get_json(&self, kind: &str, name: &str) -> Result<Value> {
        let out = self.kubectl(&["get", kind, name, "--output", "json"])?;
        serde_json::from_str(&out).with_context(|| format!("invalid json for {kind}/{name}"))
    }

    fn patch(&self, kind: &str, name: &str, patch_type: &str, patch: &Value) -> Result<()> {
        let body = patch.to_string();
        self.kubectl(&["patch", kind, name, "--type", patch_type, "--patch", &body])?;
        Ok(())
    }

    fn rollout_restart(&self, deployment: &str) -> Result<()> {
        let target = format!("deployment/{deployment}");
        self.kubectl(&["rollout", "restart", &target])?;
        Ok(())
    }
}

/// Escape a map key for use in a JSON pointer (RFC 6901).
fn pointer_escape(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

impl ComponentRestarter for KubectlClient {
    fn restart_router(&mut self) -> Result<()> {
        self.rollout_restart(ROUTER_DEPLOYMENT)
    }

    fn restart_controller(&mut self) -> Result<()> {
        self.rollout_restart(CONTROLLER_DEPLOYMENT)
    }
}

impl SiteClient for KubectlClient {
    fn site_version(&self) -> Result<String> {
        let cm = self.get_json("configmap", SITE_CONFIG_MAP)?;
        cm.pointer(&format!(
            "/metadata/annotations/{}",
            pointer_escape(SITE_VERSION_ANNOTATION)
        ))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("site version not recorded on configmap/{SITE_CONFIG_MAP}"))
    }

    fn set_site_version(&mut self, version: &str) -> Result<()> {
        let annotation = format!("{SITE_VERSION_ANNOTATION}={version}");
        self.kubectl(&["annotate", "configmap", SITE_CONFIG_MAP, &annotation, "--overwrite"])?;
        Ok(())
    }
}

impl KubeClient for KubectlClient {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn config_value(&self, config_map: &str, key: &str) -> Result<Option<String>> {
        let cm = self.get_json("configmap", config_map)?;
        Ok(cm
            .get("data")
            .and_then(|d| d.get(key))
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn set_config_value(&mut self, config_map: &str, key: &str, value: &str) -> Result<()> {
        self.patch(
            "configmap",
            config_map,
            "merge",
            &json!({ "data": { key: value } }),
        )
    }

    fn remove_config_key(&mut self, config_map: &str, key: &str) -> Result<()> {
        let path = format!("/data/{}", pointer_escape(key));
        self.patch(
            "configmap",
            config_map,
            "json",
            &json!([{ "op": "remove", "path": path }]),
        )
    }

    fn service_ports(&self, service: &str) -> Result<Vec<ServicePort>> {
        let svc = self.get_json("service", service)?;
        let ports = svc
            .pointer("/spec/ports")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        serde_json::from_value(ports).with_context(|| format!("invalid ports on service/{service}"))
    }

    fn add_service_port(&mut self, service: &str, port: &ServicePort) -> Result<()> {
        self.patch(
            "service",
            service,
            "json",
            &json!([{ "op": "add", "path": "/spec/ports/-", "value": port }]),
        )
    }

    fn remove_service_port(&mut self, service: &str, name: &str) -> Result<()> {
        let ports = self.service_ports(service)?;
        let idx = ports
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| anyhow!("port {name} not found on service/{service}"))?;
        self.patch(
            "service",
            service,
            "json",
            &json!([{ "op": "remove", "path": format!("/spec/ports/{idx}") }]),
        )
    }
}
