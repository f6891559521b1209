use std::sync::Arc;

use anyhow::Result;
use siteup_core::api::{AppConfig, ReportRendererPlugin, TaskRegistry};

use crate::client::{KubeClient, KubectlClient, PodmanCliClient, PodmanClient};
use crate::renderers::{JsonlRendererPlugin, TextRendererPlugin};

pub const DEFAULT_NAMESPACE: &str = "default";

pub fn build_renderer(format: &str, verbose: bool) -> Arc<dyn ReportRendererPlugin> {
    match format {
        "jsonl" => Arc::new(JsonlRendererPlugin::new(false)),
        _ => Arc::new(TextRendererPlugin::new(verbose)),
    }
}

pub fn build_kube_client(cfg: &AppConfig) -> Box<dyn KubeClient> {
    let namespace = cfg
        .namespace
        .clone()
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
    Box::new(KubectlClient::new(cfg.clients.kubectl_bin.clone(), namespace))
}

pub fn build_podman_client(cfg: &AppConfig) -> Box<dyn PodmanClient> {
    Box::new(PodmanCliClient::new(cfg.clients.podman_bin.clone()))
}

pub fn build_kube_registry(cfg: &AppConfig) -> Result<TaskRegistry<Box<dyn KubeClient>>> {
    let mut registry = TaskRegistry::new();
    crate::kube::register_tasks(&mut registry, &cfg.release()?);
    Ok(registry)
}

pub fn build_podman_registry(cfg: &AppConfig) -> Result<TaskRegistry<Box<dyn PodmanClient>>> {
    let mut registry = TaskRegistry::new();
    crate::podman::register_tasks(&mut registry, &cfg.release()?, &cfg.image_tag()?);
    Ok(registry)
}
