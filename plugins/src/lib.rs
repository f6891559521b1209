pub mod client;
pub mod common;
pub mod factory;
pub mod kube;
pub mod podman;
pub mod renderers;
