//! siteup-cli library, exposed for unit tests.

pub mod app;
pub mod commands;
