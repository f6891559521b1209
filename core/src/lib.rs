pub mod api;
pub mod config;
pub mod error;
pub mod platform;
pub mod update;
pub mod util;
