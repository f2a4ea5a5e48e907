//! CLI command handlers.

mod config;
mod download;

pub use config::show_config;
pub use download::run_download;

#[cfg(test)]
pub(crate) use download::{settings_from, Interrupt};
