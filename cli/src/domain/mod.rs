//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod classify;
pub mod config;
pub mod deploy;
pub mod error;
pub mod health;
pub mod remote_output;
pub mod templates;
pub mod validate;

pub use classify::{ProjectSnapshot, classify_snapshot};
pub use config::{SiteshipConfig, ToolboxPaths, ToolboxScript};
pub use deploy::{AppName, DeployConfig, DeployLog, HostRef, Timeouts};
pub use error::{ConfigError, DeployError, ValidationError};
