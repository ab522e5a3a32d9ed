//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, ssh and
//! rsync transport, toolbox scripts, project inspection, and config loading.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod project_fs;
pub mod rsync;
pub mod scripts;
pub mod ssh;

#[cfg(test)]
pub(crate) mod test_support;
