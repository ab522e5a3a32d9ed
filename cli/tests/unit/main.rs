//! Unit tests for siteship CLI
//!
//! These tests use recording mocks of the ports and temp directories. They
//! run fast and never touch a remote host.

mod classify_service;
mod deploy_site_service;
mod domain_binding;
mod mocks;
mod server_report;
