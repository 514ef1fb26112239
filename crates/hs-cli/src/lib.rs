//! hypr-sso: Command-line interface for remote admin login
//!
//! Provides the `hypr-sso` CLI for exercising the login flow, inspecting
//! the provisioned admin account and diagnosing endpoint connectivity.

pub mod commands;
pub mod output;
