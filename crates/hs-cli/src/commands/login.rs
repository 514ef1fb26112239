//! Login command implementation
//!
//! Drives one login attempt through the same handler a host pipeline
//! would use, against the file-backed user store.

use std::net::IpAddr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use hs_auth::{HostOutcome, LoginHandler};
use hs_core::config::SsoConfig;
use hs_core::store::FileUserStore;
use hs_core::Credentials;

use crate::output::{format_user, print_error, print_success, print_warning};

/// Execute the login command
pub async fn login_command(
    config: &SsoConfig,
    credentials: Credentials,
    remote_addr: Option<IpAddr>,
) -> Result<()> {
    tracing::debug!(
        username = %credentials.username,
        store = %config.store_path.display(),
        "Running login command"
    );

    let store = FileUserStore::open(&config.store_path)
        .await
        .with_context(|| format!("Failed to open user store at {:?}", config.store_path))?;
    let handler = LoginHandler::from_config(config, Arc::new(store))
        .context("Failed to initialize login handler")?;

    if !handler.handles(&credentials.username) {
        print_warning(&format!(
            "'{}' is not the SSO admin login ('{}'); the host handles it",
            credentials.username,
            handler.admin_username()
        ));
        return Ok(());
    }

    match handler
        .authenticate(HostOutcome::Unresolved, &credentials)
        .await
    {
        HostOutcome::Resolved(user) => {
            handler.on_successful_login(&user.login, remote_addr);
            print_success(&format!("Logged in as {}", user.login));
            println!("{}", format_user(&user));
            Ok(())
        }
        HostOutcome::Failed(error) => {
            print_error(&error.message);
            bail!("login failed: {}", error.code)
        }
        HostOutcome::Unresolved => bail!("login was not resolved"),
    }
}
