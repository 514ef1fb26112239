//! Diagnose command implementation
//!
//! Operational check of an installation: configuration, admin account,
//! a live round-trip to the endpoint and the tail of the debug log.
//! Not part of the login path.

use std::io;
use std::path::Path;

use anyhow::Result;

use hs_auth::remote::interpret;
use hs_auth::RemoteAuthenticator;
use hs_core::config::SsoConfig;
use hs_core::error::VerifyError;
use hs_core::store::FileUserStore;
use hs_core::traits::UserStore;
use hs_core::Credentials;

use crate::output::{
    format_timestamp, print_error, print_heading, print_info, print_success, print_warning,
};

/// Execute the diagnose command
pub async fn diagnose_command(
    config: &SsoConfig,
    config_path: &Path,
    test_credentials: Option<Credentials>,
    log_lines: usize,
) -> Result<()> {
    println!("HYPR SSO Diagnostics");

    check_config(config, config_path);
    check_admin_user(config).await;
    check_connectivity(config, test_credentials).await;
    check_debug_log(config, log_lines);

    Ok(())
}

fn check_config(config: &SsoConfig, config_path: &Path) {
    print_heading("Configuration");

    if config_path.exists() {
        print_success(&format!("Config file found at {}", config_path.display()));
    } else {
        print_warning(&format!(
            "No config file at {} - using defaults",
            config_path.display()
        ));
    }

    println!("Admin login: {}", config.admin_username);
    println!("Site URL: {}", config.site_url);
    println!("Endpoint: {}", config.remote.endpoint);
    println!("Timeout: {}s", config.remote.timeout.as_secs());
    println!(
        "Transport credentials: {}",
        match &config.remote.credentials {
            Some(creds) => format!("{} / {}", creds.username, creds.password),
            None => "none".to_string(),
        }
    );

    match config.validate() {
        Ok(()) => print_success("Configuration is valid"),
        Err(e) => print_error(&format!("Configuration is invalid: {}", e)),
    }
}

async fn check_admin_user(config: &SsoConfig) {
    print_heading("Admin User");

    let store = match FileUserStore::open(&config.store_path).await {
        Ok(store) => store,
        Err(e) => {
            print_error(&format!(
                "Cannot open user store at {}: {}",
                config.store_path.display(),
                e
            ));
            return;
        }
    };

    match store.find_by_login(&config.admin_username).await {
        Ok(Some(user)) => {
            let provenance = user.provenance();
            print_success(&format!(
                "User '{}' exists (ID: {})",
                user.login, user.id
            ));
            println!("User role: {}", user.role);
            println!("SSO user: {}", provenance.sso_user);
            if let Some(created) = provenance.created_at {
                println!("SSO created: {}", format_timestamp(created));
            }
            if user.is_partially_provisioned() {
                print_warning("Setup was interrupted; the next successful login finishes it");
            } else if !user.is_admin() {
                print_warning("User is not an administrator");
            }
        }
        Ok(None) => print_warning(&format!(
            "User '{}' does not exist yet",
            config.admin_username
        )),
        Err(e) => print_error(&format!("User lookup failed: {}", e)),
    }
}

async fn check_connectivity(config: &SsoConfig, test_credentials: Option<Credentials>) {
    print_heading("Server Connectivity Test");

    let Some(credentials) = test_credentials else {
        print_warning("Skipped - pass --test-password to run a live round-trip");
        return;
    };

    let authenticator = match RemoteAuthenticator::new(&config.remote, config.site_url.clone()) {
        Ok(authenticator) => authenticator,
        Err(e) => {
            print_error(&format!("Cannot build client: {}", e));
            return;
        }
    };

    let reply = match authenticator.send(&credentials).await {
        Ok(reply) => reply,
        Err(e) => {
            print_error(&e.to_string());
            return;
        }
    };

    println!("HTTP status: {}", reply.status);
    println!("Server response: {}", reply.body);

    match interpret(&reply) {
        Ok(_) => print_success("Server authentication successful"),
        Err(e @ VerifyError::Rejected { .. }) => print_error(&format!("Server {}", e)),
        Err(e) => print_error(&format!("Invalid server response format: {}", e)),
    }
}

fn check_debug_log(config: &SsoConfig, log_lines: usize) {
    print_heading("Debug Information");

    if !config.debug_log {
        print_warning("Debug logging is disabled");
        print_info("To enable it, add this line to the config file:");
        println!("debug_log = true");
        return;
    }

    print_success("Debug logging is enabled");
    let path = &config.log_file;
    let size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(_) => {
            print_warning(&format!("Debug log file not found at {}", path.display()));
            return;
        }
    };

    println!("Debug log: {} ({} bytes)", path.display(), size);
    match tail_lines(path, log_lines) {
        Ok(lines) if lines.is_empty() => print_info("Debug log is empty"),
        Ok(lines) => {
            println!("Last {} debug log entries:", lines.len());
            for line in lines {
                println!("  {}", line);
            }
        }
        Err(e) => print_error(&format!("Cannot read debug log: {}", e)),
    }
}

/// Read the last `n` lines of a file
pub fn tail_lines(path: &Path, n: usize) -> io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let mut lines: Vec<String> = content.lines().rev().take(n).map(str::to_string).collect();
    lines.reverse();
    Ok(lines)
}
