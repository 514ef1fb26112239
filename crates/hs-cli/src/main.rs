//! hypr-sso CLI
//!
//! Single binary for hypr-sso operations:
//! - Login (run one attempt through the remote login flow)
//! - Diagnostics (config, admin account, endpoint round-trip, debug log)
//! - User and configuration inspection

use std::fs::OpenOptions;
use std::io::BufRead;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use hs_core::config::{self, SsoConfig};
use hs_core::{Credentials, Secret};
use hypr_sso::commands;
use hypr_sso::output::print_warning;

/// Crates captured in the debug log file regardless of verbosity
const DEBUG_LOG_FILTER: &str = "hs_core=debug,hs_auth=debug,hypr_sso=debug";

#[derive(Parser)]
#[command(name = "hypr-sso")]
#[command(author, version, about = "Remote admin login delegation")]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one login attempt through the remote verification flow
    Login {
        /// Login name (defaults to the configured admin login)
        #[arg(short, long)]
        username: Option<String>,
        /// Password (prefer the environment variable or --password-stdin)
        #[arg(long, env = "HYPR_SSO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Read the password from the first line of stdin
        #[arg(long, conflicts_with = "password")]
        password_stdin: bool,
        /// Client address recorded in the login audit line
        #[arg(long)]
        remote_addr: Option<IpAddr>,
    },

    /// Check configuration, admin account, endpoint and debug log
    Diagnose {
        /// Login used for the live round-trip (defaults to the admin login)
        #[arg(long)]
        test_user: Option<String>,
        /// Password used for the live round-trip; the test is skipped without it
        #[arg(long, env = "HYPR_SSO_TEST_PASSWORD", hide_env_values = true)]
        test_password: Option<String>,
        /// Number of debug log lines to show
        #[arg(short = 'n', long, default_value_t = 10)]
        lines: usize,
    },

    /// Inspect local user records
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Show a user record
    Show {
        /// Login name (defaults to the configured admin login)
        login: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_sso_config(cli.config.as_ref())?;

    // Setup logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    init_logging(log_level, &config);

    match cli.command {
        Commands::Login {
            username,
            password,
            password_stdin,
            remote_addr,
        } => {
            let username = username.unwrap_or_else(|| config.admin_username.clone());
            let password = match (password, password_stdin) {
                (Some(password), _) => password,
                (None, true) => read_password_stdin()?,
                (None, false) => {
                    bail!("no password given; use --password-stdin or HYPR_SSO_PASSWORD")
                }
            };
            commands::login_command(
                &config,
                Credentials::new(username, Secret::new(password)),
                remote_addr,
            )
            .await
        }

        Commands::Diagnose {
            test_user,
            test_password,
            lines,
        } => {
            let config_path = cli
                .config
                .clone()
                .unwrap_or_else(config::default_config_path);
            let test_credentials = test_password.map(|password| {
                Credentials::new(
                    test_user.unwrap_or_else(|| config.admin_username.clone()),
                    Secret::new(password),
                )
            });
            commands::diagnose_command(&config, &config_path, test_credentials, lines).await
        }

        Commands::User { action } => match action {
            UserAction::Show { login } => {
                commands::user_show_command(&config, login.as_deref()).await
            }
        },

        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_show(cli.config.as_ref(), &config),
            ConfigAction::Init { force } => commands::config_init(cli.config.as_ref(), force),
            ConfigAction::Path => commands::config_path(cli.config.as_ref()),
        },
    }
}

/// Load the config file, falling back to defaults when none exists
fn load_sso_config(path: Option<&PathBuf>) -> Result<SsoConfig> {
    if let Some(path) = path {
        if path.exists() {
            return config::load_config(path)
                .with_context(|| format!("Failed to load config from {:?}", path));
        }
        return Ok(SsoConfig::default());
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        config::load_config(&default_path)
            .with_context(|| format!("Failed to load config from {:?}", default_path))
    } else {
        Ok(SsoConfig::default())
    }
}

/// Install the tracing subscriber, adding a plain-text file copy when
/// debug logging is enabled
fn init_logging(log_level: &str, config: &SsoConfig) {
    let file_layer = if config.debug_log {
        match open_log_file(&config.log_file) {
            Ok(file) => Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(EnvFilter::new(DEBUG_LOG_FILTER)),
            ),
            Err(e) => {
                print_warning(&format!(
                    "Cannot open debug log {}: {}",
                    config.log_file.display(),
                    e
                ));
                None
            }
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_filter(EnvFilter::new(
                    std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
                )),
        )
        .with(file_layer)
        .init();
}

fn open_log_file(path: &Path) -> std::io::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn read_password_stdin() -> Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    let password = line.trim_end_matches(&['\r', '\n'][..]).to_string();
    if password.is_empty() {
        bail!("empty password on stdin");
    }
    Ok(password)
}
