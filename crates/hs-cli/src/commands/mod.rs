//! CLI command implementations

mod config;
mod diagnose;
mod login;
mod user;

pub use config::{config_init, config_path, config_show};
pub use diagnose::{diagnose_command, tail_lines};
pub use login::login_command;
pub use user::user_show_command;
