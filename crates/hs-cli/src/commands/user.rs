//! User inspection command

use anyhow::{Context, Result};

use hs_core::config::SsoConfig;
use hs_core::store::FileUserStore;
use hs_core::traits::UserStore;

use crate::output::{format_user, print_warning};

/// Show a user record from the local store
pub async fn user_show_command(config: &SsoConfig, login: Option<&str>) -> Result<()> {
    let login = login.unwrap_or(config.admin_username.as_str());
    let store = FileUserStore::open(&config.store_path)
        .await
        .with_context(|| format!("Failed to open user store at {:?}", config.store_path))?;

    match store.find_by_login(login).await? {
        Some(user) => println!("{}", format_user(&user)),
        None => print_warning(&format!("User '{}' does not exist yet", login)),
    }

    Ok(())
}
