use std::path::Path;

use crate::auth::credentials;
use crate::auth::token::TokenManager;
use crate::config;
use crate::error::AppError;

/// Exercises the stored credentials end to end. Ignores any saved token so
/// a stale one cannot mask a broken password.
pub async fn login(dir: &Path) -> anyhow::Result<()> {
    let Some(credentials) = credentials::load(dir) else {
        return Err(AppError::CredentialsUnavailable.into());
    };
    println!("Logging in as {}...", credentials.email);

    let client = reqwest::Client::builder()
        .timeout(config::REQUEST_TIMEOUT)
        .build()?;
    let tokens = TokenManager::new(client, credentials, None);

    match tokens.bootstrap().await {
        Some(token) => {
            println!("Login OK, token {}...", mask(&token));
            Ok(())
        }
        None => Err(AppError::TokenUnavailable.into()),
    }
}

fn mask(token: &str) -> String {
    token.chars().take(8).collect()
}
