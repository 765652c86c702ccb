use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::affiliate::TokenSource;
use crate::auth::credentials::Credentials;
use crate::config;

/// Owns the process-wide bearer token: obtains it via login, caches it, and
/// replaces it when a request comes back 401. All login failures surface as
/// `None`; the caller decides whether that is fatal.
pub struct TokenManager {
    client: reqwest::Client,
    credentials: Credentials,
    state: Mutex<Option<String>>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
}

impl TokenManager {
    pub fn new(client: reqwest::Client, credentials: Credentials, seed: Option<String>) -> Self {
        Self {
            client,
            credentials,
            state: Mutex::new(seed.filter(|t| !t.is_empty())),
        }
    }

    /// Make sure a token is cached before the batch starts: keep the seed if
    /// one was given, otherwise log in once.
    pub async fn bootstrap(&self) -> Option<String> {
        let mut state = self.state.lock().await;
        if state.is_none() {
            *state = self.login().await;
        }
        state.clone()
    }

    /// One login round trip against the auth endpoint. The backend checks
    /// the Origin/Referer pair against its front-end origin. Non-200,
    /// unparsable body or a missing `token` field all yield `None`.
    async fn login(&self) -> Option<String> {
        let resp = self
            .client
            .post(config::AUTH_URL)
            .json(&LoginRequest {
                email: &self.credentials.email,
                password: &self.credentials.password,
            })
            .header("Accept", "application/json")
            .header("Origin", config::FRONTEND_ORIGIN)
            .header("Referer", format!("{}/", config::FRONTEND_ORIGIN))
            .send()
            .await;

        let resp = match resp {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Login request failed: {e}");
                return None;
            }
        };

        if resp.status() != reqwest::StatusCode::OK {
            tracing::warn!("Login rejected: HTTP {}", resp.status());
            return None;
        }

        match resp.json::<LoginResponse>().await {
            Ok(body) => {
                let token = body.token.filter(|t| !t.is_empty());
                if token.is_none() {
                    tracing::warn!("Login response carried no token");
                }
                token
            }
            Err(e) => {
                tracing::warn!("Unparsable login response: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl TokenSource for TokenManager {
    async fn current(&self) -> Option<String> {
        let mut state = self.state.lock().await;
        if state.is_none() {
            *state = self.login().await;
        }
        state.clone()
    }

    async fn refresh(&self, stale: Option<&str>) -> Option<String> {
        let mut state = self.state.lock().await;
        // Single-flight: when the cache already moved past the token the
        // caller saw rejected, reuse it instead of logging in again.
        if state.is_some() && state.as_deref() != stale {
            return state.clone();
        }
        *state = self.login().await;
        state.clone()
    }
}

/// Attach the scheme keyword unless the token already carries it.
pub fn authorization_value(token: &str) -> String {
    if token.to_lowercase().starts_with("bearer ") {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affiliate::TokenSource;

    fn manager_with_seed(seed: Option<&str>) -> TokenManager {
        TokenManager::new(
            reqwest::Client::new(),
            Credentials {
                email: "u@h.co".into(),
                password: "pw".into(),
            },
            seed.map(String::from),
        )
    }

    #[test]
    fn test_authorization_value_adds_scheme() {
        assert_eq!(authorization_value("abc123"), "Bearer abc123");
    }

    #[test]
    fn test_authorization_value_respects_existing_scheme() {
        assert_eq!(authorization_value("Bearer abc"), "Bearer abc");
        assert_eq!(authorization_value("bearer abc"), "bearer abc");
        assert_eq!(authorization_value("BEARER abc"), "BEARER abc");
    }

    #[tokio::test]
    async fn test_current_returns_seed_without_login() {
        let manager = manager_with_seed(Some("seeded.jwt"));
        assert_eq!(manager.current().await.as_deref(), Some("seeded.jwt"));
    }

    #[tokio::test]
    async fn test_bootstrap_keeps_seed() {
        let manager = manager_with_seed(Some("seeded.jwt"));
        assert_eq!(manager.bootstrap().await.as_deref(), Some("seeded.jwt"));
    }

    #[tokio::test]
    async fn test_refresh_reuses_newer_cached_token() {
        // The cache holds a token the caller never saw; refresh must hand it
        // out without a login round trip.
        let manager = manager_with_seed(Some("fresh.jwt"));
        let got = manager.refresh(Some("stale.jwt")).await;
        assert_eq!(got.as_deref(), Some("fresh.jwt"));
    }

    #[test]
    fn test_empty_seed_is_ignored() {
        let manager = manager_with_seed(Some(""));
        assert!(manager.state.try_lock().unwrap().is_none());
    }
}
