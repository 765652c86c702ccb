use std::path::Path;

use regex::Regex;

use crate::config;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Resolve credentials once, before any query runs. The structured
/// HORUS_EMAIL/HORUS_PASSWORD pair wins; otherwise fall back to tolerant
/// extraction from the legacy free-text blob. `None` is a hard stop for the
/// caller, since no queries can run without credentials.
pub fn load(dir: &Path) -> Option<Credentials> {
    if let Some(creds) = from_env() {
        return Some(creds);
    }
    let contents = std::fs::read_to_string(dir.join(config::AUTH_FILE)).ok()?;
    extract_credentials(&contents)
}

fn from_env() -> Option<Credentials> {
    let email = std::env::var("HORUS_EMAIL")
        .ok()
        .filter(|v| !v.trim().is_empty())?;
    let password = std::env::var("HORUS_PASSWORD")
        .ok()
        .filter(|v| !v.trim().is_empty())?;
    Some(Credentials {
        email: email.trim().to_string(),
        password: password.trim().to_string(),
    })
}

/// Best-effort extraction from the credential blob: a quoted email-shaped
/// value (falling back to a `usuario:` line) and a quoted `password:` value
/// (falling back to a `contraseña:` line). Missing either field yields
/// `None`, never an error.
pub fn extract_credentials(contents: &str) -> Option<Credentials> {
    let email_quoted =
        Regex::new(r#"["']([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})["']"#).unwrap();
    let email_line = Regex::new(r"(?i)usuario\s*:\s*([^\r\n]+)").unwrap();
    let password_quoted = Regex::new(r#"(?i)password\s*:\s*["']([^"']+)["']"#).unwrap();
    let password_line = Regex::new(r"(?i)contraseña\s*:\s*([^\r\n]+)").unwrap();

    let email = capture(&email_quoted, contents).or_else(|| capture(&email_line, contents))?;
    let password =
        capture(&password_quoted, contents).or_else(|| capture(&password_line, contents))?;
    Some(Credentials { email, password })
}

/// Token left behind in the credential blob by a previous session, used to
/// seed the cache before the first login. The file wins over the
/// HORUS_TOKEN environment variable.
pub fn seed_token(dir: &Path) -> Option<String> {
    std::fs::read_to_string(dir.join(config::AUTH_FILE))
        .ok()
        .and_then(|contents| extract_token(&contents))
        .or_else(|| std::env::var("HORUS_TOKEN").ok().filter(|t| !t.is_empty()))
}

pub fn extract_token(contents: &str) -> Option<String> {
    let quoted_key = Regex::new(r#""token"\s*:\s*"([^"]+)""#).unwrap();
    let bare_key = Regex::new(r#"token\s*:\s*"([^"]+)""#).unwrap();
    capture(&quoted_key, contents).or_else(|| capture(&bare_key, contents))
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
}
