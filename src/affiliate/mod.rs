pub mod client;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Closed set of normalized lookup outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    Registrado,
    NoRegistrado,
    NoAutorizado,
    ErrorRequest,
    ErrorHttp,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Registrado => "REGISTRADO",
            OutcomeStatus::NoRegistrado => "NO_REGISTRADO",
            OutcomeStatus::NoAutorizado => "NO_AUTORIZADO",
            OutcomeStatus::ErrorRequest => "ERROR_REQUEST",
            OutcomeStatus::ErrorHttp => "ERROR_HTTP",
        }
    }

    /// True for the outcomes an operator has to triage (NO_REGISTRADO is a
    /// normal negative answer, not an error).
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            OutcomeStatus::NoAutorizado | OutcomeStatus::ErrorRequest | OutcomeStatus::ErrorHttp
        )
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output row; exactly one is produced per (identifier, category) pair.
/// `http_status` is empty only when the request never got an HTTP response.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeRecord {
    pub identifier: String,
    pub document_type_code: String,
    pub document_type_name: String,
    pub status: OutcomeStatus,
    pub affiliate_state_name: Option<String>,
    pub provider_name: Option<String>,
    pub message: String,
    pub http_status: String,
}

/// Document type as resolved for a category: backend code plus a display
/// name (the registry's spelling when the code is mapped, the category's
/// own name otherwise).
#[derive(Debug, Clone)]
pub struct DocType {
    pub code: String,
    pub name: String,
}

/// What came back from the service: HTTP status plus a leniently parsed
/// body. Non-JSON bodies become `None`.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Option<Value>,
}

#[async_trait]
pub trait LookupTransport: Send + Sync {
    /// One GET against the lookup endpoint. `Err` means the request never
    /// produced an HTTP response (connect failure, timeout).
    async fn lookup(
        &self,
        identifier: &str,
        doc_type_code: &str,
        token: Option<&str>,
    ) -> anyhow::Result<RawResponse>;
}

#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Cached token, logging in first when none is cached.
    async fn current(&self) -> Option<String>;

    /// Replace `stale` with a fresh token. Implementations must be
    /// single-flight: when the cache already holds a token different from
    /// `stale`, that one is returned without another login.
    async fn refresh(&self, stale: Option<&str>) -> Option<String>;
}

/// Classification of one HTTP response, before any retry handling.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    NotRegistered {
        message: String,
    },
    Registered {
        affiliate_state_name: Option<String>,
        provider_name: Option<String>,
    },
    Unauthorized {
        message: String,
    },
    HttpError,
}

/// Ordered classification rules; the first match wins.
///
/// An `error` field in the body means "not registered" no matter the HTTP
/// status. The backend reports the business-level miss that way even on a
/// 200, and it also short-circuits a 401 before any retry.
pub fn classify(status: u16, body: Option<&Value>) -> Classification {
    if status == 404 {
        let message = body_error(body)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "No encontrado (HTTP 404)".to_string());
        return Classification::NotRegistered { message };
    }

    if let Some(message) = body_error(body) {
        return Classification::NotRegistered { message };
    }

    if status == 200 {
        return Classification::Registered {
            affiliate_state_name: nested_name(body, &["estado_afiliado", "estadoAfiliado"]),
            provider_name: nested_name(body, &["ips", "prestador"]),
        };
    }

    if status == 401 {
        let message = body_message(body)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "No autorizado".to_string());
        return Classification::Unauthorized { message };
    }

    Classification::HttpError
}

fn body_error(body: Option<&Value>) -> Option<String> {
    body?.as_object()?.get("error").map(json_string)
}

fn body_message(body: Option<&Value>) -> Option<String> {
    body?.as_object()?.get("message").map(json_string)
}

/// `nombre` of the first of `keys` whose value is a JSON object. The
/// backend spells the nested objects two ways depending on the endpoint
/// revision.
fn nested_name(body: Option<&Value>, keys: &[&str]) -> Option<String> {
    let obj = body?.as_object()?;
    keys.iter()
        .find_map(|key| obj.get(*key)?.as_object()?.get("nombre").map(json_string))
        .filter(|name| !name.is_empty())
}

fn json_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
