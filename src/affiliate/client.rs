use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::token::authorization_value;
use crate::config;

use super::{
    Classification, DocType, LookupTransport, OutcomeRecord, OutcomeStatus, RawResponse,
    TokenSource, classify,
};

// ---------------------------------------------------------------------------
// HTTP transport
// ---------------------------------------------------------------------------

/// Production transport: one GET per lookup against the affiliate endpoint,
/// identifier and document-type code interpolated as path segments.
pub struct HttpLookup {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLookup {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: config::BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl LookupTransport for HttpLookup {
    async fn lookup(
        &self,
        identifier: &str,
        doc_type_code: &str,
        token: Option<&str>,
    ) -> anyhow::Result<RawResponse> {
        let url = format!("{}/{}/{}", self.base_url, identifier, doc_type_code);
        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/json, text/plain, */*");
        if let Some(token) = token {
            request = request.header("Authorization", authorization_value(token));
        }

        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).ok();
        Ok(RawResponse { status, body })
    }
}

// ---------------------------------------------------------------------------
// Query executor
// ---------------------------------------------------------------------------

/// Runs one lookup per identifier and turns the response into an
/// `OutcomeRecord`. A 401 costs exactly one token refresh and one retried
/// request, never more.
pub struct QueryExecutor {
    transport: Arc<dyn LookupTransport>,
    tokens: Arc<dyn TokenSource>,
}

impl QueryExecutor {
    pub fn new(transport: Arc<dyn LookupTransport>, tokens: Arc<dyn TokenSource>) -> Self {
        Self { transport, tokens }
    }

    pub async fn query(&self, identifier: &str, doc: &DocType) -> OutcomeRecord {
        let token = self.tokens.current().await;
        let resp = match self
            .transport
            .lookup(identifier, &doc.code, token.as_deref())
            .await
        {
            Ok(resp) => resp,
            Err(err) => return network_failure(identifier, doc, &err),
        };

        match classify(resp.status, resp.body.as_ref()) {
            Classification::Unauthorized { message } => {
                self.retry_unauthorized(identifier, doc, token.as_deref(), resp.status, message)
                    .await
            }
            other => outcome(identifier, doc, resp.status, other),
        }
    }

    /// A 401 means the cached token expired, not that the identifier is
    /// unauthorized for good: refresh once and replay the identical request.
    /// A second 401 (or a failed refresh/retry) settles as NO_AUTORIZADO
    /// with the message the first 401 carried.
    async fn retry_unauthorized(
        &self,
        identifier: &str,
        doc: &DocType,
        used_token: Option<&str>,
        original_status: u16,
        original_message: String,
    ) -> OutcomeRecord {
        let Some(fresh) = self.tokens.refresh(used_token).await else {
            tracing::warn!("401 for {identifier} and no refreshed token available");
            return outcome(
                identifier,
                doc,
                original_status,
                Classification::Unauthorized {
                    message: original_message,
                },
            );
        };

        tracing::debug!("Token refreshed after 401, retrying {identifier}");
        let retry = match self
            .transport
            .lookup(identifier, &doc.code, Some(&fresh))
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                tracing::warn!("Retry after token refresh failed: {err}");
                return outcome(
                    identifier,
                    doc,
                    original_status,
                    Classification::Unauthorized {
                        message: original_message,
                    },
                );
            }
        };

        match classify(retry.status, retry.body.as_ref()) {
            Classification::Unauthorized { .. } => outcome(
                identifier,
                doc,
                retry.status,
                Classification::Unauthorized {
                    message: original_message,
                },
            ),
            other => outcome(identifier, doc, retry.status, other),
        }
    }
}

fn outcome(
    identifier: &str,
    doc: &DocType,
    status: u16,
    classification: Classification,
) -> OutcomeRecord {
    let (status_kind, affiliate_state_name, provider_name, message) = match classification {
        Classification::NotRegistered { message } => {
            (OutcomeStatus::NoRegistrado, None, None, message)
        }
        Classification::Registered {
            affiliate_state_name,
            provider_name,
        } => (
            OutcomeStatus::Registrado,
            affiliate_state_name,
            provider_name,
            "Afiliado encontrado".to_string(),
        ),
        Classification::Unauthorized { message } => {
            (OutcomeStatus::NoAutorizado, None, None, message)
        }
        Classification::HttpError => (OutcomeStatus::ErrorHttp, None, None, format!("HTTP {status}")),
    };

    OutcomeRecord {
        identifier: identifier.to_string(),
        document_type_code: doc.code.clone(),
        document_type_name: doc.name.clone(),
        status: status_kind,
        affiliate_state_name,
        provider_name,
        message,
        http_status: status.to_string(),
    }
}

fn network_failure(identifier: &str, doc: &DocType, err: &anyhow::Error) -> OutcomeRecord {
    OutcomeRecord {
        identifier: identifier.to_string(),
        document_type_code: doc.code.clone(),
        document_type_name: doc.name.clone(),
        status: OutcomeStatus::ErrorRequest,
        affiliate_state_name: None,
        provider_name: None,
        message: format!("Error de red: {err}"),
        http_status: String::new(),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
