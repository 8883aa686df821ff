// ABOUTME: GraphStore backed by the Dgraph HTTP API (/alter, /query, /mutate)
// ABOUTME: Maps HTTP and protocol failures onto StoreError and retries read-only queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use async_trait::async_trait;
use foodlab_core::constants::defaults;
use foodlab_core::StoreError;
use foodlab_ndb::http_client::shared_client;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CallContext, GraphStore, MutationResponse, QueryVariables};
use crate::config::store::StoreConfig;

const ACCESS_TOKEN_HEADER: &str = "X-Dgraph-AccessToken";
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct MutationData {
    #[serde(default)]
    uids: HashMap<String, String>,
}

/// Dgraph alpha reached over HTTP
#[derive(Debug, Clone)]
pub struct DgraphHttpStore {
    config: StoreConfig,
    client: Client,
}

impl DgraphHttpStore {
    /// Build a store on the process-wide pooled HTTP client
    ///
    /// Request timeouts come from `config` on every call; the connect timeout
    /// is whatever the shared pool was configured with.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self::with_client(config, shared_client())
    }

    /// Build a store around an existing HTTP client
    #[must_use]
    pub const fn with_client(config: StoreConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.url.trim_end_matches('/'))
    }

    /// Send one request and unwrap the `data` object of the response
    async fn send(
        &self,
        ctx: &CallContext,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Value, StoreError> {
        let timeout = ctx
            .remaining()
            .map_or(self.config.timeout(), |left| left.min(self.config.timeout()));
        let request = match &self.config.access_token {
            Some(token) => request.header(ACCESS_TOKEN_HEADER, token),
            None => request,
        };

        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| StoreError::unavailable(operation, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::unavailable(operation, e))?;

        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(StoreError::unavailable(operation, format!("HTTP {status}")));
        }

        let envelope: Envelope = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                return Err(StoreError::decode(format!("{operation} response"), e));
            }
            Err(_) => {
                let text: String = String::from_utf8_lossy(&body)
                    .chars()
                    .take(MAX_ERROR_BODY_CHARS)
                    .collect();
                return Err(StoreError::rejected(
                    operation,
                    format!("HTTP {status}: {text}"),
                ));
            }
        };

        if !envelope.errors.is_empty() {
            let messages: Vec<&str> = envelope
                .errors
                .iter()
                .map(|error| error.message.as_str())
                .collect();
            return Err(StoreError::rejected(operation, messages.join("; ")));
        }
        if !status.is_success() {
            return Err(StoreError::rejected(operation, format!("HTTP {status}")));
        }
        envelope
            .data
            .ok_or_else(|| StoreError::decode(format!("{operation} response"), "missing data"))
    }
}

#[async_trait]
impl GraphStore for DgraphHttpStore {
    async fn alter(&self, ctx: &CallContext, schema: &str) -> Result<(), StoreError> {
        ctx.run("alter", async {
            let request = self.client.post(self.endpoint("alter")).body(schema.to_owned());
            match self.send(ctx, "alter", request).await {
                Ok(_) => {
                    debug!("schema applied");
                    Ok(())
                }
                Err(StoreError::Rejected { message, .. }) => Err(StoreError::Schema { message }),
                Err(e) => Err(e),
            }
        })
        .await
    }

    async fn query(
        &self,
        ctx: &CallContext,
        query: &str,
        variables: &QueryVariables,
    ) -> Result<Vec<u8>, StoreError> {
        let body = json!({ "query": query, "variables": variables });
        ctx.run("query", async {
            let mut attempt = 0_u32;
            loop {
                let request = self.client.post(self.endpoint("query")).json(&body);
                match self.send(ctx, "query", request).await {
                    Err(e) if e.is_retryable() && attempt < self.config.query_retries => {
                        attempt += 1;
                        let backoff_ms = defaults::STORE_RETRY_BACKOFF_MS * 2_u64.pow(attempt - 1);
                        let max_retries = self.config.query_retries;
                        warn!("graph query failed ({e}) - retry {attempt}/{max_retries} after {backoff_ms}ms backoff");
                        tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    }
                    result => {
                        let data = result?;
                        return serde_json::to_vec(&data)
                            .map_err(|e| StoreError::decode("query data", e));
                    }
                }
            }
        })
        .await
    }

    async fn mutate(
        &self,
        ctx: &CallContext,
        set_json: &[u8],
        commit_now: bool,
    ) -> Result<MutationResponse, StoreError> {
        if !commit_now {
            return Err(StoreError::rejected(
                "mutate",
                "only immediately committed mutations are supported",
            ));
        }
        let set: Value = serde_json::from_slice(set_json)
            .map_err(|e| StoreError::rejected("mutate", format!("invalid set JSON: {e}")))?;
        let body = json!({ "set": set });

        ctx.run("mutate", async {
            let request = self
                .client
                .post(self.endpoint("mutate?commitNow=true"))
                .json(&body);
            let data = self.send(ctx, "mutate", request).await?;
            let data: MutationData = serde_json::from_value(data)
                .map_err(|e| StoreError::decode("mutation response", e))?;
            debug!(assigned = data.uids.len(), "mutation committed");
            Ok(MutationResponse { uids: data.uids })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(url: &str) -> DgraphHttpStore {
        DgraphHttpStore::new(StoreConfig {
            url: url.to_owned(),
            query_retries: 0,
            ..StoreConfig::default()
        })
    }

    #[test]
    fn test_endpoint_joins_paths() {
        assert_eq!(
            store("http://localhost:8080/").endpoint("alter"),
            "http://localhost:8080/alter"
        );
        assert_eq!(
            store("http://db:8080").endpoint("mutate?commitNow=true"),
            "http://db:8080/mutate?commitNow=true"
        );
    }

    #[test]
    fn test_envelope_decodes_errors() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"errors":[{"message":"bad predicate","extensions":{}}]}"#)
                .unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.errors[0].message, "bad predicate");
    }

    #[test]
    fn test_mutation_data_decodes_uids() {
        let data: MutationData =
            serde_json::from_value(json!({"code":"Success","uids":{"food_ab":"0x4e21"}})).unwrap();
        assert_eq!(data.uids["food_ab"], "0x4e21");
    }

    #[tokio::test]
    async fn test_commit_later_is_rejected() {
        let result = store("http://127.0.0.1:9")
            .mutate(&CallContext::background(), b"{}", false)
            .await;
        assert!(matches!(result, Err(StoreError::Rejected { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_store_is_unavailable() {
        let ctx = CallContext::with_timeout(Duration::from_secs(5));
        let result = store("http://127.0.0.1:9")
            .query(&ctx, "{ q(func: has(name)) { uid } }", &QueryVariables::new())
            .await;
        assert!(matches!(
            result,
            Err(StoreError::Unavailable { .. } | StoreError::DeadlineExceeded { .. })
        ));
    }
}
