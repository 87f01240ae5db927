//! Request plumbing shared by the store and the identity provider.

use crate::config::RemoteConfig;
use helpdesk_core::StoreError;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Instant;

/// `Accept` value asking PostgREST for exactly one row as a JSON object
pub const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// `Prefer` value asking PostgREST to echo written rows
pub const RETURN_REPRESENTATION: &str = "return=representation";

/// reqwest client bound to one remote service
#[derive(Clone, Debug)]
pub(crate) struct RemoteClient {
    client: Client,
    config: RemoteConfig,
}

impl RemoteClient {
    pub fn new(client: Client, config: RemoteConfig) -> Self {
        Self { client, config }
    }

    /// Table request carrying the public key and the caller's token
    pub fn table(&self, method: Method, table: &str, access_token: &str) -> RequestBuilder {
        self.client
            .request(method, self.config.rest_url(table))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
    }

    /// Auth API request carrying only the public key
    pub fn auth(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.config.auth_url(path))
            .header("apikey", &self.config.anon_key)
    }

    /// Send and decode a JSON body
    ///
    /// `target` labels metrics and names the entity in `NotFound` errors;
    /// `id` fills in the missing row's ID for single-object requests.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        target: &'static str,
        id: Option<&str>,
        request: RequestBuilder,
    ) -> Result<T, StoreError> {
        let response = self.send(target, id, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    /// Send and discard the body
    pub async fn execute(
        &self,
        target: &'static str,
        id: Option<&str>,
        request: RequestBuilder,
    ) -> Result<(), StoreError> {
        self.send(target, id, request).await.map(drop)
    }

    async fn send(
        &self,
        target: &'static str,
        id: Option<&str>,
        request: RequestBuilder,
    ) -> Result<Response, StoreError> {
        let start = Instant::now();
        let result = request.send().await;
        metrics::histogram!("remote.request.duration_seconds", "target" => target)
            .record(start.elapsed().as_secs_f64());

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                metrics::counter!("remote.requests.total", "target" => target, "outcome" => "transport")
                    .increment(1);
                tracing::warn!(target_table = target, error = %e, "Remote request failed");
                return Err(StoreError::Transport(e.to_string()));
            },
        };

        let status = response.status();
        if status.is_success() {
            metrics::counter!("remote.requests.total", "target" => target, "outcome" => "ok")
                .increment(1);
            return Ok(response);
        }

        metrics::counter!("remote.requests.total", "target" => target, "outcome" => "rejected")
            .increment(1);
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            target_table = target,
            status = status.as_u16(),
            "Remote store rejected request"
        );
        Err(classify(status, target, id, &body))
    }
}

/// Map a non-success status to a [`StoreError`]
pub(crate) fn classify(
    status: StatusCode,
    target: &'static str,
    id: Option<&str>,
    body: &str,
) -> StoreError {
    match status {
        StatusCode::UNAUTHORIZED => StoreError::Unauthorized,
        // Single-object request that matched no row
        StatusCode::NOT_ACCEPTABLE | StatusCode::NOT_FOUND => {
            StoreError::not_found(target, id.unwrap_or("?"))
        },
        status => StoreError::Rejected {
            status: status.as_u16(),
            message: error_message(body),
        },
    }
}

/// PostgREST and GoTrue put the human-readable text in different fields
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| value.get(*key)?.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}
