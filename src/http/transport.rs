//! The one HTTP primitive every protocol operation goes through.

use super::common::{Endpoint, construct_endpoint_url};
use super::error_helpers::{check_response, classify_reqwest_error, format_json_parse_error};
use super::loud_wire;
use super::sse_parser::parse_sse_stream;
use crate::config::Config;
use crate::errors::LiveHintError;
use crate::types::ChatMessage;
use futures_util::TryStreamExt;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Client as ReqwestClient, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Everything needed to issue one request.
#[derive(Debug, Clone)]
pub struct RequestSpec<'a> {
    pub endpoint: Endpoint<'a>,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
    /// Per-request bound; `None` falls back to the client-wide timeout.
    pub timeout: Option<Duration>,
}

impl<'a> RequestSpec<'a> {
    pub fn new(endpoint: Endpoint<'a>) -> Self {
        Self {
            endpoint,
            query: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: Vec<(&'static str, String)>) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Authenticated HTTP access to the configured service.
#[derive(Debug, Clone)]
pub struct Transport {
    http_client: ReqwestClient,
    config: Config,
}

impl Transport {
    pub const fn new(http_client: ReqwestClient, config: Config) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Sends the request and checks the status. Returns the response and the
    /// wire-debug request id.
    async fn send(
        &self,
        spec: &RequestSpec<'_>,
        label: &str,
        accept: &'static str,
    ) -> Result<(Response, usize), LiveHintError> {
        let url = construct_endpoint_url(self.config.base_url(), &spec.endpoint);

        let request_id = loud_wire::next_request_id();
        loud_wire::log_request(request_id, label, &url, &spec.query, spec.body.as_ref());
        debug!("{label}: sending request");

        let mut request = self
            .http_client
            .request(spec.endpoint.method(), &url)
            .bearer_auth(self.config.bearer_token())
            .header(ACCEPT, HeaderValue::from_static(accept));

        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }
        if let Some(timeout) = spec.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_reqwest_error(e, label, spec.timeout))?;

        loud_wire::log_response_status(request_id, response.status().as_u16());

        let response = check_response(response, label).await?;
        Ok((response, request_id))
    }

    /// Issues the request and parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Any transport failure, a non-success status, or a body that is not
    /// valid JSON.
    pub async fn send_json(&self, spec: RequestSpec<'_>) -> Result<Value, LiveHintError> {
        let label = spec.endpoint.label();
        let (response, request_id) = self.send(&spec, &label, "application/json").await?;

        let text = response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(e, &label, spec.timeout))?;

        let value: Value = serde_json::from_str(&text).map_err(|e| {
            let error = LiveHintError::Request(format!(
                "{label}: {}",
                format_json_parse_error(&text, &e)
            ));
            tracing::warn!("{label} failed: {error}");
            error
        })?;

        loud_wire::log_response_body(request_id, &value);
        Ok(value)
    }

    /// Issues the request and only checks that it succeeded; the body is
    /// dropped unread.
    ///
    /// # Errors
    ///
    /// Any transport failure or a non-success status.
    pub async fn send_discarding_body(&self, spec: RequestSpec<'_>) -> Result<(), LiveHintError> {
        let label = spec.endpoint.label();
        let (response, _) = self.send(&spec, &label, "application/json").await?;
        drop(response);
        Ok(())
    }

    /// Issues the request and decodes the body as an SSE stream of chat
    /// messages, collected in arrival order.
    ///
    /// Either the whole sequence is returned or an error; a failure halfway
    /// through the body discards what was decoded so far.
    ///
    /// # Errors
    ///
    /// Any transport failure, including a timeout while reading the body,
    /// or a non-success status.
    pub async fn send_stream(
        &self,
        spec: RequestSpec<'_>,
    ) -> Result<Vec<ChatMessage>, LiveHintError> {
        let label = spec.endpoint.label();
        let (response, request_id) = self.send(&spec, &label, "text/event-stream").await?;

        let messages: Vec<ChatMessage> =
            parse_sse_stream(response.bytes_stream(), &label, request_id)
                .try_collect()
                .await?;

        debug!("{label}: decoded {} streamed messages", messages.len());
        Ok(messages)
    }
}
