//! HTTP implementation of the agent service

use super::types::{
    Endpoint, EnterLocationRequest, EnterLocationResponse, SayRequest, SayResponse,
};
use super::{AgentService, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Agent service reached over `POST {base}/{endpoint}` with JSON bodies
pub struct HttpAgentService {
    client: Client,
    base_url: String,
}

impl HttpAgentService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Post a JSON payload and return the decoded JSON body.
    ///
    /// Every failure mode comes back as a `TransportError`; nothing is retried.
    pub async fn post_request(
        &self,
        endpoint: Endpoint,
        payload: &Value,
    ) -> Result<Value, TransportError> {
        let url = format!("{}/{}", self.base_url, endpoint.path());

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_reqwest_error)?;

        if !status.is_success() {
            return Err(TransportError::status(status.as_u16(), &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| TransportError::malformed(format!("Failed to parse response: {e}")))
    }

    async fn call<Req, Resp>(&self, endpoint: Endpoint, request: &Req) -> Result<Resp, TransportError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_value(request)
            .map_err(|e| TransportError::malformed(format!("Failed to encode request: {e}")))?;
        let value = self.post_request(endpoint, &payload).await?;
        serde_json::from_value(value).map_err(|e| {
            TransportError::malformed(format!("Unexpected {} response: {e}", endpoint.path()))
        })
    }
}

#[async_trait]
impl AgentService for HttpAgentService {
    async fn enter_location(
        &self,
        request: &EnterLocationRequest,
    ) -> Result<EnterLocationResponse, TransportError> {
        self.call(Endpoint::EnterLocation, request).await
    }

    async fn say(&self, request: &SayRequest) -> Result<SayResponse, TransportError> {
        self.call(Endpoint::Say, request).await
    }
}

fn classify_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::timeout(format!("Request timeout: {e}"))
    } else if e.is_connect() {
        TransportError::network(format!("Connection failed: {e}"))
    } else if e.is_decode() {
        TransportError::malformed(format!("Failed to read response: {e}"))
    } else {
        TransportError::network(format!("Request failed: {e}"))
    }
}
