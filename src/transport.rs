//! Client for the remote agent service
//!
//! Every call produces a typed response or a normalized `TransportError`.

mod error;
mod http;
mod types;

pub use error::{TransportError, TransportErrorKind};
pub use http::HttpAgentService;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Operations the remote agent service offers
#[async_trait]
pub trait AgentService: Send + Sync {
    /// Announce the player in a location and fetch who is there
    async fn enter_location(
        &self,
        request: &EnterLocationRequest,
    ) -> Result<EnterLocationResponse, TransportError>;

    /// Send a line of dialogue to an agent
    async fn say(&self, request: &SayRequest) -> Result<SayResponse, TransportError>;
}

#[async_trait]
impl<T: AgentService + ?Sized> AgentService for Arc<T> {
    async fn enter_location(
        &self,
        request: &EnterLocationRequest,
    ) -> Result<EnterLocationResponse, TransportError> {
        (**self).enter_location(request).await
    }

    async fn say(&self, request: &SayRequest) -> Result<SayResponse, TransportError> {
        (**self).say(request).await
    }
}

/// Logging wrapper for agent services
pub struct LoggingAgentService {
    inner: Arc<dyn AgentService>,
}

impl LoggingAgentService {
    pub fn new(inner: Arc<dyn AgentService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl AgentService for LoggingAgentService {
    async fn enter_location(
        &self,
        request: &EnterLocationRequest,
    ) -> Result<EnterLocationResponse, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.enter_location(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    location_id = %request.location_id,
                    duration_ms = %duration.as_millis(),
                    agents = response.agents_ids.len(),
                    "enterLocation completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    location_id = %request.location_id,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    status = ?e.status,
                    error = %e.message,
                    "enterLocation failed"
                );
            }
        }

        result
    }

    async fn say(&self, request: &SayRequest) -> Result<SayResponse, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.say(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    agent_id = %request.agent_id,
                    responder_id = %response.responder_id,
                    duration_ms = %duration.as_millis(),
                    "say completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    agent_id = %request.agent_id,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    status = ?e.status,
                    error = %e.message,
                    "say failed"
                );
            }
        }

        result
    }
}
