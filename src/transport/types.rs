//! Wire types for the agent service

use crate::location::{AgentId, LocationId};
use serde::{Deserialize, Serialize};

/// Service endpoints, relative to the configured base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    EnterLocation,
    Say,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::EnterLocation => "enterLocation",
            Endpoint::Say => "say",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnterLocationRequest {
    pub player_id: u32,
    pub location_id: LocationId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnterLocationResponse {
    /// Agents present, in display order
    pub agents_ids: Vec<AgentId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SayRequest {
    pub player_id: u32,
    pub agent_id: AgentId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SayResponse {
    pub message: String,
    /// Agent that actually answered; may differ from the one addressed
    pub responder_id: AgentId,
}
