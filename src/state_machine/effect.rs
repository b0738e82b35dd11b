//! Effects produced by state transitions

use crate::location::{RosterRequest, SessionEpoch};
use crate::transport::{Endpoint, EnterLocationRequest, SayRequest, TransportError};

/// Effects to be executed after state transition
#[derive(Debug, Clone)]
pub enum Effect {
    /// Fetch the roster of a location (spawns as background task)
    EnterLocation {
        request: EnterLocationRequest,
        epoch: SessionEpoch,
    },

    /// Deliver a message to an agent (spawns as background task)
    Say {
        request: SayRequest,
        epoch: SessionEpoch,
    },

    /// Surface a recovered service failure
    ReportFailure {
        endpoint: Endpoint,
        error: TransportError,
    },

    /// Re-derive and publish the view
    Render,
}

impl Effect {
    pub fn enter_location(player_id: u32, refresh: RosterRequest) -> Self {
        Effect::EnterLocation {
            request: EnterLocationRequest {
                player_id,
                location_id: refresh.location,
            },
            epoch: refresh.epoch,
        }
    }

    pub fn report(endpoint: Endpoint, error: TransportError) -> Self {
        Effect::ReportFailure { endpoint, error }
    }
}
