//! Events that can occur in a session

use crate::location::{AgentId, SessionEpoch};
use crate::transport::{SayResponse, TransportError};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User intents
    Start,
    LocationChangeRequested,
    SpeakerClicked {
        agent: AgentId,
    },
    MessageSubmitted {
        text: String,
    },

    // Service completions, tagged with the epoch they were issued under
    RosterLoaded {
        epoch: SessionEpoch,
        agents: Vec<AgentId>,
    },
    RosterFailed {
        epoch: SessionEpoch,
        error: TransportError,
    },
    ReplyReceived {
        epoch: SessionEpoch,
        reply: SayResponse,
    },
    ReplyFailed {
        epoch: SessionEpoch,
        error: TransportError,
    },
}

impl Event {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::LocationChangeRequested => "location_change_requested",
            Event::SpeakerClicked { .. } => "speaker_clicked",
            Event::MessageSubmitted { .. } => "message_submitted",
            Event::RosterLoaded { .. } => "roster_loaded",
            Event::RosterFailed { .. } => "roster_failed",
            Event::ReplyReceived { .. } => "reply_received",
            Event::ReplyFailed { .. } => "reply_failed",
        }
    }
}
