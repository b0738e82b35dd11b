//! Session state types

use crate::conversation::ConversationState;
use crate::location::{LocationCatalog, LocationSession};
use serde::Serialize;

/// Everything the controller tracks for one play session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Set once `Start` has been handled
    pub started: bool,
    pub location: LocationSession,
    pub conversation: ConversationState,
}

impl SessionState {
    pub fn new(context: &SessionContext) -> Self {
        Self {
            started: false,
            location: LocationSession::new(&context.catalog),
            conversation: ConversationState::default(),
        }
    }

    /// What the session is waiting on, derived from the lock and pending refresh
    pub fn activity(&self) -> Activity {
        if self.conversation.is_sending() {
            Activity::AwaitingSend
        } else if self.location.is_refreshing() {
            Activity::AwaitingRoster
        } else {
            Activity::Idle
        }
    }
}

/// Coarse view of outstanding work. A send outranks a roster refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Idle,
    AwaitingRoster,
    AwaitingSend,
}

/// Immutable per-session configuration
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub player_id: u32,
    pub catalog: LocationCatalog,
}

impl SessionContext {
    pub fn new(player_id: u32, catalog: LocationCatalog) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            player_id,
            catalog,
        }
    }
}
