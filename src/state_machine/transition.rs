//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! next state and effects. Network calls, logging and rendering happen in the
//! runtime when it executes the effects.

use super::{Effect, Event, SessionContext, SessionState};
use crate::conversation::ConversationError;
use crate::location::StaleEpoch;
use crate::transport::{Endpoint, SayRequest};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Reasons an event leaves the state untouched
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Session has not started")]
    NotStarted,
    #[error("Session already started")]
    AlreadyStarted,
    #[error(transparent)]
    Rejected(#[from] ConversationError),
    #[error(transparent)]
    Stale(#[from] StaleEpoch),
}

pub fn transition(
    state: &SessionState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state.started, event) {
        (false, Event::Start) => {
            let mut next = state.clone();
            next.started = true;
            let refresh = next.location.initialize(&context.catalog);
            Ok(TransitionResult::new(next)
                .with_effect(Effect::enter_location(context.player_id, refresh))
                .with_effect(Effect::Render))
        }
        (true, Event::Start) => Err(TransitionError::AlreadyStarted),
        (false, _) => Err(TransitionError::NotStarted),

        // ============================================================
        // Location
        // ============================================================

        // Allowed during a send; the reply is epoch-checked on arrival
        (true, Event::LocationChangeRequested) => {
            let mut next = state.clone();
            let refresh = next.location.change_location(&context.catalog);
            next.conversation.clear_transcript();
            Ok(TransitionResult::new(next)
                .with_effect(Effect::enter_location(context.player_id, refresh))
                .with_effect(Effect::Render))
        }

        (true, Event::RosterLoaded { epoch, agents }) => {
            let mut next = state.clone();
            next.location.apply_roster(epoch, agents)?;
            next.conversation.set_speaker_from_roster(next.location.roster());
            Ok(TransitionResult::new(next).with_effect(Effect::Render))
        }

        (true, Event::RosterFailed { epoch, error }) => {
            let mut next = state.clone();
            next.location.roster_failed(epoch)?;
            Ok(TransitionResult::new(next)
                .with_effect(Effect::report(Endpoint::EnterLocation, error))
                .with_effect(Effect::Render))
        }

        // ============================================================
        // Conversation
        // ============================================================
        (true, Event::SpeakerClicked { agent }) => {
            let mut next = state.clone();
            next.conversation
                .select_speaker(agent, state.location.roster())?;
            Ok(TransitionResult::new(next).with_effect(Effect::Render))
        }

        (true, Event::MessageSubmitted { text }) => {
            let mut next = state.clone();
            let line = next.conversation.begin_send(&text)?;
            Ok(TransitionResult::new(next)
                .with_effect(Effect::Say {
                    request: SayRequest {
                        player_id: context.player_id,
                        agent_id: line.agent,
                        message: line.message,
                    },
                    epoch: state.location.epoch(),
                })
                .with_effect(Effect::Render))
        }

        (true, Event::ReplyReceived { epoch, reply }) => {
            let mut next = state.clone();
            if state.location.is_current(epoch) {
                next.conversation
                    .complete_send(reply.message, reply.responder_id)?;
            } else {
                next.conversation.discard_reply()?;
            }
            Ok(TransitionResult::new(next).with_effect(Effect::Render))
        }

        (true, Event::ReplyFailed { error, .. }) => {
            let mut next = state.clone();
            next.conversation.fail_send()?;
            Ok(TransitionResult::new(next)
                .with_effect(Effect::report(Endpoint::Say, error))
                .with_effect(Effect::Render))
        }
    }
}
