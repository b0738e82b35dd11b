//! Conversation state: who the player is talking to and what was last said

use crate::location::{AgentId, Roster};
use thiserror::Error;

/// The dialogue line currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub text: String,
    /// Agent that produced the line
    pub agent: AgentId,
}

/// Exclusion flag for message submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SendLock {
    held: bool,
}

impl SendLock {
    pub fn is_held(self) -> bool {
        self.held
    }

    /// Returns false if the lock was already held
    fn try_acquire(&mut self) -> bool {
        if self.held {
            false
        } else {
            self.held = true;
            true
        }
    }

    /// Returns false if the lock was not held
    fn release(&mut self) -> bool {
        std::mem::replace(&mut self.held, false)
    }
}

/// Reasons an intent is refused by the conversation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    #[error("A message is already being sent")]
    SendInFlight,
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Nobody to talk to")]
    NoActiveSpeaker,
    #[error("Agent {0} is not present")]
    AgentNotPresent(AgentId),
    #[error("No message is being sent")]
    NotSending,
}

/// A message that passed the checks and must now go out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingLine {
    pub agent: AgentId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversationState {
    active_speaker: Option<AgentId>,
    transcript: Option<ConversationTurn>,
    send_lock: SendLock,
    /// Last submitted text; kept until it is delivered
    input: String,
}

impl ConversationState {
    pub fn active_speaker(&self) -> Option<AgentId> {
        self.active_speaker
    }

    pub fn transcript(&self) -> Option<&ConversationTurn> {
        self.transcript.as_ref()
    }

    pub fn is_sending(&self) -> bool {
        self.send_lock.is_held()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Highlight another agent of the current roster
    pub fn select_speaker(&mut self, agent: AgentId, roster: &Roster) -> Result<(), ConversationError> {
        if self.send_lock.is_held() {
            return Err(ConversationError::SendInFlight);
        }
        if !roster.contains(agent) {
            return Err(ConversationError::AgentNotPresent(agent));
        }
        self.active_speaker = Some(agent);
        Ok(())
    }

    /// Default to the head of a freshly loaded roster
    pub fn set_speaker_from_roster(&mut self, roster: &Roster) {
        self.active_speaker = roster.first();
    }

    pub fn clear_transcript(&mut self) {
        self.transcript = None;
    }

    /// Take the send lock for `message` addressed to the active speaker
    pub fn begin_send(&mut self, message: &str) -> Result<OutgoingLine, ConversationError> {
        if message.trim().is_empty() {
            return Err(ConversationError::EmptyMessage);
        }
        let agent = self
            .active_speaker
            .ok_or(ConversationError::NoActiveSpeaker)?;
        if !self.send_lock.try_acquire() {
            return Err(ConversationError::SendInFlight);
        }

        self.input = message.to_string();
        Ok(OutgoingLine {
            agent,
            message: message.to_string(),
        })
    }

    /// Show the reply and hand the conversation to whoever answered.
    ///
    /// The responder is trusted even if it is not in the roster snapshot.
    pub fn complete_send(&mut self, text: String, responder: AgentId) -> Result<(), ConversationError> {
        self.release()?;
        self.transcript = Some(ConversationTurn {
            text,
            agent: responder,
        });
        self.active_speaker = Some(responder);
        self.input.clear();
        Ok(())
    }

    /// The reply belongs to a location the player already left
    pub fn discard_reply(&mut self) -> Result<(), ConversationError> {
        self.release()?;
        self.input.clear();
        Ok(())
    }

    /// Delivery failed; everything stays as it was so the user can retry
    pub fn fail_send(&mut self) -> Result<(), ConversationError> {
        self.release()
    }

    fn release(&mut self) -> Result<(), ConversationError> {
        if self.send_lock.release() {
            Ok(())
        } else {
            Err(ConversationError::NotSending)
        }
    }
}
