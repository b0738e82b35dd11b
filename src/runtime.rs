//! Runtime for executing a play session
//!
//! The controller owns all session state and is the only place it is
//! mutated. Front-ends talk to it through a `ControllerHandle` and watch the
//! broadcast of `ViewEvent`s.

mod executor;


pub use executor::InteractionController;

use crate::location::AgentId;
use crate::state_machine::Event;
use crate::view::ViewModel;
use thiserror::Error;
use tokio::sync::mpsc;

/// Events sent to the render layer
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// Fresh projection after a state change
    Render(ViewModel),
    /// A recovered failure worth showing to the user
    Diagnostic { message: String },
}

#[derive(Debug, Error)]
#[error("Interaction controller has stopped")]
pub struct ControllerClosed;

/// Cloneable entry point for user intents
#[derive(Clone)]
pub struct ControllerHandle {
    event_tx: mpsc::Sender<Event>,
}

impl ControllerHandle {
    pub(crate) fn new(event_tx: mpsc::Sender<Event>) -> Self {
        Self { event_tx }
    }

    pub async fn start(&self) -> Result<(), ControllerClosed> {
        self.send(Event::Start).await
    }

    pub async fn on_location_change_requested(&self) -> Result<(), ControllerClosed> {
        self.send(Event::LocationChangeRequested).await
    }

    pub async fn on_speaker_clicked(&self, agent: AgentId) -> Result<(), ControllerClosed> {
        self.send(Event::SpeakerClicked { agent }).await
    }

    pub async fn on_message_submit(&self, text: impl Into<String>) -> Result<(), ControllerClosed> {
        self.send(Event::MessageSubmitted { text: text.into() })
            .await
    }

    async fn send(&self, event: Event) -> Result<(), ControllerClosed> {
        self.event_tx.send(event).await.map_err(|_| ControllerClosed)
    }
}
