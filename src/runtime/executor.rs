//! Session runtime executor

use super::{ControllerHandle, ViewEvent};
use crate::assets::AssetTable;
use crate::state_machine::{
    transition, Effect, Event, SessionContext, SessionState, TransitionError,
};
use crate::transport::AgentService;
use crate::view::{project, ViewModel};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

const EVENT_CHANNEL_CAPACITY: usize = 32;
const VIEW_CHANNEL_CAPACITY: usize = 64;

/// Drives one session: applies transitions and executes their effects.
///
/// Network effects run as spawned tasks and report back through the event
/// channel, so a slow call never blocks user intents.
pub struct InteractionController<A>
where
    A: AgentService + 'static,
{
    context: SessionContext,
    state: SessionState,
    service: Arc<A>,
    assets: AssetTable,
    event_rx: mpsc::Receiver<Event>,
    /// Weak so the loop ends once every handle and in-flight call is gone
    event_tx: mpsc::WeakSender<Event>,
    view_tx: broadcast::Sender<ViewEvent>,
}

impl<A> InteractionController<A>
where
    A: AgentService + 'static,
{
    pub fn new(context: SessionContext, service: A, assets: AssetTable) -> (Self, ControllerHandle) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (view_tx, _) = broadcast::channel(VIEW_CHANNEL_CAPACITY);
        let state = SessionState::new(&context);

        let controller = Self {
            context,
            state,
            service: Arc::new(service),
            assets,
            event_rx,
            event_tx: event_tx.downgrade(),
            view_tx,
        };
        (controller, ControllerHandle::new(event_tx))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.view_tx.subscribe()
    }

    #[allow(dead_code)] // Used in tests
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn view(&self) -> ViewModel {
        project(&self.state, &self.context, &self.assets)
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.context.session_id, "Starting interaction controller");

        while self.step().await {}

        tracing::info!(session_id = %self.context.session_id, "Interaction controller stopped");
    }

    /// Wait for the next event and handle it. False once the channel is closed.
    pub async fn step(&mut self) -> bool {
        match self.event_rx.recv().await {
            Some(event) => {
                self.process_event(event);
                true
            }
            None => false,
        }
    }

    pub fn process_event(&mut self, event: Event) {
        let name = event.name();
        let result = match transition(&self.state, &self.context, event) {
            Ok(r) => r,
            Err(TransitionError::Stale(stale)) => {
                tracing::debug!(
                    session_id = %self.context.session_id,
                    event = name,
                    received = %stale.received,
                    current = %stale.current,
                    "Discarding stale response"
                );
                return;
            }
            Err(e) => {
                // Refused intents are no-ops
                tracing::debug!(
                    session_id = %self.context.session_id,
                    event = name,
                    reason = %e,
                    "Event ignored"
                );
                return;
            }
        };

        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::EnterLocation { request, epoch } => {
                let Some(event_tx) = self.event_tx.upgrade() else {
                    tracing::debug!("Controller shutting down, skipping enterLocation");
                    return;
                };
                let service = Arc::clone(&self.service);
                tracing::debug!(
                    session_id = %self.context.session_id,
                    location_id = %request.location_id,
                    epoch = %epoch,
                    "Requesting roster"
                );
                tokio::spawn(async move {
                    let event = match service.enter_location(&request).await {
                        Ok(response) => Event::RosterLoaded {
                            epoch,
                            agents: response.agents_ids,
                        },
                        Err(error) => Event::RosterFailed { epoch, error },
                    };
                    let _ = event_tx.send(event).await;
                });
            }

            Effect::Say { request, epoch } => {
                let Some(event_tx) = self.event_tx.upgrade() else {
                    tracing::debug!("Controller shutting down, skipping say");
                    return;
                };
                let service = Arc::clone(&self.service);
                tracing::debug!(
                    session_id = %self.context.session_id,
                    agent_id = %request.agent_id,
                    epoch = %epoch,
                    "Sending message"
                );
                tokio::spawn(async move {
                    let event = match service.say(&request).await {
                        Ok(reply) => Event::ReplyReceived { epoch, reply },
                        Err(error) => Event::ReplyFailed { epoch, error },
                    };
                    let _ = event_tx.send(event).await;
                });
            }

            Effect::ReportFailure { endpoint, error } => {
                tracing::warn!(
                    session_id = %self.context.session_id,
                    endpoint = endpoint.path(),
                    kind = error.kind.as_str(),
                    status = ?error.status,
                    error = %error.message,
                    "Service call failed, keeping previous state"
                );
                let _ = self.view_tx.send(ViewEvent::Diagnostic {
                    message: format!("{} failed: {}", endpoint.path(), error.message),
                });
            }

            Effect::Render => {
                // No subscribers is fine
                let _ = self.view_tx.send(ViewEvent::Render(self.view()));
            }
        }
    }
}
