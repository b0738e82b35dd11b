//! Property-based tests for the state machine
//!
//! A small driver plays random user intents and resolves outstanding service
//! calls in random order, checking the session invariants after every step.

use super::*;
use crate::conversation::ConversationError;
use crate::location::{AgentId, LocationCatalog, LocationId, SessionEpoch};
use crate::transport::{SayResponse, TransportError};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context(locations: usize) -> SessionContext {
    let keys = (0..locations).map(|i| format!("loc_{i}"));
    SessionContext::new(0, LocationCatalog::from_keys(keys).unwrap())
}

fn started(ctx: &SessionContext) -> (SessionState, Vec<Effect>) {
    let result = transition(&SessionState::new(ctx), ctx, Event::Start).unwrap();
    (result.new_state, result.effects)
}

/// Driver-side actions: intents plus resolution of in-flight calls
#[derive(Debug, Clone)]
enum Action {
    ChangeLocation,
    ClickSpeaker(u32),
    Submit(String),
    ResolveRoster {
        pick: usize,
        ok: bool,
        agents: Vec<u32>,
    },
    ResolveSay {
        ok: bool,
        responder: u32,
    },
}

/// Calls issued by the state machine and not yet answered
#[derive(Debug, Default)]
struct InFlight {
    rosters: Vec<SessionEpoch>,
    say: Option<SessionEpoch>,
    says_issued_while_pending: usize,
}

impl InFlight {
    fn absorb(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::EnterLocation { epoch, .. } => self.rosters.push(*epoch),
                Effect::Say { epoch, .. } => {
                    if self.say.is_some() {
                        self.says_issued_while_pending += 1;
                    }
                    self.say = Some(*epoch);
                }
                Effect::ReportFailure { .. } | Effect::Render => {}
            }
        }
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_agents() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(0u32..10, 0..4)
}

fn arb_message() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ]{1,20}",
        Just(String::new()),
        Just("   ".to_string()),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        2 => Just(Action::ChangeLocation),
        2 => (0u32..10).prop_map(Action::ClickSpeaker),
        3 => arb_message().prop_map(Action::Submit),
        4 => (any::<usize>(), any::<bool>(), arb_agents())
            .prop_map(|(pick, ok, agents)| Action::ResolveRoster { pick, ok, agents }),
        3 => (any::<bool>(), 0u32..20).prop_map(|(ok, responder)| Action::ResolveSay { ok, responder }),
    ]
}

fn to_event(action: Action, in_flight: &mut InFlight) -> Option<Event> {
    match action {
        Action::ChangeLocation => Some(Event::LocationChangeRequested),
        Action::ClickSpeaker(id) => Some(Event::SpeakerClicked {
            agent: AgentId::new(id),
        }),
        Action::Submit(text) => Some(Event::MessageSubmitted { text }),
        Action::ResolveRoster { pick, ok, agents } => {
            if in_flight.rosters.is_empty() {
                return None;
            }
            let epoch = in_flight.rosters.remove(pick % in_flight.rosters.len());
            Some(if ok {
                Event::RosterLoaded {
                    epoch,
                    agents: agents.into_iter().map(AgentId::new).collect(),
                }
            } else {
                Event::RosterFailed {
                    epoch,
                    error: TransportError::status(500, "boom"),
                }
            })
        }
        Action::ResolveSay { ok, responder } => {
            let epoch = in_flight.say.take()?;
            Some(if ok {
                Event::ReplyReceived {
                    epoch,
                    reply: SayResponse {
                        message: format!("reply from {responder}"),
                        responder_id: AgentId::new(responder),
                    },
                }
            } else {
                Event::ReplyFailed {
                    epoch,
                    error: TransportError::network("refused"),
                }
            })
        }
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // At most one send in flight, and the lock mirrors it exactly
    #[test]
    fn prop_single_send_in_flight(actions in proptest::collection::vec(arb_action(), 0..40)) {
        let ctx = test_context(2);
        let (mut state, effects) = started(&ctx);
        let mut in_flight = InFlight::default();
        in_flight.absorb(&effects);

        for action in actions {
            let Some(event) = to_event(action, &mut in_flight) else { continue };
            if let Ok(result) = transition(&state, &ctx, event) {
                in_flight.absorb(&result.effects);
                state = result.new_state;
            }
            prop_assert_eq!(in_flight.says_issued_while_pending, 0);
            prop_assert_eq!(state.conversation.is_sending(), in_flight.say.is_some());
        }
    }

    // Only the newest epoch may change the roster, and it resets the speaker
    #[test]
    fn prop_only_current_epoch_updates_roster(actions in proptest::collection::vec(arb_action(), 0..40)) {
        let ctx = test_context(3);
        let (mut state, effects) = started(&ctx);
        let mut in_flight = InFlight::default();
        in_flight.absorb(&effects);

        for action in actions {
            let Some(event) = to_event(action, &mut in_flight) else { continue };
            let loaded = match &event {
                Event::RosterLoaded { epoch, agents } => Some((*epoch, agents.clone())),
                _ => None,
            };

            match transition(&state, &ctx, event) {
                Ok(result) => {
                    if let Some((epoch, agents)) = loaded {
                        prop_assert_eq!(epoch, state.location.epoch());
                        let next = &result.new_state;
                        prop_assert_eq!(next.location.roster().iter().collect::<Vec<_>>(), agents.clone());
                        prop_assert_eq!(next.conversation.active_speaker(), agents.first().copied());
                    }
                    in_flight.absorb(&result.effects);
                    state = result.new_state;
                }
                Err(TransitionError::Stale(stale)) => {
                    prop_assert!(stale.received < stale.current);
                }
                Err(_) => {}
            }
        }
    }

    // Location changes always cycle through the catalog, whatever else happens
    #[test]
    fn prop_location_follows_change_count(
        locations in 1usize..5,
        actions in proptest::collection::vec(arb_action(), 0..40),
    ) {
        let ctx = test_context(locations);
        let (mut state, effects) = started(&ctx);
        let mut in_flight = InFlight::default();
        in_flight.absorb(&effects);
        let mut changes = 0usize;

        for action in actions {
            let is_change = matches!(action, Action::ChangeLocation);
            let Some(event) = to_event(action, &mut in_flight) else { continue };
            if let Ok(result) = transition(&state, &ctx, event) {
                if is_change {
                    changes += 1;
                }
                in_flight.absorb(&result.effects);
                state = result.new_state;
            }
            let expected = u32::try_from(changes % locations).unwrap();
            prop_assert_eq!(state.location.current(), LocationId::new(expected));
        }
    }

    // N changes with N a multiple of the catalog size land on the origin
    #[test]
    fn prop_full_cycles_return_to_origin(locations in 1usize..6, rounds in 0usize..4) {
        let ctx = test_context(locations);
        let (mut state, _) = started(&ctx);
        let origin = state.location.current();

        for _ in 0..locations * rounds {
            state = transition(&state, &ctx, Event::LocationChangeRequested).unwrap().new_state;
        }
        prop_assert_eq!(state.location.current(), origin);
    }

    // Blank input never takes the lock or emits a request
    #[test]
    fn prop_blank_messages_are_dropped(text in "[ \t\n]{0,10}", roster in arb_agents()) {
        let ctx = test_context(2);
        let (state, _) = started(&ctx);
        let state = transition(&state, &ctx, Event::RosterLoaded {
            epoch: SessionEpoch::default(),
            agents: roster.into_iter().map(AgentId::new).collect(),
        }).unwrap().new_state;

        let result = transition(&state, &ctx, Event::MessageSubmitted { text });
        prop_assert!(matches!(
            result,
            Err(TransitionError::Rejected(ConversationError::EmptyMessage))
        ));
    }

    // A roster for epoch E arriving at E+2 changes nothing
    #[test]
    fn prop_superseded_roster_is_discarded(first in arb_agents(), late in arb_agents()) {
        let ctx = test_context(2);
        let (state, _) = started(&ctx);
        let state = transition(&state, &ctx, Event::RosterLoaded {
            epoch: SessionEpoch::default(),
            agents: first.into_iter().map(AgentId::new).collect(),
        }).unwrap().new_state;

        let stale_epoch = state.location.epoch().next();
        let mut moved = state;
        for _ in 0..2 {
            moved = transition(&moved, &ctx, Event::LocationChangeRequested).unwrap().new_state;
        }

        let result = transition(&moved, &ctx, Event::RosterLoaded {
            epoch: stale_epoch,
            agents: late.into_iter().map(AgentId::new).collect(),
        });
        prop_assert!(matches!(result, Err(TransitionError::Stale(_))), "expected stale rejection");
    }
}
