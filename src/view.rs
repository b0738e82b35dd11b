//! View model projection
//!
//! The render layer only ever sees a `ViewModel`, rebuilt from scratch after
//! every transition. No decision is made here that the state machine has not
//! already made.

use crate::assets::{location_button_label, AssetTable};
use crate::location::{AgentId, LocationId};
use crate::state_machine::{Activity, SessionContext, SessionState};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Portrait {
    pub agent: AgentId,
    pub image: String,
    pub talking: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub location: LocationId,
    pub location_key: String,
    pub background: String,
    pub roster_portraits: Vec<Portrait>,
    pub talking_agent: Option<AgentId>,
    pub dialogue_text: Option<String>,
    /// Text still waiting to be delivered
    pub input_text: String,
    /// Exactly "a send is in flight"
    pub input_disabled: bool,
    pub location_button: String,
    pub activity: Activity,
}

pub fn project(state: &SessionState, context: &SessionContext, assets: &AssetTable) -> ViewModel {
    let location = state.location.current();
    let location_key = context
        .catalog
        .get(location)
        .map(|l| l.key.clone())
        .unwrap_or_default();
    let talking_agent = state.conversation.active_speaker();

    let roster_portraits = state
        .location
        .roster()
        .iter()
        .enumerate()
        .map(|(position, agent)| Portrait {
            agent,
            image: assets.portrait(&location_key, position),
            talking: talking_agent == Some(agent),
        })
        .collect();

    ViewModel {
        location,
        background: assets.background(&location_key),
        location_key,
        roster_portraits,
        talking_agent,
        dialogue_text: state.conversation.transcript().map(|t| t.text.clone()),
        input_text: state.conversation.input().to_string(),
        input_disabled: state.conversation.is_sending(),
        location_button: location_button_label(&context.catalog, location),
        activity: state.activity(),
    }
}
