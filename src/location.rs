//! Location session: where the player is and who is there
//!
//! The roster is only ever replaced by a service response whose epoch is
//! still current. Every location change bumps the epoch, so a response that
//! arrives after the player has moved on is recognised and dropped.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Location identifier as the agent service knows it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(u32);

impl LocationId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque agent identifier, scoped to a location's roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(u32);

impl AgentId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for AgentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Generation counter for location changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionEpoch(u64);

impl SessionEpoch {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SessionEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A named scene the player can stand in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: LocationId,
    /// Resource key, e.g. `inn`
    pub key: String,
}

/// The fixed, ordered set of locations. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationCatalog {
    locations: Vec<Location>,
}

impl LocationCatalog {
    /// Build a catalog from resource keys; a key's position is its id.
    ///
    /// Returns `None` when no keys are given.
    pub fn from_keys<I, S>(keys: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let locations: Vec<Location> = keys
            .into_iter()
            .zip(0u32..)
            .map(|(key, id)| Location {
                id: LocationId::new(id),
                key: key.into(),
            })
            .collect();

        if locations.is_empty() {
            None
        } else {
            Some(Self { locations })
        }
    }

    pub fn first(&self) -> &Location {
        &self.locations[0]
    }

    pub fn get(&self, id: LocationId) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    /// The location after `id`, wrapping around at the end
    pub fn next_after(&self, id: LocationId) -> &Location {
        let position = self
            .locations
            .iter()
            .position(|l| l.id == id)
            .unwrap_or(0);
        &self.locations[(position + 1) % self.locations.len()]
    }

    #[allow(dead_code)] // Used in tests
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }
}

/// Ordered agents present at a location; index 0 is the default speaker
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Roster(Vec<AgentId>);

impl Roster {
    pub fn new(agents: Vec<AgentId>) -> Self {
        Self(agents)
    }

    pub fn first(&self) -> Option<AgentId> {
        self.0.first().copied()
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.0.contains(&agent)
    }

    pub fn iter(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.0.iter().copied()
    }
}

/// A roster fetch the controller must perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterRequest {
    pub location: LocationId,
    pub epoch: SessionEpoch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("stale roster response for epoch {received} (current epoch {current})")]
pub struct StaleEpoch {
    pub received: SessionEpoch,
    pub current: SessionEpoch,
}

/// Owns the current location, its roster and the session epoch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSession {
    current: LocationId,
    roster: Roster,
    epoch: SessionEpoch,
    /// Epoch of the roster fetch still outstanding, if any
    pending_refresh: Option<SessionEpoch>,
}

impl LocationSession {
    pub fn new(catalog: &LocationCatalog) -> Self {
        Self {
            current: catalog.first().id,
            roster: Roster::default(),
            epoch: SessionEpoch::default(),
            pending_refresh: None,
        }
    }

    pub fn current(&self) -> LocationId {
        self.current
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    pub fn is_current(&self, epoch: SessionEpoch) -> bool {
        self.epoch == epoch
    }

    pub fn is_refreshing(&self) -> bool {
        self.pending_refresh.is_some()
    }

    /// Place the player at the first location and request its roster
    pub fn initialize(&mut self, catalog: &LocationCatalog) -> RosterRequest {
        self.current = catalog.first().id;
        self.request_refresh()
    }

    /// Move to the next location (cyclically) under a fresh epoch
    pub fn change_location(&mut self, catalog: &LocationCatalog) -> RosterRequest {
        self.current = catalog.next_after(self.current).id;
        self.epoch = self.epoch.next();
        self.request_refresh()
    }

    /// Replace the roster with a service response, if it is still relevant
    pub fn apply_roster(
        &mut self,
        epoch: SessionEpoch,
        agents: Vec<AgentId>,
    ) -> Result<&Roster, StaleEpoch> {
        self.check_epoch(epoch)?;
        self.roster = Roster::new(agents);
        self.pending_refresh = None;
        Ok(&self.roster)
    }

    /// A roster fetch failed; the previous roster stays in place
    pub fn roster_failed(&mut self, epoch: SessionEpoch) -> Result<(), StaleEpoch> {
        self.check_epoch(epoch)?;
        self.pending_refresh = None;
        Ok(())
    }

    fn request_refresh(&mut self) -> RosterRequest {
        self.pending_refresh = Some(self.epoch);
        RosterRequest {
            location: self.current,
            epoch: self.epoch,
        }
    }

    fn check_epoch(&self, epoch: SessionEpoch) -> Result<(), StaleEpoch> {
        if self.is_current(epoch) {
            Ok(())
        } else {
            Err(StaleEpoch {
                received: epoch,
                current: self.epoch,
            })
        }
    }
}
