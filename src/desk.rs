//! Desk occupancy state machine.
//!
//! DESIGN
//! ======
//! A desk's status and its timing field travel together in [`Occupancy`],
//! so a record can never carry a timestamp that disagrees with its status:
//! - `Available` → `last_occupied_at`
//! - `Occupied`  → `occupied_since`
//! - `Reserved`  → `reserved_since` (or `unsure_since`, see [`StatusScheme`])
//!
//! Valid transitions, given a uniform roll in `[0, 1)`:
//! - Available → Occupied           (roll < 0.40)
//! - Occupied  → Reserved           (roll < 0.45)
//! - Reserved  → Available          (roll < 0.45)
//! - Reserved  → Occupied           (0.45 <= roll < 0.75)
//!
//! Anything else leaves the status alone. Available never moves straight
//! to Reserved.

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

const OCCUPY_FROM_AVAILABLE: f64 = 0.40;
const RESERVE_FROM_OCCUPIED: f64 = 0.45;
const RELEASE_FROM_RESERVED: f64 = 0.45;
const RETURN_FROM_RESERVED: f64 = 0.75;

const INITIAL_AVAILABLE: f64 = 0.40;
const INITIAL_OCCUPIED: f64 = 0.75;

const MAX_OCCUPIED_BACKDATE_MS: u64 = 3_600_000;
const MAX_RESERVED_BACKDATE_MS: u64 = 1_800_000;
const MAX_AVAILABLE_BACKDATE_MS: u64 = 7_200_000;

// =============================================================================
// NOISE BAND
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseBand {
    Silent,
    Quiet,
    Moderate,
    Loud,
}

impl NoiseBand {
    pub const ALL: [Self; 4] = [Self::Silent, Self::Quiet, Self::Moderate, Self::Loud];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Silent => "silent",
            Self::Quiet => "quiet",
            Self::Moderate => "moderate",
            Self::Loud => "loud",
        }
    }

    /// Case-insensitive parse of a band name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|band| band.as_str().eq_ignore_ascii_case(raw.trim()))
    }

    /// Uniform pick over all four bands.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

// =============================================================================
// OCCUPANCY STATUS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OccupancyStatus {
    Available,
    Occupied,
    /// Third state: neither free nor confirmed occupied. Named `reserved`
    /// or `unsure` on the wire depending on [`StatusScheme`].
    Reserved,
}

impl OccupancyStatus {
    pub const ALL: [Self; 3] = [Self::Available, Self::Occupied, Self::Reserved];

    /// Startup distribution: 40% available, 35% occupied, 25% reserved.
    pub fn random_initial<R: Rng>(rng: &mut R) -> Self {
        initial_status_for_roll(rng.random::<f64>())
    }
}

pub(crate) fn initial_status_for_roll(roll: f64) -> OccupancyStatus {
    if roll < INITIAL_AVAILABLE {
        OccupancyStatus::Available
    } else if roll < INITIAL_OCCUPIED {
        OccupancyStatus::Occupied
    } else {
        OccupancyStatus::Reserved
    }
}

/// Transition table lookup. `None` means the update leaves the status as is.
#[must_use]
pub fn next_status(current: OccupancyStatus, roll: f64) -> Option<OccupancyStatus> {
    match current {
        OccupancyStatus::Available if roll < OCCUPY_FROM_AVAILABLE => Some(OccupancyStatus::Occupied),
        OccupancyStatus::Occupied if roll < RESERVE_FROM_OCCUPIED => Some(OccupancyStatus::Reserved),
        OccupancyStatus::Reserved if roll < RELEASE_FROM_RESERVED => Some(OccupancyStatus::Available),
        OccupancyStatus::Reserved if roll < RETURN_FROM_RESERVED => Some(OccupancyStatus::Occupied),
        _ => None,
    }
}

// =============================================================================
// OCCUPANCY (STATUS + TIMING FIELD)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    Available { last_occupied_at: OffsetDateTime },
    Occupied { since: OffsetDateTime },
    Reserved { since: OffsetDateTime },
}

impl Occupancy {
    /// Occupancy for `status`, with its timing field stamped `at`.
    #[must_use]
    pub fn enter(status: OccupancyStatus, at: OffsetDateTime) -> Self {
        match status {
            OccupancyStatus::Available => Self::Available { last_occupied_at: at },
            OccupancyStatus::Occupied => Self::Occupied { since: at },
            OccupancyStatus::Reserved => Self::Reserved { since: at },
        }
    }

    /// Random status with a plausible backdated timestamp.
    pub fn seeded<R: Rng>(rng: &mut R, now: OffsetDateTime) -> Self {
        let status = OccupancyStatus::random_initial(rng);
        let max_ms = match status {
            OccupancyStatus::Available => MAX_AVAILABLE_BACKDATE_MS,
            OccupancyStatus::Occupied => MAX_OCCUPIED_BACKDATE_MS,
            OccupancyStatus::Reserved => MAX_RESERVED_BACKDATE_MS,
        };
        let offset_ms = rng.random_range(0..max_ms);
        #[allow(clippy::cast_possible_wrap)]
        let at = now - Duration::milliseconds(offset_ms as i64);
        Self::enter(status, at)
    }

    #[must_use]
    pub fn status(&self) -> OccupancyStatus {
        match self {
            Self::Available { .. } => OccupancyStatus::Available,
            Self::Occupied { .. } => OccupancyStatus::Occupied,
            Self::Reserved { .. } => OccupancyStatus::Reserved,
        }
    }

    /// The single timing field, whichever status owns it.
    #[must_use]
    pub fn changed_at(&self) -> OffsetDateTime {
        match *self {
            Self::Available { last_occupied_at } => last_occupied_at,
            Self::Occupied { since } | Self::Reserved { since } => since,
        }
    }

    #[must_use]
    pub fn occupied_since(&self) -> Option<OffsetDateTime> {
        match *self {
            Self::Occupied { since } => Some(since),
            _ => None,
        }
    }

    #[must_use]
    pub fn reserved_since(&self) -> Option<OffsetDateTime> {
        match *self {
            Self::Reserved { since } => Some(since),
            _ => None,
        }
    }

    #[must_use]
    pub fn last_occupied_at(&self) -> Option<OffsetDateTime> {
        match *self {
            Self::Available { last_occupied_at } => Some(last_occupied_at),
            _ => None,
        }
    }
}

// =============================================================================
// DESK STATE
// =============================================================================

/// Mutable occupancy and noise state for one physical desk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskState {
    pub desk_id: String,
    pub floor_id: String,
    pub occupancy: Occupancy,
    pub noise: NoiseBand,
}

impl DeskState {
    #[must_use]
    pub fn new(desk_id: impl Into<String>, floor_id: impl Into<String>, occupancy: Occupancy, noise: NoiseBand) -> Self {
        Self { desk_id: desk_id.into(), floor_id: floor_id.into(), occupancy, noise }
    }

    /// Random initial status, backdated timing field and random noise band.
    pub fn seeded<R: Rng>(
        desk_id: impl Into<String>,
        floor_id: impl Into<String>,
        rng: &mut R,
        now: OffsetDateTime,
    ) -> Self {
        let occupancy = Occupancy::seeded(rng, now);
        let noise = NoiseBand::random(rng);
        Self::new(desk_id, floor_id, occupancy, noise)
    }

    #[must_use]
    pub fn status(&self) -> OccupancyStatus {
        self.occupancy.status()
    }

    /// Apply one simulator update: run the transition table for `roll` and
    /// always replace the noise band. Returns whether the status changed.
    pub fn apply_update(&mut self, roll: f64, noise: NoiseBand, now: OffsetDateTime) -> bool {
        self.noise = noise;
        match next_status(self.status(), roll) {
            Some(next) => {
                self.occupancy = Occupancy::enter(next, now);
                true
            }
            None => false,
        }
    }

    /// Force `status`, restamping the timing field. Same-status calls are a
    /// no-op so repeated reports never churn the timestamp.
    pub fn set_status(&mut self, status: OccupancyStatus, now: OffsetDateTime) -> bool {
        if self.status() == status {
            return false;
        }
        self.occupancy = Occupancy::enter(status, now);
        true
    }
}

// =============================================================================
// STATUS SCHEME
// =============================================================================

/// External naming of the third status. Chosen once at startup; the
/// transition table is identical under both names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusScheme {
    #[default]
    Reserved,
    Unsure,
}

impl StatusScheme {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "reserved" => Some(Self::Reserved),
            "unsure" => Some(Self::Unsure),
            _ => None,
        }
    }

    #[must_use]
    pub fn third_label(self) -> &'static str {
        match self {
            Self::Reserved => "reserved",
            Self::Unsure => "unsure",
        }
    }

    #[must_use]
    pub fn label(self, status: OccupancyStatus) -> &'static str {
        match status {
            OccupancyStatus::Available => "available",
            OccupancyStatus::Occupied => "occupied",
            OccupancyStatus::Reserved => self.third_label(),
        }
    }

    /// Parse a status name as the dashboard spells it (filter values).
    #[must_use]
    pub fn parse_status(self, raw: &str) -> Option<OccupancyStatus> {
        let raw = raw.trim();
        OccupancyStatus::ALL
            .into_iter()
            .find(|status| self.label(*status).eq_ignore_ascii_case(raw))
    }

    /// Map the backend vocabulary (`occupied | vacant | reserved`, any case)
    /// onto local statuses. The scheme's own third label is accepted too.
    #[must_use]
    pub fn map_backend(self, raw: &str) -> Option<OccupancyStatus> {
        let lowered = raw.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "vacant" => Some(OccupancyStatus::Available),
            "occupied" => Some(OccupancyStatus::Occupied),
            "reserved" => Some(OccupancyStatus::Reserved),
            other if other == self.third_label() => Some(OccupancyStatus::Reserved),
            _ => None,
        }
    }

    /// Wire record for `desk` under this scheme's field names.
    #[must_use]
    pub fn record(self, desk: &DeskState) -> DeskRecord {
        let third_since = desk.occupancy.reserved_since();
        let (reserved_since, unsure_since) = match self {
            Self::Reserved => (third_since, None),
            Self::Unsure => (None, third_since),
        };
        DeskRecord {
            desk_id: desk.desk_id.clone(),
            floor_id: desk.floor_id.clone(),
            status: self.label(desk.status()),
            noiseband: desk.noise,
            occupied_since: desk.occupancy.occupied_since(),
            reserved_since,
            unsure_since,
            last_occupied_at: desk.occupancy.last_occupied_at(),
        }
    }
}

/// Serialized desk as the dashboard client consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeskRecord {
    pub desk_id: String,
    pub floor_id: String,
    pub status: &'static str,
    pub noiseband: NoiseBand,
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub occupied_since: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub reserved_since: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub unsure_since: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub last_occupied_at: Option<OffsetDateTime>,
}

#[cfg(test)]
#[path = "desk_test.rs"]
mod tests;
