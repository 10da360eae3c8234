//! Board dimensions, economy cadence and wall durability for a match.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Side;

/// Tunable constants governing a single match.
///
/// Every field has a default, so configuration files may override only the
/// values they care about. Durations are expressed in seconds when
/// serialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    /// Number of horizontal lanes.
    pub lanes: u32,
    /// Number of columns spanning each lane; walls sit on the first and last.
    pub columns: u32,
    /// Hit points each wall starts with.
    pub max_wall_hp: f32,
    /// Upper bound on either side's bolt balance.
    pub bolt_cap: u32,
    /// Bolts each side holds when the match begins.
    pub starting_bolts: u32,
    /// Period between economy payouts.
    #[serde(with = "seconds")]
    pub economy_interval: Duration,
    /// Bolts granted to each side per economy payout.
    pub economy_gain: u32,
    /// Period between opponent policy decisions.
    #[serde(with = "seconds")]
    pub opponent_think_interval: Duration,
    /// Minimum column distance between a new unit and any living unit in its lane.
    pub min_separation: f32,
    /// Tolerance applied when deciding whether a unit crossed the far edge.
    pub crossing_epsilon: f32,
    /// Largest step the simulation advances in a single call.
    #[serde(with = "seconds")]
    pub max_step: Duration,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            lanes: 5,
            columns: 16,
            max_wall_hp: 2_500.0,
            bolt_cap: 600,
            starting_bolts: 200,
            economy_interval: Duration::from_secs(4),
            economy_gain: 50,
            opponent_think_interval: Duration::from_millis(1_800),
            min_separation: 0.7,
            crossing_epsilon: 0.05,
            max_step: Duration::from_millis(100),
        }
    }
}

impl MatchRules {
    /// First column that belongs to the opponent's half of the board.
    #[must_use]
    pub const fn half_column(&self) -> u32 {
        self.columns / 2
    }

    /// Column occupied by the wall owned by `side`.
    #[must_use]
    pub fn wall_column(&self, side: Side) -> f32 {
        match side {
            Side::Player => 0.0,
            Side::Opponent => self.columns.saturating_sub(1) as f32,
        }
    }

    /// Reports whether `column` lies within the half of the board owned by `side`.
    #[must_use]
    pub fn owns_column(&self, side: Side, column: f32) -> bool {
        let half = self.half_column() as f32;
        match side {
            Side::Player => column < half,
            Side::Opponent => column >= half,
        }
    }

    /// Reports whether a unit of `side` standing at `column` crossed the far edge.
    #[must_use]
    pub fn crossed_far_edge(&self, side: Side, column: f32) -> bool {
        match side {
            Side::Player => column >= self.columns as f32 - self.crossing_epsilon,
            Side::Opponent => column <= -self.crossing_epsilon,
        }
    }

    /// Checks the rules for values the simulation cannot operate with.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.lanes == 0 {
            return Err(RulesError::NoLanes);
        }
        if self.columns < 2 {
            return Err(RulesError::TooFewColumns(self.columns));
        }
        if !(self.max_wall_hp.is_finite() && self.max_wall_hp > 0.0) {
            return Err(RulesError::InvalidWallHp(self.max_wall_hp));
        }
        if self.starting_bolts > self.bolt_cap {
            return Err(RulesError::StartingBoltsAboveCap {
                starting: self.starting_bolts,
                cap: self.bolt_cap,
            });
        }
        if self.economy_interval.is_zero() {
            return Err(RulesError::ZeroInterval("economy_interval"));
        }
        if self.opponent_think_interval.is_zero() {
            return Err(RulesError::ZeroInterval("opponent_think_interval"));
        }
        if self.max_step.is_zero() {
            return Err(RulesError::ZeroInterval("max_step"));
        }
        if !(self.min_separation.is_finite() && self.min_separation >= 0.0) {
            return Err(RulesError::InvalidSeparation(self.min_separation));
        }
        Ok(())
    }
}

/// Reasons a [`MatchRules`] value is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RulesError {
    /// The board must contain at least one lane.
    #[error("the board needs at least one lane")]
    NoLanes,
    /// Each lane needs room for both walls.
    #[error("the board needs at least two columns, got {0}")]
    TooFewColumns(u32),
    /// Walls must start with positive, finite hit points.
    #[error("wall hit points must be positive, got {0}")]
    InvalidWallHp(f32),
    /// Starting balance may not exceed the cap.
    #[error("starting bolts {starting} exceed the cap of {cap}")]
    StartingBoltsAboveCap {
        /// Configured starting balance.
        starting: u32,
        /// Configured cap.
        cap: u32,
    },
    /// Periodic timers need a non-zero period.
    #[error("`{0}` must be greater than zero")]
    ZeroInterval(&'static str),
    /// Separation must be a non-negative distance.
    #[error("minimum separation must be non-negative, got {0}")]
    InvalidSeparation(f32),
}

mod seconds {
    use std::time::Duration;

    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}
