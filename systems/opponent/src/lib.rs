#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure decision system that places units on behalf of one side.
//!
//! The policy wakes up whenever the world announces [`Event::PolicyTurnDue`]
//! and inspects a [`UnitView`] snapshot. If the enemy is pushing melee or
//! infiltrating units down a lane it tries to plug that lane with a ranged or
//! area defender. Otherwise it sends a cheap attacker down a random lane.
//! All randomness flows through a [`DecisionSource`] so tests can script it.

use lane_siege_core::{
    can_place, Command, Event, MatchRules, Side, UnitKind, UnitSnapshot, UnitView,
};
use rand::Rng;

/// Supplies the random choices the policy makes each turn.
pub trait DecisionSource {
    /// Returns `true` with the provided probability.
    fn roll(&mut self, probability: f32) -> bool;

    /// Picks a lane uniformly from `0..lanes`.
    fn pick_lane(&mut self, lanes: u32) -> u32;
}

/// [`DecisionSource`] backed by any [`Rng`].
#[derive(Clone, Debug)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    /// Wraps the provided generator.
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DecisionSource for RngSource<R> {
    fn roll(&mut self, probability: f32) -> bool {
        self.rng.gen::<f32>() < probability
    }

    fn pick_lane(&mut self, lanes: u32) -> u32 {
        if lanes == 0 {
            return 0;
        }
        self.rng.gen_range(0..lanes)
    }
}

/// Knobs steering the policy, expressed from the right-hand side's point of view.
///
/// Columns are mirrored with `columns - 1 - column` when the policy plays the
/// left-hand side.
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyTuning {
    /// Minimum balance before a threatened lane is reinforced.
    pub defend_threshold: u32,
    /// Minimum balance before an attacker is sent.
    pub rush_threshold: u32,
    /// Chance of defending with a ranger rather than a marker.
    pub ranger_probability: f32,
    /// Chance of defending at the first forward column rather than the second.
    pub forward_column_probability: f32,
    /// Chance of rushing with a mini walker when a walker is affordable.
    pub light_rush_probability: f32,
    /// Candidate columns for defenders.
    pub forward_columns: [f32; 2],
    /// Column attackers are placed at.
    pub rear_column: f32,
}

impl Default for PolicyTuning {
    fn default() -> Self {
        Self {
            defend_threshold: 125,
            rush_threshold: 50,
            ranger_probability: 0.55,
            forward_column_probability: 0.5,
            light_rush_probability: 0.35,
            forward_columns: [11.0, 12.0],
            rear_column: 14.0,
        }
    }
}

/// Kinds that can win by crossing count as pressure on a lane.
const fn is_threat(kind: UnitKind) -> bool {
    kind.spec().victory_eligible
}

/// Opponent policy acting for a single side.
#[derive(Debug)]
pub struct OpponentPolicy {
    side: Side,
    tuning: PolicyTuning,
    threats: Vec<u32>,
}

impl OpponentPolicy {
    /// Creates a policy controlling `side`.
    #[must_use]
    pub fn new(side: Side, tuning: PolicyTuning) -> Self {
        Self {
            side,
            tuning,
            threats: Vec::new(),
        }
    }

    /// Side the policy places units for.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Tuning the policy was created with.
    #[must_use]
    pub const fn tuning(&self) -> &PolicyTuning {
        &self.tuning
    }

    /// Consumes world events and emits placement commands.
    ///
    /// The policy acts once per [`Event::PolicyTurnDue`] in `events`, each
    /// time against the same snapshot.
    pub fn handle(
        &mut self,
        events: &[Event],
        units: &UnitView,
        bolts: u32,
        rules: &MatchRules,
        source: &mut impl DecisionSource,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if matches!(event, Event::PolicyTurnDue) {
                if let Some(command) = self.decide(units, bolts, rules, source) {
                    out.push(command);
                }
            }
        }
    }

    fn decide(
        &mut self,
        units: &UnitView,
        bolts: u32,
        rules: &MatchRules,
        source: &mut impl DecisionSource,
    ) -> Option<Command> {
        let threatened = if bolts >= self.tuning.defend_threshold {
            self.most_threatened_lane(units, rules.lanes)
        } else {
            None
        };
        let tuning = &self.tuning;

        if let Some((lane, count)) = threatened {
            let kind = if source.roll(tuning.ranger_probability) {
                UnitKind::Ranger
            } else {
                UnitKind::Marker
            };
            let [first, second] = tuning.forward_columns;
            let column = if source.roll(tuning.forward_column_probability) {
                first
            } else {
                second
            };
            let column = self.localize(rules, column);

            match can_place(rules, self.side, lane, column, units.occupants()) {
                Ok(()) => {
                    tracing::debug!(
                        side = ?self.side,
                        lane,
                        threats = count,
                        %kind,
                        column,
                        "reinforcing threatened lane"
                    );
                    return Some(self.place(kind, lane, column));
                }
                Err(reason) => {
                    tracing::trace!(side = ?self.side, lane, %reason, "defender blocked");
                }
            }
        }

        if bolts < tuning.rush_threshold {
            return None;
        }

        let lane = source.pick_lane(rules.lanes);
        let column = self.localize(rules, tuning.rear_column);
        let kind = if bolts >= UnitKind::Walker.spec().cost {
            if source.roll(tuning.light_rush_probability) {
                UnitKind::MiniWalker
            } else {
                UnitKind::Walker
            }
        } else {
            UnitKind::MiniWalker
        };
        tracing::debug!(side = ?self.side, lane, %kind, column, "sending attacker");
        Some(self.place(kind, lane, column))
    }

    /// First lane holding the most living enemy threats, if any exist.
    fn most_threatened_lane(&mut self, units: &UnitView, lanes: u32) -> Option<(u32, u32)> {
        self.threats.clear();
        self.threats.resize(lanes as usize, 0);

        let enemy = self.side.opponent();
        for unit in units.living().filter(|unit| is_threatening(unit, enemy)) {
            if let Some(count) = self.threats.get_mut(unit.lane as usize) {
                *count += 1;
            }
        }

        let mut best: Option<(u32, u32)> = None;
        for (lane, &count) in (0u32..).zip(self.threats.iter()) {
            if count > best.map_or(0, |(_, top)| top) {
                best = Some((lane, count));
            }
        }
        best
    }

    fn localize(&self, rules: &MatchRules, column: f32) -> f32 {
        match self.side {
            Side::Opponent => column,
            Side::Player => rules.columns as f32 - 1.0 - column,
        }
    }

    fn place(&self, kind: UnitKind, lane: u32, column: f32) -> Command {
        Command::PlaceUnit {
            side: self.side,
            kind,
            lane,
            column,
        }
    }
}

fn is_threatening(unit: &UnitSnapshot, enemy: Side) -> bool {
    unit.side == enemy && is_threat(unit.kind)
}
