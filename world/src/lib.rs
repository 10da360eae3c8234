#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Siege.

mod board;
mod combat;
mod units;

use std::time::Duration;

use lane_siege_core::{
    can_place, check_affordable, Command, Event, MatchOutcome, MatchRules, PlacementError,
    RulesError, Side, UnitId, UnitKind,
};

use crate::{
    board::{Bolts, Walls},
    combat::Battlefield,
    units::UnitRegistry,
};

/// Represents the authoritative Lane Siege world state.
#[derive(Debug)]
pub struct World {
    rules: MatchRules,
    units: UnitRegistry,
    walls: Walls,
    bolts: Bolts,
    economy_timer: Duration,
    think_timer: Duration,
    elapsed: Duration,
    outcome: MatchOutcome,
}

impl World {
    /// Creates a new world using the default match rules.
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_rules(MatchRules::default())
    }

    /// Creates a new world governed by the provided rules.
    ///
    /// Rules that [`MatchRules::validate`] refuses are returned as an error.
    pub fn with_rules(rules: MatchRules) -> Result<Self, RulesError> {
        rules.validate()?;
        Ok(Self::from_valid_rules(rules))
    }

    fn from_valid_rules(rules: MatchRules) -> Self {
        Self {
            units: UnitRegistry::new(),
            walls: Walls::new(&rules),
            bolts: Bolts::new(&rules),
            economy_timer: Duration::ZERO,
            think_timer: Duration::ZERO,
            elapsed: Duration::ZERO,
            outcome: MatchOutcome::Ongoing,
            rules,
        }
    }

    fn reset(&mut self) {
        let rules = self.rules.clone();
        *self = Self::from_valid_rules(rules);
    }

    fn advance_clock(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.elapsed = self.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        self.economy_timer = self.economy_timer.saturating_add(dt);
        while self.economy_timer >= self.rules.economy_interval {
            self.economy_timer -= self.rules.economy_interval;
            self.bolts.grant(self.rules.economy_gain);
            out_events.push(Event::BoltsGranted {
                amount: self.rules.economy_gain,
            });
        }

        self.think_timer = self.think_timer.saturating_add(dt);
        if self.think_timer >= self.rules.opponent_think_interval {
            self.think_timer = Duration::ZERO;
            out_events.push(Event::PolicyTurnDue);
        }
    }

    fn place_unit(
        &mut self,
        side: Side,
        kind: UnitKind,
        lane: u32,
        column: f32,
    ) -> Result<UnitId, PlacementError> {
        if self.outcome.is_over() {
            return Err(PlacementError::MatchOver);
        }
        can_place(&self.rules, side, lane, column, self.units.occupants())?;
        check_affordable(self.bolts.get(side), kind)?;

        self.bolts.spend(side, kind.spec().cost);
        Ok(self.units.insert(kind, side, lane, column))
    }

    fn step_units(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let mut field = Battlefield {
            units: self.units.as_mut_slice(),
            walls: &mut self.walls,
            events: &mut *out_events,
        };
        combat::step_units(&mut field, dt);
        combat::resolve_deaths(self.units.as_mut_slice(), out_events);

        if let Some((winner, unit)) =
            combat::find_victor(self.units.as_slice(), &self.walls, &self.rules)
        {
            self.outcome = MatchOutcome::Won(winner);
            out_events.push(Event::MatchWon { winner, unit });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the match has a winner, clock and unit commands are ignored and
/// placements are rejected with [`PlacementError::MatchOver`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::AdvanceClock { dt } => {
            if world.outcome.is_over() || dt.is_zero() {
                return;
            }
            world.advance_clock(dt, out_events);
        }
        Command::PlaceUnit {
            side,
            kind,
            lane,
            column,
        } => match world.place_unit(side, kind, lane, column) {
            Ok(unit) => out_events.push(Event::UnitPlaced {
                unit,
                kind,
                side,
                lane,
                column,
            }),
            Err(reason) => out_events.push(Event::PlacementRejected {
                side,
                kind,
                lane,
                column,
                reason,
            }),
        },
        Command::StepUnits { dt } => {
            if world.outcome.is_over() || dt.is_zero() {
                return;
            }
            world.step_units(dt, out_events);
        }
        Command::ResetMatch => {
            world.reset();
            out_events.push(Event::MatchReset);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use lane_siege_core::{
        MatchOutcome, MatchRules, Side, UnitId, UnitSnapshot, UnitView, WallSnapshot,
    };

    /// Provides read-only access to the rules governing the match.
    #[must_use]
    pub fn rules(world: &World) -> &MatchRules {
        &world.rules
    }

    /// Captures a read-only view of every unit placed so far, dead ones included.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        UnitView::from_snapshots(
            world
                .units
                .as_slice()
                .iter()
                .map(|unit| unit.snapshot())
                .collect(),
        )
    }

    /// Captures the state of a single unit.
    #[must_use]
    pub fn unit(world: &World, id: UnitId) -> Option<UnitSnapshot> {
        world.units.get(id).map(|unit| unit.snapshot())
    }

    /// Captures the state of the wall owned by `side`.
    #[must_use]
    pub fn wall(world: &World, side: Side) -> WallSnapshot {
        world.walls.get(side).snapshot()
    }

    /// Current bolt balance of `side`.
    #[must_use]
    pub fn bolts(world: &World, side: Side) -> u32 {
        world.bolts.get(side)
    }

    /// Terminal state of the match, if reached.
    #[must_use]
    pub fn outcome(world: &World) -> MatchOutcome {
        world.outcome
    }

    /// Total simulated time since the match started.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(100);

    fn place(world: &mut World, side: Side, kind: UnitKind, lane: u32, column: f32) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::PlaceUnit {
                side,
                kind,
                lane,
                column,
            },
            &mut events,
        );
        events
    }

    fn tick(world: &mut World, out_events: &mut Vec<Event>) {
        apply(world, Command::AdvanceClock { dt: FRAME }, out_events);
        apply(world, Command::StepUnits { dt: FRAME }, out_events);
    }

    #[test]
    fn placement_debits_cost_and_rejects_crowding() {
        let mut world = World::new();

        let events = place(&mut world, Side::Player, UnitKind::Walker, 2, 3.0);
        assert!(matches!(
            events.as_slice(),
            [Event::UnitPlaced { unit, .. }] if *unit == UnitId::new(1)
        ));
        assert_eq!(query::bolts(&world, Side::Player), 100);

        let events = place(&mut world, Side::Player, UnitKind::Walker, 2, 3.0);
        assert!(matches!(
            events.as_slice(),
            [Event::PlacementRejected {
                reason: PlacementError::Occupied,
                ..
            }]
        ));
        assert_eq!(query::bolts(&world, Side::Player), 100);
    }

    #[test]
    fn placement_requires_sufficient_bolts() {
        let mut world = World::new();
        let _ = place(&mut world, Side::Opponent, UnitKind::Ranger, 0, 12.0);

        let events = place(&mut world, Side::Opponent, UnitKind::Marker, 1, 12.0);
        assert!(matches!(
            events.as_slice(),
            [Event::PlacementRejected {
                reason: PlacementError::InsufficientBolts,
                ..
            }]
        ));
        assert_eq!(query::bolts(&world, Side::Opponent), 75);
        assert_eq!(query::unit_view(&world).len(), 1);
    }

    #[test]
    fn economy_pays_every_interval_and_keeps_remainder() {
        let mut world = World::new();
        let mut events = Vec::new();

        for _ in 0..39 {
            apply(&mut world, Command::AdvanceClock { dt: FRAME }, &mut events);
        }
        assert_eq!(query::bolts(&world, Side::Player), 200);

        apply(&mut world, Command::AdvanceClock { dt: FRAME }, &mut events);
        assert_eq!(query::bolts(&world, Side::Player), 250);
        assert_eq!(query::bolts(&world, Side::Opponent), 250);
        assert_eq!(world.economy_timer, Duration::ZERO);

        apply(
            &mut world,
            Command::AdvanceClock {
                dt: Duration::from_millis(4_300),
            },
            &mut events,
        );
        assert_eq!(query::bolts(&world, Side::Player), 300);
        assert_eq!(world.economy_timer, Duration::from_millis(300));
    }

    #[test]
    fn policy_turn_is_announced_every_think_interval() {
        let mut world = World::new();
        let mut events = Vec::new();

        for _ in 0..36 {
            apply(&mut world, Command::AdvanceClock { dt: FRAME }, &mut events);
        }

        let turns = events
            .iter()
            .filter(|event| matches!(event, Event::PolicyTurnDue))
            .count();
        assert_eq!(turns, 2);
        assert_eq!(world.think_timer, Duration::ZERO);
    }

    #[test]
    fn zero_delta_is_a_no_op() {
        let mut world = World::new();
        let _ = place(&mut world, Side::Player, UnitKind::Walker, 0, 1.0);
        let mut events = Vec::new();

        apply(&mut world, Command::AdvanceClock { dt: Duration::ZERO }, &mut events);
        apply(&mut world, Command::StepUnits { dt: Duration::ZERO }, &mut events);

        assert!(events.is_empty());
        assert_eq!(query::elapsed(&world), Duration::ZERO);
        let walker = query::unit(&world, UnitId::new(1)).expect("walker");
        assert_eq!(walker.column, 1.0);
        assert!(walker.age.is_zero());
    }

    #[test]
    fn crossing_after_wall_falls_wins_once_and_freezes() {
        let mut world = World::with_rules(MatchRules {
            max_wall_hp: 150.0,
            ..MatchRules::default()
        })
        .expect("rules are valid");
        let _ = place(&mut world, Side::Player, UnitKind::Walker, 0, 7.0);
        let mut events = Vec::new();

        for _ in 0..400 {
            if query::outcome(&world).is_over() {
                break;
            }
            tick(&mut world, &mut events);
        }

        assert_eq!(query::outcome(&world), MatchOutcome::Won(Side::Player));
        assert!(!query::wall(&world, Side::Opponent).alive);
        let wins = events
            .iter()
            .filter(|event| matches!(event, Event::MatchWon { .. }))
            .count();
        assert_eq!(wins, 1);

        let frozen = query::unit_view(&world).into_vec();
        let frozen_bolts = query::bolts(&world, Side::Player);
        let mut after = Vec::new();
        for _ in 0..50 {
            tick(&mut world, &mut after);
        }
        assert!(after.is_empty());
        assert_eq!(query::unit_view(&world).into_vec(), frozen);
        assert_eq!(query::bolts(&world, Side::Player), frozen_bolts);

        let events = place(&mut world, Side::Player, UnitKind::MiniWalker, 1, 1.0);
        assert!(matches!(
            events.as_slice(),
            [Event::PlacementRejected {
                reason: PlacementError::MatchOver,
                ..
            }]
        ));
    }

    #[test]
    fn rules_with_zero_intervals_are_refused() {
        let zero_economy = MatchRules {
            economy_interval: Duration::ZERO,
            ..MatchRules::default()
        };
        assert!(matches!(
            World::with_rules(zero_economy),
            Err(RulesError::ZeroInterval("economy_interval"))
        ));

        let zero_think = MatchRules {
            opponent_think_interval: Duration::ZERO,
            ..MatchRules::default()
        };
        assert!(matches!(
            World::with_rules(zero_think),
            Err(RulesError::ZeroInterval("opponent_think_interval"))
        ));
    }

    #[test]
    fn clock_settles_when_a_step_spans_many_payouts() {
        let mut world = World::with_rules(MatchRules {
            economy_interval: Duration::from_millis(1),
            bolt_cap: 10_000,
            ..MatchRules::default()
        })
        .expect("rules are valid");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::AdvanceClock {
                dt: Duration::from_millis(100),
            },
            &mut events,
        );

        let payouts = events
            .iter()
            .filter(|event| matches!(event, Event::BoltsGranted { .. }))
            .count();
        assert_eq!(payouts, 100);
        assert_eq!(query::bolts(&world, Side::Player), 200 + 100 * 50);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut world = World::new();
        let _ = place(&mut world, Side::Player, UnitKind::Walker, 0, 1.0);
        let mut events = Vec::new();
        tick(&mut world, &mut events);

        apply(&mut world, Command::ResetMatch, &mut events);

        assert!(query::unit_view(&world).is_empty());
        assert_eq!(query::bolts(&world, Side::Player), 200);
        assert_eq!(query::elapsed(&world), Duration::ZERO);
        assert_eq!(events.last(), Some(&Event::MatchReset));
        let _ = place(&mut world, Side::Player, UnitKind::Walker, 0, 1.0);
        assert!(query::unit(&world, UnitId::new(1)).is_some());
    }
}
