#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-driven facade that owns a Lane Siege match.
//!
//! [`Simulation`] pumps commands through the authoritative world, lets the
//! decision policies react to the cadence events the world emits, and exposes
//! read-only state between ticks. Hosts call [`Simulation::advance`] once per
//! frame and [`Simulation::request_placement`] for human input.

use std::time::Duration;

use lane_siege_core::{
    Command, Event, MatchOutcome, MatchRules, PlacementError, RulesError, Side, UnitId, UnitKind,
    UnitSnapshot, UnitView, WallSnapshot,
};
use lane_siege_system_opponent::{DecisionSource, OpponentPolicy, PolicyTuning, RngSource};
use lane_siege_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Decision source used when a match is created from a seed.
pub type SeededSource = RngSource<ChaCha8Rng>;

/// Owns the world, the decision policies and their random source.
#[derive(Debug)]
pub struct Simulation<S = SeededSource> {
    world: World,
    opponent: Option<OpponentPolicy>,
    autopilot: Option<OpponentPolicy>,
    source: S,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Simulation {
    /// Creates a match whose policy randomness is derived from `seed`.
    pub fn new(rules: MatchRules, seed: u64) -> Result<Self, RulesError> {
        Self::with_source(rules, RngSource::new(ChaCha8Rng::seed_from_u64(seed)))
    }
}

impl<S: DecisionSource> Simulation<S> {
    /// Creates a match drawing policy decisions from `source`.
    ///
    /// The right-hand side is driven by an [`OpponentPolicy`] with default
    /// tuning; the left-hand side waits for [`Self::request_placement`].
    pub fn with_source(rules: MatchRules, source: S) -> Result<Self, RulesError> {
        tracing::debug!(?rules, "starting match");
        Ok(Self {
            world: World::with_rules(rules)?,
            opponent: Some(OpponentPolicy::new(
                Side::Opponent,
                PolicyTuning::default(),
            )),
            autopilot: None,
            source,
            events: Vec::new(),
            commands: Vec::new(),
        })
    }

    /// Removes the opponent policy so only explicit requests place units.
    #[must_use]
    pub fn sandbox(mut self) -> Self {
        self.opponent = None;
        self
    }

    /// Replaces the opponent policy's tuning.
    #[must_use]
    pub fn with_opponent_tuning(mut self, tuning: PolicyTuning) -> Self {
        self.opponent = Some(OpponentPolicy::new(Side::Opponent, tuning));
        self
    }

    /// Lets a second policy instance play the left-hand side.
    #[must_use]
    pub fn with_autopilot(mut self, tuning: PolicyTuning) -> Self {
        self.autopilot = Some(OpponentPolicy::new(Side::Player, tuning));
        self
    }

    /// Runs one simulation step and returns the events it produced.
    ///
    /// `dt` is clamped to the rules' maximum step. A zero step, or any step
    /// after the match was decided, changes nothing.
    pub fn advance(&mut self, dt: Duration) -> &[Event] {
        self.events.clear();
        if dt.is_zero() || self.outcome().is_over() {
            return &self.events;
        }
        let dt = dt.min(self.rules().max_step);

        world::apply(&mut self.world, Command::AdvanceClock { dt }, &mut self.events);
        self.run_policies();
        world::apply(&mut self.world, Command::StepUnits { dt }, &mut self.events);

        log_events(&self.events);
        &self.events
    }

    /// Convenience wrapper over [`Self::advance`] for hosts measuring frames in seconds.
    ///
    /// Negative and non-finite deltas are treated as zero, except positive
    /// infinity which is clamped like any oversized step.
    pub fn advance_secs(&mut self, secs: f32) -> &[Event] {
        let dt = if secs > 0.0 {
            Duration::try_from_secs_f32(secs).unwrap_or(self.rules().max_step)
        } else {
            Duration::ZERO
        };
        self.advance(dt)
    }

    /// Attempts to place a unit for `side`.
    ///
    /// Nothing changes when the request is rejected.
    pub fn request_placement(
        &mut self,
        side: Side,
        kind: UnitKind,
        lane: u32,
        column: f32,
    ) -> Result<UnitId, PlacementError> {
        let first = self.events.len();
        world::apply(
            &mut self.world,
            Command::PlaceUnit {
                side,
                kind,
                lane,
                column,
            },
            &mut self.events,
        );
        let answer = &self.events[first..];
        log_events(answer);

        // Every placement command is answered with exactly one event.
        answer
            .iter()
            .find_map(|event| match event {
                Event::UnitPlaced { unit, .. } => Some(Ok(*unit)),
                Event::PlacementRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(PlacementError::MatchOver))
    }

    /// Attempts to place a unit identified by its catalog name.
    pub fn request_placement_named(
        &mut self,
        side: Side,
        kind: &str,
        lane: u32,
        column: f32,
    ) -> Result<UnitId, PlacementError> {
        let Ok(kind) = kind.parse::<UnitKind>() else {
            tracing::debug!(?side, kind, "unknown unit kind requested");
            return Err(PlacementError::UnknownKind);
        };
        self.request_placement(side, kind, lane, column)
    }

    /// Restores the initial match state, keeping rules and policies.
    pub fn reset(&mut self) {
        self.events.clear();
        world::apply(&mut self.world, Command::ResetMatch, &mut self.events);
        tracing::info!("match reset");
    }

    /// Events produced by the last step, followed by any placements requested since.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Rules governing the match.
    #[must_use]
    pub fn rules(&self) -> &MatchRules {
        query::rules(&self.world)
    }

    /// Snapshot of every unit placed so far.
    #[must_use]
    pub fn units(&self) -> UnitView {
        query::unit_view(&self.world)
    }

    /// Snapshot of a single unit.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<UnitSnapshot> {
        query::unit(&self.world, id)
    }

    /// Snapshot of the wall owned by `side`.
    #[must_use]
    pub fn wall(&self, side: Side) -> WallSnapshot {
        query::wall(&self.world, side)
    }

    /// Spendable balance of `side`.
    #[must_use]
    pub fn bolts(&self, side: Side) -> u32 {
        query::bolts(&self.world, side)
    }

    /// Current match outcome.
    #[must_use]
    pub fn outcome(&self) -> MatchOutcome {
        query::outcome(&self.world)
    }

    /// Simulated time accumulated since the match started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        query::elapsed(&self.world)
    }

    /// Underlying world for callers needing direct queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    fn run_policies(&mut self) {
        let Self {
            world,
            opponent,
            autopilot,
            source,
            events,
            commands,
        } = self;
        let clock_events = events.len();

        for policy in [opponent.as_mut(), autopilot.as_mut()].into_iter().flatten() {
            let units = query::unit_view(world);
            let bolts = query::bolts(world, policy.side());
            commands.clear();
            policy.handle(
                &events[..clock_events],
                &units,
                bolts,
                query::rules(world),
                &mut *source,
                commands,
            );
            for command in commands.drain(..) {
                world::apply(world, command, events);
            }
        }
    }
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::UnitPlaced {
                unit,
                kind,
                side,
                lane,
                column,
            } => tracing::debug!(unit = unit.get(), %kind, ?side, lane, column, "unit placed"),
            Event::PlacementRejected {
                side,
                kind,
                lane,
                column,
                reason,
            } => tracing::debug!(?side, %kind, lane, column, %reason, "placement rejected"),
            Event::UnitDestroyed { unit, kind, side } => {
                tracing::trace!(unit = unit.get(), %kind, ?side, "unit destroyed");
            }
            Event::WallDestroyed { side } => tracing::info!(?side, "wall destroyed"),
            Event::MatchWon { winner, unit } => {
                tracing::info!(?winner, unit = unit.get(), "match decided");
            }
            _ => {}
        }
    }
}
