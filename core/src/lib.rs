#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Siege engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that systems and presentation layers react to. Read-only snapshots such as
//! [`UnitView`] and [`WallSnapshot`] are the only way state leaves the world.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod catalog;
mod placement;
mod rules;

pub use catalog::{Behavior, TeleportSpec, UnitKind, UnitTypeSpec, UnknownUnitKind};
pub use placement::{can_place, check_affordable, PlacementError};
pub use rules::{MatchRules, RulesError};

/// One of the two factions contesting the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// Human-controlled side defending the left wall and advancing right.
    Player,
    /// Policy-controlled side defending the right wall and advancing left.
    Opponent,
}

impl Side {
    /// Both sides in a stable order.
    pub const ALL: [Side; 2] = [Side::Player, Side::Opponent];

    /// The side this one fights against.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Opponent,
            Self::Opponent => Self::Player,
        }
    }

    /// Sign of the column delta when units of this side advance.
    #[must_use]
    pub const fn forward(self) -> f32 {
        match self {
            Self::Player => 1.0,
            Self::Opponent => -1.0,
        }
    }
}

/// Unique identifier assigned to a unit, increasing in placement order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// What a unit last aimed an attack at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrikeTarget {
    /// Another unit.
    Unit(UnitId),
    /// The wall owned by the given side.
    Wall(Side),
}

/// Terminal state of the match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// Nobody has won yet.
    #[default]
    Ongoing,
    /// The given side crossed the enemy edge after felling its wall.
    Won(Side),
}

impl MatchOutcome {
    /// Reports whether the match reached a terminal state.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Won(_))
    }

    /// Side that won the match, if any.
    #[must_use]
    pub const fn winner(self) -> Option<Side> {
        match self {
            Self::Ongoing => None,
            Self::Won(side) => Some(side),
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Advances the economy and decision timers by the provided delta time.
    AdvanceClock {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that `side` spend bolts to place a unit.
    PlaceUnit {
        /// Side paying for and owning the unit.
        side: Side,
        /// Kind of unit to place.
        kind: UnitKind,
        /// Lane the unit is placed in.
        lane: u32,
        /// Column the unit is placed at.
        column: f32,
    },
    /// Runs unit behaviors, death resolution and the win check for one tick.
    StepUnits {
        /// Duration of simulated time the units act over.
        dt: Duration,
    },
    /// Restores walls, balances and timers and removes every unit.
    ResetMatch,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports an economy payout to both sides.
    BoltsGranted {
        /// Bolts offered to each side before the cap was applied.
        amount: u32,
    },
    /// Signals that decision policies should act once.
    PolicyTurnDue,
    /// Confirms that a unit was placed on the board.
    UnitPlaced {
        /// Identifier assigned to the new unit.
        unit: UnitId,
        /// Kind of the new unit.
        kind: UnitKind,
        /// Owner of the new unit.
        side: Side,
        /// Lane the unit occupies.
        lane: u32,
        /// Column the unit occupies.
        column: f32,
    },
    /// Reports that a placement request was rejected without mutation.
    PlacementRejected {
        /// Side that issued the request.
        side: Side,
        /// Kind requested.
        kind: UnitKind,
        /// Lane requested.
        lane: u32,
        /// Column requested.
        column: f32,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// A unit landed a discrete attack on another unit.
    UnitStruck {
        /// Unit that attacked.
        attacker: UnitId,
        /// Unit that was hit.
        target: UnitId,
        /// Damage dealt.
        damage: f32,
    },
    /// A unit landed a discrete attack on a wall.
    WallStruck {
        /// Unit that attacked.
        attacker: UnitId,
        /// Owner of the wall that was hit.
        wall: Side,
        /// Damage dealt.
        damage: f32,
    },
    /// An infiltrator relocated next to the enemy wall.
    UnitTeleported {
        /// Unit that relocated.
        unit: UnitId,
        /// Column before the jump.
        from: f32,
        /// Column after the jump.
        to: f32,
    },
    /// A unit's hit points were exhausted.
    UnitDestroyed {
        /// Unit that died.
        unit: UnitId,
        /// Kind of the unit that died.
        kind: UnitKind,
        /// Owner of the unit that died.
        side: Side,
    },
    /// A wall was destroyed and can no longer block crossings.
    WallDestroyed {
        /// Owner of the destroyed wall.
        side: Side,
    },
    /// The match ended.
    MatchWon {
        /// Winning side.
        winner: Side,
        /// Unit whose crossing decided the match.
        unit: UnitId,
    },
    /// The world returned to its initial state.
    MatchReset,
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Kind of the unit.
    pub kind: UnitKind,
    /// Owner of the unit.
    pub side: Side,
    /// Lane the unit occupies.
    pub lane: u32,
    /// Continuous column position.
    pub column: f32,
    /// Remaining hit points.
    pub hp: f32,
    /// Hit points the unit was placed with.
    pub max_hp: f32,
    /// Whether the unit still participates in the simulation.
    pub alive: bool,
    /// Time since the unit was placed.
    pub age: Duration,
    /// Time until the unit may attack again.
    pub cooldown: Duration,
    /// Whether the unit already used its one-shot relocation.
    pub teleported: bool,
    /// Most recent target of a discrete attack, for effects rendering.
    pub last_target: Option<StrikeTarget>,
}

/// Read-only snapshot describing every unit ever placed, dead ones included.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over units that are still alive.
    pub fn living(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter().filter(|snapshot| snapshot.alive)
    }

    /// Lane and column of every living unit, as consumed by [`can_place`].
    pub fn occupants(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.living().map(|snapshot| (snapshot.lane, snapshot.column))
    }

    /// Finds the snapshot for `id`.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&UnitSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no unit was ever placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a wall used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSnapshot {
    /// Owner of the wall.
    pub side: Side,
    /// Remaining hit points, never negative.
    pub hp: f32,
    /// Hit points the wall started with.
    pub max_hp: f32,
    /// Whether the wall still stands.
    pub alive: bool,
    /// Column the wall occupies.
    pub column: f32,
}
