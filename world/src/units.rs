//! Authoritative unit state management utilities.

use std::time::Duration;

use lane_siege_core::{Side, StrikeTarget, UnitId, UnitKind, UnitSnapshot, UnitTypeSpec};

/// Mutable state of a single unit stored inside the world.
///
/// Dead units stay in the registry with `alive == false` so indices and
/// identifiers never shift during a tick.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Unit {
    pub(crate) id: UnitId,
    pub(crate) kind: UnitKind,
    pub(crate) side: Side,
    pub(crate) lane: u32,
    pub(crate) column: f32,
    pub(crate) hp: f32,
    pub(crate) max_hp: f32,
    pub(crate) cooldown: Duration,
    pub(crate) alive: bool,
    pub(crate) age: Duration,
    pub(crate) teleported: bool,
    pub(crate) last_target: Option<StrikeTarget>,
}

impl Unit {
    pub(crate) fn new(id: UnitId, kind: UnitKind, side: Side, lane: u32, column: f32) -> Self {
        let max_hp = kind.spec().max_hp;
        Self {
            id,
            kind,
            side,
            lane,
            column,
            hp: max_hp,
            max_hp,
            cooldown: Duration::ZERO,
            alive: true,
            age: Duration::ZERO,
            teleported: false,
            last_target: None,
        }
    }

    pub(crate) const fn spec(&self) -> &'static UnitTypeSpec {
        self.kind.spec()
    }

    /// Reports whether `self` is a living enemy of `other`.
    pub(crate) fn is_living_enemy_of(&self, other: &Unit) -> bool {
        self.alive && self.side != other.side
    }

    pub(crate) fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            id: self.id,
            kind: self.kind,
            side: self.side,
            lane: self.lane,
            column: self.column,
            hp: self.hp,
            max_hp: self.max_hp,
            alive: self.alive,
            age: self.age,
            cooldown: self.cooldown,
            teleported: self.teleported,
            last_target: self.last_target,
        }
    }
}

/// Registry that stores units and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct UnitRegistry {
    entries: Vec<Unit>,
    next_unit_id: UnitId,
}

impl UnitRegistry {
    /// Creates an empty registry whose first identifier is one.
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_unit_id: UnitId::new(1),
        }
    }

    /// Inserts a freshly placed unit and returns its identifier.
    pub(crate) fn insert(&mut self, kind: UnitKind, side: Side, lane: u32, column: f32) -> UnitId {
        let id = self.next_unit_id;
        self.next_unit_id = UnitId::new(id.get().saturating_add(1));
        self.entries.push(Unit::new(id, kind, side, lane, column));
        id
    }

    /// Lane and column of every living unit.
    pub(crate) fn occupants(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.entries
            .iter()
            .filter(|unit| unit.alive)
            .map(|unit| (unit.lane, unit.column))
    }

    pub(crate) fn get(&self, id: UnitId) -> Option<&Unit> {
        self.entries
            .binary_search_by_key(&id, |unit| unit.id)
            .ok()
            .map(|index| &self.entries[index])
    }

    pub(crate) fn as_slice(&self) -> &[Unit] {
        &self.entries
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Unit] {
        &mut self.entries
    }
}
