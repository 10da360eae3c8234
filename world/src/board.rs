//! Walls and bolt balances owned by each side.

use lane_siege_core::{MatchRules, Side, WallSnapshot};

/// Destructible objective guarding one end of every lane.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WallState {
    pub(crate) side: Side,
    pub(crate) hp: f32,
    pub(crate) max_hp: f32,
    pub(crate) alive: bool,
    pub(crate) column: f32,
}

impl WallState {
    fn new(rules: &MatchRules, side: Side) -> Self {
        Self {
            side,
            hp: rules.max_wall_hp,
            max_hp: rules.max_wall_hp,
            alive: true,
            column: rules.wall_column(side),
        }
    }

    /// Applies damage and returns `true` when this hit destroyed the wall.
    pub(crate) fn take_damage(&mut self, damage: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.hp -= damage;
        if self.hp <= 0.0 {
            self.hp = 0.0;
            self.alive = false;
            return true;
        }
        false
    }

    pub(crate) fn snapshot(&self) -> WallSnapshot {
        WallSnapshot {
            side: self.side,
            hp: self.hp,
            max_hp: self.max_hp,
            alive: self.alive,
            column: self.column,
        }
    }
}

/// Pair of walls indexed by owner.
#[derive(Clone, Debug)]
pub(crate) struct Walls {
    player: WallState,
    opponent: WallState,
}

impl Walls {
    pub(crate) fn new(rules: &MatchRules) -> Self {
        Self {
            player: WallState::new(rules, Side::Player),
            opponent: WallState::new(rules, Side::Opponent),
        }
    }

    pub(crate) const fn get(&self, side: Side) -> &WallState {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub(crate) fn get_mut(&mut self, side: Side) -> &mut WallState {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }
}

/// Spendable balances of both sides, bounded by the rules' cap.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Bolts {
    player: u32,
    opponent: u32,
    cap: u32,
}

impl Bolts {
    pub(crate) fn new(rules: &MatchRules) -> Self {
        let starting = rules.starting_bolts.min(rules.bolt_cap);
        Self {
            player: starting,
            opponent: starting,
            cap: rules.bolt_cap,
        }
    }

    pub(crate) const fn get(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player,
            Side::Opponent => self.opponent,
        }
    }

    /// Credits both sides, saturating at the cap.
    pub(crate) fn grant(&mut self, amount: u32) {
        self.player = self.player.saturating_add(amount).min(self.cap);
        self.opponent = self.opponent.saturating_add(amount).min(self.cap);
    }

    /// Debits `cost` from `side`; callers check affordability first.
    pub(crate) fn spend(&mut self, side: Side, cost: u32) {
        let balance = match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        };
        *balance = balance.saturating_sub(cost);
    }
}
