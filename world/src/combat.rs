//! Per-tick unit behavior, death resolution and the crossing check.
//!
//! Behaviors run sequentially in placement order against live state: a unit
//! acting later in the pass sees positions and hit points already changed by
//! earlier units. Units whose hit points drop to zero keep acting until
//! [`resolve_deaths`] runs after the whole pass.

use std::time::Duration;

use lane_siege_core::{Behavior, Event, MatchRules, Side, StrikeTarget, UnitId};

use crate::{board::Walls, units::Unit};

/// Column distance within which melee units strike.
const MELEE_REACH: f32 = 1.0;
/// Column distance within which cross-lane lasers burn.
const LASER_REACH: f32 = 0.45;
/// Lane and column half-extent of teleport and death blasts.
const BLAST_LANE_REACH: u32 = 1;
const BLAST_COLUMN_REACH: f32 = 1.0;

/// Mutable view over everything a behavior may touch during a tick.
pub(crate) struct Battlefield<'a> {
    pub(crate) units: &'a mut [Unit],
    pub(crate) walls: &'a mut Walls,
    pub(crate) events: &'a mut Vec<Event>,
}

type BehaviorFn = fn(&mut Battlefield<'_>, usize, f32);

fn behavior_fn(behavior: Behavior) -> BehaviorFn {
    match behavior {
        Behavior::MeleeAdvance => melee_advance,
        Behavior::RangedControl => ranged_control,
        Behavior::CrossLaneArea => cross_lane_area,
        Behavior::DelayedInfiltration => delayed_infiltration,
    }
}

/// Ages every living unit, ticks its cooldown and runs its behavior.
pub(crate) fn step_units(field: &mut Battlefield<'_>, dt: Duration) {
    let seconds = dt.as_secs_f32();
    for index in 0..field.units.len() {
        let unit = &mut field.units[index];
        if !unit.alive {
            continue;
        }
        unit.age = unit.age.saturating_add(dt);
        unit.cooldown = unit.cooldown.saturating_sub(dt);
        let behave = behavior_fn(unit.spec().behavior);
        behave(field, index, seconds);
    }
}

fn melee_advance(field: &mut Battlefield<'_>, index: usize, dt: f32) {
    let actor = field.units[index];
    let spec = actor.spec();
    let forward = actor.side.forward();

    let mut front: Option<(usize, f32)> = None;
    for (candidate_index, candidate) in field.units.iter().enumerate() {
        if !candidate.is_living_enemy_of(&actor) || candidate.lane != actor.lane {
            continue;
        }
        let distance = (candidate.column - actor.column) * forward;
        if distance > 0.0
            && distance <= MELEE_REACH
            && front.map_or(true, |(_, best)| distance < best)
        {
            front = Some((candidate_index, distance));
        }
    }

    if let Some((target, _)) = front {
        if actor.cooldown.is_zero() {
            strike_unit(field, index, target, spec.damage);
        }
        return;
    }

    let foe = actor.side.opponent();
    let wall = *field.walls.get(foe);
    let wall_distance = (wall.column - actor.column) * forward;
    if wall.alive && wall_distance > 0.0 && wall_distance <= MELEE_REACH {
        if actor.cooldown.is_zero() {
            strike_wall(field, index, foe, spec.damage);
        }
        return;
    }

    if !wall.alive || wall_distance > MELEE_REACH {
        field.units[index].column += forward * spec.speed * dt;
    }
}

fn ranged_control(field: &mut Battlefield<'_>, index: usize, _dt: f32) {
    let actor = field.units[index];
    if !actor.cooldown.is_zero() {
        return;
    }
    let spec = actor.spec();

    let mut nearest: Option<(usize, f32)> = None;
    for (candidate_index, candidate) in field.units.iter().enumerate() {
        if !candidate.is_living_enemy_of(&actor) || candidate.lane != actor.lane {
            continue;
        }
        let distance = (candidate.column - actor.column).abs();
        if nearest.map_or(true, |(_, best)| distance < best) {
            nearest = Some((candidate_index, distance));
        }
    }

    if let Some((target, _)) = nearest {
        strike_unit(field, index, target, spec.damage);
        return;
    }

    let foe = actor.side.opponent();
    if field.walls.get(foe).alive {
        strike_wall(field, index, foe, spec.damage);
    }
}

fn cross_lane_area(field: &mut Battlefield<'_>, index: usize, dt: f32) {
    let actor = field.units[index];
    let Some(dps) = actor.spec().laser_dps else {
        return;
    };
    let damage = dps * dt;

    let mut burned = None;
    for candidate in field.units.iter_mut() {
        if candidate.is_living_enemy_of(&actor)
            && candidate.lane.abs_diff(actor.lane) == 1
            && (candidate.column - actor.column).abs() <= LASER_REACH
        {
            candidate.hp -= damage;
            burned = Some(candidate.id);
        }
    }

    if let Some(target) = burned {
        field.units[index].last_target = Some(StrikeTarget::Unit(target));
    }
}

fn delayed_infiltration(field: &mut Battlefield<'_>, index: usize, dt: f32) {
    let actor = field.units[index];
    let spec = actor.spec();
    let forward = actor.side.forward();

    if !actor.teleported {
        let Some(teleport) = spec.teleport else {
            return;
        };
        if actor.age < teleport.delay {
            return;
        }

        let enemy_wall = field.walls.get(actor.side.opponent()).column;
        let landing = enemy_wall - teleport.landing_offset * forward;
        let unit = &mut field.units[index];
        unit.teleported = true;
        unit.column = landing;
        field.events.push(Event::UnitTeleported {
            unit: actor.id,
            from: actor.column,
            to: landing,
        });
        area_blast(field.units, actor.side, actor.lane, landing, teleport.blast);
    }

    field.units[index].column += forward * spec.speed * dt;
}

fn strike_unit(field: &mut Battlefield<'_>, attacker: usize, target: usize, damage: f32) {
    let target_id = field.units[target].id;
    field.units[target].hp -= damage;
    let unit = &mut field.units[attacker];
    unit.last_target = Some(StrikeTarget::Unit(target_id));
    reset_cooldown(unit);
    field.events.push(Event::UnitStruck {
        attacker: unit.id,
        target: target_id,
        damage,
    });
}

fn strike_wall(field: &mut Battlefield<'_>, attacker: usize, wall: Side, damage: f32) {
    let destroyed = field.walls.get_mut(wall).take_damage(damage);
    let unit = &mut field.units[attacker];
    unit.last_target = Some(StrikeTarget::Wall(wall));
    reset_cooldown(unit);
    field.events.push(Event::WallStruck {
        attacker: unit.id,
        wall,
        damage,
    });
    if destroyed {
        field.events.push(Event::WallDestroyed { side: wall });
    }
}

fn reset_cooldown(unit: &mut Unit) {
    if let Some(interval) = unit.spec().attack_interval() {
        unit.cooldown = interval;
    }
}

/// Damages every living enemy of `source` inside the square blast region.
fn area_blast(units: &mut [Unit], source: Side, lane: u32, column: f32, damage: f32) {
    for unit in units.iter_mut() {
        if unit.alive
            && unit.side != source
            && unit.lane.abs_diff(lane) <= BLAST_LANE_REACH
            && (unit.column - column).abs() <= BLAST_COLUMN_REACH
        {
            unit.hp -= damage;
        }
    }
}

/// Tombstones every unit whose hit points ran out and detonates death blasts.
///
/// Blasts may kill further units; the pass repeats until no unit with
/// non-positive hit points remains alive.
pub(crate) fn resolve_deaths(units: &mut [Unit], events: &mut Vec<Event>) {
    let mut blasts = Vec::new();
    loop {
        for unit in units.iter_mut() {
            if !unit.alive || unit.hp > 0.0 {
                continue;
            }
            unit.alive = false;
            unit.hp = 0.0;
            events.push(Event::UnitDestroyed {
                unit: unit.id,
                kind: unit.kind,
                side: unit.side,
            });
            if let Some(damage) = unit.spec().death_blast {
                blasts.push((unit.side, unit.lane, unit.column, damage));
            }
        }

        if blasts.is_empty() {
            break;
        }
        for (side, lane, column, damage) in blasts.drain(..) {
            area_blast(units, side, lane, column, damage);
        }
    }
}

/// Finds the first living victory-eligible unit that crossed a fallen wall's edge.
pub(crate) fn find_victor(
    units: &[Unit],
    walls: &Walls,
    rules: &MatchRules,
) -> Option<(Side, UnitId)> {
    units
        .iter()
        .find(|unit| {
            unit.alive
                && unit.spec().victory_eligible
                && !walls.get(unit.side.opponent()).alive
                && rules.crossed_far_edge(unit.side, unit.column)
        })
        .map(|unit| (unit.side, unit.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_siege_core::UnitKind;

    struct Arena {
        rules: MatchRules,
        units: Vec<Unit>,
        walls: Walls,
        events: Vec<Event>,
    }

    impl Arena {
        fn new() -> Self {
            Self::with_rules(MatchRules::default())
        }

        fn with_rules(rules: MatchRules) -> Self {
            let walls = Walls::new(&rules);
            Self {
                rules,
                units: Vec::new(),
                walls,
                events: Vec::new(),
            }
        }

        fn spawn(&mut self, kind: UnitKind, side: Side, lane: u32, column: f32) -> usize {
            let id = UnitId::new(self.units.len() as u32 + 1);
            self.units.push(Unit::new(id, kind, side, lane, column));
            self.units.len() - 1
        }

        fn tick(&mut self, dt: Duration) {
            let mut field = Battlefield {
                units: &mut self.units,
                walls: &mut self.walls,
                events: &mut self.events,
            };
            step_units(&mut field, dt);
            resolve_deaths(&mut self.units, &mut self.events);
        }
    }

    const FRAME: Duration = Duration::from_millis(100);

    #[test]
    fn walker_destroys_weak_wall_in_one_hit() {
        let mut arena = Arena::with_rules(MatchRules {
            max_wall_hp: 150.0,
            ..MatchRules::default()
        });
        let walker = arena.spawn(UnitKind::Walker, Side::Player, 2, 14.0);

        arena.tick(FRAME);

        let wall = arena.walls.get(Side::Opponent);
        assert_eq!(wall.hp, 0.0);
        assert!(!wall.alive);
        assert_eq!(arena.units[walker].column, 14.0, "walker attacks instead of moving");
        assert!(arena.events.contains(&Event::WallDestroyed {
            side: Side::Opponent
        }));
    }

    #[test]
    fn walker_holds_in_front_of_standing_wall_and_advances_once_it_falls() {
        let mut arena = Arena::new();
        let walker = arena.spawn(UnitKind::Walker, Side::Player, 0, 13.98);

        arena.tick(FRAME);
        let parked = arena.units[walker].column;
        assert!(parked > 13.98 && parked < 14.1);

        arena.walls.get_mut(Side::Opponent).alive = false;
        arena.tick(FRAME);
        assert!(arena.units[walker].column > parked);
    }

    #[test]
    fn walker_strikes_nearest_enemy_ahead_and_respects_cooldown() {
        let mut arena = Arena::new();
        let walker = arena.spawn(UnitKind::Walker, Side::Player, 1, 5.0);
        let far = arena.spawn(UnitKind::Ranger, Side::Opponent, 1, 5.9);
        let near = arena.spawn(UnitKind::Ranger, Side::Opponent, 1, 5.5);
        let _behind = arena.spawn(UnitKind::Ranger, Side::Opponent, 1, 4.5);

        arena.tick(FRAME);
        assert_eq!(arena.units[near].hp, 1_500.0 - 150.0);
        assert_eq!(arena.units[far].hp, 1_500.0);
        assert_eq!(arena.units[walker].column, 5.0);

        arena.tick(FRAME);
        assert_eq!(arena.units[near].hp, 1_500.0 - 150.0, "cooldown gates the next hit");
        assert_eq!(arena.units[walker].cooldown, Duration::from_millis(900));
    }

    #[test]
    fn ranger_shoots_closest_enemy_in_lane_regardless_of_range() {
        let mut arena = Arena::new();
        let ranger = arena.spawn(UnitKind::Ranger, Side::Opponent, 3, 12.0);
        let distant = arena.spawn(UnitKind::MiniWalker, Side::Player, 3, 1.0);
        let closer = arena.spawn(UnitKind::Walker, Side::Player, 3, 4.0);

        arena.tick(FRAME);

        assert_eq!(arena.units[closer].hp, 750.0 - 75.0);
        assert_eq!(arena.units[distant].hp, 150.0);
        assert_eq!(arena.units[ranger].cooldown, Duration::from_secs(2));
        assert_eq!(
            arena.units[ranger].last_target,
            Some(StrikeTarget::Unit(arena.units[closer].id))
        );
    }

    #[test]
    fn ranger_targets_wall_when_lane_is_clear() {
        let mut arena = Arena::new();
        let _ = arena.spawn(UnitKind::Ranger, Side::Player, 0, 3.0);

        arena.tick(FRAME);

        assert_eq!(arena.walls.get(Side::Opponent).hp, 2_500.0 - 75.0);
    }

    #[test]
    fn marker_burns_adjacent_lanes_only_while_in_contact() {
        let mut arena = Arena::new();
        let _ = arena.spawn(UnitKind::Marker, Side::Opponent, 2, 9.0);
        let adjacent = arena.spawn(UnitKind::Walker, Side::Player, 1, 9.4);
        let same_lane = arena.spawn(UnitKind::Ranger, Side::Player, 2, 9.0);
        let two_lanes_away = arena.spawn(UnitKind::Ranger, Side::Player, 4, 9.0);

        let dt = FRAME.as_secs_f32();
        arena.tick(FRAME);
        assert_eq!(arena.units[adjacent].hp, 750.0 - 250.0 * dt);
        assert_eq!(arena.units[same_lane].hp, 1_500.0);
        assert_eq!(arena.units[two_lanes_away].hp, 1_500.0);

        arena.units[adjacent].column = 9.5;
        let before = arena.units[adjacent].hp;
        arena.tick(FRAME);
        assert_eq!(arena.units[adjacent].hp, before);
    }

    #[test]
    fn infiltrator_waits_then_blasts_exactly_once() {
        let mut arena = Arena::new();
        let zoom = arena.spawn(UnitKind::TeleZoom, Side::Player, 2, 3.0);
        let victim = arena.spawn(UnitKind::Ranger, Side::Opponent, 3, 12.5);
        let spared = arena.spawn(UnitKind::Ranger, Side::Opponent, 2, 13.5);

        for _ in 0..9 {
            arena.tick(FRAME);
        }
        assert_eq!(arena.units[zoom].column, 3.0);
        assert_eq!(arena.units[victim].hp, 1_500.0);

        arena.tick(FRAME);
        let speed = UnitKind::TeleZoom.spec().speed;
        assert!(arena.units[zoom].teleported);
        assert_eq!(arena.units[zoom].column, 12.0 + speed * FRAME.as_secs_f32());
        assert_eq!(arena.units[victim].hp, 1_100.0);
        assert_eq!(arena.units[spared].hp, 1_500.0);

        for _ in 0..5 {
            arena.tick(FRAME);
        }
        assert_eq!(arena.units[victim].hp, 1_100.0);
        let teleports = arena
            .events
            .iter()
            .filter(|event| matches!(event, Event::UnitTeleported { .. }))
            .count();
        assert_eq!(teleports, 1);
    }

    #[test]
    fn opponent_infiltrator_lands_in_front_of_player_wall() {
        let mut arena = Arena::new();
        let zoom = arena.spawn(UnitKind::TeleZoom, Side::Opponent, 0, 10.0);
        arena.units[zoom].age = Duration::from_millis(950);

        arena.tick(FRAME);

        let speed = UnitKind::TeleZoom.spec().speed;
        assert_eq!(arena.units[zoom].column, 3.0 - speed * FRAME.as_secs_f32());
    }

    #[test]
    fn marker_death_blast_chains_and_clamps() {
        let mut arena = Arena::new();
        let marker = arena.spawn(UnitKind::Marker, Side::Opponent, 1, 9.0);
        let first = arena.spawn(UnitKind::MiniWalker, Side::Player, 0, 8.5);
        let diagonal = arena.spawn(UnitKind::MiniWalker, Side::Player, 2, 10.0);
        let outside = arena.spawn(UnitKind::MiniWalker, Side::Player, 3, 9.0);
        arena.units[marker].hp = -20.0;

        resolve_deaths(&mut arena.units, &mut arena.events);

        assert!(!arena.units[marker].alive);
        assert_eq!(arena.units[marker].hp, 0.0);
        for index in [first, diagonal] {
            assert!(!arena.units[index].alive);
            assert_eq!(arena.units[index].hp, 0.0);
        }
        assert!(arena.units[outside].alive);
        assert_eq!(arena.units[outside].hp, 150.0);
    }

    #[test]
    fn victor_requires_fallen_wall_and_crossing() {
        let mut arena = Arena::new();
        let walker = arena.spawn(UnitKind::Walker, Side::Player, 0, 15.97);
        let _ = arena.spawn(UnitKind::Ranger, Side::Player, 1, 15.99);

        assert_eq!(find_victor(&arena.units, &arena.walls, &arena.rules), None);

        arena.walls.get_mut(Side::Opponent).alive = false;
        assert_eq!(
            find_victor(&arena.units, &arena.walls, &arena.rules),
            Some((Side::Player, arena.units[walker].id))
        );
    }
}
