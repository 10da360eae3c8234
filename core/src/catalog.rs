//! Static combat parameters for every unit kind.
//!
//! The catalog is immutable for the lifetime of the process. Every system
//! resolves per-kind numbers through [`UnitKind::spec`] rather than copying
//! them, so a unit never caches stale tuning.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of unit kinds that can be placed on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitKind {
    /// Frontline breaker that marches forward and smashes whatever blocks the lane.
    Walker,
    /// Fast, fragile walker variant that attacks four times per second.
    MiniWalker,
    /// Stationary lane controller that shoots the closest enemy in its lane.
    Ranger,
    /// Stationary disruptor that burns enemies in adjacent lanes and explodes on death.
    Marker,
    /// Infiltrator that teleports in front of the enemy wall after a short delay.
    TeleZoom,
}

impl UnitKind {
    /// Every unit kind in catalog order.
    pub const ALL: [UnitKind; 5] = [
        UnitKind::Walker,
        UnitKind::MiniWalker,
        UnitKind::Ranger,
        UnitKind::Marker,
        UnitKind::TeleZoom,
    ];

    /// Immutable combat parameters associated with the kind.
    #[must_use]
    pub const fn spec(self) -> &'static UnitTypeSpec {
        match self {
            Self::Walker => &WALKER,
            Self::MiniWalker => &MINI_WALKER,
            Self::Ranger => &RANGER,
            Self::Marker => &MARKER,
            Self::TeleZoom => &TELE_ZOOM,
        }
    }

    /// Stable identifier used by adapters and configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Walker => "walker",
            Self::MiniWalker => "miniWalker",
            Self::Ranger => "ranger",
            Self::Marker => "marker",
            Self::TeleZoom => "teleZoom",
        }
    }

    /// Resolves a kind from its stable identifier.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raised when a textual unit identifier does not name a catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown unit kind `{0}`")]
pub struct UnknownUnitKind(pub String);

impl FromStr for UnitKind {
    type Err = UnknownUnitKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_name(value).ok_or_else(|| UnknownUnitKind(value.to_owned()))
    }
}

/// Looks up the catalog entry for a textual unit identifier.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static UnitTypeSpec> {
    UnitKind::from_name(name).map(UnitKind::spec)
}

/// Per-tick behavior a unit kind resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Behavior {
    /// Walks forward, striking the nearest enemy or wall directly ahead.
    MeleeAdvance,
    /// Stationary; shoots the closest enemy anywhere in its lane, else the wall.
    RangedControl,
    /// Stationary; applies continuous damage to enemies in adjacent lanes.
    CrossLaneArea,
    /// Idles, teleports next to the enemy wall with a blast, then creeps forward.
    DelayedInfiltration,
}

/// One-shot relocation parameters for infiltrating units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeleportSpec {
    /// Age a unit must reach before it relocates.
    pub delay: Duration,
    /// Damage dealt to each enemy caught in the arrival blast.
    pub blast: f32,
    /// Distance in columns between the landing column and the enemy wall.
    pub landing_offset: f32,
}

/// Immutable combat parameters for a single unit kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitTypeSpec {
    /// Bolts debited when the unit is placed.
    pub cost: u32,
    /// Hit points a freshly placed unit starts with.
    pub max_hp: f32,
    /// Linear speed in columns per second; zero for stationary kinds.
    pub speed: f32,
    /// Damage dealt per discrete attack.
    pub damage: f32,
    /// Discrete attacks per second; zero when the kind never attacks.
    pub attack_rate: f32,
    /// Whether the kind moves along its lane.
    pub moving: bool,
    /// Behavior dispatched for the kind each tick.
    pub behavior: Behavior,
    /// Whether crossing the enemy edge with this kind wins the match.
    pub victory_eligible: bool,
    /// Continuous cross-lane damage per second.
    pub laser_dps: Option<f32>,
    /// Damage dealt to nearby enemies when the unit dies.
    pub death_blast: Option<f32>,
    /// Delayed relocation parameters.
    pub teleport: Option<TeleportSpec>,
}

impl UnitTypeSpec {
    /// Cooldown applied after a discrete attack, if the kind attacks at all.
    #[must_use]
    pub fn attack_interval(&self) -> Option<Duration> {
        if self.attack_rate > 0.0 && self.attack_rate.is_finite() {
            Some(Duration::from_secs_f32(1.0 / self.attack_rate))
        } else {
            None
        }
    }
}

const WALKER: UnitTypeSpec = UnitTypeSpec {
    cost: 100,
    max_hp: 750.0,
    speed: 0.5,
    damage: 150.0,
    attack_rate: 1.0,
    moving: true,
    behavior: Behavior::MeleeAdvance,
    victory_eligible: true,
    laser_dps: None,
    death_blast: None,
    teleport: None,
};

const MINI_WALKER: UnitTypeSpec = UnitTypeSpec {
    cost: 50,
    max_hp: 150.0,
    speed: 1.0,
    damage: 75.0,
    attack_rate: 4.0,
    moving: true,
    behavior: Behavior::MeleeAdvance,
    victory_eligible: true,
    laser_dps: None,
    death_blast: None,
    teleport: None,
};

const RANGER: UnitTypeSpec = UnitTypeSpec {
    cost: 125,
    max_hp: 1_500.0,
    speed: 0.0,
    damage: 75.0,
    attack_rate: 0.5,
    moving: false,
    behavior: Behavior::RangedControl,
    victory_eligible: false,
    laser_dps: None,
    death_blast: None,
    teleport: None,
};

const MARKER: UnitTypeSpec = UnitTypeSpec {
    cost: 125,
    max_hp: 300.0,
    speed: 0.0,
    damage: 0.0,
    attack_rate: 0.0,
    moving: false,
    behavior: Behavior::CrossLaneArea,
    victory_eligible: false,
    laser_dps: Some(250.0),
    death_blast: Some(300.0),
    teleport: None,
};

const TELE_ZOOM: UnitTypeSpec = UnitTypeSpec {
    cost: 100,
    max_hp: 200.0,
    speed: 2.0 / 3.0,
    damage: 0.0,
    attack_rate: 0.0,
    moving: true,
    behavior: Behavior::DelayedInfiltration,
    victory_eligible: true,
    laser_dps: None,
    death_blast: None,
    teleport: Some(TeleportSpec {
        delay: Duration::from_secs(1),
        blast: 400.0,
        landing_offset: 3.0,
    }),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_back_to_their_kind() {
        for kind in UnitKind::ALL {
            assert_eq!(kind.name().parse::<UnitKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_names_are_reported() {
        assert_eq!(
            "tank".parse::<UnitKind>(),
            Err(UnknownUnitKind("tank".to_owned()))
        );
        assert!(lookup("tank").is_none());
    }

    #[test]
    fn victory_eligibility_covers_walkers_and_infiltrators() {
        let eligible: Vec<_> = UnitKind::ALL
            .into_iter()
            .filter(|kind| kind.spec().victory_eligible)
            .collect();
        assert_eq!(
            eligible,
            vec![UnitKind::Walker, UnitKind::MiniWalker, UnitKind::TeleZoom]
        );
    }

    #[test]
    fn attack_interval_inverts_rate() {
        assert_eq!(
            UnitKind::Walker.spec().attack_interval(),
            Some(Duration::from_secs(1))
        );
        assert_eq!(
            UnitKind::MiniWalker.spec().attack_interval(),
            Some(Duration::from_millis(250))
        );
        assert_eq!(
            UnitKind::Ranger.spec().attack_interval(),
            Some(Duration::from_secs(2))
        );
        assert_eq!(UnitKind::Marker.spec().attack_interval(), None);
    }

    #[test]
    fn only_stationary_kinds_have_zero_speed() {
        for kind in UnitKind::ALL {
            let spec = kind.spec();
            assert_eq!(spec.moving, spec.speed > 0.0, "{kind} speed mismatch");
        }
    }
}
