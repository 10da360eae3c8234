//! Pure placement validation shared by the world and decision systems.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{MatchRules, Side, UnitKind};

/// Reasons a unit placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The match already has a winner.
    #[error("the match is over")]
    MatchOver,
    /// The requested unit identifier does not name a catalog entry.
    #[error("unknown unit kind")]
    UnknownKind,
    /// The lane index lies outside the board.
    #[error("lane is outside the board")]
    LaneOutOfRange,
    /// The column lies outside the board.
    #[error("column is outside the board")]
    ColumnOutOfRange,
    /// The column belongs to the other side's half of the board.
    #[error("column belongs to the other side")]
    WrongHalf,
    /// A living unit in the lane stands closer than the minimum separation.
    #[error("lane position is occupied")]
    Occupied,
    /// The side cannot afford the unit.
    #[error("not enough bolts")]
    InsufficientBolts,
}

/// Checks whether `side` may place a unit at `lane`/`column`.
///
/// `occupants` yields the lane and column of every living unit regardless
/// of owner. Balance is not considered; see [`check_affordable`].
pub fn can_place<I>(
    rules: &MatchRules,
    side: Side,
    lane: u32,
    column: f32,
    occupants: I,
) -> Result<(), PlacementError>
where
    I: IntoIterator<Item = (u32, f32)>,
{
    if lane >= rules.lanes {
        return Err(PlacementError::LaneOutOfRange);
    }
    if !(column >= 0.0 && column < rules.columns as f32) {
        return Err(PlacementError::ColumnOutOfRange);
    }
    if !rules.owns_column(side, column) {
        return Err(PlacementError::WrongHalf);
    }

    let crowded = occupants.into_iter().any(|(occupied_lane, occupied_column)| {
        occupied_lane == lane && (occupied_column - column).abs() < rules.min_separation
    });
    if crowded {
        return Err(PlacementError::Occupied);
    }

    Ok(())
}

/// Checks whether a balance of `bolts` covers the cost of `kind`.
pub fn check_affordable(bolts: u32, kind: UnitKind) -> Result<(), PlacementError> {
    if bolts < kind.spec().cost {
        Err(PlacementError::InsufficientBolts)
    } else {
        Ok(())
    }
}
