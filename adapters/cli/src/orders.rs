use std::{error::Error, fmt, str::FromStr};

/// Separates the unit name from its board position.
const KIND_DELIMITER: char = '@';
/// Separates the lane from the column.
const POSITION_DELIMITER: char = ':';

/// Placement issued for the player before the first frame, written `kind@lane:column`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct OpeningOrder {
    /// Catalog name of the unit, resolved by the simulation.
    pub(crate) kind: String,
    /// Lane to place the unit in.
    pub(crate) lane: u32,
    /// Column to place the unit at.
    pub(crate) column: f32,
}

impl FromStr for OpeningOrder {
    type Err = OrderParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(OrderParseError::Empty);
        }

        let (kind, position) = trimmed
            .split_once(KIND_DELIMITER)
            .ok_or(OrderParseError::MissingPosition)?;
        if kind.is_empty() {
            return Err(OrderParseError::MissingKind);
        }
        let (lane, column) = position
            .split_once(POSITION_DELIMITER)
            .ok_or(OrderParseError::MissingColumn)?;

        let lane = lane
            .parse::<u32>()
            .map_err(|_| OrderParseError::InvalidLane(lane.to_owned()))?;
        let column = column
            .parse::<f32>()
            .ok()
            .filter(|column| column.is_finite())
            .ok_or_else(|| OrderParseError::InvalidColumn(column.to_owned()))?;

        Ok(Self {
            kind: kind.to_owned(),
            lane,
            column,
        })
    }
}

/// Errors that can occur while parsing opening orders.
#[derive(Debug, PartialEq)]
pub(crate) enum OrderParseError {
    /// The order was empty or contained only whitespace.
    Empty,
    /// The order did not contain a `@` separated position.
    MissingPosition,
    /// Nothing preceded the `@`.
    MissingKind,
    /// The position did not contain a `:` separated column.
    MissingColumn,
    /// The lane was not a non-negative integer.
    InvalidLane(String),
    /// The column was not a finite number.
    InvalidColumn(String),
}

impl fmt::Display for OrderParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "opening order is empty"),
            Self::MissingPosition => write!(f, "expected `kind@lane:column`"),
            Self::MissingKind => write!(f, "opening order names no unit kind"),
            Self::MissingColumn => write!(f, "position must be written `lane:column`"),
            Self::InvalidLane(lane) => write!(f, "invalid lane `{lane}`"),
            Self::InvalidColumn(column) => write!(f, "invalid column `{column}`"),
        }
    }
}

impl Error for OrderParseError {}
