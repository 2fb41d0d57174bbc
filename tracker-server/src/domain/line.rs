//! Resolved line records and travel direction.

use std::fmt;

use crate::olhovivo::LineDto;

/// Direction of travel for one directional line record.
///
/// The upstream API represents each public line code as up to two records,
/// one per direction, distinguished by the `sl` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// `sl == 1`: outbound from the main terminal.
    MainTerminal,

    /// `sl == 2`: outbound from the secondary terminal.
    SecondaryTerminal,
}

impl Direction {
    /// Convert from the upstream `sl` integer. Anything other than 1 or 2
    /// is unknown data and yields `None`.
    pub fn from_sl(sl: u8) -> Option<Self> {
        match sl {
            1 => Some(Direction::MainTerminal),
            2 => Some(Direction::SecondaryTerminal),
            _ => None,
        }
    }

    /// The upstream `sl` value.
    pub fn as_sl(&self) -> u8 {
        match self {
            Direction::MainTerminal => 1,
            Direction::SecondaryTerminal => 2,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::MainTerminal => f.write_str("main terminal"),
            Direction::SecondaryTerminal => f.write_str("secondary terminal"),
        }
    }
}

/// A resolved directional line: one upstream record for a public line code.
///
/// A single `LineCode` search term may resolve to zero, one, or two of
/// these (one per direction actually in service).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    /// Internal line identifier (`cl`), used for position queries.
    pub internal_id: u32,

    /// Public line code (`lt`), e.g. "1017-10".
    pub code: String,

    /// Direction this record covers.
    pub direction: Direction,

    /// Main terminal name (`tp`).
    pub main_terminal: String,

    /// Secondary terminal name (`ts`).
    pub secondary_terminal: String,
}

impl LineRecord {
    /// Build from an upstream search record.
    ///
    /// Records with an out-of-range `sl` are bad upstream data and yield
    /// `None`. Missing terminal names become empty strings.
    pub fn from_dto(dto: &LineDto) -> Option<Self> {
        let direction = Direction::from_sl(dto.sl)?;
        Some(Self {
            internal_id: dto.cl,
            code: dto.public_code(),
            direction,
            main_terminal: dto.tp.clone().unwrap_or_default(),
            secondary_terminal: dto.ts.clone().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::olhovivo::mock_line;

    #[test]
    fn direction_from_sl() {
        assert_eq!(Direction::from_sl(1), Some(Direction::MainTerminal));
        assert_eq!(Direction::from_sl(2), Some(Direction::SecondaryTerminal));
        assert_eq!(Direction::from_sl(0), None);
        assert_eq!(Direction::from_sl(3), None);
    }

    #[test]
    fn direction_roundtrip() {
        for sl in [1u8, 2] {
            assert_eq!(Direction::from_sl(sl).unwrap().as_sl(), sl);
        }
    }

    #[test]
    fn record_from_dto() {
        let record = LineRecord::from_dto(&mock_line(1273, "1017", 10, 1)).unwrap();

        assert_eq!(record.internal_id, 1273);
        assert_eq!(record.code, "1017-10");
        assert_eq!(record.direction, Direction::MainTerminal);
        assert!(!record.main_terminal.is_empty());
    }

    #[test]
    fn bad_sl_yields_no_record() {
        assert!(LineRecord::from_dto(&mock_line(1273, "1017", 10, 9)).is_none());
    }
}
