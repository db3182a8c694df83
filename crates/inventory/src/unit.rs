//! Measuring units a part's quantities are expressed in.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use partuniverse_core::DomainError;

/// Placeholder shown by input forms before a choice is made. Never a valid unit.
pub const UNSET_CHOICE: &str = "---";

/// Grouping used when presenting units for selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitGroup {
    Length,
    Volume,
    Piece,
    Unknown,
}

impl UnitGroup {
    pub fn label(self) -> &'static str {
        match self {
            UnitGroup::Length => "Length",
            UnitGroup::Volume => "Volume",
            UnitGroup::Piece => "Piece",
            UnitGroup::Unknown => "n/A",
        }
    }
}

/// Closed set of measuring units. Serialized as the short stored code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "l")]
    Litres,
    #[serde(rename = "m³")]
    CubicMeters,
    #[serde(rename = "ccm")]
    CubicCentimeters,
    #[serde(rename = "pc")]
    Piece,
    #[serde(rename = "n/A")]
    Unknown,
}

impl Unit {
    /// All units in presentation order.
    pub const ALL: [Unit; 7] = [
        Unit::Meters,
        Unit::Centimeters,
        Unit::Litres,
        Unit::CubicMeters,
        Unit::CubicCentimeters,
        Unit::Piece,
        Unit::Unknown,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Unit::Meters => "m",
            Unit::Centimeters => "cm",
            Unit::Litres => "l",
            Unit::CubicMeters => "m³",
            Unit::CubicCentimeters => "ccm",
            Unit::Piece => "pc",
            Unit::Unknown => "n/A",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Unit::Meters => "meters",
            Unit::Centimeters => "centimeters",
            Unit::Litres => "litres",
            Unit::CubicMeters => "cubic meters",
            Unit::CubicCentimeters => "cubic centimeters",
            Unit::Piece => "piece",
            Unit::Unknown => "unknown",
        }
    }

    pub fn group(self) -> UnitGroup {
        match self {
            Unit::Meters | Unit::Centimeters => UnitGroup::Length,
            Unit::Litres | Unit::CubicMeters | Unit::CubicCentimeters => UnitGroup::Volume,
            Unit::Piece => UnitGroup::Piece,
            Unit::Unknown => UnitGroup::Unknown,
        }
    }
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Unit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code == UNSET_CHOICE || code.is_empty() {
            return Err(DomainError::field("unit", "a unit must be selected"));
        }
        Unit::ALL
            .into_iter()
            .find(|u| u.code() == code)
            .ok_or_else(|| DomainError::field("unit", format!("unknown unit '{code}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_unit_parses_from_its_code() {
        for unit in Unit::ALL {
            assert_eq!(unit.code().parse::<Unit>().unwrap(), unit);
        }
    }

    #[test]
    fn sentinel_is_not_a_unit() {
        let err = UNSET_CHOICE.parse::<Unit>().unwrap_err();
        assert_eq!(err.field_name(), Some("unit"));
    }

    #[test]
    fn groups_match_dimensions() {
        assert_eq!(Unit::Centimeters.group(), UnitGroup::Length);
        assert_eq!(Unit::CubicMeters.group(), UnitGroup::Volume);
        assert_eq!(Unit::Piece.group(), UnitGroup::Piece);
        assert_eq!(Unit::Unknown.group().label(), "n/A");
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(serde_json::to_string(&Unit::CubicMeters).unwrap(), "\"m³\"");
        let parsed: Unit = serde_json::from_str("\"pc\"").unwrap();
        assert_eq!(parsed, Unit::Piece);
    }
}
