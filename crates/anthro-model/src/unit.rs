//! Source and canonical units.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::key::MeasurementKind;

/// Unit a raw source column is declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceUnit {
    #[serde(rename = "mm")]
    Millimeter,
    #[serde(rename = "cm")]
    Centimeter,
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "yr")]
    Year,
}

impl SourceUnit {
    /// Parse a declared unit. Returns `None` for anything unsupported.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "mm" => Some(Self::Millimeter),
            "cm" => Some(Self::Centimeter),
            "m" => Some(Self::Meter),
            "kg" => Some(Self::Kilogram),
            "yr" => Some(Self::Year),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Meter => "m",
            Self::Kilogram => "kg",
            Self::Year => "yr",
        }
    }

    /// Divisor taking a raw value in this unit to its canonical unit.
    pub fn scale(self) -> f64 {
        match self {
            Self::Millimeter => 1000.0,
            Self::Centimeter => 100.0,
            Self::Meter | Self::Kilogram | Self::Year => 1.0,
        }
    }

    /// Whether a column of this unit can feed a field of `kind`.
    pub fn is_compatible_with(self, kind: MeasurementKind) -> bool {
        match kind {
            MeasurementKind::Length => {
                matches!(self, Self::Millimeter | Self::Centimeter | Self::Meter)
            }
            MeasurementKind::Mass => self == Self::Kilogram,
            MeasurementKind::Age => self == Self::Year,
        }
    }
}

impl fmt::Display for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit every stored value of a field is normalized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalUnit {
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "yr")]
    Year,
}

impl CanonicalUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meter => "m",
            Self::Kilogram => "kg",
            Self::Year => "yr",
        }
    }
}

impl fmt::Display for CanonicalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
