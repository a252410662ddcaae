//! The fixed standard-key vocabulary of the curated table.
//!
//! Every curated table carries exactly these columns (plus the `SUBJECT_ID`
//! row key). Keys are never created at runtime; a name outside this set is a
//! schema violation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CurationError;
use crate::unit::CanonicalUnit;

/// Name of the row-key column that precedes the standard keys.
pub const SUBJECT_ID_COLUMN: &str = "SUBJECT_ID";

/// Physical kind of a measurement field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    /// Heights, circumferences, widths, depths and lengths.
    Length,
    /// Body mass.
    Mass,
    /// Subject age, used to scope the outlier age band.
    Age,
}

impl MeasurementKind {
    pub fn canonical_unit(self) -> CanonicalUnit {
        match self {
            Self::Length => CanonicalUnit::Meter,
            Self::Mass => CanonicalUnit::Kilogram,
            Self::Age => CanonicalUnit::Year,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Mass => "mass",
            Self::Age => "age",
        }
    }
}

/// One canonical measurement field of the curated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StandardKey {
    AgeYr,
    HeightM,
    WeightKg,
    NeckCircM,
    ChestCircM,
    BustCircM,
    UnderbustCircM,
    WaistCircM,
    HipCircM,
    ThighCircM,
    UpperArmCircM,
    ShoulderWidthM,
    ChestWidthM,
    WaistWidthM,
    HipWidthM,
    ChestDepthM,
    WaistDepthM,
    HipDepthM,
    ArmLenM,
    CrotchHeightM,
    WaistHeightM,
    KneeHeightM,
}

impl StandardKey {
    /// The complete schema, in curated column order.
    pub const ALL: [StandardKey; 22] = [
        Self::AgeYr,
        Self::HeightM,
        Self::WeightKg,
        Self::NeckCircM,
        Self::ChestCircM,
        Self::BustCircM,
        Self::UnderbustCircM,
        Self::WaistCircM,
        Self::HipCircM,
        Self::ThighCircM,
        Self::UpperArmCircM,
        Self::ShoulderWidthM,
        Self::ChestWidthM,
        Self::WaistWidthM,
        Self::HipWidthM,
        Self::ChestDepthM,
        Self::WaistDepthM,
        Self::HipDepthM,
        Self::ArmLenM,
        Self::CrotchHeightM,
        Self::WaistHeightM,
        Self::KneeHeightM,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AgeYr => "AGE_YR",
            Self::HeightM => "HEIGHT_M",
            Self::WeightKg => "WEIGHT_KG",
            Self::NeckCircM => "NECK_CIRC_M",
            Self::ChestCircM => "CHEST_CIRC_M",
            Self::BustCircM => "BUST_CIRC_M",
            Self::UnderbustCircM => "UNDERBUST_CIRC_M",
            Self::WaistCircM => "WAIST_CIRC_M",
            Self::HipCircM => "HIP_CIRC_M",
            Self::ThighCircM => "THIGH_CIRC_M",
            Self::UpperArmCircM => "UPPER_ARM_CIRC_M",
            Self::ShoulderWidthM => "SHOULDER_WIDTH_M",
            Self::ChestWidthM => "CHEST_WIDTH_M",
            Self::WaistWidthM => "WAIST_WIDTH_M",
            Self::HipWidthM => "HIP_WIDTH_M",
            Self::ChestDepthM => "CHEST_DEPTH_M",
            Self::WaistDepthM => "WAIST_DEPTH_M",
            Self::HipDepthM => "HIP_DEPTH_M",
            Self::ArmLenM => "ARM_LEN_M",
            Self::CrotchHeightM => "CROTCH_HEIGHT_M",
            Self::WaistHeightM => "WAIST_HEIGHT_M",
            Self::KneeHeightM => "KNEE_HEIGHT_M",
        }
    }

    pub fn kind(self) -> MeasurementKind {
        match self {
            Self::AgeYr => MeasurementKind::Age,
            Self::WeightKg => MeasurementKind::Mass,
            _ => MeasurementKind::Length,
        }
    }

    pub fn canonical_unit(self) -> CanonicalUnit {
        self.kind().canonical_unit()
    }

    /// Whether the outlier filter applies to this key.
    pub fn is_filterable(self) -> bool {
        self.kind() != MeasurementKind::Age
    }

    /// Position of this key in [`StandardKey::ALL`].
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Column names of a curated table: the row key followed by every standard key.
    pub fn curated_columns() -> Vec<&'static str> {
        std::iter::once(SUBJECT_ID_COLUMN)
            .chain(Self::ALL.iter().map(|key| key.as_str()))
            .collect()
    }
}

impl fmt::Display for StandardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StandardKey {
    type Err = CurationError;

    /// Exact, case-sensitive lookup.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == name)
            .ok_or_else(|| CurationError::SchemaViolation {
                message: format!("undefined standard key '{name}'"),
            })
    }
}
