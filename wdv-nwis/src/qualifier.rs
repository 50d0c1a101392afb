//! Qualifier codes that drive point classification and data masks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualifier code marking a point as approved for publication.
pub const APPROVED_CODE: &str = "A";

/// Qualifier code marking a point as estimated.
pub const ESTIMATED_CODE: &str = "E";

/// Qualifiers that explain why a point has no value. By business rule at
/// most one applies to any point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaskQualifier {
    #[serde(rename = "ice")]
    Ice,
    #[serde(rename = "fld")]
    Flood,
    #[serde(rename = "bkw")]
    Backwater,
    #[serde(rename = "zfl")]
    ZeroFlow,
    #[serde(rename = "dry")]
    Dry,
    #[serde(rename = "ssn")]
    Seasonal,
    #[serde(rename = "pr")]
    PartialRecord,
    #[serde(rename = "rat")]
    RatingDevelopment,
    #[serde(rename = "eqp")]
    EquipmentMalfunction,
    #[serde(rename = "mnt")]
    Maintenance,
    #[serde(rename = "dis")]
    Discontinued,
    #[serde(rename = "tst")]
    Test,
    #[serde(rename = "pmp")]
    Pump,
    #[serde(rename = "***")]
    Unavailable,
}

impl MaskQualifier {
    /// The full vocabulary in precedence order. When a point carries more
    /// than one mask, the earliest entry here wins.
    pub const ALL: [MaskQualifier; 14] = [
        MaskQualifier::Ice,
        MaskQualifier::Flood,
        MaskQualifier::Backwater,
        MaskQualifier::ZeroFlow,
        MaskQualifier::Dry,
        MaskQualifier::Seasonal,
        MaskQualifier::PartialRecord,
        MaskQualifier::RatingDevelopment,
        MaskQualifier::EquipmentMalfunction,
        MaskQualifier::Maintenance,
        MaskQualifier::Discontinued,
        MaskQualifier::Test,
        MaskQualifier::Pump,
        MaskQualifier::Unavailable,
    ];

    /// Lower-case service code, e.g. "ice".
    pub fn code(&self) -> &'static str {
        match self {
            MaskQualifier::Ice => "ice",
            MaskQualifier::Flood => "fld",
            MaskQualifier::Backwater => "bkw",
            MaskQualifier::ZeroFlow => "zfl",
            MaskQualifier::Dry => "dry",
            MaskQualifier::Seasonal => "ssn",
            MaskQualifier::PartialRecord => "pr",
            MaskQualifier::RatingDevelopment => "rat",
            MaskQualifier::EquipmentMalfunction => "eqp",
            MaskQualifier::Maintenance => "mnt",
            MaskQualifier::Discontinued => "dis",
            MaskQualifier::Test => "tst",
            MaskQualifier::Pump => "pmp",
            MaskQualifier::Unavailable => "***",
        }
    }

    /// Legend label.
    pub fn description(&self) -> &'static str {
        match self {
            MaskQualifier::Ice => "Ice-Affected",
            MaskQualifier::Flood => "Flood",
            MaskQualifier::Backwater => "Backwater",
            MaskQualifier::ZeroFlow => "Zeroflow",
            MaskQualifier::Dry => "Dry",
            MaskQualifier::Seasonal => "Seasonal",
            MaskQualifier::PartialRecord => "Partial Record",
            MaskQualifier::RatingDevelopment => "Rating Development",
            MaskQualifier::EquipmentMalfunction => "Equipment Malfunction",
            MaskQualifier::Maintenance => "Maintenance",
            MaskQualifier::Discontinued => "Discontinued",
            MaskQualifier::Test => "Test",
            MaskQualifier::Pump => "Pump",
            MaskQualifier::Unavailable => "Unavailable",
        }
    }

    /// Case-insensitive lookup of a qualifier code.
    pub fn from_code(code: &str) -> Option<MaskQualifier> {
        MaskQualifier::ALL
            .into_iter()
            .find(|mask| mask.code().eq_ignore_ascii_case(code.trim()))
    }

    /// Every mask present among `qualifiers`, in precedence order.
    pub fn all_in<S: AsRef<str>>(qualifiers: &[S]) -> Vec<MaskQualifier> {
        MaskQualifier::ALL
            .into_iter()
            .filter(|mask| {
                qualifiers
                    .iter()
                    .any(|q| mask.code().eq_ignore_ascii_case(q.as_ref().trim()))
            })
            .collect()
    }
}

impl fmt::Display for MaskQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
