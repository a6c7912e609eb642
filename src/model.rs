//! Canonical tag conversion model.

use serde::{Deserialize, Serialize};

/// Signal direction, taken from the FactoryIO `Type` column.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    /// Case-insensitive parse; anything that is not input/output is rejected.
    pub fn parse_loose(value: &str) -> Option<Direction> {
        match value.trim().to_lowercase().as_str() {
            "input" => Some(Direction::Input),
            "output" => Some(Direction::Output),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Input => "Input",
            Direction::Output => "Output",
        }
    }

    /// Area letter used in IEC bit addresses.
    pub fn area_letter(&self) -> char {
        match self {
            Direction::Input => 'I',
            Direction::Output => 'Q',
        }
    }

    /// Channel the mapping export groups by: 0 for inputs, 1 for outputs.
    /// Kept as a plain number because the export format keys off it
    /// directly.
    pub fn channel(&self) -> u8 {
        match self {
            Direction::Input => 0,
            Direction::Output => 1,
        }
    }
}

/// IEC data type tag. `Unknown` absorbs every unrecognised value.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TagDataType {
    Bool,
    Int,
    DInt,
    Real,
    #[serde(other)]
    Unknown,
}

impl TagDataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagDataType::Bool => "Bool",
            TagDataType::Int => "Int",
            TagDataType::DInt => "DInt",
            TagDataType::Real => "Real",
            TagDataType::Unknown => "Unknown",
        }
    }
}

/// One addressed tag. Immutable once addressing completes; the exporters
/// only read and regroup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TagRecord {
    pub variable: String,
    pub direction: Direction,
    pub data_type: TagDataType,
    /// Coarse direction partition: 0 = Input, 1 = Output.
    pub channel: u8,
    /// Bit slot within the byte, 0..=7.
    pub bit_index: u8,
    /// `%IX{byte}.{bit}` for inputs, `%QX{byte}.{bit}` for outputs.
    pub iec_address: String,
}
