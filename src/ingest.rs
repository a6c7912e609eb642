//! FactoryIO tag list ingest: csv rows to an addressed `TagRecord` list.
//!
//! The export is UTF-8 with an optional BOM. Rows without a usable name or
//! direction are skipped with a warning, not an error. A source `Address`
//! column is never trusted; IEC addresses are always recomputed from row
//! order.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::addressing::{assign_bit_addresses, PendingTag};
use crate::mapping_spec_v1 as spec_v1;
use crate::model::{Direction, TagDataType, TagRecord};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportTagsDiagnostics {
    pub detected_columns: Vec<String>,
    pub rows_scanned: u32,
    pub rows_dropped: u32,
    pub inputs: u32,
    pub outputs: u32,
}

/// A non-fatal ingest observation, one per skipped row.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TagWarning {
    pub code: String,
    pub message: String,
    /// 1-based data row index, header row excluded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportTagsOutcome {
    pub tags: Vec<TagRecord>,
    pub warnings: Vec<TagWarning>,
    pub diagnostics: ImportTagsDiagnostics,
}

#[derive(Debug, Error)]
pub enum ImportTagsError {
    #[error("failed to open tag csv: {0}")]
    Open(String),

    #[error("failed to read tag csv: {0}")]
    Read(String),

    #[error("tag csv has no header row")]
    NoHeaderRow,

    #[error("missing required columns: {missing_columns:?}, detected: {detected_columns:?}")]
    MissingRequiredColumns {
        missing_columns: Vec<String>,
        detected_columns: Vec<String>,
    },
}

/// Infer the IEC data type for one row.
///
/// An explicit hint from a `Data Type` column wins. Without a hint the
/// address prefix is consulted; the re-addressing flow passes an empty
/// address, so the prefix branch only matters for callers that still carry
/// source addresses.
pub fn infer_data_type(address: &str, data_type_hint: Option<&str>) -> TagDataType {
    if let Some(hint) = data_type_hint.map(str::trim).filter(|h| !h.is_empty()) {
        return match hint.to_lowercase().as_str() {
            "bool" | "boolean" => TagDataType::Bool,
            "int" | "integer" => TagDataType::Int,
            "dint" | "doubleint" => TagDataType::DInt,
            "real" | "float" | "double" => TagDataType::Real,
            _ => TagDataType::Unknown,
        };
    }

    if address.starts_with("%IX") || address.starts_with("%QX") {
        TagDataType::Bool
    } else if address.starts_with("%IW") || address.starts_with("%QW") {
        TagDataType::Int
    } else if address.starts_with("%ID") || address.starts_with("%QD") {
        TagDataType::DInt
    } else if address.starts_with("%MD") {
        TagDataType::Real
    } else {
        TagDataType::Unknown
    }
}

/// Read and address a FactoryIO tag export from disk.
pub fn import_factoryio_csv(path: &Path) -> Result<ImportTagsOutcome, ImportTagsError> {
    let bytes = std::fs::read(path).map_err(|e| ImportTagsError::Open(e.to_string()))?;
    import_factoryio_csv_bytes(&bytes)
}

/// Parse an already-loaded tag export. A leading UTF-8 BOM is stripped.
pub fn import_factoryio_csv_bytes(bytes: &[u8]) -> Result<ImportTagsOutcome, ImportTagsError> {
    let content = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ImportTagsError::Read(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ImportTagsError::NoHeaderRow);
    }

    // Both name spellings may be present; per row the first non-empty cell
    // wins, in the order the candidates are listed.
    let name_indices: Vec<usize> = spec_v1::NAME_COLUMNS_V1
        .into_iter()
        .filter_map(|cand| header_index(&headers, &[cand]))
        .collect();
    let data_type_index = header_index(&headers, &[spec_v1::DATA_TYPE_COLUMN_V1]);

    let type_index = match header_index(&headers, &[spec_v1::TYPE_COLUMN_V1]) {
        Some(idx) if !name_indices.is_empty() => idx,
        found => {
            let mut missing_columns = Vec::new();
            if name_indices.is_empty() {
                missing_columns.push(spec_v1::NAME_COLUMNS_V1.join("/"));
            }
            if found.is_none() {
                missing_columns.push(spec_v1::TYPE_COLUMN_V1.to_string());
            }
            return Err(ImportTagsError::MissingRequiredColumns {
                missing_columns,
                detected_columns: headers,
            });
        }
    };

    let mut warnings: Vec<TagWarning> = Vec::new();
    let mut inputs: Vec<PendingTag> = Vec::new();
    let mut outputs: Vec<PendingTag> = Vec::new();
    let mut rows_scanned: u32 = 0;
    let mut rows_dropped: u32 = 0;

    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ImportTagsError::Read(e.to_string()))?;
        rows_scanned += 1;
        let row_index = idx as u32 + 1;

        let variable = name_indices
            .iter()
            .filter_map(|&i| record.get(i))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .unwrap_or("");
        if variable.is_empty() {
            rows_dropped += 1;
            push_row_warning(&mut warnings, "ROW_MISSING_NAME", row_index, "row has no tag name");
            continue;
        }

        let Some(direction) = record.get(type_index).and_then(Direction::parse_loose) else {
            rows_dropped += 1;
            push_row_warning(
                &mut warnings,
                "ROW_UNKNOWN_TYPE",
                row_index,
                &format!("type of '{variable}' is neither Input nor Output"),
            );
            continue;
        };

        // The source address is not forwarded: addresses get recomputed, so
        // inference runs on the hint alone.
        let data_type = infer_data_type("", data_type_index.and_then(|i| record.get(i)));

        let pending = PendingTag {
            variable: variable.to_string(),
            direction,
            data_type,
        };
        match direction {
            Direction::Input => inputs.push(pending),
            Direction::Output => outputs.push(pending),
        }
    }

    let diagnostics = ImportTagsDiagnostics {
        detected_columns: headers,
        rows_scanned,
        rows_dropped,
        inputs: inputs.len() as u32,
        outputs: outputs.len() as u32,
    };

    Ok(ImportTagsOutcome {
        tags: assign_bit_addresses(inputs, outputs),
        warnings,
        diagnostics,
    })
}

fn header_index(headers: &[String], candidates: &[&str]) -> Option<usize> {
    for cand in candidates {
        let cand_norm = spec_v1::normalize_header_loose(cand);
        if let Some(idx) = headers
            .iter()
            .position(|h| spec_v1::normalize_header_loose(h) == cand_norm)
        {
            return Some(idx);
        }
    }
    None
}

fn push_row_warning(warnings: &mut Vec<TagWarning>, code: &str, row_index: u32, message: &str) {
    debug!("skipping row {row_index}: {message}");
    warnings.push(TagWarning {
        code: code.to_string(),
        message: message.to_string(),
        row_index: Some(row_index),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_wins_and_matches_case_insensitively() {
        assert_eq!(infer_data_type("", Some("Bool")), TagDataType::Bool);
        assert_eq!(infer_data_type("", Some("boolean")), TagDataType::Bool);
        assert_eq!(infer_data_type("", Some("integer")), TagDataType::Int);
        assert_eq!(infer_data_type("", Some("DoubleInt")), TagDataType::DInt);
        assert_eq!(infer_data_type("", Some("FLOAT")), TagDataType::Real);
        assert_eq!(infer_data_type("", Some("double")), TagDataType::Real);
        assert_eq!(infer_data_type("", Some("Word")), TagDataType::Unknown);
        // The hint also wins over a contradicting address prefix.
        assert_eq!(infer_data_type("%IX0.0", Some("Real")), TagDataType::Real);
    }

    #[test]
    fn address_prefix_fallback_without_a_hint() {
        assert_eq!(infer_data_type("%IX0.0", None), TagDataType::Bool);
        assert_eq!(infer_data_type("%QX1.3", None), TagDataType::Bool);
        assert_eq!(infer_data_type("%IW2", None), TagDataType::Int);
        assert_eq!(infer_data_type("%QW0", None), TagDataType::Int);
        assert_eq!(infer_data_type("%ID4", None), TagDataType::DInt);
        assert_eq!(infer_data_type("%QD4", None), TagDataType::DInt);
        assert_eq!(infer_data_type("%MD8", None), TagDataType::Real);
        assert_eq!(infer_data_type("%MW0", None), TagDataType::Unknown);
        assert_eq!(infer_data_type("", None), TagDataType::Unknown);
        // An empty hint falls through to the prefix branch.
        assert_eq!(infer_data_type("%IX0.0", Some("")), TagDataType::Bool);
    }

    #[test]
    fn imports_and_addresses_a_plain_export() {
        let csv = "Name,Type,Data Type\n\
                   Start,Input,Bool\n\
                   Stop,Input,Bool\n\
                   Motor,Output,Bool\n";
        let outcome = import_factoryio_csv_bytes(csv.as_bytes()).unwrap();

        assert_eq!(outcome.tags.len(), 3);
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.diagnostics.rows_scanned, 3);
        assert_eq!(outcome.diagnostics.rows_dropped, 0);
        assert_eq!(outcome.diagnostics.inputs, 2);
        assert_eq!(outcome.diagnostics.outputs, 1);

        assert_eq!(outcome.tags[0].variable, "Start");
        assert_eq!(outcome.tags[0].iec_address, "%IX0.0");
        assert_eq!(outcome.tags[1].iec_address, "%IX0.1");
        assert_eq!(outcome.tags[2].variable, "Motor");
        assert_eq!(outcome.tags[2].iec_address, "%QX0.0");
        assert_eq!(outcome.tags[2].channel, 1);
    }

    #[test]
    fn bom_and_variable_spelling_are_accepted() {
        let mut bytes = b"\xef\xbb\xbf".to_vec();
        bytes.extend_from_slice(b"Variable,Type\nSensor1,input\n");

        let outcome = import_factoryio_csv_bytes(&bytes).unwrap();
        assert_eq!(outcome.tags.len(), 1);
        assert_eq!(outcome.tags[0].variable, "Sensor1");
        assert_eq!(outcome.tags[0].direction, Direction::Input);
        // No hint column: the type stays Unknown.
        assert_eq!(outcome.tags[0].data_type, TagDataType::Unknown);
    }

    #[test]
    fn rows_without_name_or_known_type_are_dropped_with_warnings() {
        let csv = "Name,Type,Data Type\n\
                   Start,Input,Bool\n\
                   ,Input,Bool\n\
                   Ghost,Memory,Bool\n\
                   Motor,Output,Bool\n";
        let outcome = import_factoryio_csv_bytes(csv.as_bytes()).unwrap();

        assert_eq!(outcome.diagnostics.rows_scanned, 4);
        assert_eq!(outcome.diagnostics.rows_dropped, 2);
        assert_eq!(
            outcome.tags.len() as u32,
            outcome.diagnostics.rows_scanned - outcome.diagnostics.rows_dropped
        );

        let codes: Vec<&str> = outcome.warnings.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, ["ROW_MISSING_NAME", "ROW_UNKNOWN_TYPE"]);
        assert_eq!(outcome.warnings[0].row_index, Some(2));
        assert_eq!(outcome.warnings[1].row_index, Some(3));
    }

    #[test]
    fn source_address_column_is_ignored() {
        let csv = "Name,Type,Data Type,Address\n\
                   Start,Input,Bool,%IX7.5\n\
                   Motor,Output,Bool,%QX3.1\n";
        let outcome = import_factoryio_csv_bytes(csv.as_bytes()).unwrap();

        assert_eq!(outcome.tags[0].iec_address, "%IX0.0");
        assert_eq!(outcome.tags[1].iec_address, "%QX0.0");
    }

    #[test]
    fn missing_type_column_is_terminal() {
        let csv = "Name,Data Type\nStart,Bool\n";
        let err = import_factoryio_csv_bytes(csv.as_bytes()).unwrap_err();
        match err {
            ImportTagsError::MissingRequiredColumns {
                missing_columns,
                detected_columns,
            } => {
                assert_eq!(missing_columns, ["Type"]);
                assert_eq!(detected_columns, ["Name", "Data Type"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_name_column_is_terminal() {
        let csv = "Tag,Type\nStart,Input\n";
        let err = import_factoryio_csv_bytes(csv.as_bytes()).unwrap_err();
        match err {
            ImportTagsError::MissingRequiredColumns { missing_columns, .. } => {
                assert_eq!(missing_columns, ["Name/Variable"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_has_no_header_row() {
        let err = import_factoryio_csv_bytes(b"").unwrap_err();
        assert!(matches!(err, ImportTagsError::NoHeaderRow));
    }

    #[test]
    fn header_matching_is_loose() {
        let csv = "name , TYPE \nStart,Input\n";
        let outcome = import_factoryio_csv_bytes(csv.as_bytes()).unwrap();
        assert_eq!(outcome.tags.len(), 1);
    }

    #[test]
    fn first_non_empty_name_cell_wins_when_both_spellings_exist() {
        let csv = "Name,Variable,Type\n\
                   ,Fallback,Input\n\
                   Primary,Shadowed,Output\n";
        let outcome = import_factoryio_csv_bytes(csv.as_bytes()).unwrap();
        assert_eq!(outcome.tags[0].variable, "Fallback");
        assert_eq!(outcome.tags[1].variable, "Primary");
    }
}
