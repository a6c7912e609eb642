//! CODESYS mapping export for a Modbus TCP server device.
//!
//! Layout (frozen v1): three `//` banner rows, one cell each; then per
//! channel in ascending order two summary rows followed by one detail row
//! per tag in stored order.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mapping_spec_v1 as spec_v1;
use crate::model::TagRecord;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportMappingDiagnostics {
    pub channels: u32,
    pub rows_written: u32,
    pub duration_ms: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportMappingOutcome {
    pub diagnostics: ExportMappingDiagnostics,
}

#[derive(Debug, Error)]
pub enum ExportMappingError {
    #[error("failed to write mapping csv: {0}")]
    Write(String),
}

pub fn export_codesys_mapping(
    tags: &[TagRecord],
    path: &Path,
) -> Result<ExportMappingOutcome, ExportMappingError> {
    export_codesys_mapping_with_hook(tags, path, None)
}

/// Write the mapping csv. `after_write` runs once the file is flushed and
/// closed; front ends use it to reveal the file in the OS shell.
pub fn export_codesys_mapping_with_hook(
    tags: &[TagRecord],
    path: &Path,
    after_write: Option<&dyn Fn(&Path)>,
) -> Result<ExportMappingOutcome, ExportMappingError> {
    let started = Instant::now();

    // Group by channel; no assumption about the incoming order. BTreeMap
    // keeps channel 0 ahead of channel 1.
    let mut channels: BTreeMap<u8, Vec<&TagRecord>> = BTreeMap::new();
    for tag in tags {
        channels.entry(tag.channel).or_default().push(tag);
    }

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::CRLF)
        .from_path(path)
        .map_err(|e| ExportMappingError::Write(e.to_string()))?;

    let mut rows_written: u32 = 0;
    for line in spec_v1::MAPPING_BANNER_V1 {
        writer
            .write_record([line])
            .map_err(|e| ExportMappingError::Write(e.to_string()))?;
        rows_written += 1;
    }

    for (&channel, channel_tags) in &channels {
        let operation = spec_v1::operation_label(channel);
        let base_address = spec_v1::channel_base_address(channel);

        let channel_label = format!("Channel {channel}");
        writer
            .write_record([
                "",
                channel_label.as_str(),
                "",
                operation,
                base_address.as_str(),
                spec_v1::MAPPING_DEVICE_NAME_V1,
            ])
            .map_err(|e| ExportMappingError::Write(e.to_string()))?;
        rows_written += 1;

        let array_label = format!("Channel {channel}[0]");
        writer
            .write_record([
                "",
                array_label.as_str(),
                "",
                operation,
                base_address.as_str(),
                spec_v1::MAPPING_DEVICE_NAME_V1,
            ])
            .map_err(|e| ExportMappingError::Write(e.to_string()))?;
        rows_written += 1;

        for tag in channel_tags {
            let bit_label = if channel == 1 {
                format!("Bit{}@1", tag.bit_index)
            } else {
                format!("Bit{}", tag.bit_index)
            };
            let description = format!("0x{:04X}", tag.bit_index);
            writer
                .write_record([
                    tag.variable.as_str(),
                    bit_label.as_str(),
                    "",
                    description.as_str(),
                    tag.iec_address.as_str(),
                    spec_v1::MAPPING_DEVICE_NAME_V1,
                ])
                .map_err(|e| ExportMappingError::Write(e.to_string()))?;
            rows_written += 1;
        }
    }

    writer
        .flush()
        .map_err(|e| ExportMappingError::Write(e.to_string()))?;
    // Close the handle before the hook runs.
    drop(writer);

    info!("codesys mapping exported to {}", path.display());

    if let Some(hook) = after_write {
        hook(path);
    }

    Ok(ExportMappingOutcome {
        diagnostics: ExportMappingDiagnostics {
            channels: channels.len() as u32,
            rows_written,
            duration_ms: started.elapsed().as_millis() as u32,
        },
    })
}
