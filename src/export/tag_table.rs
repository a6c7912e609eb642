//! Re-addressed tag table writer.

use std::path::Path;

use thiserror::Error;

use crate::mapping_spec_v1 as spec_v1;
use crate::model::TagRecord;

#[derive(Debug, Error)]
pub enum ExportTagTableError {
    #[error("failed to write tag table csv: {0}")]
    Write(String),
}

/// Write one row per record under the frozen v1 header, in the order the
/// records were addressed (all inputs, then all outputs).
pub fn export_tag_table(tags: &[TagRecord], path: &Path) -> Result<(), ExportTagTableError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_path(path)
        .map_err(|e| ExportTagTableError::Write(e.to_string()))?;

    writer
        .write_record(spec_v1::TAG_TABLE_HEADERS_V1)
        .map_err(|e| ExportTagTableError::Write(e.to_string()))?;

    for tag in tags {
        let channel = tag.channel.to_string();
        let bit_index = tag.bit_index.to_string();
        writer
            .write_record([
                tag.variable.as_str(),
                tag.direction.as_str(),
                tag.data_type.as_str(),
                tag.iec_address.as_str(),
                channel.as_str(),
                bit_index.as_str(),
            ])
            .map_err(|e| ExportTagTableError::Write(e.to_string()))?;
    }

    writer
        .flush()
        .map_err(|e| ExportTagTableError::Write(e.to_string()))
}
