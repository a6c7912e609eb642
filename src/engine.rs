//! One conversion run: ingest, re-address, write both output files.
//!
//! The stages run strictly in sequence. An ingest failure writes nothing;
//! a write failure after a partial write leaves the file as-is.

use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::{
    export_codesys_mapping_with_hook, export_tag_table, ExportMappingDiagnostics,
    ExportMappingError, ExportTagTableError,
};
use crate::ingest::{import_factoryio_csv, ImportTagsDiagnostics, ImportTagsError, TagWarning};
use crate::mapping_spec_v1 as spec_v1;
use crate::model::TagRecord;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Output directory. Defaults to the input file's directory.
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConvertDiagnostics {
    pub import: ImportTagsDiagnostics,
    pub mapping: ExportMappingDiagnostics,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConvertOutcome {
    pub tag_table_path: PathBuf,
    pub mapping_path: PathBuf,
    pub tags: Vec<TagRecord>,
    pub warnings: Vec<TagWarning>,
    pub diagnostics: ConvertDiagnostics,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to create output directory: {0}")]
    CreateOutDir(String),

    #[error(transparent)]
    Import(#[from] ImportTagsError),

    #[error(transparent)]
    TagTable(#[from] ExportTagTableError),

    #[error(transparent)]
    Mapping(#[from] ExportMappingError),
}

pub fn run_conversion(input: &Path, options: &ConvertOptions) -> Result<ConvertOutcome, ConvertError> {
    run_conversion_with_hook(input, options, None)
}

/// Run one conversion. `after_mapping_write` is handed through to the
/// mapping exporter and fires after that file is closed.
pub fn run_conversion_with_hook(
    input: &Path,
    options: &ConvertOptions,
    after_mapping_write: Option<&dyn Fn(&Path)>,
) -> Result<ConvertOutcome, ConvertError> {
    let out_dir = match &options.out_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| ConvertError::CreateOutDir(e.to_string()))?;
            dir.clone()
        }
        None => {
            let parent = input.parent().unwrap_or(Path::new("."));
            if parent.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                parent.to_path_buf()
            }
        }
    };

    let imported = import_factoryio_csv(input)?;

    let tag_table_path = out_dir.join(spec_v1::TAG_TABLE_FILE_NAME_V1);
    let mapping_path = out_dir.join(spec_v1::MAPPING_FILE_NAME_V1);

    export_tag_table(&imported.tags, &tag_table_path)?;
    let mapping = export_codesys_mapping_with_hook(&imported.tags, &mapping_path, after_mapping_write)?;

    info!(
        "converted {} tags ({} skipped) from {}",
        imported.tags.len(),
        imported.diagnostics.rows_dropped,
        input.display()
    );

    Ok(ConvertOutcome {
        tag_table_path,
        mapping_path,
        tags: imported.tags,
        warnings: imported.warnings,
        diagnostics: ConvertDiagnostics {
            import: imported.diagnostics,
            mapping: mapping.diagnostics,
        },
    })
}
