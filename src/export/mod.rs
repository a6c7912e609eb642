mod codesys_mapping;
mod tag_table;

pub use codesys_mapping::{
    export_codesys_mapping, export_codesys_mapping_with_hook, ExportMappingDiagnostics,
    ExportMappingError, ExportMappingOutcome,
};
pub use tag_table::{export_tag_table, ExportTagTableError};
