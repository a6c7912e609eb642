//! FactoryIO tag export -> CODESYS Modbus TCP mapping converter.
//! Responsibilities: ingest the exported tag list, recompute IEC bit
//! addresses, write the re-addressed tag table and the mapping csv.
//! Non-goals: file dialogs / desktop shell integration (front ends hook in
//! through the post-write callback).

pub mod addressing;
pub mod engine;
pub mod export;
pub mod ingest;
pub mod mapping_spec_v1;
pub mod model;

pub use engine::{run_conversion, run_conversion_with_hook, ConvertError, ConvertOptions, ConvertOutcome};
pub use ingest::{import_factoryio_csv, infer_data_type, ImportTagsError, ImportTagsOutcome};
pub use model::{Direction, TagDataType, TagRecord};
