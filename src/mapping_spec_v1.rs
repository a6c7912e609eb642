//! Input/output format constants (frozen v1): code-side single source of
//! truth for the tag table and the CODESYS mapping export.
//!
//! Once consumed by downstream tooling, strings in this module may not be
//! renamed or reformatted; additions only.

pub const SPEC_VERSION_V1: &str = "v1";

/// Accepted spellings of the tag-name column, tried in order.
pub const NAME_COLUMNS_V1: [&str; 2] = ["Name", "Variable"];

/// Direction column, values meaning input/output (case-insensitive).
pub const TYPE_COLUMN_V1: &str = "Type";

/// Optional data-type hint column.
pub const DATA_TYPE_COLUMN_V1: &str = "Data Type";

/// Optional source address column. Never read back: addresses are always
/// recomputed from row order.
pub const ADDRESS_COLUMN_V1: &str = "Address";

/// Re-addressed tag table header (frozen v1).
pub const TAG_TABLE_HEADERS_V1: [&str; 6] = [
    "Variable",
    "Type",
    "Data Type",
    "IEC_Address",
    "Channel",
    "BitIndex",
];

/// Mapping export banner lines (frozen v1), each written as a single-cell
/// row. The second line contains commas and therefore serializes quoted.
pub const MAPPING_BANNER_V1: [&str; 3] = [
    "//CoDeSys Mapping Export V1.2",
    "//Mapped variable,//Parameter name @ counter in device,//Unit,//Description,//IEC address,//Device name",
    "//Important: change only first, third or fourth column in Excel or add variable name before first",
];

/// Device name column value on every channel and detail row.
pub const MAPPING_DEVICE_NAME_V1: &str = "Modbus_TCP_Server";

pub const READ_OPERATION_V1: &str = "Read Discrete Inputs";
pub const WRITE_OPERATION_V1: &str = "Write Multiple Coils";

/// Default output file names, written next to the source file.
pub const TAG_TABLE_FILE_NAME_V1: &str = "new_tags.csv";
pub const MAPPING_FILE_NAME_V1: &str = "codesys_mapping_export.csv";

/// Channel summary base address (frozen v1): `%IB00` for channel 0,
/// `%IQ10` for channel 1. The leading area letter is literally `I` on both
/// channels; only the inner letter switches. Existing CODESYS projects
/// import these strings as-is, so the format is locked even though the
/// channel 1 form reads oddly. Whether the original format definition
/// meant it this way is still unconfirmed.
pub fn channel_base_address(channel: u8) -> String {
    format!("%I{}{}0", if channel == 0 { "B" } else { "Q" }, channel)
}

/// Modbus operation label shown on the channel summary rows.
pub fn operation_label(channel: u8) -> &'static str {
    if channel == 0 {
        READ_OPERATION_V1
    } else {
        WRITE_OPERATION_V1
    }
}

/// Loose header comparison: trim, drop inner spaces, lowercase.
pub fn normalize_header_loose(s: &str) -> String {
    s.trim().replace(' ', "").to_lowercase()
}
