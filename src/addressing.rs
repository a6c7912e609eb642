//! Sequential IEC bit addressing, packed eight tags per byte.

use crate::model::{Direction, TagDataType, TagRecord};

/// A filtered source row that has not been addressed yet.
#[derive(Clone, Debug)]
pub struct PendingTag {
    pub variable: String,
    pub direction: Direction,
    pub data_type: TagDataType,
}

/// IEC address of the tag at `position` within its direction group.
///
/// Always the bit form (`%IX`/`%QX`), whatever the data type: word and
/// double-word addresses are not assigned by this stage.
pub fn iec_bit_address(direction: Direction, position: usize) -> String {
    let byte = position / 8;
    let bit = position % 8;
    format!("%{}X{byte}.{bit}", direction.area_letter())
}

/// Address both direction groups and concatenate them, inputs first.
/// Relative order within each group is preserved; the groups are never
/// interleaved.
pub fn assign_bit_addresses(inputs: Vec<PendingTag>, outputs: Vec<PendingTag>) -> Vec<TagRecord> {
    let mut records = Vec::with_capacity(inputs.len() + outputs.len());
    for group in [inputs, outputs] {
        for (position, tag) in group.into_iter().enumerate() {
            records.push(TagRecord {
                iec_address: iec_bit_address(tag.direction, position),
                bit_index: (position % 8) as u8,
                channel: tag.direction.channel(),
                direction: tag.direction,
                data_type: tag.data_type,
                variable: tag.variable,
            });
        }
    }
    records
}
