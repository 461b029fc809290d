//! IT file parser

use tracing::debug;

use crate::cursor::ByteReader;
use crate::error::ItError;
use crate::module::{ItModule, ItPattern};
use crate::{
    COUNTS_OFFSET, HEADER_SIZE, IT_MAGIC, MAX_ORDER_PATTERN, MESSAGE_OFFSET, PATTERN_HEADER_SIZE,
    SPECIAL_MESSAGE, SPECIAL_OFFSET, SPEED_OFFSET,
};

mod pattern;
#[cfg(test)]
mod tests;

pub use pattern::decode_pattern;

/// Parse an IT file into an ItModule
///
/// Only the header, order list, song message and pattern data are read.
/// Instrument and sample headers are skipped by size to reach the pattern
/// offset table.
///
/// # Arguments
/// * `data` - Raw IT file bytes
///
/// # Returns
/// * `Ok(ItModule)` - Parsed module
/// * `Err(ItError)` - Parse error
pub fn parse_it(data: &[u8]) -> Result<ItModule, ItError> {
    // Validate magic "IMPM"
    if data.get(..IT_MAGIC.len()) != Some(IT_MAGIC.as_slice()) {
        return Err(ItError::InvalidFormat);
    }

    let reader = ByteReader::new(data);

    // OrdNum, InsNum, SmpNum, PatNum (2 bytes each)
    let num_orders = reader.u16_at(COUNTS_OFFSET)?;
    let num_instruments = reader.u16_at(COUNTS_OFFSET + 2)?;
    let num_samples = reader.u16_at(COUNTS_OFFSET + 4)?;
    let num_patterns = reader.u16_at(COUNTS_OFFSET + 6)?;

    // Special (2 bytes), after Cwt/v, Cmwt and Flags
    let special = reader.u16_at(SPECIAL_OFFSET)?;

    // IS - Initial speed, IT - Initial tempo (1 byte each)
    let speed = reader.u8_at(SPEED_OFFSET)?;
    let tempo = reader.u8_at(SPEED_OFFSET + 1)?;

    let message = if special & SPECIAL_MESSAGE != 0 {
        read_message(&reader)?
    } else {
        None
    };

    // Order table, keeping only entries that name a pattern
    // (254 "+++" skip and 255 "---" end markers are dropped with the rest)
    let order_list: Vec<u8> = reader
        .bytes_at(HEADER_SIZE, num_orders as usize)?
        .iter()
        .copied()
        .filter(|&order| order <= MAX_ORDER_PATTERN)
        .collect();

    // Pattern offsets follow the order list and the instrument/sample offset tables
    let pattern_table = HEADER_SIZE
        + num_orders as usize
        + num_instruments as usize * 4
        + num_samples as usize * 4;

    let mut patterns = Vec::with_capacity(num_patterns as usize);
    for idx in 0..num_patterns as usize {
        let offset = reader.u32_at(pattern_table + idx * 4)? as usize;
        if offset == 0 {
            // Empty pattern - default 64-row pattern
            patterns.push(ItPattern::default_empty());
            continue;
        }

        // Length (2 bytes) - packed data size (excluding 8-byte header)
        let packed_length = reader.u16_at(offset)?;
        // Rows (2 bytes), then 4 reserved bytes
        let num_rows = reader.u16_at(offset + 2)?;
        let packed = reader.bytes_at(offset + PATTERN_HEADER_SIZE, packed_length as usize)?;

        let pattern = decode_pattern(idx, packed, num_rows)?;
        debug!(
            pattern = idx,
            rows = pattern.len(),
            declared_rows = num_rows,
            bytes = packed_length,
            "decoded pattern"
        );
        patterns.push(pattern);
    }

    Ok(ItModule {
        num_orders,
        num_instruments,
        num_samples,
        num_patterns,
        order_list,
        patterns,
        speed,
        tempo,
        message,
    })
}

/// Read the song message: MsgLgth (u16) and MsgOff (u32)
fn read_message(reader: &ByteReader<'_>) -> Result<Option<String>, ItError> {
    let length = reader.u16_at(MESSAGE_OFFSET)?;
    let offset = reader.u32_at(MESSAGE_OFFSET + 2)?;
    let bytes = reader.bytes_at(offset as usize, length as usize)?;

    let message: String = bytes
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| match b {
            b'\r' => '\n',
            b if b.is_ascii() => b as char,
            _ => '?',
        })
        .collect();

    Ok((!message.is_empty()).then_some(message))
}
