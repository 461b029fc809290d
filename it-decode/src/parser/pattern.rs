//! Pattern parsing

use tracing::{debug, warn};

use crate::MAX_CHANNELS;
use crate::error::ItError;
use crate::module::{ItCell, ItCommand, ItPattern, ItRow};

/// Values a channel last read explicitly, for the mask "reuse" bits
#[derive(Debug, Clone, Copy, Default)]
struct ChannelMemory {
    mask: Option<u8>,
    note: Option<u8>,
    instrument: Option<u8>,
    volume: Option<u8>,
    command: Option<ItCommand>,
}

/// Forward-only reader over one pattern's packed bytes
struct PackedStream<'a> {
    data: &'a [u8],
    position: usize,
    pattern: usize,
}

impl PackedStream<'_> {
    fn has_remaining(&self) -> bool {
        self.position < self.data.len()
    }

    fn read_u8(&mut self) -> Result<u8, ItError> {
        let byte = self
            .data
            .get(self.position)
            .copied()
            .ok_or(ItError::TruncatedPattern {
                pattern: self.pattern,
                offset: self.position,
            })?;
        self.position += 1;
        Ok(byte)
    }
}

/// Decode one pattern's packed data
///
/// `pattern` is the pattern index, used for error reporting. Every byte of
/// `packed` is consumed; a row is emitted for each zero (end of row) byte.
/// Channel state is local to this call.
pub fn decode_pattern(pattern: usize, packed: &[u8], num_rows: u16) -> Result<ItPattern, ItError> {
    let mut stream = PackedStream {
        data: packed,
        position: 0,
        pattern,
    };

    // Per-channel previous values for pattern compression
    let mut memory = [ChannelMemory::default(); MAX_CHANNELS];

    let mut rows = Vec::with_capacity(num_rows as usize);
    let mut row = ItRow::new();

    while stream.has_remaining() {
        // Read channel marker
        let channel_marker = stream.read_u8()?;

        if channel_marker == 0 {
            // End of row
            rows.push(std::mem::take(&mut row));
            continue;
        }

        let channel = channel_marker.wrapping_sub(1) & 0x3F;
        let prev = &mut memory[channel as usize];

        // Get mask
        let mask = if channel_marker & 0x80 != 0 {
            let m = stream.read_u8()?;
            prev.mask = Some(m);
            m
        } else {
            prev.mask.ok_or(ItError::MissingMaskState { pattern, channel })?
        };

        let mut cell = ItCell::default();

        // Read note/instrument/volume/effect
        if mask & 0x01 != 0 {
            let n = stream.read_u8()?;
            prev.note = Some(n);
            cell.set_raw_note(n);
        }
        if mask & 0x02 != 0 {
            let i = stream.read_u8()?;
            prev.instrument = Some(i);
            cell.instrument = Some(i);
        }
        if mask & 0x04 != 0 {
            let v = stream.read_u8()?;
            prev.volume = Some(v);
            cell.volume = Some(v);
        }
        if mask & 0x08 != 0 {
            let e = stream.read_u8()?;
            let p = stream.read_u8()?;
            let command = ItCommand::new(e, p);
            prev.command = Some(command);
            cell.command = Some(command);
        }

        // Reuse last values
        if mask & 0x10 != 0 {
            match prev.note {
                Some(n) => cell.set_raw_note(n),
                None => cell.note = None,
            }
        }
        if mask & 0x20 != 0 {
            cell.instrument = prev.instrument;
        }
        if mask & 0x40 != 0 {
            cell.volume = prev.volume;
        }
        if mask & 0x80 != 0 {
            cell.command = prev.command;
        }

        if !cell.is_empty() {
            row.insert(channel, cell);
        }
    }

    if !row.is_empty() {
        warn!(pattern, channels = row.len(), "dropping unterminated trailing row");
    }

    if rows.len() != num_rows as usize {
        debug!(
            pattern,
            decoded = rows.len(),
            declared = num_rows,
            "row count differs from pattern header"
        );
    }

    Ok(ItPattern { num_rows, rows })
}
