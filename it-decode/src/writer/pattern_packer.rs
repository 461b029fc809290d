//! IT pattern compression

use crate::MAX_CHANNELS;
use crate::module::{ItCommand, ItPattern};

/// Pack pattern data using IT compression
///
/// Values equal to the channel's previous explicit value are encoded with
/// the mask's reuse bits instead of being written again.
pub fn pack_pattern(pattern: &ItPattern) -> Vec<u8> {
    let mut output = Vec::new();

    // Previous values for compression
    let mut prev_note = [None::<u8>; MAX_CHANNELS];
    let mut prev_instrument = [None::<u8>; MAX_CHANNELS];
    let mut prev_volume = [None::<u8>; MAX_CHANNELS];
    let mut prev_command = [None::<ItCommand>; MAX_CHANNELS];

    for row in &pattern.rows {
        for (channel, cell) in row.iter() {
            let ch = channel as usize;
            if ch >= MAX_CHANNELS || cell.is_empty() {
                continue;
            }

            // Build mask
            let mut mask = 0u8;

            let note = cell.raw_note();
            if note.is_some() && note != prev_note[ch] {
                mask |= 0x01;
                prev_note[ch] = note;
            } else if note.is_some() {
                mask |= 0x10;
            }

            if cell.instrument.is_some() && cell.instrument != prev_instrument[ch] {
                mask |= 0x02;
                prev_instrument[ch] = cell.instrument;
            } else if cell.instrument.is_some() {
                mask |= 0x20;
            }

            if cell.volume.is_some() && cell.volume != prev_volume[ch] {
                mask |= 0x04;
                prev_volume[ch] = cell.volume;
            } else if cell.volume.is_some() {
                mask |= 0x40;
            }

            if cell.command.is_some() && cell.command != prev_command[ch] {
                mask |= 0x08;
                prev_command[ch] = cell.command;
            } else if cell.command.is_some() {
                mask |= 0x80;
            }

            // Write channel marker with mask flag
            output.push((channel + 1) | 0x80);
            output.push(mask);

            // Write data
            if let (true, Some(n)) = (mask & 0x01 != 0, note) {
                output.push(n);
            }
            if let (true, Some(i)) = (mask & 0x02 != 0, cell.instrument) {
                output.push(i);
            }
            if let (true, Some(v)) = (mask & 0x04 != 0, cell.volume) {
                output.push(v);
            }
            if let (true, Some(cmd)) = (mask & 0x08 != 0, cell.command) {
                output.push(cmd.id);
                output.push(cmd.value);
            }
        }

        // End of row marker
        output.push(0);
    }

    output
}
