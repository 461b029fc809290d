//! IT file writer
//!
//! Generates minimal IT files: header, order list, empty instrument and
//! sample offset tables, an optional song message and packed patterns. The
//! output carries no instrument or sample bodies, which is all the decoder
//! looks at and makes it handy for building fixtures.

use crate::module::ItPattern;
use crate::{
    COUNTS_OFFSET, HEADER_SIZE, IT_MAGIC, MESSAGE_OFFSET, PATTERN_HEADER_SIZE, SPECIAL_MESSAGE,
    SPECIAL_OFFSET, SPEED_OFFSET,
};

mod pattern_packer;


pub(crate) use pattern_packer::pack_pattern;

/// Pattern as it will be stored in the file
#[derive(Debug, Clone)]
enum StoredPattern {
    /// Offset table entry of 0
    Empty,
    Packed { num_rows: u16, data: Vec<u8> },
}

/// IT file writer for generating minimal IT modules
#[derive(Debug, Clone)]
pub struct ItWriter {
    speed: u8,
    tempo: u8,
    message: Option<String>,
    orders: Vec<u8>,
    num_instruments: u16,
    num_samples: u16,
    patterns: Vec<StoredPattern>,
}

impl Default for ItWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ItWriter {
    /// Create a writer with IT's default speed 6 and tempo 125
    pub fn new() -> Self {
        Self {
            speed: 6,
            tempo: 125,
            message: None,
            orders: Vec::new(),
            num_instruments: 0,
            num_samples: 0,
            patterns: Vec::new(),
        }
    }

    /// Set initial speed (ticks per row)
    pub fn set_speed(&mut self, speed: u8) {
        self.speed = speed;
    }

    /// Set initial tempo (BPM)
    pub fn set_tempo(&mut self, tempo: u8) {
        self.tempo = tempo;
    }

    /// Attach a song message ('\n' line breaks are stored as '\r')
    pub fn set_message(&mut self, message: &str) {
        self.message = Some(message.to_string());
    }

    /// Set the raw order table (written as-is, including skip/end markers)
    pub fn set_orders(&mut self, orders: &[u8]) {
        self.orders = orders.to_vec();
    }

    /// Number of (empty) instrument header entries to declare
    pub fn set_instrument_count(&mut self, count: u16) {
        self.num_instruments = count;
    }

    /// Number of (empty) sample header entries to declare
    pub fn set_sample_count(&mut self, count: u16) {
        self.num_samples = count;
    }

    /// Add a pattern, packing its rows
    /// Returns the pattern index
    pub fn add_pattern(&mut self, pattern: &ItPattern) -> u8 {
        self.add_raw_pattern(pattern.num_rows, &pack_pattern(pattern))
    }

    /// Add a pattern from already-packed data
    /// Returns the pattern index
    pub fn add_raw_pattern(&mut self, num_rows: u16, packed: &[u8]) -> u8 {
        self.patterns.push(StoredPattern::Packed {
            num_rows,
            data: packed.to_vec(),
        });
        (self.patterns.len() - 1) as u8
    }

    /// Add a pattern stored with a zero offset
    /// Returns the pattern index
    pub fn add_empty_pattern(&mut self) -> u8 {
        self.patterns.push(StoredPattern::Empty);
        (self.patterns.len() - 1) as u8
    }

    /// Write the complete IT file
    pub fn write(&self) -> Vec<u8> {
        let mut output = vec![0u8; HEADER_SIZE];
        output[..4].copy_from_slice(IT_MAGIC);

        write_u16_at(&mut output, COUNTS_OFFSET, self.orders.len() as u16);
        write_u16_at(&mut output, COUNTS_OFFSET + 2, self.num_instruments);
        write_u16_at(&mut output, COUNTS_OFFSET + 4, self.num_samples);
        write_u16_at(&mut output, COUNTS_OFFSET + 6, self.patterns.len() as u16);
        output[SPEED_OFFSET] = self.speed;
        output[SPEED_OFFSET + 1] = self.tempo;

        // Order table, then zeroed instrument and sample offsets
        output.extend_from_slice(&self.orders);
        let table_size = (self.num_instruments as usize + self.num_samples as usize) * 4;
        output.resize(output.len() + table_size, 0);

        // Pattern offset table, filled in below
        let pattern_table = output.len();
        output.resize(pattern_table + self.patterns.len() * 4, 0);

        if let Some(message) = &self.message {
            let mut bytes: Vec<u8> = message
                .bytes()
                .map(|b| if b == b'\n' { b'\r' } else { b })
                .collect();
            bytes.push(0);

            write_u16_at(&mut output, SPECIAL_OFFSET, SPECIAL_MESSAGE);
            write_u16_at(&mut output, MESSAGE_OFFSET, bytes.len() as u16);
            let offset = output.len() as u32;
            write_u32_at(&mut output, MESSAGE_OFFSET + 2, offset);
            output.extend_from_slice(&bytes);
        }

        for (idx, pattern) in self.patterns.iter().enumerate() {
            let StoredPattern::Packed { num_rows, data } = pattern else {
                continue;
            };

            let offset = output.len() as u32;
            write_u32_at(&mut output, pattern_table + idx * 4, offset);

            // Length, rows, 4 reserved bytes
            output.extend_from_slice(&(data.len() as u16).to_le_bytes());
            output.extend_from_slice(&num_rows.to_le_bytes());
            output.resize(output.len() + PATTERN_HEADER_SIZE - 4, 0);
            output.extend_from_slice(data);
        }

        output
    }
}

fn write_u16_at(output: &mut [u8], offset: usize, value: u16) {
    output[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn write_u32_at(output: &mut [u8], offset: usize, value: u32) {
    output[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
