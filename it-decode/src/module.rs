//! IT module data structures

use std::collections::BTreeMap;

use crate::{DEFAULT_PATTERN_ROWS, NOTE_CUT, NOTE_MAX};

/// Decoded IT module: everything the converter needs, nothing more
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItModule {
    /// Declared number of orders (before filtering)
    pub num_orders: u16,
    /// Declared number of instruments
    pub num_instruments: u16,
    /// Declared number of samples
    pub num_samples: u16,
    /// Declared number of patterns
    pub num_patterns: u16,
    /// Pattern order list, restricted to real pattern indices (0-199)
    pub order_list: Vec<u8>,
    /// Pattern data, indexed by pattern number
    pub patterns: Vec<ItPattern>,
    /// Initial speed (ticks per row)
    pub speed: u8,
    /// Initial tempo (BPM)
    pub tempo: u8,
    /// Song message with line breaks normalized to '\n'
    pub message: Option<String>,
}

impl ItModule {
    /// Get the pattern at the given order position
    pub fn pattern_at_order(&self, order: usize) -> Option<&ItPattern> {
        let pattern_idx = *self.order_list.get(order)? as usize;
        self.patterns.get(pattern_idx)
    }
}

/// A single pattern: decoded rows plus the row count from its header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItPattern {
    /// Number of rows declared in the pattern header
    pub num_rows: u16,
    /// Rows in playback order, one per row terminator in the packed data
    pub rows: Vec<ItRow>,
}

impl ItPattern {
    /// Create a pattern of `num_rows` rows without any events
    pub fn empty(num_rows: u16) -> Self {
        Self {
            num_rows,
            rows: vec![ItRow::default(); num_rows as usize],
        }
    }

    /// Pattern used when the offset table holds 0
    pub fn default_empty() -> Self {
        Self::empty(DEFAULT_PATTERN_ROWS)
    }

    /// Number of decoded rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One row: channel number (0-63) to event, channels without events absent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItRow {
    cells: BTreeMap<u8, ItCell>,
}

impl ItRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Event on `channel`, if the row has one
    pub fn cell(&self, channel: u8) -> Option<&ItCell> {
        self.cells.get(&channel)
    }

    /// Set the event for `channel`, replacing any previous one
    pub fn insert(&mut self, channel: u8, cell: ItCell) {
        self.cells.insert(channel, cell);
    }

    /// Iterate events in channel order
    pub fn iter(&self) -> impl Iterator<Item = (u8, &ItCell)> {
        self.cells.iter().map(|(&channel, cell)| (channel, cell))
    }

    /// Number of channels with an event
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Effect command and parameter (e.g. `D0F` = id 4, value 0x0F)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItCommand {
    pub id: u8,
    pub value: u8,
}

impl ItCommand {
    pub fn new(id: u8, value: u8) -> Self {
        Self { id, value }
    }
}

/// A single channel event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItCell {
    /// Note (0-119), absent for empty or special notes
    pub note: Option<u8>,
    /// Note column held a note cut or note off
    pub note_cut: bool,
    /// Instrument number (1-based as stored)
    pub instrument: Option<u8>,
    /// Volume/pan column value
    pub volume: Option<u8>,
    /// Effect command
    pub command: Option<ItCommand>,
}

impl ItCell {
    /// Build a cell from a raw note column byte
    pub fn with_raw_note(mut self, raw: u8) -> Self {
        self.set_raw_note(raw);
        self
    }

    /// Apply a raw note column byte: 0-119 is a note, >=254 a cut/off
    pub fn set_raw_note(&mut self, raw: u8) {
        self.note = (raw <= NOTE_MAX).then_some(raw);
        self.note_cut = raw >= NOTE_CUT;
    }

    /// Raw note column byte this cell would be packed with
    pub fn raw_note(&self) -> Option<u8> {
        match (self.note, self.note_cut) {
            (Some(note), _) => Some(note),
            (None, true) => Some(NOTE_CUT),
            (None, false) => None,
        }
    }

    /// Play a note with instrument and volume
    pub fn play_note(note: u8, instrument: u8, volume: u8) -> Self {
        Self {
            note: Some(note),
            instrument: Some(instrument),
            volume: Some(volume),
            ..Self::default()
        }
    }

    /// Whether the cell carries any information at all
    pub fn is_empty(&self) -> bool {
        self.note.is_none()
            && !self.note_cut
            && self.instrument.is_none()
            && self.volume.is_none()
            && self.command.is_none()
    }
}
