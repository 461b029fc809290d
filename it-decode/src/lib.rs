//! IT-Decode: Impulse Tracker module decoder for the it2p8 converter
//!
//! This crate reads the parts of an Impulse Tracker `.it` file that carry
//! musical events: the order list, the packed pattern data, the initial
//! speed/tempo and the optional song message. Instrument and sample bodies
//! are never parsed; only their header table sizes matter for locating the
//! pattern offset table.
//!
//! # IT Format Overview
//!
//! IT files contain:
//! - Header with song metadata (counts, special flags, speed, tempo)
//! - Pattern order table
//! - Instrument/sample/pattern offset tables
//! - Pattern data (compressed channel-based format)
//!
//! # Usage
//!
//! ```ignore
//! use it_decode::parse_it;
//!
//! let it_data = std::fs::read("song.it").unwrap();
//! let module = parse_it(&it_data).unwrap();
//!
//! println!("Orders: {:?}", module.order_list);
//! println!("Speed/tempo: {}/{}", module.speed, module.tempo);
//! ```
//!
//! # Format Reference
//!
//! - Impulse Tracker Technical Specification (ITTECH.TXT)
//! - <https://github.com/schismtracker/schismtracker/wiki/ITTECH.TXT>

mod cursor;
mod error;
mod module;
mod parser;
mod writer;

pub use cursor::ByteReader;
pub use error::ItError;
pub use module::{ItCell, ItCommand, ItModule, ItPattern, ItRow};
pub use parser::{decode_pattern, parse_it};
pub use writer::ItWriter;

// =============================================================================
// Constants
// =============================================================================

/// IT format magic string "IMPM"
pub const IT_MAGIC: &[u8; 4] = b"IMPM";

/// Offset of the order/instrument/sample/pattern count fields
pub const COUNTS_OFFSET: usize = 0x20;

/// Offset of the "special" flags field
pub const SPECIAL_OFFSET: usize = 0x2E;

/// Offset of the initial speed and tempo bytes
pub const SPEED_OFFSET: usize = 0x32;

/// Offset of the message length (u16) and message offset (u32)
pub const MESSAGE_OFFSET: usize = 0x36;

/// Offset of the order list (end of the fixed header)
pub const HEADER_SIZE: usize = 0xC0;

/// Size of the header that precedes packed pattern data
pub const PATTERN_HEADER_SIZE: usize = 8;

/// Special flag bit: song message attached
pub const SPECIAL_MESSAGE: u16 = 0x0001;

/// Maximum number of channels addressable by the pattern encoding
pub const MAX_CHANNELS: usize = 64;

/// Rows in a pattern whose offset is 0 (no stored data)
pub const DEFAULT_PATTERN_ROWS: u16 = 64;

/// Highest order list entry that refers to a pattern
pub const MAX_ORDER_PATTERN: u8 = 199;

// =============================================================================
// Note Constants
// =============================================================================

/// Note value for "note cut" (^^^)
pub const NOTE_CUT: u8 = 254;

/// Note value for "note off" (===)
pub const NOTE_OFF: u8 = 255;

/// Maximum valid note (B-9)
pub const NOTE_MAX: u8 = 119;

/// Maximum value of a plain volume in the volume/pan column
pub const VOLUME_MAX: u8 = 64;

// =============================================================================
// Effect Constants
// =============================================================================

/// IT effect commands consumed by the converter
pub mod effects {
    /// Dxy - Volume slide
    pub const VOLUME_SLIDE: u8 = b'D' - b'@';
    /// Exx - Pitch slide down
    pub const PORTA_DOWN: u8 = b'E' - b'@';
    /// Gxx - Tone portamento
    pub const TONE_PORTA: u8 = b'G' - b'@';
    /// Hxy - Vibrato
    pub const VIBRATO: u8 = b'H' - b'@';
}

// =============================================================================
// Tests
// =============================================================================
