//! Error types for IT module decoding

use thiserror::Error;

/// Errors that can occur when decoding an IT module
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItError {
    /// Invalid magic bytes (expected "IMPM")
    #[error("Not an Impulse Tracker module (expected 'IMPM' magic)")]
    InvalidFormat,

    /// A fixed-width field or byte span reaches past the end of the buffer
    #[error("Read of {len} bytes at offset 0x{offset:08X} exceeds buffer of {size} bytes")]
    OutOfBounds {
        offset: usize,
        len: usize,
        size: usize,
    },

    /// Packed pattern data ended in the middle of a channel record
    #[error("Pattern {pattern} is truncated at packed offset {offset}")]
    TruncatedPattern { pattern: usize, offset: usize },

    /// A channel reused its mask before defining one in this pattern
    #[error("Pattern {pattern} reuses the mask of channel {channel} before defining it")]
    MissingMaskState { pattern: usize, channel: u8 },
}
