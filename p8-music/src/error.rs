//! Conversion error types

use thiserror::Error;

use crate::MAX_SOUNDS;

/// Errors that can occur while mapping a module onto a PICO-8 cartridge
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// Order list names a pattern the module does not contain
    #[error("Order {order} refers to missing pattern {pattern}")]
    MissingPattern { order: usize, pattern: u8 },

    /// Tempo of 0 gives no note length
    #[error("Module tempo is 0")]
    ZeroTempo,

    /// More distinct sounds than sfx slots
    #[error("Song needs more than {} sfx", MAX_SOUNDS)]
    TooManySounds,

    /// Nothing to put in the music section
    #[error("Order list is empty")]
    EmptySong,
}
