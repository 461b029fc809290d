//! Conversion settings

use serde::Deserialize;

/// Settings for [`convert`](crate::convert)
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConvertConfig {
    /// Value written on the cartridge's `version` line.
    /// Default: 16
    #[serde(default = "default_cart_version")]
    pub cart_version: u32,

    /// Subtracted from IT notes to get a PICO-8 pitch (IT C-3 is PICO-8 C-0).
    /// Default: 36
    #[serde(default = "default_note_offset")]
    pub note_offset: u8,
}

fn default_cart_version() -> u32 {
    16
}

fn default_note_offset() -> u8 {
    36
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            cart_version: default_cart_version(),
            note_offset: default_note_offset(),
        }
    }
}
