//! PICO-8 cartridge text output

use std::fmt;

use crate::catalog::SoundCatalog;
use crate::config::ConvertConfig;
use crate::error::ConvertError;
use crate::{CHANNELS, loop_flags};

/// First line of every `.p8` file
pub const CART_HEADER: &str = "pico-8 cartridge // http://www.pico-8.com";

/// One music pattern: an sfx index (or [`SILENT_CHANNEL`](crate::SILENT_CHANNEL)) per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MusicEntry {
    pub sounds: [u8; CHANNELS],
}

impl MusicEntry {
    pub fn new(sounds: [u8; CHANNELS]) -> Self {
        Self { sounds }
    }
}

impl fmt::Display for MusicEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sound in self.sounds {
            write!(f, "{sound:02x}")?;
        }
        Ok(())
    }
}

/// Write the cartridge: preamble, `__sfx__` and `__music__` sections
///
/// The first music pattern starts the loop and the last one ends it; a
/// single pattern carries both flags.
pub fn write_cart(
    catalog: &SoundCatalog,
    music: &[MusicEntry],
    config: &ConvertConfig,
) -> Result<String, ConvertError> {
    if music.is_empty() {
        return Err(ConvertError::EmptySong);
    }

    let mut lines = vec![
        CART_HEADER.to_string(),
        format!("version {}", config.cart_version),
        "__lua__".to_string(),
        String::new(),
        "__sfx__".to_string(),
    ];

    lines.extend(catalog.iter().map(str::to_string));

    lines.push(String::new());
    lines.push("__music__".to_string());

    let last = music.len() - 1;
    for (idx, entry) in music.iter().enumerate() {
        let mut flags = loop_flags::NONE;
        if idx == 0 {
            flags |= loop_flags::LOOP_START;
        }
        if idx == last {
            flags |= loop_flags::LOOP_END;
        }
        lines.push(format!("{flags:02x} {entry}"));
    }

    let mut output = lines.join("\n");
    output.push('\n');
    Ok(output)
}
