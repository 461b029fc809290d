//! P8-Music: PICO-8 sfx/music generation from decoded IT modules
//!
//! Projects the events of an [`ItModule`] onto a PICO-8 cartridge's
//! `__sfx__` and `__music__` sections. The conversion is lossy: only the
//! first four channels are used, notes become pitch offsets, volume drops
//! to 3 bits and a handful of IT commands map onto PICO-8 effects.
//!
//! # Usage
//!
//! ```ignore
//! use p8_music::{ConvertConfig, convert};
//!
//! let module = it_decode::parse_it(&std::fs::read("song.it").unwrap()).unwrap();
//! let cart = convert(&module, &ConvertConfig::default()).unwrap();
//! std::fs::write("song.p8", cart).unwrap();
//! ```

use it_decode::ItModule;
use tracing::{debug, warn};

mod cart;
mod catalog;
mod config;
mod error;
mod remap;

pub use cart::{CART_HEADER, MusicEntry, write_cart};
pub use catalog::SoundCatalog;
pub use config::ConvertConfig;
pub use error::ConvertError;
pub use remap::{P8Note, Remapper, Sound, it_volume_to_p8, sfx_speed};

// =============================================================================
// Constants
// =============================================================================

/// Channels in a PICO-8 music pattern
pub const CHANNELS: usize = 4;

/// Number of sfx slots in a cartridge
pub const MAX_SOUNDS: usize = 64;

/// Music pattern channel value for "channel disabled"
pub const SILENT_CHANNEL: u8 = 64;

/// Notes held by one PICO-8 sfx
pub const SFX_NOTES: usize = 32;

/// Highest PICO-8 volume
pub const P8_VOLUME_MAX: u8 = 7;

/// PICO-8 note effects
pub mod effects {
    pub const NONE: u8 = 0;
    pub const SLIDE: u8 = 1;
    pub const VIBRATO: u8 = 2;
    /// Also used as the retrigger cue for repeated custom instruments
    pub const DROP: u8 = 3;
    pub const FADE_IN: u8 = 4;
    pub const FADE_OUT: u8 = 5;
}

/// Music pattern flags
pub mod loop_flags {
    pub const NONE: u8 = 0x00;
    pub const LOOP_START: u8 = 0x01;
    pub const LOOP_END: u8 = 0x02;
}

/// Convert a decoded IT module into PICO-8 cartridge text
///
/// Walks the order list, renders channels 0-3 of each pattern into sfx
/// strings (carrying note state across the whole song), deduplicates them
/// and emits the cartridge.
pub fn convert(module: &ItModule, config: &ConvertConfig) -> Result<String, ConvertError> {
    let speed = sfx_speed(module.speed, module.tempo)?;

    let mut remapper = Remapper::new(config.note_offset);
    let mut catalog = SoundCatalog::from_message(module.message.as_deref());
    let seeded = catalog.len();
    let mut music = Vec::with_capacity(module.order_list.len());

    for (order, &pattern_idx) in module.order_list.iter().enumerate() {
        let pattern = module
            .pattern_at_order(order)
            .ok_or(ConvertError::MissingPattern {
                order,
                pattern: pattern_idx,
            })?;

        if pattern.len() > SFX_NOTES {
            warn!(
                order,
                pattern = pattern_idx,
                rows = pattern.len(),
                "pattern is longer than a PICO-8 sfx ({} notes)",
                SFX_NOTES
            );
        }

        let mut sounds = [SILENT_CHANNEL; CHANNELS];
        for (channel, slot) in sounds.iter_mut().enumerate() {
            let sound = remapper.render_channel(pattern, channel as u8, speed);
            *slot = catalog.add(&sound)?;
        }

        debug!(order, pattern = pattern_idx, ?sounds, "mapped order");
        music.push(MusicEntry::new(sounds));
    }

    debug!(
        sfx = catalog.len(),
        seeded,
        patterns = music.len(),
        speed,
        "conversion complete"
    );

    write_cart(&catalog, &music, config)
}
