//! IT → PICO-8 note mapping

use std::fmt;

use it_decode::{ItCell, ItCommand, ItPattern, VOLUME_MAX};
use tracing::warn;

use crate::error::ConvertError;
use crate::{CHANNELS, P8_VOLUME_MAX, effects};

/// Highest PICO-8 instrument digit
const MAX_INSTRUMENT: u8 = 0x0F;

/// One PICO-8 sfx note
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct P8Note {
    pub pitch: u8,
    pub instrument: u8,
    pub volume: u8,
    pub effect: u8,
}

impl P8Note {
    /// Whether this note renders as `00000`
    pub fn is_silent(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for P8Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}{:x}{:x}{:x}",
            self.pitch, self.instrument, self.volume, self.effect
        )
    }
}

/// One channel of one pattern, rendered as a PICO-8 sfx
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sound {
    /// Note length in 1/128 s units
    pub speed: u8,
    pub notes: Vec<P8Note>,
}

impl Sound {
    /// Every note is `00000`
    pub fn is_silent(&self) -> bool {
        self.notes.iter().all(P8Note::is_silent)
    }
}

impl fmt::Display for Sound {
    /// Editor mode 01, speed, loop start 00, loop end 00, then the notes
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "01{:02x}0000", self.speed)?;
        for note in &self.notes {
            write!(f, "{note}")?;
        }
        Ok(())
    }
}

/// PICO-8 note length for an IT speed/tempo pair
///
/// An IT row lasts `2.5 / tempo * speed` seconds, a PICO-8 note
/// `speed / 128` seconds. Computed in integers, so a few pairs whose exact
/// quotient is whole (speed 49, tempo 245 gives 64) come out one higher than
/// a floating point evaluation of the same formula.
pub fn sfx_speed(speed: u8, tempo: u8) -> Result<u8, ConvertError> {
    if tempo == 0 {
        return Err(ConvertError::ZeroTempo);
    }
    let steps = 320 * speed as u32 / tempo as u32;
    Ok(steps.min(u8::MAX as u32) as u8)
}

/// Rescale an IT volume (0-64) to PICO-8 volume (0-7), rounding down
pub fn it_volume_to_p8(volume: u8) -> u8 {
    (volume.min(VOLUME_MAX) as u16 * P8_VOLUME_MAX as u16 / VOLUME_MAX as u16) as u8
}

/// Rescale a PICO-8 volume back to the IT range, rounding down
fn p8_volume_to_it(volume: u8) -> u8 {
    (volume.min(P8_VOLUME_MAX) as u16 * VOLUME_MAX as u16 / P8_VOLUME_MAX as u16) as u8
}

/// Convert an IT effect command to a PICO-8 effect
fn convert_command(command: Option<ItCommand>) -> u8 {
    use it_decode::effects as it;

    let Some(command) = command else {
        return effects::NONE;
    };

    match command.id {
        // Gxx - Tone portamento
        it::TONE_PORTA => effects::SLIDE,

        // Hxy - Vibrato
        it::VIBRATO => effects::VIBRATO,

        // Exx - Portamento down
        it::PORTA_DOWN => effects::DROP,

        // Dxy - Volume slide, an upward slide wins
        it::VOLUME_SLIDE => {
            if command.value & 0xF0 != 0 {
                effects::FADE_IN
            } else if command.value & 0x0F != 0 {
                effects::FADE_OUT
            } else {
                effects::NONE
            }
        }

        _ => effects::NONE,
    }
}

/// Maps cells to PICO-8 notes, remembering each channel's last note
///
/// The remembered state lives for the whole song: it is not reset when a
/// new pattern starts.
#[derive(Debug, Clone)]
pub struct Remapper {
    note_offset: u8,
    previous: [P8Note; CHANNELS],
}

impl Remapper {
    pub fn new(note_offset: u8) -> Self {
        Self {
            note_offset,
            previous: [P8Note::default(); CHANNELS],
        }
    }

    /// Map the next row's cell for `channel` (`None` for no event)
    ///
    /// # Panics
    /// If `channel` is not below [`CHANNELS`].
    pub fn next_note(&mut self, channel: usize, cell: Option<&ItCell>) -> P8Note {
        let prev = self.previous[channel];

        let note = match cell {
            None => P8Note {
                volume: if prev.effect == effects::FADE_OUT {
                    0
                } else {
                    prev.volume
                },
                effect: effects::NONE,
                ..prev
            },
            Some(cell) => self.map_cell(channel, cell, prev),
        };

        self.previous[channel] = note;
        note
    }

    fn map_cell(&self, channel: usize, cell: &ItCell, prev: P8Note) -> P8Note {
        let pitch = match cell.note {
            Some(note) if note < self.note_offset => {
                warn!(
                    channel,
                    note,
                    offset = self.note_offset,
                    "note below offset, clamped to pitch 0"
                );
                0
            }
            Some(note) => note - self.note_offset,
            None => prev.pitch,
        };

        let instrument = match cell.instrument {
            Some(stored) if stored > MAX_INSTRUMENT + 1 => {
                warn!(
                    channel,
                    instrument = stored,
                    "instrument out of range, clamped to {:x}",
                    MAX_INSTRUMENT
                );
                MAX_INSTRUMENT
            }
            Some(stored) => stored.saturating_sub(1),
            None => prev.instrument,
        };

        let volume = if cell.note_cut {
            0
        } else {
            let it_volume = match (cell.volume, cell.note) {
                (Some(v), _) => v,
                (None, Some(_)) => VOLUME_MAX,
                (None, None) if prev.effect == effects::FADE_OUT => 0,
                // Previous volume is already 0-7; widened and narrowed again
                (None, None) => p8_volume_to_it(prev.volume),
            };
            it_volume_to_p8(it_volume)
        };

        let mut effect = convert_command(cell.command);

        // Custom instruments need an explicit retrigger when repeated
        if instrument > 7 && instrument == prev.instrument && effect == effects::NONE {
            effect = effects::DROP;
        }

        P8Note {
            pitch,
            instrument,
            volume,
            effect,
        }
    }

    /// Render one channel of a pattern as an sfx
    pub fn render_channel(&mut self, pattern: &ItPattern, channel: u8, speed: u8) -> Sound {
        let notes = pattern
            .rows
            .iter()
            .map(|row| self.next_note(channel as usize, row.cell(channel)))
            .collect();
        Sound { speed, notes }
    }
}
