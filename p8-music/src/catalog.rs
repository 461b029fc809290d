//! Deduplicated sfx catalog

use hashbrown::HashMap;

use crate::error::ConvertError;
use crate::remap::Sound;
use crate::{MAX_SOUNDS, SILENT_CHANNEL};

/// Ordered list of distinct sfx strings, addressed by index
///
/// Lookup goes through a hash index that remembers where each string first
/// appeared, so a string that occurs twice in the seed still resolves to its
/// first position.
#[derive(Debug, Clone, Default)]
pub struct SoundCatalog {
    sounds: Vec<String>,
    index: HashMap<String, usize>,
}

impl SoundCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the catalog with one sfx per message line
    ///
    /// Songs can ship hand-made sfx (custom instruments, typically) in their
    /// message; generated sfx that match a line reuse its index.
    pub fn from_message(message: Option<&str>) -> Self {
        let mut catalog = Self::new();
        for line in message.into_iter().flat_map(|m| m.split('\n')) {
            catalog.push(line.to_string());
        }
        catalog
    }

    fn push(&mut self, sound: String) -> usize {
        let idx = self.sounds.len();
        self.index.entry(sound.clone()).or_insert(idx);
        self.sounds.push(sound);
        idx
    }

    /// Index for `sound`, adding it if it is new
    ///
    /// Silent sounds are never stored; they map to [`SILENT_CHANNEL`].
    pub fn add(&mut self, sound: &Sound) -> Result<u8, ConvertError> {
        if sound.is_silent() {
            return Ok(SILENT_CHANNEL);
        }
        self.intern(sound.to_string())
    }

    /// Index for an sfx string, adding it if it is new
    pub fn intern(&mut self, sound: String) -> Result<u8, ConvertError> {
        let idx = match self.index.get(&sound) {
            Some(&idx) => idx,
            None => {
                if self.sounds.len() >= MAX_SOUNDS {
                    return Err(ConvertError::TooManySounds);
                }
                self.push(sound)
            }
        };

        // Seeded entries past the last slot cannot be referenced either
        if idx >= MAX_SOUNDS {
            return Err(ConvertError::TooManySounds);
        }
        Ok(idx as u8)
    }

    /// sfx strings in index order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.sounds.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remap::P8Note;

    fn sound(pitch: u8) -> Sound {
        Sound {
            speed: 15,
            notes: vec![
                P8Note {
                    pitch,
                    instrument: 1,
                    volume: 5,
                    effect: 0,
                };
                2
            ],
        }
    }

    #[test]
    fn test_silent_sound_not_stored() {
        let mut catalog = SoundCatalog::new();
        let silent = Sound {
            speed: 15,
            notes: vec![P8Note::default(); 32],
        };
        assert_eq!(catalog.add(&silent), Ok(SILENT_CHANNEL));
        assert_eq!(catalog.add(&silent), Ok(SILENT_CHANNEL));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_dedup_reuses_index() {
        let mut catalog = SoundCatalog::new();
        assert_eq!(catalog.add(&sound(10)), Ok(0));
        assert_eq!(catalog.add(&sound(12)), Ok(1));
        assert_eq!(catalog.add(&sound(10)), Ok(0));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.iter().nth(1), Some("010f00000c1500c150"));
    }

    #[test]
    fn test_seeded_from_message() {
        let seeded = sound(10).to_string();
        let message = format!("custom-instrument\n{seeded}");
        let mut catalog = SoundCatalog::from_message(Some(&message));
        assert_eq!(catalog.len(), 2);

        // Matches the second seeded line
        assert_eq!(catalog.add(&sound(10)), Ok(1));
        assert_eq!(catalog.add(&sound(11)), Ok(2));
        assert_eq!(
            catalog.iter().collect::<Vec<_>>(),
            vec!["custom-instrument", seeded.as_str(), "010f00000b1500b150"]
        );
    }

    #[test]
    fn test_duplicate_seed_lines_resolve_to_first() {
        let mut catalog = SoundCatalog::from_message(Some("a\nb\na"));
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.intern("a".to_string()), Ok(0));
    }

    #[test]
    fn test_no_message_means_empty_catalog() {
        assert!(SoundCatalog::from_message(None).is_empty());
    }

    #[test]
    fn test_too_many_sounds() {
        let mut catalog = SoundCatalog::new();
        for pitch in 0..MAX_SOUNDS as u8 {
            assert_eq!(catalog.add(&sound(pitch)), Ok(pitch));
        }
        assert_eq!(
            catalog.add(&sound(MAX_SOUNDS as u8)),
            Err(ConvertError::TooManySounds)
        );
        // Existing entries are still found
        assert_eq!(catalog.add(&sound(3)), Ok(3));
    }

    #[test]
    fn test_seeded_line_past_last_slot() {
        let message = (0..=MAX_SOUNDS)
            .map(|i| format!("line{i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut catalog = SoundCatalog::from_message(Some(&message));
        assert_eq!(catalog.len(), MAX_SOUNDS + 1);

        assert_eq!(catalog.intern("line63".to_string()), Ok(63));
        assert_eq!(
            catalog.intern("line64".to_string()),
            Err(ConvertError::TooManySounds)
        );
    }
}
