//! Tests for the parser module

use crate::error::ItError;
use crate::module::{ItCell, ItCommand, ItPattern};
use crate::parser::{decode_pattern, parse_it};
use crate::writer::ItWriter;
use crate::{HEADER_SIZE, IT_MAGIC};

/// Module with a single one-row pattern played once
fn single_pattern_writer(packed: &[u8], num_rows: u16) -> ItWriter {
    let mut writer = ItWriter::new();
    writer.add_raw_pattern(num_rows, packed);
    writer.set_orders(&[0]);
    writer
}

#[test]
fn test_parse_invalid_magic() {
    let mut data = ItWriter::new().write();
    data[..4].copy_from_slice(b"XXXX"); // Invalid magic
    assert_eq!(parse_it(&data), Err(ItError::InvalidFormat));
}

#[test]
fn test_parse_invalid_magic_short_buffer() {
    assert_eq!(parse_it(b"IM"), Err(ItError::InvalidFormat));
    assert_eq!(parse_it(b""), Err(ItError::InvalidFormat));
    assert_eq!(parse_it(b"MPMI with trailing data"), Err(ItError::InvalidFormat));
}

#[test]
fn test_parse_truncated_header() {
    let result = parse_it(b"IMPM test");
    assert!(matches!(result, Err(ItError::OutOfBounds { .. })));
}

#[test]
fn test_order_list_filtering() {
    let mut writer = ItWriter::new();
    writer.add_empty_pattern();
    writer.set_orders(&[0, 199, 200, 5, 255]);

    let module = parse_it(&writer.write()).unwrap();
    assert_eq!(module.num_orders, 5);
    assert_eq!(module.order_list, vec![0, 199, 5]);
}

#[test]
fn test_pattern_table_skips_instrument_and_sample_headers() {
    let mut writer = single_pattern_writer(&[0x81, 0x01, 60, 0], 1);
    writer.set_instrument_count(2);
    writer.set_sample_count(5);

    let module = parse_it(&writer.write()).unwrap();
    assert_eq!(module.patterns.len(), 1);
    assert_eq!(module.patterns[0].rows[0].cell(0).unwrap().note, Some(60));
}

#[test]
fn test_speed_tempo_and_message() {
    let mut writer = single_pattern_writer(&[0], 1);
    writer.set_speed(3);
    writer.set_tempo(150);
    writer.set_message("0110000000\n0220000000");

    let module = parse_it(&writer.write()).unwrap();
    assert_eq!(module.speed, 3);
    assert_eq!(module.tempo, 150);
    // Stored with CR line breaks, normalized on read
    assert_eq!(module.message.as_deref(), Some("0110000000\n0220000000"));
}

#[test]
fn test_message_ignored_without_special_flag() {
    let mut data = {
        let mut writer = single_pattern_writer(&[0], 1);
        writer.set_message("hello");
        writer.write()
    };
    data[crate::SPECIAL_OFFSET] = 0;

    let module = parse_it(&data).unwrap();
    assert!(module.message.is_none());
}

/// Offset of the stored message, read back from the header
fn message_offset(data: &[u8]) -> usize {
    let at = crate::MESSAGE_OFFSET + 2;
    u32::from_le_bytes(data[at..at + 4].try_into().unwrap()) as usize
}

#[test]
fn test_message_non_ascii_replaced() {
    let mut writer = single_pattern_writer(&[0], 1);
    writer.set_message("abc");
    let mut data = writer.write();
    let offset = message_offset(&data);
    data[offset + 1] = 0xE9;

    let module = parse_it(&data).unwrap();
    assert_eq!(module.message.as_deref(), Some("a?c"));
}

#[test]
fn test_message_starting_with_nul_is_absent() {
    let mut writer = single_pattern_writer(&[0], 1);
    writer.set_message("abc");
    let mut data = writer.write();
    let offset = message_offset(&data);
    data[offset] = 0;

    assert!(parse_it(&data).unwrap().message.is_none());
}

#[test]
fn test_zero_length_message_is_absent() {
    let mut writer = single_pattern_writer(&[0], 1);
    writer.set_message("abc");
    let mut data = writer.write();
    data[crate::MESSAGE_OFFSET..crate::MESSAGE_OFFSET + 2].copy_from_slice(&0u16.to_le_bytes());

    assert!(parse_it(&data).unwrap().message.is_none());
}

#[test]
fn test_pattern_past_end_of_file() {
    let mut data = single_pattern_writer(&[0x81, 0x01, 60, 0], 1).write();
    data.truncate(data.len() - 2);
    assert!(matches!(parse_it(&data), Err(ItError::OutOfBounds { .. })));
}

#[test]
fn test_zero_offset_pattern_is_empty() {
    let mut writer = ItWriter::new();
    writer.add_empty_pattern();
    writer.set_orders(&[0]);

    let module = parse_it(&writer.write()).unwrap();
    assert_eq!(module.patterns[0], ItPattern::default_empty());
}

#[test]
fn test_header_magic_constant() {
    let data = ItWriter::new().write();
    assert_eq!(&data[..4], IT_MAGIC);
    assert_eq!(data.len(), HEADER_SIZE);
}

// =============================================================================
// Pattern decoding
// =============================================================================

#[test]
fn test_single_zero_byte_is_one_empty_row() {
    let pattern = decode_pattern(0, &[0], 1).unwrap();
    assert_eq!(pattern.rows.len(), 1);
    assert!(pattern.rows[0].is_empty());
}

#[test]
fn test_channel_from_marker() {
    // Marker 0x83 -> channel 2 with new mask; marker 0x40 -> channel 63
    let packed = [0x83, 0x02, 5, 0xC0, 0x02, 9, 0];
    let pattern = decode_pattern(0, &packed, 1).unwrap();
    let row = &pattern.rows[0];
    assert_eq!(row.cell(2).unwrap().instrument, Some(5));
    assert_eq!(row.cell(63).unwrap().instrument, Some(9));
    assert_eq!(row.len(), 2);
}

#[test]
fn test_all_fields_read() {
    let packed = [0x81, 0x0F, 48, 1, 64, 4, 0x0F, 0];
    let pattern = decode_pattern(0, &packed, 1).unwrap();
    let cell = pattern.rows[0].cell(0).unwrap();
    assert_eq!(*cell, ItCell {
        note: Some(48),
        note_cut: false,
        instrument: Some(1),
        volume: Some(64),
        command: Some(ItCommand::new(4, 0x0F)),
    });
}

#[test]
fn test_mask_carry_forward_reuses_note() {
    let packed = [
        0x81, 0x01, 60, 0, // explicit note 60
        0x81, 0x10, 0, // reuse note
        0x81, 0x10, 0, // reuse note again
        0x01, 0, // marker without mask: reuse mask 0x10
    ];
    let pattern = decode_pattern(0, &packed, 4).unwrap();
    assert_eq!(pattern.rows.len(), 4);
    for row in &pattern.rows {
        assert_eq!(row.cell(0).unwrap().note, Some(60));
    }
}

#[test]
fn test_mask_reuse_follows_latest_note() {
    let packed = [
        0x81, 0x01, 60, 0, // note 60
        0x01, 72, 0, // same mask, new note 72
        0x81, 0x10, 0, // reuse -> 72
    ];
    let pattern = decode_pattern(0, &packed, 3).unwrap();
    assert_eq!(pattern.rows[2].cell(0).unwrap().note, Some(72));
}

#[test]
fn test_reuse_bits_for_instrument_volume_command() {
    let packed = [
        0x82, 0x0E, 3, 40, 8, 0x44, 0, // channel 1: instrument, volume, command
        0x82, 0xE0, 0, // reuse all three
    ];
    let pattern = decode_pattern(0, &packed, 2).unwrap();
    assert_eq!(pattern.rows[0].cell(1), pattern.rows[1].cell(1));
}

#[test]
fn test_special_notes() {
    // Note off and note cut are kept as a cut; note fade carries nothing
    let packed = [0x81, 0x01, 255, 0x82, 0x01, 254, 0x83, 0x01, 253, 0];
    let pattern = decode_pattern(0, &packed, 1).unwrap();
    let row = &pattern.rows[0];
    assert!(row.cell(0).unwrap().note_cut);
    assert_eq!(row.cell(0).unwrap().note, None);
    assert!(row.cell(1).unwrap().note_cut);
    assert!(row.cell(2).is_none());
}

#[test]
fn test_missing_mask_state() {
    // Marker without bit 7 on a channel that never defined a mask
    let packed = [0x81, 0x01, 60, 0x02, 0];
    assert_eq!(
        decode_pattern(7, &packed, 1),
        Err(ItError::MissingMaskState {
            pattern: 7,
            channel: 1
        })
    );
}

#[test]
fn test_mask_state_reset_between_patterns() {
    let mut writer = ItWriter::new();
    writer.add_raw_pattern(1, &[0x81, 0x01, 60, 0]);
    writer.add_raw_pattern(1, &[0x01, 61, 0]);
    writer.set_orders(&[0, 1]);

    assert_eq!(
        parse_it(&writer.write()),
        Err(ItError::MissingMaskState {
            pattern: 1,
            channel: 0
        })
    );
}

#[test]
fn test_truncated_pattern() {
    // Command needs two bytes, only one present
    let packed = [0x81, 0x08, 4];
    assert_eq!(
        decode_pattern(3, &packed, 1),
        Err(ItError::TruncatedPattern {
            pattern: 3,
            offset: 3
        })
    );
}

#[test]
fn test_trailing_partial_row_dropped() {
    let packed = [0x81, 0x01, 60, 0, 0x81, 0x01, 62];
    let pattern = decode_pattern(0, &packed, 1).unwrap();
    assert_eq!(pattern.rows.len(), 1);
    assert_eq!(pattern.rows[0].cell(0).unwrap().note, Some(60));
}

#[test]
fn test_declared_rows_kept() {
    let pattern = decode_pattern(0, &[0, 0], 64).unwrap();
    assert_eq!(pattern.num_rows, 64);
    assert_eq!(pattern.rows.len(), 2);
}
