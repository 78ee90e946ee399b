//! Decoding invariants

use yenc_rs::{decode, decode_lines, LineDecoder, YencError};

use super::common::{crc32, encode_body, encode_single};

#[test]
fn test_every_byte_round_trips_plain_and_escaped() {
    for byte in 0..=255u8 {
        let encoded = byte.wrapping_add(42);

        let mut decoder = LineDecoder::new();
        let mut output = Vec::new();
        if encoded != b'=' {
            decoder.decode_line(&[encoded], &mut output);
            assert_eq!(output, [byte], "plain form of {byte}");
        }

        output.clear();
        decoder.decode_line(&[b'=', encoded.wrapping_add(64)], &mut output);
        assert_eq!(output, [byte], "escaped form of {byte}");
    }
}

#[test]
fn test_escape_split_across_lines() {
    // 0x00 -> '*' + 64 = 'j'; the marker ends the first line
    let lines = [
        "=ybegin line=128 size=3 name=split.bin",
        "kk=",
        "j",
        "=yend size=3",
    ];
    let part = decode_lines(lines, 1).unwrap();
    assert_eq!(part.body, b"AA\x00");

    let stream: &[u8] = b"=ybegin line=128 size=3 name=split.bin\r\nkk=\r\nj\r\n=yend size=3\r\n";
    assert_eq!(decode(stream).unwrap().body, b"AA\x00");
}

#[test]
fn test_escape_before_empty_line_contributes_nothing() {
    let stream: &[u8] = b"=ybegin line=128 size=1 name=e.bin\r\n=\r\n\r\nj\r\n=yend size=1\r\n";
    assert_eq!(decode(stream).unwrap().body, b"\x00");
}

#[test]
fn test_escape_does_not_leak_into_next_part() {
    // Part one ends with a dangling escape marker; part two must decode plainly
    let input: &[u8] = b"=ybegin size=1 name=a.bin\r\nk=\r\n=yend size=1\r\n\
                         =ybegin size=1 name=b.bin\r\nk\r\n=yend size=1\r\n";
    let mut decoder = yenc_rs::Decoder::from_reader(input);
    assert_eq!(decoder.run().unwrap(), 2);
    assert_eq!(decoder.parts()[1].body, b"A");
}

#[test]
fn test_wrong_size_is_rejected() {
    let data = b"size invariant";
    let tampered = framed(&encode_body(data, 128), data.len() + 1, None);

    match decode(tampered.as_slice()) {
        Err(YencError::SizeMismatch { expected, actual, .. }) => {
            assert_eq!(expected, 15);
            assert_eq!(actual, 14);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_valid_parts_match_trailer_size() {
    for len in [0usize, 1, 127, 128, 129, 1000] {
        let data: Vec<u8> = (0..len).map(|i| (i % 256) as u8).collect();
        let part = decode(encode_single(&data, "n.bin", 128).as_slice()).unwrap();
        assert_eq!(part.body.len() as u64, part.size);
        assert_eq!(part.body, data);
    }
}

/// Frame an encoded body, optionally declaring pcrc32
fn framed(body: &[u8], size: usize, pcrc32: Option<u32>) -> Vec<u8> {
    let mut input = format!("=ybegin line=128 size={size} name=flip.bin\r\n").into_bytes();
    input.extend_from_slice(body);
    let trailer = match pcrc32 {
        Some(crc) => format!("=yend size={size} pcrc32={crc:08x}\r\n"),
        None => format!("=yend size={size}\r\n"),
    };
    input.extend_from_slice(trailer.as_bytes());
    input
}

#[test]
fn test_any_flipped_byte_fails_checksum() {
    let data: Vec<u8> = (0..200).map(|i| (i * 13 % 256) as u8).collect();
    let body = encode_body(&data, 64);
    let mut flipped_positions = 0;

    for i in 0..body.len() {
        let byte = body[i];
        let escaped_target = i > 0 && body[i - 1] == b'=';
        if matches!(byte, b'=' | b'\r' | b'\n') || escaped_target {
            continue;
        }
        let flipped = byte ^ 0x01;
        if matches!(flipped, 0 | b'=' | b'\r' | b'\n') {
            continue;
        }

        let mut tampered = body.clone();
        tampered[i] = flipped;
        flipped_positions += 1;

        let checked = framed(&tampered, data.len(), Some(crc32(&data)));
        assert!(
            matches!(decode(checked.as_slice()), Err(YencError::ChecksumMismatch { .. })),
            "flip at {i} not detected"
        );

        let unchecked = framed(&tampered, data.len(), None);
        let part = decode(unchecked.as_slice()).unwrap();
        assert_ne!(part.body, data);
    }

    assert!(flipped_positions > 100);
}

#[test]
fn test_end_to_end_five_bytes() {
    let crc = crc32(&[0, 1, 2, 3, 4]);
    let trailer = format!("=yend size=5 crc32={crc:08x}");
    let lines: Vec<Vec<u8>> = vec![
        b"=ybegin line=128 size=5 name=test.bin".to_vec(),
        vec![42, 43, 44, 45, 46],
        trailer.into_bytes(),
    ];

    let part = decode_lines(lines, 1).unwrap();
    assert_eq!(part.name, "test.bin");
    assert_eq!(part.size, 5);
    assert_eq!(part.body, [0, 1, 2, 3, 4]);
    assert_eq!(part.crc32, crc);
}
