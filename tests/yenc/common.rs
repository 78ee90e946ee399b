//! Test-only yEnc encoder
//!
//! The library only decodes; these helpers produce encoded input for the
//! decoding tests.

use crc32fast::Hasher;

/// CRC32 (IEEE) of `data`
pub fn crc32(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Check if an encoded byte must always be escaped
fn is_critical_byte(byte: u8) -> bool {
    matches!(
        byte,
        0x00 |  // NUL
        0x0A |  // LF
        0x0D |  // CR
        0x3D // '='
    )
}

/// Encode binary data into CRLF-terminated body lines
///
/// yEnc encoding: output = (input + 42) mod 256
/// Escape sequence: = followed by (encoded + 64)
pub fn encode_body(data: &[u8], line_length: usize) -> Vec<u8> {
    let mut output = Vec::new();
    let mut current_line = Vec::new();

    for &byte in data {
        let encoded = byte.wrapping_add(42);
        let at_edge = current_line.is_empty() || current_line.len() + 1 >= line_length;
        let needs_escape =
            is_critical_byte(encoded) || (at_edge && (encoded == b'\t' || encoded == b' '));

        if needs_escape {
            current_line.push(b'=');
            current_line.push(encoded.wrapping_add(64));
        } else {
            current_line.push(encoded);
        }

        if current_line.len() >= line_length {
            output.extend_from_slice(&current_line);
            output.extend_from_slice(b"\r\n");
            current_line.clear();
        }
    }

    if !current_line.is_empty() {
        output.extend_from_slice(&current_line);
        output.extend_from_slice(b"\r\n");
    }

    output
}

/// Encode a complete single-part file
pub fn encode_single(data: &[u8], filename: &str, line_length: usize) -> Vec<u8> {
    let mut output = format!(
        "=ybegin line={} size={} name={}\r\n",
        line_length,
        data.len(),
        filename
    )
    .into_bytes();
    output.extend_from_slice(&encode_body(data, line_length));
    output.extend_from_slice(
        format!("=yend size={} crc32={:08x}\r\n", data.len(), crc32(data)).as_bytes(),
    );
    output
}

/// Encode every part of a multipart file
///
/// `chunk` is the part size. The last part's trailer carries `crc32` of the
/// whole file, or `file_crc32` when given.
pub fn encode_multipart(
    data: &[u8],
    filename: &str,
    chunk: usize,
    file_crc32: Option<u32>,
) -> Vec<Vec<u8>> {
    let chunks: Vec<&[u8]> = data.chunks(chunk).collect();
    let total = chunks.len();
    let file_crc32 = file_crc32.unwrap_or_else(|| crc32(data));

    chunks
        .iter()
        .enumerate()
        .map(|(i, part_data)| {
            let number = i + 1;
            let begin = i * chunk + 1;
            let end = begin + part_data.len() - 1;

            let mut output = format!(
                "=ybegin part={} total={} line=128 size={} name={}\r\n=ypart begin={} end={}\r\n",
                number,
                total,
                data.len(),
                filename,
                begin,
                end
            )
            .into_bytes();
            output.extend_from_slice(&encode_body(part_data, 128));

            let mut trailer = format!(
                "=yend size={} part={} pcrc32={:08x}",
                part_data.len(),
                number,
                crc32(part_data)
            );
            if number == total {
                trailer.push_str(&format!(" crc32={:08x}", file_crc32));
            }
            trailer.push_str("\r\n");
            output.extend_from_slice(trailer.as_bytes());
            output
        })
        .collect()
}

/// Split encoded bytes into lines without terminators
pub fn to_lines(encoded: &[u8]) -> Vec<Vec<u8>> {
    encoded
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line).to_vec())
        .filter(|line| !line.is_empty())
        .collect()
}
