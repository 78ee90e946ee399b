/// Escape marker preceding a critical character
const ESCAPE: u8 = b'=';
/// Offset added to every byte by the encoder
const OFFSET: u8 = 42;
/// Extra offset added to escaped bytes
const ESCAPE_OFFSET: u8 = 64;

/// Per-part yEnc line decoder
///
/// yEnc encoding: output = (input + 42) mod 256
/// yEnc decoding: output = (input - 42) mod 256
///
/// Escape sequences: =X means (X - 42 - 64) mod 256
///
/// An escape marker may be the last byte of a line; the escaped character is
/// then the first byte of the next line. The pending escape is kept here
/// between calls, so use one decoder per part body.
#[derive(Debug, Clone, Default)]
pub struct LineDecoder {
    escaped: bool,
}

impl LineDecoder {
    /// Create a decoder with no pending escape
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the previous line ended with an unresolved escape marker
    pub fn is_escape_pending(&self) -> bool {
        self.escaped
    }

    /// Drop any pending escape
    pub fn reset(&mut self) {
        self.escaped = false;
    }

    /// Decode one line (without terminator), appending the bytes to `output`
    ///
    /// Returns the number of bytes appended, which is the line length minus
    /// the number of escape markers consumed.
    pub fn decode_line(&mut self, line: &[u8], output: &mut Vec<u8>) -> usize {
        let start = output.len();
        output.reserve(line.len());

        for &byte in line {
            if self.escaped {
                self.escaped = false;
                output.push(byte.wrapping_sub(OFFSET).wrapping_sub(ESCAPE_OFFSET));
            } else if byte == ESCAPE {
                self.escaped = true;
            } else {
                output.push(byte.wrapping_sub(OFFSET));
            }
        }

        output.len() - start
    }
}
