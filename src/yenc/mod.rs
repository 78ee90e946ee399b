//! yEnc decoding for Usenet binaries
//!
//! yEnc is a binary-to-text encoding scheme designed specifically for Usenet.
//! Every byte is shifted by 42; the few results that would clash with line
//! framing are escaped with `=` and shifted by another 64.
//!
//! Reference: http://www.yenc.org/yenc-draft.1.3.txt

mod assembler;
pub mod decode;
pub mod decoder;
pub mod params;
pub mod types;

pub use decode::LineDecoder;
pub use decoder::{decode, decode_lines, Decoder};
pub use params::parse_params;
pub use types::Part;
