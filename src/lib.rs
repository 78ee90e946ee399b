#![doc = include_str!("../README.md")]

mod config;
mod error;
/// Line sources feeding the decoder
pub mod source;
/// yEnc decoding for Usenet binaries
pub mod yenc;

pub use config::DecoderConfig;
pub use error::{Result, YencError};
pub use source::{LineRead, LineSource, LinesSource, StreamSource};
pub use yenc::{decode, decode_lines, parse_params, Decoder, LineDecoder, Part};
