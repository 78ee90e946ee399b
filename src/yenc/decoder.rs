use crate::config::DecoderConfig;
use crate::error::{Result, YencError};
use crate::source::{LineSource, LinesSource, StreamSource};
use std::io::{BufReader, Read};
use tracing::{debug, warn};

use super::assembler::PartAssembler;
use super::types::Part;

/// yEnc decoder over one logical input
///
/// A decoder owns its line source and the session state. One decoder handles
/// one input; it is not meant to be shared.
///
/// # Example
/// ```
/// use yenc_rs::Decoder;
///
/// let input: &[u8] = b"=ybegin line=128 size=5 name=test.bin\r\n\
///                      *+,-.\r\n\
///                      =yend size=5 crc32=515ad3cc\r\n";
/// let mut decoder = Decoder::from_reader(input);
/// let part = decoder.decode_first()?;
/// assert_eq!(part.name, "test.bin");
/// assert_eq!(part.body, [0, 1, 2, 3, 4]);
/// # Ok::<(), yenc_rs::YencError>(())
/// ```
#[derive(Debug)]
pub struct Decoder<S> {
    source: S,
    assembler: PartAssembler,
}

impl<R: Read> Decoder<StreamSource<BufReader<R>>> {
    /// Create a decoder reading lines from a byte stream
    ///
    /// Decoding continues until the stream ends.
    pub fn from_reader(reader: R) -> Self {
        Self::new(StreamSource::new(BufReader::new(reader)))
    }
}

impl<I> Decoder<LinesSource<I>>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    /// Create a decoder over lines that were already split
    ///
    /// `limit` is the number of parts to decode before stopping. It is
    /// mandatory because a line sequence cannot signal that no more parts
    /// will arrive.
    pub fn from_lines<T>(lines: T, limit: usize) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self::with_config(
            LinesSource::new(lines),
            DecoderConfig::new().with_part_limit(limit),
        )
    }
}

impl<S: LineSource> Decoder<S> {
    /// Create a decoder with the default configuration
    pub fn new(source: S) -> Self {
        Self::with_config(source, DecoderConfig::default())
    }

    /// Create a decoder with a custom configuration
    pub fn with_config(source: S, config: DecoderConfig) -> Self {
        Self {
            source,
            assembler: PartAssembler::new(config),
        }
    }

    /// The configuration in use
    pub fn config(&self) -> &DecoderConfig {
        self.assembler.config()
    }

    /// Decode parts until the input ends or the part limit is reached
    ///
    /// Returns the number of parts decoded by this call. If the input ends
    /// before the session produced any part, the error is
    /// [`YencError::EndOfInput`]. Parts decoded before a fatal error stay
    /// available through [`Decoder::parts`].
    pub fn run(&mut self) -> Result<usize> {
        self.assembler.run(&mut self.source)
    }

    /// Decode the input and return the first part
    ///
    /// Once a multipart set looks complete (more than one part, the last part
    /// number equal to the number of parts decoded), the whole-file CRC32 is
    /// verified as well. A failure there is returned as an error, but the
    /// validated parts remain available through [`Decoder::parts`].
    ///
    /// The returned part carries `total` when the header declared one.
    pub fn decode_first(&mut self) -> Result<&Part> {
        match self.run() {
            Ok(_) => {}
            Err(err) if err.is_end_of_input() => {}
            Err(err) => {
                warn!("yEnc decoding failed: {}", err);
                return Err(err);
            }
        }

        if self.assembler.parts().is_empty() {
            return Err(YencError::NoPartsFound);
        }

        if self.config().verify_file_crc32 && self.assembler.is_complete_in_order() {
            debug!(
                "Verifying file CRC32 over {} parts",
                self.assembler.parts().len()
            );
            self.assembler.verify_file_crc32()?;
        } else {
            debug!("Multipart set incomplete or single part, file CRC32 not checked");
        }

        self.assembler.annotate_total();
        self.assembler.parts().first().ok_or(YencError::NoPartsFound)
    }

    /// Decode the input and take ownership of the first part
    pub fn into_first(mut self) -> Result<Part> {
        self.decode_first()?;
        self.assembler
            .into_parts()
            .into_iter()
            .next()
            .ok_or(YencError::NoPartsFound)
    }

    /// Parts decoded so far, in encounter order
    pub fn parts(&self) -> &[Part] {
        self.assembler.parts()
    }

    /// Consume the decoder and return every decoded part
    pub fn into_parts(self) -> Vec<Part> {
        self.assembler.into_parts()
    }

    /// Whether any header so far declared a part number
    pub fn is_multipart(&self) -> bool {
        self.assembler.is_multipart()
    }

    /// Total number of parts declared by `total=`, if any
    pub fn total_parts(&self) -> Option<u32> {
        let total = self.assembler.total();
        (total > 0).then_some(total)
    }

    /// Whole-file CRC32 declared by the last trailer, if any
    pub fn file_crc32(&self) -> Option<u32> {
        self.assembler.file_crc32()
    }

    /// CRC32 over every byte decoded so far
    pub fn computed_file_crc32(&self) -> u32 {
        self.assembler.computed_file_crc32()
    }

    /// Part numbers declared by `total=` that have not been decoded
    ///
    /// Lists at most the first 10 000 missing numbers, however large the
    /// declared total.
    pub fn missing_parts(&self) -> Vec<u32> {
        self.assembler.missing_parts()
    }

    /// Join the decoded parts into the original file
    ///
    /// # Errors
    /// Returns an error if:
    /// - No part was decoded
    /// - Parts of a multipart set are missing
    /// - Part ranges overlap, leave gaps or exceed the declared file size
    pub fn assemble(&self) -> Result<Vec<u8>> {
        self.assembler.assemble()
    }
}

/// Decode the first yEnc part from a byte stream
///
/// # Example
/// ```ignore
/// let file = std::fs::File::open("article.txt")?;
/// let part = yenc_rs::decode(file)?;
/// std::fs::write(&part.name, &part.body)?;
/// ```
pub fn decode<R: Read>(reader: R) -> Result<Part> {
    Decoder::from_reader(reader).into_first()
}

/// Decode the first yEnc part from pre-split lines, stopping after `limit` parts
pub fn decode_lines<T>(lines: T, limit: usize) -> Result<Part>
where
    T: IntoIterator,
    T::Item: AsRef<[u8]>,
{
    Decoder::from_lines(lines, limit).into_first()
}
