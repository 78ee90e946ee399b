//! yEnc decoding error types

use thiserror::Error;

/// Errors raised while decoding a yEnc stream
///
/// Every variant except [`YencError::EndOfInput`] is fatal: the session that
/// produced it stops and the logical file must be treated as unrecoverable.
#[derive(Error, Debug)]
pub enum YencError {
    /// IO error from the underlying byte source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input ran out while looking for the next `=ybegin` line
    #[error("End of input")]
    EndOfInput,

    /// `=ybegin` line without a `name=` value
    #[error("Missing filename in =ybegin header")]
    MissingFilename,

    /// The same (name, part) pair was produced twice in one session
    #[error("Duplicate part {part} of {name}")]
    DuplicatePart {
        /// Filename from the header
        name: String,
        /// Part number (0 for single-part streams)
        part: u32,
    },

    /// A multipart stream did not supply the `=ypart` line
    #[error("Missing =ypart header for part {part}")]
    MissingPartHeader {
        /// Part number from the `=ybegin` line
        part: u32,
    },

    /// `=yend part=` does not match the part being decoded
    #[error("=yend out of order: expected part {expected}, found {found}")]
    TrailerOutOfOrder {
        /// Part number from the `=ybegin` line
        expected: u32,
        /// Part number from the `=yend` line
        found: u32,
    },

    /// Input ended inside a part body
    #[error("Unexpected end of input in body of part {part}")]
    UnexpectedEndOfInput {
        /// Part number being decoded
        part: u32,
    },

    /// Decoded body length differs from the `=yend size=` value
    #[error("Part {part} size mismatch: expected {expected} bytes, decoded {actual}")]
    SizeMismatch {
        /// Part number
        part: u32,
        /// Size declared by the trailer
        expected: u64,
        /// Number of bytes actually decoded
        actual: u64,
    },

    /// Part CRC32 differs from the declared checksum
    #[error("Part {part} CRC32 mismatch: expected {expected:08x}, computed {computed:08x}")]
    ChecksumMismatch {
        /// Part number
        part: u32,
        /// Checksum from the trailer
        expected: u32,
        /// Checksum of the decoded body
        computed: u32,
    },

    /// Part carries no checksum while the decoder requires one
    #[error("Part {part} has no CRC32")]
    MissingChecksum {
        /// Part number
        part: u32,
    },

    /// The input contained no yEnc part at all
    #[error("No yEnc parts found")]
    NoPartsFound,

    /// CRC32 over every decoded part differs from the declared file checksum
    #[error("File CRC32 mismatch: expected {expected:08x}, computed {computed:08x}")]
    WholeFileChecksumMismatch {
        /// Checksum from the final trailer
        expected: u32,
        /// Checksum of all decoded bytes
        computed: u32,
    },

    /// Complete multipart set without a file checksum while one is required
    #[error("File CRC32 not declared")]
    MissingFileChecksum,

    /// Not every part of a multipart set has been decoded
    #[error("Incomplete set: {received} of {total} parts decoded")]
    IncompleteSet {
        /// Parts decoded for the first file of the session
        received: usize,
        /// Parts declared by `total=`
        total: u32,
    },

    /// A part's `=ypart` range does not fit the declared file
    #[error("Part {part} range {begin}-{end} does not fit file of {size} bytes")]
    InvalidPartRange {
        /// Part number
        part: u32,
        /// First byte (1-based)
        begin: u64,
        /// Last byte (1-based, inclusive)
        end: u64,
        /// File size from the `=ybegin` line
        size: u64,
    },
}

impl YencError {
    /// Whether this is the benign end-of-input signal rather than a fatal error
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, YencError::EndOfInput)
    }
}

/// Result type alias using YencError
pub type Result<T> = std::result::Result<T, YencError>;
