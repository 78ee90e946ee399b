/// One decoded segment of a (possibly multi-part) yEnc file
///
/// Numeric fields that the stream did not declare, or declared with an
/// unparseable value, stay at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Part {
    /// Part number (1-based, 0 for single-part streams)
    pub number: u32,
    /// Total file size from the `=ybegin` line (informational)
    pub header_size: u64,
    /// Size of this part's decoded body, from the `=yend` line
    pub size: u64,
    /// Byte offset where this part begins in the original file (1-based)
    pub begin: u64,
    /// Byte offset where this part ends in the original file (inclusive)
    pub end: u64,
    /// Original filename, lossily converted to UTF-8 for display
    pub name: String,
    /// Original filename bytes as they appeared on the `=ybegin` line
    ///
    /// Parts are identified by these bytes, so two names that only differ
    /// in non-UTF-8 bytes stay distinct.
    pub name_bytes: Vec<u8>,
    /// Line length from the `=ybegin` line (informational)
    pub columns: usize,
    /// Total number of parts; only set on the part returned by `decode_first`
    pub total: u32,
    /// Declared CRC32 of this part (0 when not provided)
    pub crc32: u32,
    /// Decoded binary data
    pub body: Vec<u8>,
}

impl Part {
    /// Declared CRC32, if the stream provided one
    pub fn declared_crc32(&self) -> Option<u32> {
        (self.crc32 != 0).then_some(self.crc32)
    }

    /// Check if this part belongs to a multi-part file
    pub fn is_multipart(&self) -> bool {
        self.number > 0
    }
}
