//! Decoder configuration

/// yEnc decoder configuration
///
/// Controls how many parts a session decodes and how strictly missing
/// checksums are treated.
///
/// # Example
///
/// ```
/// use yenc_rs::DecoderConfig;
///
/// // Lenient defaults: decode until input ends, skip absent checksums
/// let config = DecoderConfig::default();
/// assert_eq!(config.part_limit, None);
///
/// // Stop after two parts and insist on checksums
/// let config = DecoderConfig::strict().with_part_limit(2);
/// assert!(config.require_crc32);
/// assert_eq!(config.part_limit, Some(2));
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoderConfig {
    /// Stop after this many parts have been decoded in the session
    ///
    /// `None` decodes until the input is exhausted. Sources of pre-split lines
    /// always carry a limit, since they cannot tell "no more data" apart from
    /// "no new data yet".
    #[cfg_attr(feature = "serde", serde(default))]
    pub part_limit: Option<usize>,

    /// Treat an absent part or file CRC32 as an error
    ///
    /// When `false` (the default), a zero/absent checksum means no check is
    /// performed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub require_crc32: bool,

    /// Verify the whole-file CRC32 once a multipart set looks complete
    ///
    /// Default: `true`
    #[cfg_attr(feature = "serde", serde(default = "default_verify_file_crc32"))]
    pub verify_file_crc32: bool,
}

#[cfg(feature = "serde")]
fn default_verify_file_crc32() -> bool {
    true
}

impl DecoderConfig {
    /// Create the default lenient configuration
    pub fn new() -> Self {
        Self {
            part_limit: None,
            require_crc32: false,
            verify_file_crc32: true,
        }
    }

    /// Create a configuration that rejects parts and sets without checksums
    pub fn strict() -> Self {
        Self::new().with_require_crc32(true)
    }

    /// Stop decoding after `limit` parts
    pub fn with_part_limit(mut self, limit: usize) -> Self {
        self.part_limit = Some(limit);
        self
    }

    /// Set whether absent checksums are fatal
    pub fn with_require_crc32(mut self, require: bool) -> Self {
        self.require_crc32 = require;
        self
    }

    /// Set whether the whole-file checksum is verified
    pub fn with_verify_file_crc32(mut self, verify: bool) -> Self {
        self.verify_file_crc32 = verify;
        self
    }

    /// Whether `decoded` parts reach the configured limit
    pub(crate) fn limit_reached(&self, decoded: usize) -> bool {
        self.part_limit.is_some_and(|limit| decoded >= limit)
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}
