use crate::config::DecoderConfig;
use crate::error::{Result, YencError};
use crate::source::{LineRead, LineSource};
use crc32fast::Hasher;
use std::collections::HashSet;
use tracing::{debug, trace, warn};

use super::decode::LineDecoder;
use super::params::{is_marker, parse_ybegin, parse_yend, parse_ypart, YBEGIN, YEND, YPART};
use super::types::Part;

/// Initial capacity of the reusable line buffer (typical line length is 128)
const LINE_BUFFER_CAPACITY: usize = 1024;

/// Most part numbers [`PartAssembler::missing_parts`] lists
///
/// `total=` is untrusted, so the listing is bounded rather than sized by it.
pub(crate) const MAX_LISTED_MISSING: usize = 10_000;

/// Part assembler driving one decoding session
///
/// Walks `=ybegin` → `=ypart` (multipart only) → body → `=yend` for every
/// part in the input, validating each part before it is kept. Session state
/// (multipart mode, file checksum, parts seen so far) lives here and outlives
/// any single part.
#[derive(Debug, Clone)]
pub(crate) struct PartAssembler {
    config: DecoderConfig,
    /// Set once any `=ybegin` line carries `part=`
    multipart: bool,
    /// Total parts from the last `total=` seen
    total: u32,
    /// Validated parts in encounter order
    parts: Vec<Part>,
    /// CRC32 over every decoded byte of every part
    file_hasher: Hasher,
    /// Declared file CRC32 from the last `=yend crc32=`
    file_crc32: u32,
    /// (raw name, part) pairs already decoded
    seen: HashSet<(Vec<u8>, u32)>,
    /// Reusable line buffer
    line: Vec<u8>,
}

impl PartAssembler {
    /// Create an assembler for a new session
    pub(crate) fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            multipart: false,
            total: 0,
            parts: Vec::new(),
            file_hasher: Hasher::new(),
            file_crc32: 0,
            seen: HashSet::new(),
            line: Vec::with_capacity(LINE_BUFFER_CAPACITY),
        }
    }

    pub(crate) fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub(crate) fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub(crate) fn into_parts(self) -> Vec<Part> {
        self.parts
    }

    pub(crate) fn is_multipart(&self) -> bool {
        self.multipart
    }

    pub(crate) fn total(&self) -> u32 {
        self.total
    }

    pub(crate) fn file_crc32(&self) -> Option<u32> {
        (self.file_crc32 != 0).then_some(self.file_crc32)
    }

    pub(crate) fn computed_file_crc32(&self) -> u32 {
        self.file_hasher.clone().finalize()
    }

    /// Decode parts until the input is exhausted or the part limit is reached
    ///
    /// Returns the number of parts decoded by this call. Running out of input
    /// before any part was decoded in the whole session yields
    /// [`YencError::EndOfInput`].
    pub(crate) fn run<S: LineSource>(&mut self, source: &mut S) -> Result<usize> {
        let mut decoded = 0;

        loop {
            if self.config.limit_reached(self.parts.len()) {
                debug!("yEnc part limit reached after {} parts", self.parts.len());
                return Ok(decoded);
            }

            match self.next_part(source)? {
                Some(part) => {
                    debug!(
                        "yEnc part {} of {} decoded ({} bytes)",
                        part.number,
                        part.name,
                        part.body.len()
                    );
                    self.parts.push(part);
                    decoded += 1;
                }
                None if self.parts.is_empty() => return Err(YencError::EndOfInput),
                None => return Ok(decoded),
            }
        }
    }

    /// Decode and validate the next part, or `None` at end of input
    fn next_part<S: LineSource>(&mut self, source: &mut S) -> Result<Option<Part>> {
        if !self.seek(source, YBEGIN)? {
            return Ok(None);
        }

        let header = parse_ybegin(&self.line);
        if header.part.is_some() {
            self.multipart = true;
        }
        if header.total > 0 {
            self.total = header.total;
        }
        trace!("=ybegin: {:?}", header);

        let mut part = Part {
            number: header.part.unwrap_or_default(),
            header_size: header.size,
            name: header.name,
            name_bytes: header.name_bytes,
            columns: header.columns,
            ..Part::default()
        };

        if part.name_bytes.is_empty() {
            return Err(YencError::MissingFilename);
        }
        if !self.seen.insert((part.name_bytes.clone(), part.number)) {
            warn!("Part {} of {} seen twice", part.number, part.name);
            return Err(YencError::DuplicatePart {
                name: part.name,
                part: part.number,
            });
        }

        if self.multipart {
            if !self.seek(source, YPART)? {
                return Err(YencError::MissingPartHeader { part: part.number });
            }
            let range = parse_ypart(&self.line);
            part.begin = range.begin;
            part.end = range.end;
        }

        let computed = self.read_body(source, &mut part)?;
        self.validate(&part, computed)?;

        Ok(Some(part))
    }

    /// Skip lines until one starts with `marker`, leaving it in the line buffer
    ///
    /// Returns `false` when the input ends first. An unterminated last line
    /// counts as end of input.
    fn seek<S: LineSource>(&mut self, source: &mut S, marker: &[u8]) -> Result<bool> {
        loop {
            match source.read_line(&mut self.line)? {
                LineRead::Terminated if is_marker(&self.line, marker) => return Ok(true),
                LineRead::Terminated => {}
                LineRead::Unterminated | LineRead::Exhausted => return Ok(false),
            }
        }
    }

    /// Decode body lines into `part` up to and including the `=yend` line
    ///
    /// Returns the CRC32 of the decoded body.
    fn read_body<S: LineSource>(&mut self, source: &mut S, part: &mut Part) -> Result<u32> {
        let mut decoder = LineDecoder::new();
        let mut hasher = Hasher::new();
        let presplit = source.is_presplit();

        loop {
            match source.read_line(&mut self.line)? {
                LineRead::Terminated => {}
                LineRead::Unterminated | LineRead::Exhausted => {
                    warn!("Input ended inside part {} of {}", part.number, part.name);
                    return Err(YencError::UnexpectedEndOfInput { part: part.number });
                }
            }

            if is_marker(&self.line, YEND) {
                self.apply_trailer(part)?;
                return Ok(hasher.finalize());
            }

            if presplit && (is_marker(&self.line, YBEGIN) || is_marker(&self.line, YPART)) {
                trace!("Skipping repeated framing line in part {}", part.number);
                continue;
            }

            let start = part.body.len();
            decoder.decode_line(&self.line, &mut part.body);
            let decoded = &part.body[start..];
            hasher.update(decoded);
            self.file_hasher.update(decoded);
        }
    }

    /// Apply the `=yend` line in the buffer to `part` and the session
    fn apply_trailer(&mut self, part: &mut Part) -> Result<()> {
        let trailer = parse_yend(&self.line);
        trace!("=yend: {:?}", trailer);

        if let Some(found) = trailer.part
            && found != part.number
        {
            warn!("=yend for part {} while decoding part {}", found, part.number);
            return Err(YencError::TrailerOutOfOrder {
                expected: part.number,
                found,
            });
        }

        part.size = trailer.size;
        part.crc32 = trailer.pcrc32;
        if trailer.crc32 != 0 {
            self.file_crc32 = trailer.crc32;
            // Single-part encoders often emit only crc32
            if !self.multipart && part.crc32 == 0 {
                part.crc32 = trailer.crc32;
            }
        }
        Ok(())
    }

    /// Check a finished part against its trailer
    fn validate(&self, part: &Part, computed: u32) -> Result<()> {
        let actual = part.body.len() as u64;
        if actual != part.size {
            warn!(
                "Part {} of {}: decoded {} bytes, trailer says {}",
                part.number, part.name, actual, part.size
            );
            return Err(YencError::SizeMismatch {
                part: part.number,
                expected: part.size,
                actual,
            });
        }

        match part.declared_crc32() {
            Some(expected) if expected != computed => {
                warn!(
                    "Part {} of {}: CRC32 {:08x} != {:08x}",
                    part.number, part.name, computed, expected
                );
                Err(YencError::ChecksumMismatch {
                    part: part.number,
                    expected,
                    computed,
                })
            }
            Some(_) => Ok(()),
            None if self.config.require_crc32 => {
                Err(YencError::MissingChecksum { part: part.number })
            }
            None => {
                debug!("Part {} of {} has no CRC32, skipping check", part.number, part.name);
                Ok(())
            }
        }
    }

    /// Whether the parts look like a complete multipart set in acquisition order
    ///
    /// More than one part, the last part number equal to the number of parts,
    /// and that number equal to `total=` when one was declared.
    pub(crate) fn is_complete_in_order(&self) -> bool {
        let count = self.parts.len();
        self.multipart
            && count > 1
            && (self.total == 0 || self.total as usize == count)
            && self
                .parts
                .last()
                .is_some_and(|last| last.number as usize == count)
    }

    /// Compare the CRC32 over all decoded bytes with the declared file checksum
    pub(crate) fn verify_file_crc32(&self) -> Result<()> {
        let computed = self.computed_file_crc32();
        match self.file_crc32() {
            Some(expected) if expected != computed => {
                warn!("File CRC32 {:08x} != {:08x}", computed, expected);
                Err(YencError::WholeFileChecksumMismatch { expected, computed })
            }
            Some(_) => Ok(()),
            None if self.config.require_crc32 => Err(YencError::MissingFileChecksum),
            None => {
                debug!("No file CRC32 declared, skipping check");
                Ok(())
            }
        }
    }

    /// Attach the declared total to the first part
    pub(crate) fn annotate_total(&mut self) {
        if self.total > 0
            && let Some(first) = self.parts.first_mut()
        {
            first.total = self.total;
        }
    }

    /// Part numbers in `1..=total` that have not been decoded
    ///
    /// Walks the gaps between the received numbers, so the work depends on
    /// the parts decoded and not on `total`. At most [`MAX_LISTED_MISSING`]
    /// numbers are listed, lowest first.
    pub(crate) fn missing_parts(&self) -> Vec<u32> {
        let mut present: Vec<u32> = self
            .parts
            .iter()
            .map(|part| part.number)
            .filter(|&n| n >= 1 && n <= self.total)
            .collect();
        present.sort_unstable();
        present.dedup();

        let mut missing = Vec::new();
        let mut next = 1u64;
        let bounds = present
            .iter()
            .map(|&n| u64::from(n))
            .chain(std::iter::once(u64::from(self.total) + 1));
        for bound in bounds {
            for n in next..bound {
                if missing.len() == MAX_LISTED_MISSING {
                    return missing;
                }
                // n < bound <= total + 1, so it fits in u32
                missing.push(n as u32);
            }
            next = bound + 1;
        }
        missing
    }

    /// Join the decoded parts into the original file
    ///
    /// Single-part sessions return the body of the first part. Multipart
    /// sessions need every part of the first file, whose `=ypart` ranges must
    /// tile the declared file size without gaps or overlaps.
    pub(crate) fn assemble(&self) -> Result<Vec<u8>> {
        let first = self.parts.first().ok_or(YencError::NoPartsFound)?;
        if !self.multipart {
            return Ok(first.body.clone());
        }

        let mut sorted: Vec<&Part> = self
            .parts
            .iter()
            .filter(|part| part.name_bytes == first.name_bytes)
            .collect();
        if (sorted.len() as u64) < u64::from(self.total) {
            return Err(YencError::IncompleteSet {
                received: sorted.len(),
                total: self.total,
            });
        }
        sorted.sort_by_key(|part| part.begin);

        let size = first.header_size;
        let mut covered = 0u64;
        let mut prev_end = 0u64;
        for part in &sorted {
            let len = part.body.len() as u64;
            let fits = part.begin > prev_end
                && part.end <= size
                && part.end.checked_sub(part.begin).map(|span| span + 1) == Some(len);
            if !fits {
                return Err(YencError::InvalidPartRange {
                    part: part.number,
                    begin: part.begin,
                    end: part.end,
                    size,
                });
            }
            covered += len;
            prev_end = part.end;
        }

        if covered != size {
            return Err(YencError::IncompleteSet {
                received: sorted.len(),
                total: self.total,
            });
        }

        // Ranges are sorted, disjoint and cover 1..=size, so they are contiguous
        let mut data = Vec::with_capacity(covered as usize);
        for part in sorted {
            data.extend_from_slice(&part.body);
        }
        Ok(data)
    }
}
