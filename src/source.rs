//! Line sources feeding the yEnc decoder
//!
//! The decoder never touches files or sockets itself. It pulls one line at a
//! time from a [`LineSource`]:
//! - [`StreamSource`] splits a byte stream on `\n`
//! - [`LinesSource`] walks lines that were already split by the caller

use crate::error::Result;
use std::io::BufRead;

/// Outcome of a single [`LineSource::read_line`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRead {
    /// A complete line was read into the buffer
    Terminated,
    /// The input ended before a line terminator; the buffer holds the remainder
    Unterminated,
    /// Nothing left to read; the buffer is empty
    Exhausted,
}

/// Sequential source of text lines
pub trait LineSource {
    /// Read the next line into `buf` without its terminator
    ///
    /// `buf` is cleared before reading.
    fn read_line(&mut self, buf: &mut Vec<u8>) -> Result<LineRead>;

    /// Whether lines come pre-split from the caller
    ///
    /// Pre-split sources tolerate repeated `=ybegin`/`=ypart` lines inside a
    /// part body; they are skipped instead of decoded.
    fn is_presplit(&self) -> bool {
        false
    }
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn read_line(&mut self, buf: &mut Vec<u8>) -> Result<LineRead> {
        (**self).read_line(buf)
    }

    fn is_presplit(&self) -> bool {
        (**self).is_presplit()
    }
}

/// Line source over a buffered byte stream
///
/// Lines end at `\n`; any trailing `\r`/`\n` bytes are stripped, so both LF
/// and CRLF input work.
#[derive(Debug)]
pub struct StreamSource<R> {
    reader: R,
}

impl<R: BufRead> StreamSource<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Return the wrapped reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> LineSource for StreamSource<R> {
    fn read_line(&mut self, buf: &mut Vec<u8>) -> Result<LineRead> {
        buf.clear();
        if self.reader.read_until(b'\n', buf)? == 0 {
            return Ok(LineRead::Exhausted);
        }

        let terminated = buf.last() == Some(&b'\n');
        while matches!(buf.last(), Some(b'\r' | b'\n')) {
            buf.pop();
        }

        Ok(if terminated {
            LineRead::Terminated
        } else {
            LineRead::Unterminated
        })
    }
}

/// Line source over lines the caller already split
///
/// Each item is one line with its terminator removed. Because this shape
/// cannot signal the end of new data on its own, decoders built from it always
/// carry a part limit.
#[derive(Debug)]
pub struct LinesSource<I> {
    lines: I,
}

impl<I> LinesSource<I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    /// Wrap anything that yields lines
    pub fn new<T>(lines: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            lines: lines.into_iter(),
        }
    }
}

impl<I> LineSource for LinesSource<I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    fn read_line(&mut self, buf: &mut Vec<u8>) -> Result<LineRead> {
        buf.clear();
        match self.lines.next() {
            Some(line) => {
                buf.extend_from_slice(line.as_ref());
                Ok(LineRead::Terminated)
            }
            None => Ok(LineRead::Exhausted),
        }
    }

    fn is_presplit(&self) -> bool {
        true
    }
}
