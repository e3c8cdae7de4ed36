//! Pull-based line reader.

use std::io::{self, BufRead};

/// A line of input and its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedLine {
    pub number: usize,
    pub text: String,
}

/// Reads numbered lines from a buffered stream.
///
/// Lines end at `\n`; a trailing `\r` is dropped and invalid UTF-8 is
/// replaced rather than treated as a read error.
pub struct LineSource<R> {
    reader: R,
    line_number: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buf: Vec::new(),
        }
    }

    /// Next line, or `None` at end of input.
    pub fn next_line(&mut self) -> io::Result<Option<NumberedLine>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        self.line_number += 1;
        Ok(Some(NumberedLine {
            number: self.line_number,
            text: String::from_utf8_lossy(&self.buf).into_owned(),
        }))
    }

    /// Up to `n` following lines, consumed without being scanned. The
    /// iterator stops early at end of input.
    pub fn take_unscanned(&mut self, n: usize) -> Unscanned<'_, R> {
        Unscanned {
            source: self,
            remaining: n,
        }
    }

    /// Number of lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

/// Iterator returned by [`LineSource::take_unscanned`].
pub struct Unscanned<'a, R> {
    source: &'a mut LineSource<R>,
    remaining: usize,
}

impl<R: BufRead> Iterator for Unscanned<'_, R> {
    type Item = io::Result<NumberedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let next = self.source.next_line().transpose();
        self.remaining = if next.is_some() { self.remaining - 1 } else { 0 };
        next
    }
}
