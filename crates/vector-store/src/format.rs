//! Binary model formats.
//!
//! Format A (`*.bin`):
//!
//! ```text
//! "<vocab> <dim>\n"
//! ( <word> ' ' <dim x f32 LE> ['\n'] ) x vocab
//! <EOF>
//! ```
//!
//! Format B (`*.8int.bin`):
//!
//! ```text
//! <vocab: i32 LE> <dim: i32 LE> <min: f32 LE> <max: f32 LE>
//! ( <word> '\0' <dim x i8> ) x vocab
//! ```

use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead};
use std::path::Path;

use crate::error::{Result, VectorStoreError};
use crate::types::{Embedding, QuantRange, Representation};

pub const REAL_SUFFIX: &str = ".bin";
pub const QUANTIZED_SUFFIX: &str = ".8int.bin";

/// Upper bound on the header dimension. Neither format caps it; this crate
/// rejects anything larger so a corrupt header cannot size the per-record
/// buffer.
pub const MAX_DIMENSION: usize = 1 << 16;

// Capacity hint ceiling so a bogus vocab count does not reserve gigabytes.
const PREALLOC_LIMIT: usize = 1 << 20;

const QUANTIZED_HEADER_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// Format A: text header, f32 components.
    Real,
    /// Format B: binary header with range, i8 components.
    Quantized,
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFormat::Real => f.write_str("word2vec binary (f32)"),
            ModelFormat::Quantized => f.write_str("word2vec 8-bit quantized"),
        }
    }
}

impl ModelFormat {
    /// Picks the format from the file name. The quantized suffix is checked
    /// first since it also ends in `.bin`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name.ends_with(QUANTIZED_SUFFIX) {
            Ok(ModelFormat::Quantized)
        } else if name.ends_with(REAL_SUFFIX) {
            Ok(ModelFormat::Real)
        } else {
            Err(VectorStoreError::UnsupportedFormat(format!(
                "{} (expected a {REAL_SUFFIX} or {QUANTIZED_SUFFIX} file)",
                path.display()
            )))
        }
    }

    pub fn representation(self) -> Representation {
        match self {
            ModelFormat::Real => Representation::Real,
            ModelFormat::Quantized => Representation::Quantized,
        }
    }

    pub(crate) fn decode<R: BufRead>(self, reader: &mut R) -> Result<Decoded> {
        match self {
            ModelFormat::Real => read_real(reader),
            ModelFormat::Quantized => read_quantized(reader),
        }
    }
}

/// Everything a format reader produces.
#[derive(Debug)]
pub(crate) struct Decoded {
    pub vectors: HashMap<String, Embedding>,
    pub dimension: usize,
    pub range: Option<QuantRange>,
    pub duplicates: usize,
}

impl Decoded {
    fn with_header(vocab: usize, dimension: usize, range: Option<QuantRange>) -> Self {
        Self {
            vectors: HashMap::with_capacity(vocab.min(PREALLOC_LIMIT)),
            dimension,
            range,
            duplicates: 0,
        }
    }

    // Last occurrence of a word wins.
    fn insert(&mut self, word: String, embedding: Embedding) {
        if self.vectors.insert(word, embedding).is_some() {
            self.duplicates += 1;
        }
    }
}

fn read_real<R: BufRead>(reader: &mut R) -> Result<Decoded> {
    let (vocab, dimension) = read_text_header(reader)?;
    let mut decoded = Decoded::with_header(vocab, dimension, None);

    let mut word = Vec::new();
    let mut raw = vec![0u8; dimension * 4];
    for index in 0..vocab {
        word.clear();
        reader.read_until(b' ', &mut word)?;
        if word.last() != Some(&b' ') {
            return Err(VectorStoreError::format(format!(
                "record {index}: word is not terminated by a space"
            )));
        }
        let token = String::from_utf8_lossy(&word).trim().to_string();

        read_record_bytes(reader, &mut raw, index)?;
        let values = raw
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        if reader.fill_buf()?.first() == Some(&b'\n') {
            reader.consume(1);
        }
        decoded.insert(token, Embedding::Real(values));
    }

    if !reader.fill_buf()?.is_empty() {
        return Err(VectorStoreError::format(
            "unexpected data at end of file after the last record",
        ));
    }
    Ok(decoded)
}

fn read_text_header<R: BufRead>(reader: &mut R) -> Result<(usize, usize)> {
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;
    if line.last() != Some(&b'\n') {
        return Err(VectorStoreError::format("header is not terminated by a newline"));
    }
    let text = std::str::from_utf8(&line)
        .map_err(|_| VectorStoreError::format("header is not valid text"))?;
    let fields: Vec<&str> = text.split_whitespace().collect();
    let [vocab, dimension] = fields.as_slice() else {
        return Err(VectorStoreError::format(format!(
            "header must be \"<vocab> <dim>\", got {:?}",
            text.trim_end()
        )));
    };
    let vocab = parse_count("vocab size", vocab.parse::<i64>().ok())?;
    let dimension = parse_count("dimension", dimension.parse::<i64>().ok())?;
    check_dimension(dimension)?;
    Ok((vocab, dimension))
}

fn read_quantized<R: BufRead>(reader: &mut R) -> Result<Decoded> {
    let mut header = [0u8; QUANTIZED_HEADER_LEN];
    reader.read_exact(&mut header).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => VectorStoreError::format("truncated header"),
        _ => VectorStoreError::IoError(err),
    })?;

    let vocab = i32::from_le_bytes(le_word(&header, 0));
    let dimension = i32::from_le_bytes(le_word(&header, 4));
    let min = f32::from_le_bytes(le_word(&header, 8));
    let max = f32::from_le_bytes(le_word(&header, 12));

    let vocab = parse_count("vocab size", Some(i64::from(vocab)))?;
    let dimension = parse_count("dimension", Some(i64::from(dimension)))?;
    check_dimension(dimension)?;
    if !min.is_finite() || !max.is_finite() {
        return Err(VectorStoreError::format(format!(
            "quantization range must be finite, got [{min}, {max}]"
        )));
    }

    let mut decoded = Decoded::with_header(vocab, dimension, Some(QuantRange::new(min, max)));
    let mut word = Vec::new();
    let mut raw = vec![0u8; dimension];
    for index in 0..vocab {
        word.clear();
        reader.read_until(0, &mut word)?;
        if word.pop() != Some(0) {
            return Err(VectorStoreError::format(format!(
                "record {index}: word is not NUL-terminated"
            )));
        }
        let token = String::from_utf8_lossy(&word).into_owned();

        read_record_bytes(reader, &mut raw, index)?;
        let values = raw.iter().map(|&b| i8::from_le_bytes([b])).collect();
        decoded.insert(token, Embedding::Quantized(values));
    }

    let trailing = reader.fill_buf()?.len();
    if trailing > 0 {
        log::warn!("Ignoring trailing data after {vocab} quantized records");
    }
    Ok(decoded)
}

fn read_record_bytes<R: BufRead>(reader: &mut R, buf: &mut [u8], index: usize) -> Result<()> {
    reader.read_exact(buf).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => {
            VectorStoreError::format(format!("record {index}: truncated vector data"))
        }
        _ => VectorStoreError::IoError(err),
    })
}

fn parse_count(what: &str, value: Option<i64>) -> Result<usize> {
    match value {
        Some(v) if v > 0 => usize::try_from(v)
            .map_err(|_| VectorStoreError::format(format!("{what} {v} is too large"))),
        Some(v) => Err(VectorStoreError::format(format!(
            "{what} must be positive, got {v}"
        ))),
        None => Err(VectorStoreError::format(format!("{what} is not a number"))),
    }
}

/// Extra limit on top of the positive-count rule: dimensions above
/// [`MAX_DIMENSION`] are a format error even if the records would follow.
fn check_dimension(dimension: usize) -> Result<()> {
    if dimension > MAX_DIMENSION {
        return Err(VectorStoreError::format(format!(
            "dimension {dimension} exceeds the supported maximum of {MAX_DIMENSION}"
        )));
    }
    Ok(())
}

fn le_word(buf: &[u8], at: usize) -> [u8; 4] {
    [buf[at], buf[at + 1], buf[at + 2], buf[at + 3]]
}
