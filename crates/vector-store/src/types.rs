use std::fmt;

/// How the components of an embedding are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// 32-bit floats (Format A).
    Real,
    /// Signed 8-bit integers with a store-wide affine range (Format B).
    Quantized,
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Representation::Real => f.write_str("real (f32)"),
            Representation::Quantized => f.write_str("quantized (i8)"),
        }
    }
}

/// Affine range shared by every quantized embedding of one store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantRange {
    pub min: f32,
    pub max: f32,
}

impl QuantRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Maps a raw component back into the original float range:
    /// `-128` becomes `min`, `127` becomes `max`.
    pub fn dequantize(&self, raw: i8) -> f32 {
        let offset = f32::from(raw) + 128.0;
        self.min + offset / 255.0 * (self.max - self.min)
    }
}

/// A token's position in the embedding space.
#[derive(Debug, Clone, PartialEq)]
pub enum Embedding {
    Real(Vec<f32>),
    Quantized(Vec<i8>),
}

impl Embedding {
    pub fn representation(&self) -> Representation {
        match self {
            Embedding::Real(_) => Representation::Real,
            Embedding::Quantized(_) => Representation::Quantized,
        }
    }

    pub fn dim(&self) -> usize {
        match self {
            Embedding::Real(values) => values.len(),
            Embedding::Quantized(values) => values.len(),
        }
    }
}

/// One entry of a similar-word listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub word: String,
    pub score: f64,
}
