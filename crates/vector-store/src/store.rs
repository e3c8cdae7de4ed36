use crate::error::{Result, VectorStoreError};
use crate::format::ModelFormat;
use crate::types::{Embedding, QuantRange, Representation};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const READ_BUFFER_BYTES: usize = 1 << 20;

/// Token to embedding lookup. The matcher only needs this much of a store.
pub trait EmbeddingLookup {
    /// Embedding for `token`, or [`VectorStoreError::NotFound`].
    fn embedding(&self, token: &str) -> Result<&Embedding>;
}

/// Immutable word embedding table loaded from a model file.
#[derive(Debug)]
pub struct VectorStore {
    vectors: HashMap<String, Embedding>,
    dimension: usize,
    representation: Representation,
    range: Option<QuantRange>,
}

impl VectorStore {
    /// Load a model file; the format follows the file suffix.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ModelFormat::from_path(path)?;
        log::info!("Loading {format} model from {}", path.display());

        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(READ_BUFFER_BYTES, file);
        Self::from_reader(format, &mut reader)
    }

    /// Decode a model from any buffered reader.
    pub fn from_reader<R: BufRead>(format: ModelFormat, reader: &mut R) -> Result<Self> {
        let decoded = format.decode(reader)?;
        if decoded.duplicates > 0 {
            log::debug!(
                "{} duplicate words replaced by later records",
                decoded.duplicates
            );
        }
        if let Some(range) = decoded.range {
            log::debug!("Quantization range [{}, {}]", range.min, range.max);
        }
        log::info!(
            "Loaded {} embeddings (dimension {})",
            decoded.vectors.len(),
            decoded.dimension
        );

        Ok(Self {
            vectors: decoded.vectors,
            dimension: decoded.dimension,
            representation: format.representation(),
            range: decoded.range,
        })
    }

    /// Build a store from in-memory embeddings.
    ///
    /// All embeddings must share one representation and dimension; quantized
    /// stores need a range.
    pub fn from_embeddings<I, S>(entries: I, range: Option<QuantRange>) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Embedding)>,
        S: Into<String>,
    {
        let mut vectors = HashMap::new();
        let mut shape: Option<(Representation, usize)> = None;

        for (word, embedding) in entries {
            let this = (embedding.representation(), embedding.dim());
            match shape {
                None => shape = Some(this),
                Some((representation, _)) if representation != this.0 => {
                    return Err(VectorStoreError::IncompatibleVectorTypes {
                        left: representation,
                        right: this.0,
                    });
                }
                Some((_, dimension)) if dimension != this.1 => {
                    return Err(VectorStoreError::InvalidDimension {
                        expected: dimension,
                        actual: this.1,
                    });
                }
                Some(_) => {}
            }
            vectors.insert(word.into(), embedding);
        }

        let Some((representation, dimension)) = shape else {
            return Err(VectorStoreError::format("store has no embeddings"));
        };
        if representation == Representation::Quantized && range.is_none() {
            return Err(VectorStoreError::format(
                "quantized embeddings need a quantization range",
            ));
        }

        Ok(Self {
            vectors,
            dimension,
            representation,
            range: range.filter(|_| representation == Representation::Quantized),
        })
    }

    /// Get an embedding by token. Tokens are case-sensitive.
    pub fn get_embedding(&self, token: &str) -> Result<&Embedding> {
        self.vectors
            .get(token)
            .ok_or_else(|| VectorStoreError::not_found(token))
    }

    /// Iterate over every (word, embedding) pair in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Embedding)> {
        self.vectors.iter().map(|(word, emb)| (word.as_str(), emb))
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// Store-wide range for quantized models, `None` for float models.
    pub fn quant_range(&self) -> Option<QuantRange> {
        self.range
    }
}

impl EmbeddingLookup for VectorStore {
    fn embedding(&self, token: &str) -> Result<&Embedding> {
        self.get_embedding(token)
    }
}
