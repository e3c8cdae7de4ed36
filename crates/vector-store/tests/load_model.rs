use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use w2vgrep_vector_store::{
    Embedding, EmbeddingLookup, QuantRange, Representation, SimilarityEngine, VectorStore,
    VectorStoreError,
};

fn write_real_model(
    dir: &Path,
    name: &str,
    words: &[(&str, &[f32])],
    trailing: &[u8],
) -> PathBuf {
    let dim = words.first().map(|(_, v)| v.len()).unwrap_or(0);
    let mut bytes = format!("{} {}\n", words.len(), dim).into_bytes();
    for (word, values) in words {
        bytes.extend_from_slice(word.as_bytes());
        bytes.push(b' ');
        for v in values.iter() {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.push(b'\n');
    }
    bytes.extend_from_slice(trailing);
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn write_quantized_model(
    dir: &Path,
    name: &str,
    range: QuantRange,
    words: &[(&str, &[i8])],
) -> PathBuf {
    let dim = words.first().map(|(_, v)| v.len()).unwrap_or(0);
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&(words.len() as i32).to_le_bytes());
    bytes.extend_from_slice(&(dim as i32).to_le_bytes());
    bytes.extend_from_slice(&range.min.to_le_bytes());
    bytes.extend_from_slice(&range.max.to_le_bytes());
    for (word, values) in words {
        bytes.extend_from_slice(word.as_bytes());
        bytes.push(0);
        bytes.extend(values.iter().map(|v| v.to_le_bytes()[0]));
    }
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn loads_two_by_two_real_model() {
    let dir = tempdir().unwrap();
    let path = write_real_model(
        dir.path(),
        "tiny.bin",
        &[("king", &[1.0, 0.0]), ("queen", &[0.9, 0.436])],
        b"",
    );

    let store = VectorStore::load(&path).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.dimension(), 2);
    assert_eq!(store.representation(), Representation::Real);

    let king = store.embedding("king").unwrap();
    let queen = store.embedding("queen").unwrap();
    let score = SimilarityEngine::new()
        .score("king", "queen", king, queen)
        .unwrap();
    assert!((score - 0.9).abs() < 1e-3, "score {score}");
}

#[test]
fn trailing_byte_is_a_format_error() {
    let dir = tempdir().unwrap();
    let path = write_real_model(
        dir.path(),
        "tiny.bin",
        &[("king", &[1.0, 0.0]), ("queen", &[0.9, 0.436])],
        b"!",
    );

    let err = VectorStore::load(&path).unwrap_err();
    assert!(matches!(err, VectorStoreError::FormatError(_)), "{err}");
}

#[test]
fn loads_quantized_model() {
    let dir = tempdir().unwrap();
    let range = QuantRange::new(-0.5, 0.5);
    let path = write_quantized_model(
        dir.path(),
        "tiny.8int.bin",
        range,
        &[
            ("cat", &[100, 20, -3]),
            ("kitten", &[90, 30, -1]),
            ("car", &[-80, 5, 70]),
        ],
    );

    let store = VectorStore::load(&path).unwrap();
    assert_eq!(store.representation(), Representation::Quantized);
    assert_eq!(store.quant_range(), Some(range));
    assert_eq!(
        store.get_embedding("kitten").unwrap(),
        &Embedding::Quantized(vec![90, 30, -1])
    );

    let mut engine = SimilarityEngine::new();
    let cat = store.get_embedding("cat").unwrap();
    let kitten = engine
        .score("cat", "kitten", cat, store.get_embedding("kitten").unwrap())
        .unwrap();
    let car = engine
        .score("cat", "car", cat, store.get_embedding("car").unwrap())
        .unwrap();
    assert!(kitten > 0.9, "kitten {kitten}");
    assert!(car < 0.0, "car {car}");
}

#[test]
fn unknown_suffix_is_unsupported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vectors.txt");
    fs::write(&path, "1 1\n").unwrap();

    let err = VectorStore::load(&path).unwrap_err();
    assert!(matches!(err, VectorStoreError::UnsupportedFormat(_)), "{err}");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = VectorStore::load(dir.path().join("absent.bin")).unwrap_err();
    assert!(matches!(err, VectorStoreError::IoError(_)), "{err}");
}
