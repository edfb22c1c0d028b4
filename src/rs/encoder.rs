//! Systematic Reed-Solomon encoding.

use super::config::EncodingConfig;
use super::shard::{Shard, ShardMetadata};
use crate::error::RsError;
use crate::hash::sha256_hex;
use crate::matrix::{code_bytes, Matrix, MatrixCache, MatrixKind, DEFAULT_MATRIX_CACHE};
use std::sync::Arc;
use tracing::instrument;

/// The full `(k + m) x k` systematic encoding matrix: identity on the top
/// `k` rows (so data shards pass through unchanged) and, for each parity
/// row `k + i`, column `j`, the value `exp(k + i)^j`. Every `(k, m)` pair
/// is generated once and memoized in [`DEFAULT_MATRIX_CACHE`]; both the
/// encoder and the decoder's k-subset retry loop ask for the same matrix
/// repeatedly, so building it from scratch on every call would redo the
/// same GF(256) exponentiation on every decode candidate.
pub fn encoding_matrix(data_shards: usize, parity_shards: usize) -> Arc<Matrix> {
    DEFAULT_MATRIX_CACHE.get_or_generate(MatrixKind::SystematicRs, data_shards, data_shards + parity_shards)
}

/// Rows `[k, k+m)` of [`encoding_matrix`]: the linear combination of data
/// shards that produces each parity shard.
fn parity_matrix(data_shards: usize, parity_shards: usize) -> Matrix {
    let full = encoding_matrix(data_shards, parity_shards);
    full.select_rows(&(data_shards..data_shards + parity_shards).collect::<Vec<_>>())
}

/// Encode `data` into `config.total_shards()` shards per chunk.
/// Deterministic: equal inputs produce byte-identical shards.
#[instrument(skip(data), fields(len = data.len(), k = config.data_shards(), m = config.parity_shards()))]
pub fn encode(data: &[u8], config: &EncodingConfig) -> Result<Vec<Shard>, RsError> {
    if data.is_empty() {
        return Err(RsError::InvalidConfiguration("data must not be empty".into()));
    }

    let checksum = sha256_hex(data);
    let chunk_payload_len = config.shard_size() * config.data_shards();
    let num_chunks = data.len().div_ceil(chunk_payload_len);
    let multi_chunk = num_chunks > 1;

    let mut padded = data.to_vec();
    padded.resize(num_chunks * chunk_payload_len, 0);

    let mut shards = Vec::with_capacity(num_chunks * config.total_shards());
    for chunk_index in 0..num_chunks {
        let start = chunk_index * chunk_payload_len;
        let chunk = &padded[start..start + chunk_payload_len];
        let metadata = ShardMetadata {
            original_size: data.len() as u64,
            config: *config,
            checksum: checksum.clone(),
            chunk_index: multi_chunk.then_some(chunk_index as u64),
        };
        shards.extend(encode_chunk_with_metadata(chunk, config, chunk_index as u64, metadata)?);
    }

    Ok(shards)
}

/// Streaming collaborator entry point: encode exactly one chunk's
/// worth of already-split data, given metadata the caller derived once for
/// the whole logical stream (typically its SHA-256 checksum and total
/// size). Pads `data_chunk` to `shard_size * k` bytes if it is shorter
/// (e.g. the final, partial chunk of a stream).
pub fn encode_chunk(
    data_chunk: &[u8],
    config: &EncodingConfig,
    chunk_index: u64,
    metadata: ShardMetadata,
) -> Result<Vec<Shard>, RsError> {
    let chunk_payload_len = config.shard_size() * config.data_shards();
    if data_chunk.len() > chunk_payload_len {
        return Err(RsError::InvalidConfiguration(format!(
            "chunk of {} bytes exceeds shard_size * data_shards ({})",
            data_chunk.len(),
            chunk_payload_len
        )));
    }
    let mut padded = data_chunk.to_vec();
    padded.resize(chunk_payload_len, 0);
    encode_chunk_with_metadata(&padded, config, chunk_index, metadata)
}

fn encode_chunk_with_metadata(
    padded_chunk: &[u8],
    config: &EncodingConfig,
    chunk_index: u64,
    metadata: ShardMetadata,
) -> Result<Vec<Shard>, RsError> {
    let k = config.data_shards();
    let m = config.parity_shards();
    let shard_size = config.shard_size();

    let data_shards: Vec<&[u8]> = (0..k).map(|i| &padded_chunk[i * shard_size..(i + 1) * shard_size]).collect();

    let parity = parity_matrix(k, m);
    let mut parity_shards = vec![Vec::new(); m];
    code_bytes(&parity, &data_shards, &mut parity_shards);

    let total = k + m;
    let mut shards = Vec::with_capacity(total);
    for (local, chunk) in data_shards.iter().enumerate() {
        shards.push(Shard::new(
            chunk_index as usize * total + local,
            chunk.to_vec(),
            metadata.clone(),
        ));
    }
    for (local, parity_shard) in parity_shards.into_iter().enumerate() {
        shards.push(Shard::new(
            chunk_index as usize * total + k + local,
            parity_shard,
            metadata.clone(),
        ));
    }

    Ok(shards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_matrix_top_is_identity() {
        let m = encoding_matrix(4, 2);
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(if i == j { 1 } else { 0 }, m.get(i, j));
            }
        }
    }

    #[test]
    fn encode_small_roundtrip_shapes() {
        let config = EncodingConfig::new(4, 2, 64).unwrap();
        let shards = encode(b"Hello, World!", &config).unwrap();
        assert_eq!(6, shards.len());
        for shard in &shards {
            assert_eq!(64, shard.data().len());
            assert_eq!(13, shard.metadata().original_size);
        }
        // data shards pass through unchanged (padded)
        let mut expected = b"Hello, World!".to_vec();
        expected.resize(64 * 4, 0);
        let mut reconstructed = Vec::new();
        for i in 0..4 {
            reconstructed.extend_from_slice(shards[i].data());
        }
        assert_eq!(expected, reconstructed);
    }

    #[test]
    fn encode_is_deterministic() {
        let config = EncodingConfig::new(3, 2, 32).unwrap();
        let data = b"deterministic encoding test data";
        let a = encode(data, &config).unwrap();
        let b = encode(data, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn encode_rejects_empty_data() {
        let config = EncodingConfig::new(3, 2, 32).unwrap();
        assert!(encode(b"", &config).is_err());
    }

    #[test]
    fn multi_chunk_tags_chunk_index() {
        let config = EncodingConfig::new(2, 1, 4).unwrap();
        let data = vec![7u8; 20]; // chunk_payload_len = 8, needs 3 chunks
        let shards = encode(&data, &config).unwrap();
        let chunk_indices: std::collections::BTreeSet<_> =
            shards.iter().map(|s| s.metadata().chunk_index.unwrap()).collect();
        assert_eq!(3, chunk_indices.len());
    }
}
