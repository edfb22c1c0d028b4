//! Systematic Reed-Solomon decoding.

use super::encoder::encoding_matrix;
use super::shard::Shard;
use crate::error::RsError;
use crate::hash::sha256_hex;
use crate::matrix::code_bytes;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::warn;

/// Bounded defense-in-depth retry budget for alternative k-subsets: given
/// the MDS guarantee this should rarely fire, but any firing is logged.
const MAX_SUBSET_RETRIES: u32 = 16;

/// How a chunk's payload was reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconstructionStrategy {
    /// The first `k` shards by local index were exactly `{0, .., k-1}`, so
    /// their data was concatenated directly with no matrix inversion.
    Fast,
    /// A `k x k` submatrix of the encoding matrix was inverted; carries the
    /// number of additional k-subsets tried before a usable one was found.
    General { submatrix_retries: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructionDiagnostics {
    /// Global shard indices actually consumed, in chunk order.
    pub used_indices: Vec<usize>,
    pub strategy: ReconstructionStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructionResult {
    pub data: Vec<u8>,
    pub diagnostics: ReconstructionDiagnostics,
}

/// Caps wall-clock spent searching alternative k-subsets.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    pub max_subset_search: Option<Duration>,
}

/// `canReconstruct`: true iff the shards cover every chunk with at least
/// `k` shards each, all shards share consistent metadata, and config
/// matches.
pub fn can_reconstruct(shards: &[Shard], config: &super::config::EncodingConfig) -> bool {
    if shards.is_empty() {
        return false;
    }
    if validate_shards(shards).is_err() {
        return false;
    }
    let meta = shards[0].metadata();
    if meta.config != *config {
        return false;
    }
    let total = config.total_shards();
    let mut by_chunk: BTreeMap<usize, usize> = BTreeMap::new();
    for shard in shards {
        *by_chunk.entry(shard.chunk_index(total)).or_insert(0) += 1;
    }
    by_chunk.values().all(|&count| count >= config.data_shards())
}

pub fn decode(shards: Vec<Shard>) -> Result<ReconstructionResult, RsError> {
    decode_with_options(shards, &DecodeOptions::default())
}

pub fn decode_with_options(
    shards: Vec<Shard>,
    options: &DecodeOptions,
) -> Result<ReconstructionResult, RsError> {
    validate_shards(&shards)?;
    let metadata = shards[0].metadata().clone();
    let config = metadata.config;
    let total = config.total_shards();
    let k = config.data_shards();

    let mut by_chunk: BTreeMap<usize, Vec<Shard>> = BTreeMap::new();
    for shard in shards {
        by_chunk.entry(shard.chunk_index(total)).or_default().push(shard);
    }

    for (_, chunk_shards) in by_chunk.iter() {
        if chunk_shards.len() < k {
            return Err(RsError::InsufficientShards);
        }
    }

    let deadline = options.max_subset_search.map(|d| Instant::now() + d);
    let mut retries_used_total = 0u32;
    let mut used_any_general = false;

    // Ordered by chunk index; each entry keeps the sorted shard pool around
    // so a checksum mismatch can retry with a different k-subset later.
    let mut chunks: Vec<(usize, Vec<Shard>)> = by_chunk.into_iter().collect();
    for (_, chunk_shards) in chunks.iter_mut() {
        chunk_shards.sort_by_key(|s| s.local_index(total));
    }

    let mut chunk_payloads: Vec<(Vec<u8>, ReconstructionStrategy, Vec<usize>)> = Vec::new();
    let mut tried: Vec<Vec<Vec<usize>>> = Vec::new();
    for (_, chunk_shards) in &chunks {
        let (payload, strategy, used_indices, retries, subset) =
            reconstruct_chunk(chunk_shards, &config, &[], deadline)?;
        retries_used_total += retries;
        if matches!(strategy, ReconstructionStrategy::General { .. }) {
            used_any_general = true;
        }
        chunk_payloads.push((payload, strategy, used_indices));
        tried.push(vec![subset]);
    }

    let assemble = |payloads: &[(Vec<u8>, ReconstructionStrategy, Vec<usize>)]| -> Vec<u8> {
        let mut data: Vec<u8> = payloads.iter().flat_map(|(p, _, _)| p.clone()).collect();
        data.truncate(metadata.original_size as usize);
        data
    };

    let mut data = assemble(&chunk_payloads);

    if sha256_hex(&data) != metadata.checksum {
        warn!("checksum mismatch after reconstruction, retrying alternative subsets");
        let mut budget = MAX_SUBSET_RETRIES.saturating_sub(retries_used_total);
        let mut exhausted = vec![false; chunks.len()];
        let mut fixed = false;
        'retry: while budget > 0 && !exhausted.iter().all(|&e| e) {
            for (chunk_pos, (_, chunk_shards)) in chunks.iter().enumerate() {
                if exhausted[chunk_pos] || chunk_shards.len() <= k {
                    exhausted[chunk_pos] = true;
                    continue;
                }
                match reconstruct_chunk(chunk_shards, &config, &tried[chunk_pos], deadline) {
                    Ok((payload, strategy, used_indices, _, subset)) => {
                        budget -= 1;
                        tried[chunk_pos].push(subset);
                        let saved = chunk_payloads[chunk_pos].clone();
                        chunk_payloads[chunk_pos] = (payload, strategy, used_indices);
                        data = assemble(&chunk_payloads);
                        if sha256_hex(&data) == metadata.checksum {
                            used_any_general = true;
                            retries_used_total = MAX_SUBSET_RETRIES - budget;
                            fixed = true;
                            break 'retry;
                        }
                        chunk_payloads[chunk_pos] = saved;
                    }
                    Err(_) => exhausted[chunk_pos] = true,
                }
                if budget == 0 {
                    break;
                }
            }
        }
        if !fixed {
            return Err(RsError::CorruptedShards);
        }
    }

    let used_indices: Vec<usize> = chunk_payloads.iter().flat_map(|(_, _, idx)| idx.clone()).collect();
    let strategy = if used_any_general {
        ReconstructionStrategy::General {
            submatrix_retries: retries_used_total,
        }
    } else {
        ReconstructionStrategy::Fast
    };

    Ok(ReconstructionResult {
        data,
        diagnostics: ReconstructionDiagnostics { used_indices, strategy },
    })
}

/// Streaming collaborator entry point: decode a sequence of
/// `(chunk_index, shards)` pairs, yielding each chunk's reconstructed bytes
/// independently (no cross-chunk checksum check or truncation — the
/// collaborator owns final assembly ("ordering and contiguity of
/// chunks are the collaborator's responsibility").
pub fn decode_chunks<I>(chunks: I) -> impl Iterator<Item = Result<Vec<u8>, RsError>>
where
    I: IntoIterator<Item = (u64, Vec<Shard>)>,
{
    chunks.into_iter().map(|(_, mut shards)| {
        validate_shards(&shards)?;
        let config = shards[0].metadata().config;
        let total = config.total_shards();
        shards.sort_by_key(|s| s.local_index(total));
        let (payload, _, _, _, _) = reconstruct_chunk(&shards, &config, &[], None)?;
        Ok(payload)
    })
}

fn validate_shards(shards: &[Shard]) -> Result<(), RsError> {
    if shards.is_empty() {
        return Err(RsError::InvalidConfiguration("no shards provided".into()));
    }
    let first = shards[0].metadata();
    let mut seen_indices = std::collections::HashSet::new();
    for shard in shards {
        if shard.metadata().config.data_shards() != first.config.data_shards()
            || shard.metadata().config.parity_shards() != first.config.parity_shards()
        {
            return Err(RsError::IncompatibleShards);
        }
        if shard.metadata().original_size != first.original_size || shard.metadata().checksum != first.checksum {
            return Err(RsError::InvalidConfiguration(
                "shards carry inconsistent original_size or checksum".into(),
            ));
        }
        if shard.data().len() != shard.metadata().config.shard_size() {
            return Err(RsError::InvalidConfiguration(format!(
                "shard {} has length {}, expected shard_size {}",
                shard.index(),
                shard.data().len(),
                shard.metadata().config.shard_size()
            )));
        }
        if !seen_indices.insert(shard.index()) {
            return Err(RsError::InvalidConfiguration(format!(
                "duplicate shard index {}",
                shard.index()
            )));
        }
    }
    Ok(())
}

/// Reconstruct one chunk's `k * shard_size` payload from its (sorted by
/// local index) available shards, skipping any subset already listed in
/// `exclude`. Returns the payload, the strategy used, the global indices
/// actually consumed, how many singular submatrices were skipped along the
/// way, and the winning subset (so a caller can extend `exclude` for a
/// further retry).
fn reconstruct_chunk(
    sorted_chunk_shards: &[Shard],
    config: &super::config::EncodingConfig,
    exclude: &[Vec<usize>],
    deadline: Option<Instant>,
) -> Result<(Vec<u8>, ReconstructionStrategy, Vec<usize>, u32, Vec<usize>), RsError> {
    let k = config.data_shards();
    let total = config.total_shards();
    let available: Vec<usize> = sorted_chunk_shards.iter().map(|s| s.local_index(total)).collect();

    let candidates = k_subset_candidates(&available, k, MAX_SUBSET_RETRIES);
    let primary: Vec<usize> = (0..k).collect();
    let mut retries = 0u32;

    for subset_locals in candidates {
        if exclude.contains(&subset_locals) {
            continue;
        }
        if let Some(dl) = deadline {
            if Instant::now() > dl {
                return Err(RsError::MatrixInversionFailed { timed_out: true });
            }
        }

        let selected: Vec<&Shard> = subset_locals
            .iter()
            .map(|local| {
                sorted_chunk_shards
                    .iter()
                    .find(|s| s.local_index(total) == *local)
                    .expect("subset drawn from available locals")
            })
            .collect();
        let global_indices: Vec<usize> = selected.iter().map(|s| s.index()).collect();

        if subset_locals == primary {
            let payload: Vec<u8> = selected.iter().flat_map(|s| s.data().to_vec()).collect();
            return Ok((payload, ReconstructionStrategy::Fast, global_indices, retries, subset_locals));
        }

        let full = encoding_matrix(k, config.parity_shards());
        let sub = full.select_rows(&subset_locals);
        match sub.invert() {
            Ok(inv) => {
                let data_refs: Vec<&[u8]> = selected.iter().map(|s| s.data()).collect();
                let mut outputs = vec![Vec::new(); k];
                code_bytes(&inv, &data_refs, &mut outputs);
                let payload: Vec<u8> = outputs.into_iter().flatten().collect();
                return Ok((
                    payload,
                    ReconstructionStrategy::General { submatrix_retries: retries },
                    global_indices,
                    retries,
                    subset_locals,
                ));
            }
            Err(_) => {
                warn!("matrix inversion failed for k-subset, retrying with another");
                retries += 1;
                continue;
            }
        }
    }

    Err(RsError::MatrixInversionFailed { timed_out: false })
}

/// Up to `max_candidates` distinct ordered `k`-subsets of `available`
/// (which is sorted ascending), with the ascending-first-k subset always
/// first so the common case is tried before any fallback.
fn k_subset_candidates(available: &[usize], k: usize, max_candidates: u32) -> Vec<Vec<usize>> {
    let limit = (max_candidates as usize).max(1);
    let ascending_first_k: Vec<usize> = available.iter().take(k).copied().collect();

    let mut all = Vec::new();
    let mut current = Vec::new();
    combinations(available, k, 0, &mut current, &mut all, limit + 1);

    let mut result = vec![ascending_first_k.clone()];
    for subset in all {
        if subset != ascending_first_k {
            result.push(subset);
        }
        if result.len() >= limit {
            break;
        }
    }
    result
}

fn combinations(
    available: &[usize],
    k: usize,
    start: usize,
    current: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
    limit: usize,
) {
    if out.len() >= limit {
        return;
    }
    if current.len() == k {
        out.push(current.clone());
        return;
    }
    for i in start..available.len() {
        if out.len() >= limit {
            return;
        }
        current.push(available[i]);
        combinations(available, k, i + 1, current, out, limit);
        current.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rs::config::EncodingConfig;
    use crate::rs::encoder::encode;

    #[test]
    fn roundtrip_first_k_shards() {
        let config = EncodingConfig::new(4, 2, 64).unwrap();
        let shards = encode(b"Hello, World!", &config).unwrap();
        let result = decode(shards[0..4].to_vec()).unwrap();
        assert_eq!(b"Hello, World!".to_vec(), result.data);
        assert_eq!(ReconstructionStrategy::Fast, result.diagnostics.strategy);
    }

    #[test]
    fn roundtrip_non_contiguous_subset() {
        let config = EncodingConfig::new(5, 3, 1024).unwrap();
        let data: Vec<u8> = (0..2048u32).map(|i| (i % 256) as u8).collect();
        let shards = encode(&data, &config).unwrap();
        let keep: Vec<_> = shards
            .into_iter()
            .filter(|s| ![0, 3, 6].contains(&s.index()))
            .collect();
        let result = decode(keep).unwrap();
        assert_eq!(data, result.data);
    }

    #[test]
    fn insufficient_shards_is_reported() {
        let config = EncodingConfig::new(4, 2, 16).unwrap();
        let shards = encode(b"short message!!!", &config).unwrap();
        let err = decode(shards[0..3].to_vec()).unwrap_err();
        assert_eq!(RsError::InsufficientShards, err);
    }

    #[test]
    fn corrupted_shard_is_detected() {
        // Exactly k shards available, so no alternative k-subset exists to
        // route around the corrupted one.
        let config = EncodingConfig::new(4, 2, 16).unwrap();
        let mut shards = encode(b"short message!!!", &config).unwrap();
        shards.truncate(4);
        let byte = shards[2].data()[0];
        let mut data = shards[2].data().to_vec();
        data[0] = byte ^ 0x01;
        shards[2] = Shard::new(shards[2].index(), data, shards[2].metadata().clone());
        let err = decode(shards).unwrap_err();
        assert_eq!(RsError::CorruptedShards, err);
    }

    #[test]
    fn corrupted_shard_is_routed_around_when_spare_shards_exist() {
        // All k + m shards present: one corrupted data shard can be
        // excluded by falling back to an alternative k-subset.
        let config = EncodingConfig::new(4, 2, 16).unwrap();
        let mut shards = encode(b"short message!!!", &config).unwrap();
        let byte = shards[2].data()[0];
        let mut data = shards[2].data().to_vec();
        data[0] = byte ^ 0x01;
        shards[2] = Shard::new(shards[2].index(), data, shards[2].metadata().clone());
        let result = decode(shards).unwrap();
        assert_eq!(b"short message!!!".to_vec(), result.data);
    }

    #[test]
    fn can_reconstruct_reports_insufficient_chunks() {
        let config = EncodingConfig::new(4, 2, 16).unwrap();
        let shards = encode(b"short message!!!", &config).unwrap();
        assert!(can_reconstruct(&shards, &config));
        assert!(!can_reconstruct(&shards[0..3], &config));
    }
}
