//! `EncodingConfig`: immutable, validated RS parameters.

use crate::error::RsError;

/// Default shard size in bytes when a caller doesn't specify one.
pub const DEFAULT_SHARD_SIZE: usize = 8192;

/// Reed-Solomon encoding configuration. `k + m <= 256` is enforced at
/// construction so every downstream operation can assume it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodingConfig {
    data_shards: usize,
    parity_shards: usize,
    shard_size: usize,
}

impl EncodingConfig {
    pub fn new(data_shards: usize, parity_shards: usize, shard_size: usize) -> Result<Self, RsError> {
        if data_shards == 0 {
            return Err(RsError::InvalidConfiguration(
                "data_shards must be greater than 0".into(),
            ));
        }
        if parity_shards == 0 {
            return Err(RsError::InvalidConfiguration(
                "parity_shards must be greater than 0".into(),
            ));
        }
        if data_shards + parity_shards > 256 {
            return Err(RsError::InvalidConfiguration(
                "data_shards + parity_shards must not exceed 256".into(),
            ));
        }
        if shard_size == 0 {
            return Err(RsError::InvalidConfiguration(
                "shard_size must be greater than 0".into(),
            ));
        }

        Ok(EncodingConfig {
            data_shards,
            parity_shards,
            shard_size,
        })
    }

    pub fn with_default_shard_size(data_shards: usize, parity_shards: usize) -> Result<Self, RsError> {
        Self::new(data_shards, parity_shards, DEFAULT_SHARD_SIZE)
    }

    pub fn data_shards(&self) -> usize {
        self.data_shards
    }

    pub fn parity_shards(&self) -> usize {
        self.parity_shards
    }

    pub fn shard_size(&self) -> usize {
        self.shard_size
    }

    pub fn total_shards(&self) -> usize {
        self.data_shards + self.parity_shards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_shard_counts() {
        assert!(EncodingConfig::new(0, 2, 64).is_err());
        assert!(EncodingConfig::new(2, 0, 64).is_err());
    }

    #[test]
    fn rejects_overflowing_total() {
        assert!(EncodingConfig::new(200, 100, 64).is_err());
        assert!(EncodingConfig::new(200, 56, 64).is_ok());
    }

    #[test]
    fn default_shard_size_is_8192() {
        let cfg = EncodingConfig::with_default_shard_size(4, 2).unwrap();
        assert_eq!(DEFAULT_SHARD_SIZE, cfg.shard_size());
    }
}
