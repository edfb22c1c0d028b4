//! `SSSConfig`: immutable, validated Shamir secret sharing parameters.

use crate::error::SssError;

/// Hard ceiling on total shares: each share's `x` coordinate is a nonzero
/// element of GF(256), and `x = 0` is reserved for the secret itself.
pub const MAX_TOTAL_SHARES: usize = 128;

/// Ceiling on secret size in bytes; generous enough for keys and small
/// documents while keeping per-byte polynomial evaluation bounded.
pub const MAX_SECRET_SIZE: usize = 1024;

/// Shamir secret sharing configuration: `threshold` shares reconstruct the
/// secret, `total_shares` are produced. `1 <= threshold <= total_shares <=
/// 128`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SSSConfig {
    threshold: usize,
    total_shares: usize,
    secret_max_size: usize,
}

impl SSSConfig {
    pub fn new(threshold: usize, total_shares: usize) -> Result<Self, SssError> {
        Self::with_secret_max_size(threshold, total_shares, MAX_SECRET_SIZE)
    }

    pub fn with_secret_max_size(
        threshold: usize,
        total_shares: usize,
        secret_max_size: usize,
    ) -> Result<Self, SssError> {
        if threshold == 0 {
            return Err(SssError::InvalidConfig("threshold must be greater than 0".into()));
        }
        if total_shares == 0 || total_shares > MAX_TOTAL_SHARES {
            return Err(SssError::InvalidConfig(format!(
                "total_shares must be in 1..={MAX_TOTAL_SHARES}"
            )));
        }
        if threshold > total_shares {
            return Err(SssError::InvalidConfig(
                "threshold must not exceed total_shares".into(),
            ));
        }
        if secret_max_size == 0 || secret_max_size > MAX_SECRET_SIZE {
            return Err(SssError::InvalidConfig(format!(
                "secret_max_size must be in 1..={MAX_SECRET_SIZE}"
            )));
        }

        Ok(SSSConfig {
            threshold,
            total_shares,
            secret_max_size,
        })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn total_shares(&self) -> usize {
        self.total_shares
    }

    pub fn secret_max_size(&self) -> usize {
        self.secret_max_size
    }
}
