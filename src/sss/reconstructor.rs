//! `reconstruct`: recover a secret from `k` or more valid shares via
//! Lagrange interpolation at `x = 0`.

use super::share::SecretShare;
use crate::error::SssError;
use crate::gf;
use crate::hash::{sha256, sss_share_hash};
use crate::wipe::secure_wipe;
use tracing::instrument;

/// Reconstruct the original secret from `shares`. Every presented share
/// must pass per-share and cross-share validation (a single invalid share
/// fails the whole call with `InvalidShare`/`IncompatibleShares`, it is not
/// dropped and retried with the rest), there must be at least `threshold`
/// of them, and the reconstructed secret's hash must match `secret_hash`.
#[instrument(skip(shares), fields(count = shares.len()))]
pub fn reconstruct(shares: Vec<SecretShare>) -> Result<Vec<u8>, SssError> {
    if shares.is_empty() {
        return Err(SssError::InsufficientShares);
    }

    for share in &shares {
        validate_share(share)?;
    }
    validate_cross_share(&shares)?;

    let metadata = shares[0].metadata().clone();
    if shares.len() < metadata.threshold {
        return Err(SssError::InsufficientShares);
    }

    let chosen = &shares[..metadata.threshold];
    let points: Vec<(gf::GfElement, &[u8])> = chosen.iter().map(|s| (s.index(), s.data())).collect();

    let mut secret = vec![0u8; metadata.secret_size];
    for (b, out_byte) in secret.iter_mut().enumerate() {
        *out_byte = lagrange_at_zero(&points, b);
    }

    if sha256(&secret) != metadata.secret_hash {
        secure_wipe(&mut secret);
        return Err(SssError::InvalidShare);
    }

    Ok(secret)
}

fn validate_share(share: &SecretShare) -> Result<(), SssError> {
    if share.index() == 0 {
        return Err(SssError::InvalidShare);
    }
    if (share.index() as usize) > share.metadata().total_shares {
        return Err(SssError::InvalidShare);
    }
    if share.data().len() != share.metadata().secret_size {
        return Err(SssError::InvalidShare);
    }
    if share.metadata().version >= 2 {
        let expected = sss_share_hash(share.index(), share.data(), &share.metadata().share_set_id);
        if &expected != share.data_hash() {
            return Err(SssError::InvalidShare);
        }
    }
    Ok(())
}

fn validate_cross_share(shares: &[SecretShare]) -> Result<(), SssError> {
    if shares.is_empty() {
        return Err(SssError::InsufficientShares);
    }
    let first = shares[0].metadata();
    let mut seen_indices = std::collections::HashSet::new();
    for share in shares {
        let meta = share.metadata();
        if meta.share_set_id != first.share_set_id
            || meta.threshold != first.threshold
            || meta.total_shares != first.total_shares
            || meta.secret_size != first.secret_size
            || meta.secret_hash != first.secret_hash
        {
            return Err(SssError::IncompatibleShares);
        }
        if share.data().len() != first.secret_size {
            return Err(SssError::IncompatibleShares);
        }
        if !seen_indices.insert(share.index()) {
            return Err(SssError::IncompatibleShares);
        }
    }
    Ok(())
}

/// Lagrange interpolation of `points` (each `(x_i, data)`) at `x = 0`,
/// evaluated at byte offset `b`: `secret[b] = sum_i data_i[b] * basis_i`.
fn lagrange_at_zero(points: &[(gf::GfElement, &[u8])], b: usize) -> u8 {
    let mut acc = 0u8;
    for (i, &(xi, data_i)) in points.iter().enumerate() {
        let mut basis = 1u8;
        for (j, &(xj, _)) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            let numerator = gf::sub(0, xj);
            let denominator = gf::sub(xi, xj);
            let term = gf::div(numerator, denominator).expect("distinct share indices give nonzero denominator");
            basis = gf::mul(basis, term);
        }
        acc = gf::add(acc, gf::mul(data_i[b], basis));
    }
    acc
}
