//! `split`: turn a secret byte string into `n` shares, `k` of which
//! reconstruct it.

use super::config::SSSConfig;
use super::poly::random_coefficients;
use super::share::{SecretShare, ShareMetadata};
use crate::error::SssError;
use crate::gf;
use crate::hash::sha256;
use crate::wipe::secure_wipe;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::instrument;

const CURRENT_VERSION: u8 = 2;

/// Split `secret` into `config.total_shares()` shares, any `config.threshold()`
/// of which reconstruct it. Every call draws a fresh `share_set_id` and
/// fresh per-byte polynomials, so splitting the same secret twice yields
/// independent share sets.
#[instrument(skip(secret), fields(len = secret.len(), k = config.threshold(), n = config.total_shares()))]
pub fn split(secret: &[u8], config: &SSSConfig) -> Result<Vec<SecretShare>, SssError> {
    if secret.is_empty() {
        return Err(SssError::InvalidSecret("secret must not be empty".into()));
    }
    if secret.len() > config.secret_max_size() {
        return Err(SssError::InvalidSecret(format!(
            "secret of {} bytes exceeds secret_max_size {}",
            secret.len(),
            config.secret_max_size()
        )));
    }

    let k = config.threshold();
    let n = config.total_shares();

    let mut share_set_id = [0u8; 16];
    OsRng.fill_bytes(&mut share_set_id);
    let secret_hash = sha256(secret);

    let metadata = ShareMetadata {
        threshold: k,
        total_shares: n,
        secret_size: secret.len(),
        secret_hash,
        share_set_id,
        version: CURRENT_VERSION,
    };

    let mut share_data: Vec<Vec<u8>> = vec![Vec::with_capacity(secret.len()); n];
    for &secret_byte in secret {
        let mut coeffs = random_coefficients(secret_byte, k - 1);
        for (i, row) in share_data.iter_mut().enumerate() {
            let x = (i as u8).wrapping_add(1);
            row.push(gf::horner_eval(&coeffs, x));
        }
        secure_wipe(&mut coeffs);
    }

    let shares = share_data
        .into_iter()
        .enumerate()
        .map(|(i, data)| SecretShare::new((i as u8).wrapping_add(1), data, metadata.clone()))
        .collect();

    Ok(shares)
}
