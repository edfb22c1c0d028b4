//! SHA-256 entry points shared by both pipelines ("both computed
//! via the same SHA-256 primitive").

use sha2::{Digest, Sha256};

/// Raw 32-byte SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hex-encoded (lowercase) SHA-256 digest of `data`, used for RS shard
/// checksums.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// `SHA-256(index_byte || data || share_set_id)`, the per-share integrity
/// tag for SSS.
pub fn sss_share_hash(index: u8, data: &[u8], share_set_id: &[u8; 16]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([index]);
    hasher.update(data);
    hasher.update(share_set_id);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_matches_known_vector() {
        // SHA-256("") = e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
        assert_eq!(
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            sha256_hex(b"")
        );
    }

    #[test]
    fn sss_share_hash_is_domain_separated_by_share_set() {
        let a = sss_share_hash(1, b"data", &[0u8; 16]);
        let b = sss_share_hash(1, b"data", &[1u8; 16]);
        assert_ne!(a, b);
    }

    #[test]
    fn sss_share_hash_is_domain_separated_by_index() {
        let set = [7u8; 16];
        let a = sss_share_hash(1, b"data", &set);
        let b = sss_share_hash(2, b"data", &set);
        assert_ne!(a, b);
    }
}
