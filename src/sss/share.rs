//! `SecretShare` and `ShareMetadata`, plus their base64 wire format.

use crate::error::SssError;
use crate::hash::sss_share_hash;
use crate::serialize::{ByteReader, ByteWriter, SerializeError};
use super::config::SSSConfig;

const WIRE_VERSION_CURRENT: u8 = 2;

/// Metadata shared, by value, across every share produced by one `split`
/// call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMetadata {
    pub threshold: usize,
    pub total_shares: usize,
    pub secret_size: usize,
    /// SHA-256 of the whole secret.
    pub secret_hash: [u8; 32],
    /// 128-bit identifier binding every share from one `split` call.
    pub share_set_id: [u8; 16],
    /// `1` = legacy, hashless; `2` = current.
    pub version: u8,
}

/// One share of a Shamir split: `index` is the nonzero x-coordinate, `data`
/// is the evaluation of every per-byte polynomial at that x, and
/// `data_hash` binds `(index, data, share_set_id)` against tampering.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretShare {
    index: u8,
    data: Vec<u8>,
    metadata: ShareMetadata,
    data_hash: [u8; 32],
}

impl std::fmt::Debug for SecretShare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretShare")
            .field("index", &self.index)
            .field("data_len", &self.data.len())
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl SecretShare {
    pub fn new(index: u8, data: Vec<u8>, metadata: ShareMetadata) -> SecretShare {
        let data_hash = sss_share_hash(index, &data, &metadata.share_set_id);
        SecretShare {
            index,
            data,
            metadata,
            data_hash,
        }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn metadata(&self) -> &ShareMetadata {
        &self.metadata
    }

    pub fn data_hash(&self) -> &[u8; 32] {
        &self.data_hash
    }

    /// Recompute `data_hash` from the current `(index, data, share_set_id)`.
    /// Used when deserializing a legacy version-1 record, whose wire form
    /// carries no stored hash.
    pub fn recompute_hash(&mut self) {
        self.data_hash = sss_share_hash(self.index, &self.data, &self.metadata.share_set_id);
    }

    pub fn config(&self) -> Result<SSSConfig, SssError> {
        SSSConfig::with_secret_max_size(
            self.metadata.threshold,
            self.metadata.total_shares,
            self.metadata.secret_size.max(1),
        )
    }

    /// Serialize as base64 of a self-describing record: version byte,
    /// index, metadata, data_hash (version 2 only), and raw data.
    pub fn encode_base64(&self) -> String {
        let mut w = ByteWriter::new();
        w.u8(self.metadata.version)
            .u8(self.index)
            .u16(self.metadata.threshold as u16)
            .u16(self.metadata.total_shares as u16)
            .u32(self.metadata.secret_size as u32)
            .bytes(&self.metadata.secret_hash)
            .bytes(&self.metadata.share_set_id);
        if self.metadata.version >= 2 {
            w.bytes(&self.data_hash);
        }
        w.u32(self.data.len() as u32);
        w.bytes(&self.data);
        w.to_base64()
    }

    pub fn decode_base64(encoded: &str) -> Result<SecretShare, SssError> {
        let mut owned = Vec::new();
        let mut r = ByteReader::from_base64(encoded, &mut owned).map_err(ser_err)?;

        let version = r.u8().map_err(ser_err)?;
        if version == 0 || version > WIRE_VERSION_CURRENT {
            return Err(ser_err(SerializeError::UnknownVersion(version)));
        }

        let index = r.u8().map_err(ser_err)?;
        let threshold = r.u16().map_err(ser_err)? as usize;
        let total_shares = r.u16().map_err(ser_err)? as usize;
        let secret_size = r.u32().map_err(ser_err)? as usize;
        let mut secret_hash = [0u8; 32];
        secret_hash.copy_from_slice(&r.bytes(32).map_err(ser_err)?);
        let mut share_set_id = [0u8; 16];
        share_set_id.copy_from_slice(&r.bytes(16).map_err(ser_err)?);

        let stored_hash = if version >= 2 {
            let mut h = [0u8; 32];
            h.copy_from_slice(&r.bytes(32).map_err(ser_err)?);
            Some(h)
        } else {
            None
        };

        let data_len = r.u32().map_err(ser_err)? as usize;
        let data = r.bytes(data_len).map_err(ser_err)?;
        r.finish().map_err(ser_err)?;

        let metadata = ShareMetadata {
            threshold,
            total_shares,
            secret_size,
            secret_hash,
            share_set_id,
            version,
        };

        let share = match stored_hash {
            Some(h) => SecretShare {
                index,
                data,
                metadata,
                data_hash: h,
            },
            None => {
                // version 1 carried no hash; recompute at deserialize time.
                let mut share = SecretShare {
                    index,
                    data,
                    metadata,
                    data_hash: [0u8; 32],
                };
                share.recompute_hash();
                share
            }
        };
        Ok(share)
    }
}

fn ser_err(e: SerializeError) -> SssError {
    SssError::ReconstructionFailed(e.to_string())
}
