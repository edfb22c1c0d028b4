//! `Shard` and `ShardMetadata`, plus their base64 wire format.

use super::config::EncodingConfig;
use crate::error::RsError;
use crate::serialize::{ByteReader, ByteWriter, SerializeError};

const WIRE_VERSION: u8 = 1;

/// Metadata shared, by value, across every shard produced by one `encode`
/// call ("all shards from one encode share identical metadata
/// excluding `index`").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardMetadata {
    pub original_size: u64,
    pub config: EncodingConfig,
    /// Hex-encoded SHA-256 of the original, unpadded data.
    pub checksum: String,
    pub chunk_index: Option<u64>,
}

/// One shard of a systematic Reed-Solomon encoding: `index < k` carries
/// original (padded) data unchanged, `index >= k` carries parity.
#[derive(Clone, PartialEq, Eq)]
pub struct Shard {
    index: usize,
    data: Vec<u8>,
    metadata: ShardMetadata,
}

impl std::fmt::Debug for Shard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shard")
            .field("index", &self.index)
            .field("data_len", &self.data.len())
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl Shard {
    pub fn new(index: usize, data: Vec<u8>, metadata: ShardMetadata) -> Shard {
        Shard {
            index,
            data,
            metadata,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn metadata(&self) -> &ShardMetadata {
        &self.metadata
    }

    /// Local index of this shard within its chunk (`index mod (k + m)`).
    pub fn local_index(&self, total_shards: usize) -> usize {
        self.index % total_shards
    }

    /// Index of the chunk this shard belongs to (`index / (k + m)`).
    pub fn chunk_index(&self, total_shards: usize) -> usize {
        self.index / total_shards
    }

    /// Serialize as base64 of a self-describing record: version byte,
    /// index, original size, config, checksum, chunk index flag, and raw
    /// data.
    pub fn encode_base64(&self) -> String {
        let mut w = ByteWriter::new();
        w.u8(WIRE_VERSION)
            .u64(self.index as u64)
            .u64(self.metadata.original_size)
            .u16(self.metadata.config.data_shards() as u16)
            .u16(self.metadata.config.parity_shards() as u16)
            .u32(self.metadata.config.shard_size() as u32);
        let checksum_bytes = hex::decode(&self.metadata.checksum).unwrap_or_else(|_| vec![0u8; 32]);
        w.bytes(&checksum_bytes);
        match self.metadata.chunk_index {
            Some(ci) => {
                w.u8(1).u64(ci);
            }
            None => {
                w.u8(0).u64(0);
            }
        }
        w.u32(self.data.len() as u32);
        w.bytes(&self.data);
        w.to_base64()
    }

    pub fn decode_base64(encoded: &str) -> Result<Shard, RsError> {
        let mut owned = Vec::new();
        let mut r = ByteReader::from_base64(encoded, &mut owned)
            .map_err(|e| RsError::InvalidConfiguration(e.to_string()))?;

        let version = r.u8().map_err(ser_err)?;
        if version != WIRE_VERSION {
            return Err(RsError::InvalidConfiguration(
                SerializeError::UnknownVersion(version).to_string(),
            ));
        }

        let index = r.u64().map_err(ser_err)? as usize;
        let original_size = r.u64().map_err(ser_err)?;
        let data_shards = r.u16().map_err(ser_err)? as usize;
        let parity_shards = r.u16().map_err(ser_err)? as usize;
        let shard_size = r.u32().map_err(ser_err)? as usize;
        let checksum = hex::encode(r.bytes(32).map_err(ser_err)?);
        let chunk_present = r.u8().map_err(ser_err)?;
        let chunk_raw = r.u64().map_err(ser_err)?;
        let chunk_index = if chunk_present != 0 { Some(chunk_raw) } else { None };
        let data_len = r.u32().map_err(ser_err)? as usize;
        let data = r.bytes(data_len).map_err(ser_err)?;
        r.finish().map_err(ser_err)?;

        let config = EncodingConfig::new(data_shards, parity_shards, shard_size)?;
        Ok(Shard::new(
            index,
            data,
            ShardMetadata {
                original_size,
                config,
                checksum,
                chunk_index,
            },
        ))
    }
}

fn ser_err(e: SerializeError) -> RsError {
    RsError::InvalidConfiguration(e.to_string())
}
