//! Systematic Reed-Solomon erasure coding: configuration, shard model,
//! encoder, and decoder.

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod shard;

pub use config::{EncodingConfig, DEFAULT_SHARD_SIZE};
pub use decoder::{
    can_reconstruct, decode, decode_chunks, decode_with_options, DecodeOptions,
    ReconstructionDiagnostics, ReconstructionResult, ReconstructionStrategy,
};
pub use encoder::{encode, encode_chunk, encoding_matrix};
pub use shard::{Shard, ShardMetadata};
