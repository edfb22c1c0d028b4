//! Error types shared by the GF(256) core and both pipelines.
//!
//! Every public operation returns a `Result` whose error carries a
//! categorical kind and a human message, never secret data or polynomial
//! values. Panics are reserved for programmer bugs such as
//! out-of-range lookups reached only by an internal invariant violation.

use thiserror::Error;

/// Failure of a raw GF(256)/matrix operation, wrapped by both pipelines'
/// error types rather than exposed on its own in the public API surface.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("division by zero in GF(256)")]
    DivideByZero,
    #[error("zero has no multiplicative inverse in GF(256)")]
    InverseOfZero,
    #[error("matrix is singular and cannot be inverted")]
    SingularMatrix,
    #[error("matrix dimensions are incompatible for this operation")]
    DimensionMismatch,
}

/// Reed-Solomon erasure coding error kinds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RsError {
    #[error("fewer than k shards are available to reconstruct one or more chunks")]
    InsufficientShards,

    #[error("reconstructed data does not match the recorded checksum")]
    CorruptedShards,

    #[error("invalid encoding configuration: {0}")]
    InvalidConfiguration(String),

    #[error("GF(256) arithmetic error: {0}")]
    MathError(#[from] FieldError),

    #[error("shards carry inconsistent metadata and cannot be combined")]
    IncompatibleShards,

    #[error("no invertible k-subset of the available shards was found (timed_out={timed_out})")]
    MatrixInversionFailed { timed_out: bool },
}

/// Shamir secret sharing error kinds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SssError {
    #[error("invalid secret sharing configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid secret: {0}")]
    InvalidSecret(String),

    #[error("fewer than k valid shares are available to reconstruct")]
    InsufficientShares,

    #[error("a share failed its integrity check")]
    InvalidShare,

    #[error("shares do not belong to the same share set or carry inconsistent metadata")]
    IncompatibleShares,

    #[error("reconstruction failed: {0}")]
    ReconstructionFailed(String),

    #[error("only a subset of the shares needed could be validated")]
    PartialData,

    #[error("unknown error: {0}")]
    Unknown(String),
}

pub type RsResult<T> = Result<T, RsError>;
pub type SssResult<T> = Result<T, SssError>;
