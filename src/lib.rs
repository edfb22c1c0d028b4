//! GF(256)-based Reed-Solomon erasure coding and Shamir secret sharing.
//!
//! Both pipelines share the same finite-field core ([`gf`]) and matrix
//! engine ([`matrix`]): Reed-Solomon ([`rs`]) encodes a byte array into `k +
//! m` shards recoverable from any `k`; Shamir sharing ([`sss`]) splits a
//! secret into `n` shares recoverable from any `k`.

pub mod error;
pub mod gf;
pub mod hash;
pub mod matrix;
pub mod rs;
pub mod serialize;
pub mod sss;
pub mod wipe;

pub use error::{FieldError, RsError, RsResult, SssError, SssResult};
