//! Shamir Secret Sharing: configuration, polynomial generation, share
//! model, splitter, and reconstructor.

pub mod config;
pub mod poly;
pub mod reconstructor;
pub mod share;
pub mod splitter;

pub use config::{SSSConfig, MAX_SECRET_SIZE, MAX_TOTAL_SHARES};
pub use reconstructor::reconstruct;
pub use share::{SecretShare, ShareMetadata};
pub use splitter::split;
