//! Error Types for the Aggregation Codec
//!
//! ## Error Categories
//!
//! ### Encode Errors
//! - `Encode`: payload serialization failed during a drain. The aggregation
//!   buffer is left untouched so the caller can retry.
//!
//! ### Decode Errors
//! - `MalformedEntry`: entry is shorter than the 20-byte envelope or does not
//!   start with the magic prefix.
//! - `MalformedPayload`: the payload section is not a valid aggregated record.
//! - `KeyIndexOutOfRange`: a record references a partition-key-table slot that
//!   does not exist (corrupted or adversarial container).
//!
//! Decode failures are always surfaced to the caller; the codec never returns
//! a partial or silently-empty record set, so "no records" and "corrupt
//! container" stay distinguishable. The codec does not retry anything
//! internally.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to encode container payload: {0}")]
    Encode(#[from] prost::EncodeError),

    #[error("malformed container entry: {0}")]
    MalformedEntry(String),

    #[error("malformed container payload: {0}")]
    MalformedPayload(#[from] prost::DecodeError),

    #[error("partition key index {index} out of range (table has {table_len} entries)")]
    KeyIndexOutOfRange { index: u64, table_len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
