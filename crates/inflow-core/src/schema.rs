//! Payload Schema for Aggregated Containers
//!
//! The container payload is a protobuf message (proto2 semantics) shared with
//! the consumer-side deaggregation libraries:
//!
//! ```proto
//! message AggregatedRecord {
//!   repeated string partition_key_table = 1;
//!   repeated Record records             = 3;
//! }
//! message Record {
//!   required uint64 partition_key_index = 1;
//!   required bytes  data                = 3;
//! }
//! ```
//!
//! Field numbers are fixed by that convention and must never change. The
//! convention also defines explicit-hash-key and tag fields (tag 2 of
//! `AggregatedRecord`, tags 2 and 4 of `Record`) which this producer never
//! emits; decoders skip unknown fields, so containers from richer producers
//! still decode here and our containers decode everywhere.
//!
//! The messages are small enough that they are written by hand instead of
//! running protoc at build time. `partition_key_index` and `data` carry the
//! proto2 `required` label: they are encoded unconditionally, because
//! consumer-side decoders treat a missing index (even index zero) as a parse
//! failure.

use bytes::Bytes;

/// One aggregated record: payload bytes plus the index of its partition key
/// in the enclosing container's key table.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Record {
    #[prost(uint64, required, tag = "1")]
    pub partition_key_index: u64,

    #[prost(bytes = "bytes", required, tag = "3")]
    pub data: Bytes,
}

/// The container payload: a deduplicated partition-key table and the records
/// that reference it.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AggregatedRecord {
    #[prost(string, repeated, tag = "1")]
    pub partition_key_table: Vec<String>,

    #[prost(message, repeated, tag = "3")]
    pub records: Vec<Record>,
}
