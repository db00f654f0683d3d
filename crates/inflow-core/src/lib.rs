//! Inflow Core
//!
//! Packs many small logical records into one physical "container" entry to
//! cut per-record overhead when writing to a high-throughput ingestion
//! service, and unpacks such containers back into the original records. The
//! wire format (magic prefix, protobuf payload, trailing MD5 digest) is
//! byte-compatible with the consumer-side deaggregation convention used by
//! downstream readers outside this system's control.
//!
//! ## Producer side
//!
//! ```ignore
//! use inflow_core::Aggregator;
//!
//! let mut agg = Aggregator::new();
//! agg.put("first", "user-1");
//! agg.put("second", "user-1");
//!
//! if agg.size_bytes() > 16 * 1024 {
//!     let entry = agg.drain()?;
//!     transport.send(entry.data, &entry.partition_key);
//! }
//! ```
//!
//! ## Consumer / retry side
//!
//! ```ignore
//! use inflow_core::{extract_records, is_aggregated};
//!
//! if is_aggregated(&entry) {
//!     for record in extract_records(&entry)? {
//!         handle(record.data, &record.partition_key);
//!     }
//! }
//! ```
//!
//! Shard routing, encryption, compression, and delivery/retry live in the
//! surrounding producer pipeline, not here.

pub mod aggregator;
pub mod container;
pub mod error;
pub mod schema;

pub use aggregator::{Aggregator, ContainerEntry};
pub use container::{extract_records, is_aggregated, verify_checksum, ExtractedRecord, MAGIC};
pub use error::{Error, Result};
