//! Aggregation Buffer for the Inflow Producer
//!
//! This module implements record aggregation to amortize the per-record
//! overhead of the downstream ingestion service. Small logical records are
//! accumulated in memory and serialized into a single physical container
//! entry on demand.
//!
//! ```text
//! ┌──────────────┐
//! │  put(...)    │ Producer API
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────────────────────────┐
//! │  Aggregator                      │ One buffer per worker/shard
//! │  - records: Vec<Record>          │
//! │  - partition_keys: Vec<String>   │
//! │  - size_bytes: usize             │
//! └──────┬───────────────────────────┘
//!        │  drain() on a size/count threshold or timer (caller's policy)
//!        ▼
//! ┌──────────────────────────────────┐
//! │  ContainerEntry                  │
//! │  magic ++ payload ++ md5         │
//! └──────────────────────────────────┘
//! ```
//!
//! ## Partition Keys
//!
//! All records in one buffer share a single partition key: the first key ever
//! supplied to the buffer instance. Keys passed on later `put` calls are
//! accepted but silently ignored. Callers that need per-key routing must run
//! one buffer per key.
//!
//! ## Size Accounting
//!
//! `size_bytes` is the sum of raw record payload bytes plus raw partition-key
//! bytes. It estimates wire weight so the caller can decide when to drain; it
//! is not the exact encoded size.
//!
//! ## Thread Safety
//!
//! Aggregator is NOT thread-safe. Callers funnel concurrent producers through
//! a mutex or a single dedicated task that owns the buffer exclusively.

use bytes::{BufMut, Bytes, BytesMut};
use md5::{Digest, Md5};
use prost::Message;
use tracing::{debug, trace};

use crate::container::{CHECKSUM_LEN, MAGIC};
use crate::error::Result;
use crate::schema::{AggregatedRecord, Record};

/// One drained container, ready to hand to the transport layer.
#[derive(Debug, Clone)]
pub struct ContainerEntry {
    /// Wire bytes: magic prefix, encoded payload, trailing MD5 digest.
    pub data: Bytes,
    /// Nominal partition key for transport-layer routing (the key table's
    /// first entry; empty when the buffer was drained empty).
    pub partition_key: String,
}

/// Accumulates logical records and serializes them into container entries.
#[derive(Debug)]
pub struct Aggregator {
    records: Vec<Record>,
    partition_keys: Vec<String>,
    size_bytes: usize,
}

impl Aggregator {
    /// Create a new empty aggregation buffer.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            partition_keys: Vec::new(),
            size_bytes: 0,
        }
    }

    /// Buffer one record under the given partition key.
    ///
    /// The buffer is single-partition-key for its whole lifetime: the first
    /// key supplied wins and later keys are ignored. Cannot fail.
    pub fn put(&mut self, data: impl Into<Bytes>, partition_key: &str) {
        if self.partition_keys.is_empty() {
            self.partition_keys.push(partition_key.to_string());
            self.size_bytes += partition_key.len();
        }

        let data = data.into();
        self.size_bytes += data.len();
        self.records.push(Record {
            partition_key_index: (self.partition_keys.len() - 1) as u64,
            data,
        });

        trace!(
            record_count = self.records.len(),
            size_bytes = self.size_bytes,
            "Buffered record"
        );
    }

    /// Approximate accumulated size in bytes (payloads plus partition keys).
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Number of buffered records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the buffer holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the buffered records into one container entry and reset the
    /// buffer.
    ///
    /// The buffer is reset only after the entry is fully constructed; a
    /// failed drain leaves every buffered record in place for a retry.
    /// Draining an empty buffer is permitted and yields a valid container
    /// with an empty key table and zero records.
    pub fn drain(&mut self) -> Result<ContainerEntry> {
        let container = AggregatedRecord {
            partition_key_table: self.partition_keys.clone(),
            records: self.records.clone(),
        };

        let mut payload = Vec::with_capacity(container.encoded_len());
        container.encode(&mut payload)?;

        let checksum = Md5::digest(&payload);

        let mut data = BytesMut::with_capacity(MAGIC.len() + payload.len() + CHECKSUM_LEN);
        data.put_slice(&MAGIC);
        data.put_slice(&payload);
        data.put_slice(&checksum);

        let partition_key = self.partition_keys.first().cloned().unwrap_or_default();

        self.records.clear();
        self.partition_keys.clear();
        self.size_bytes = 0;

        debug!(entry_bytes = data.len(), "Drained aggregation buffer");

        Ok(ContainerEntry {
            data: data.freeze(),
            partition_key,
        })
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_counts_records_and_bytes() {
        let mut agg = Aggregator::new();
        assert!(agg.is_empty());

        agg.put("hello", "user-1");
        assert_eq!(agg.len(), 1);
        // "user-1" (6) + "hello" (5)
        assert_eq!(agg.size_bytes(), 11);

        agg.put("world", "user-1");
        assert_eq!(agg.len(), 2);
        // Key is only counted once.
        assert_eq!(agg.size_bytes(), 16);
    }

    #[test]
    fn test_later_keys_ignored() {
        let mut agg = Aggregator::new();
        agg.put("a", "first");
        agg.put("b", "second");

        // The second key is neither stored nor counted.
        assert_eq!(agg.size_bytes(), "first".len() + 2);

        let entry = agg.drain().unwrap();
        assert_eq!(entry.partition_key, "first");
    }

    #[test]
    fn test_drain_resets_buffer() {
        let mut agg = Aggregator::new();
        agg.put("payload", "pk");

        let entry = agg.drain().unwrap();
        assert_eq!(entry.partition_key, "pk");
        assert!(entry.data.len() > MAGIC.len() + CHECKSUM_LEN);

        assert!(agg.is_empty());
        assert_eq!(agg.len(), 0);
        assert_eq!(agg.size_bytes(), 0);
    }

    #[test]
    fn test_drain_entry_layout() {
        let mut agg = Aggregator::new();
        agg.put("a", "pk1");

        let entry = agg.drain().unwrap();
        let data = &entry.data;
        assert_eq!(&data[..MAGIC.len()], MAGIC);

        let payload = &data[MAGIC.len()..data.len() - CHECKSUM_LEN];
        let digest = Md5::digest(payload);
        assert_eq!(digest.as_slice(), &data[data.len() - CHECKSUM_LEN..]);
    }

    #[test]
    fn test_empty_drain_produces_valid_container() {
        let mut agg = Aggregator::new();
        let entry = agg.drain().unwrap();

        // Empty payload: just magic and the digest of zero bytes.
        assert_eq!(entry.data.len(), MAGIC.len() + CHECKSUM_LEN);
        assert_eq!(entry.partition_key, "");
    }

    #[test]
    fn test_buffer_reusable_after_drain() {
        let mut agg = Aggregator::new();
        agg.put("a", "pk1");
        agg.drain().unwrap();

        // A fresh key takes index 0 again.
        agg.put("b", "pk2");
        let entry = agg.drain().unwrap();
        assert_eq!(entry.partition_key, "pk2");
    }
}
