//! Container Envelope: Detection, Decoding, Integrity
//!
//! ## Wire Format
//!
//! ```text
//! ┌───────────┬──────────────────────────────┬──────────────┐
//! │ Magic (4) │ Payload (variable)           │ Checksum (16)│
//! │ F3899AC2  │ protobuf AggregatedRecord    │ MD5(payload) │
//! └───────────┴──────────────────────────────┴──────────────┘
//! ```
//!
//! The smallest well-formed entry is 20 bytes (empty payload). Any blob not
//! starting with the magic prefix is not a container and is never decoded as
//! one.
//!
//! ## Integrity
//!
//! For compatibility with the existing consumer-side convention,
//! [`extract_records`] does not verify the trailing digest. Callers that want
//! corruption detection call [`verify_checksum`] explicitly before extracting.

use bytes::Bytes;
use md5::{Digest, Md5};
use prost::Message;

use crate::error::{Error, Result};
use crate::schema::AggregatedRecord;

/// Fixed prefix identifying an aggregated container entry.
pub const MAGIC: [u8; 4] = [0xF3, 0x89, 0x9A, 0xC2];

/// Length of the trailing MD5 digest.
pub const CHECKSUM_LEN: usize = 16;

/// Smallest well-formed entry: magic and digest around an empty payload.
pub const MIN_ENTRY_LEN: usize = MAGIC.len() + CHECKSUM_LEN;

/// One logical record recovered from a container entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    pub data: Bytes,
    pub partition_key: String,
}

/// Test whether a physical entry is an aggregated container.
///
/// True iff the entry is at least 4 bytes long and starts with the magic
/// prefix. Looks at nothing past the first 4 bytes.
pub fn is_aggregated(entry: &[u8]) -> bool {
    entry.starts_with(&MAGIC)
}

/// Decode a container entry back into its logical records, in original order.
///
/// Fails with [`Error::MalformedEntry`] when the entry is shorter than the
/// 20-byte envelope or lacks the magic prefix, [`Error::MalformedPayload`]
/// when the payload section does not decode, and [`Error::KeyIndexOutOfRange`]
/// when a record references a missing key-table slot. The trailing digest is
/// not checked here; see [`verify_checksum`].
pub fn extract_records(entry: &[u8]) -> Result<Vec<ExtractedRecord>> {
    if entry.len() < MIN_ENTRY_LEN {
        return Err(Error::MalformedEntry(format!(
            "{} bytes, need at least {}",
            entry.len(),
            MIN_ENTRY_LEN
        )));
    }
    if !is_aggregated(entry) {
        return Err(Error::MalformedEntry("missing magic prefix".to_string()));
    }

    let payload = &entry[MAGIC.len()..entry.len() - CHECKSUM_LEN];
    let container = AggregatedRecord::decode(payload)?;

    let mut records = Vec::with_capacity(container.records.len());
    for record in container.records {
        let key = usize::try_from(record.partition_key_index)
            .ok()
            .and_then(|index| container.partition_key_table.get(index))
            .ok_or(Error::KeyIndexOutOfRange {
                index: record.partition_key_index,
                table_len: container.partition_key_table.len(),
            })?;

        records.push(ExtractedRecord {
            data: record.data,
            partition_key: key.clone(),
        });
    }

    Ok(records)
}

/// Check that an entry is a well-formed container whose trailing digest
/// matches its payload. Returns false for anything else; never fails.
pub fn verify_checksum(entry: &[u8]) -> bool {
    if entry.len() < MIN_ENTRY_LEN || !is_aggregated(entry) {
        return false;
    }

    let payload = &entry[MAGIC.len()..entry.len() - CHECKSUM_LEN];
    let digest = Md5::digest(payload);
    digest.as_slice() == &entry[entry.len() - CHECKSUM_LEN..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with(payload: &[u8], checksum: &[u8; CHECKSUM_LEN]) -> Vec<u8> {
        let mut entry = Vec::with_capacity(MIN_ENTRY_LEN + payload.len());
        entry.extend_from_slice(&MAGIC);
        entry.extend_from_slice(payload);
        entry.extend_from_slice(checksum);
        entry
    }

    #[test]
    fn test_is_aggregated_true_for_magic_prefix() {
        assert!(is_aggregated(&MAGIC));
        assert!(is_aggregated(&[0xF3, 0x89, 0x9A, 0xC2, 0x00, 0x01]));
    }

    #[test]
    fn test_is_aggregated_false_for_short_or_other_prefix() {
        assert!(!is_aggregated(&[]));
        assert!(!is_aggregated(&[0xF3]));
        assert!(!is_aggregated(&[0xF3, 0x89, 0x9A]));
        assert!(!is_aggregated(b"plain record data"));
        assert!(!is_aggregated(&[0xF3, 0x89, 0x9A, 0xC3]));
    }

    #[test]
    fn test_extract_rejects_short_entries() {
        for len in 0..MIN_ENTRY_LEN {
            let entry = vec![0xF3; len];
            let err = extract_records(&entry).unwrap_err();
            assert!(
                matches!(err, Error::MalformedEntry(_)),
                "len {len} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_extract_rejects_missing_magic() {
        let entry = vec![0u8; MIN_ENTRY_LEN + 3];
        let err = extract_records(&entry).unwrap_err();
        assert!(matches!(err, Error::MalformedEntry(_)));
    }

    #[test]
    fn test_extract_rejects_garbage_payload() {
        let entry = entry_with(&[0xFF, 0xFF, 0xFF], &[0u8; CHECKSUM_LEN]);
        let err = extract_records(&entry).unwrap_err();
        assert!(matches!(err, Error::MalformedPayload(_)));
    }

    #[test]
    fn test_extract_rejects_out_of_range_key_index() {
        // One key in the table, a record pointing at slot 5.
        let payload = [
            0x0A, 0x03, b'p', b'k', b'1', // partition_key_table[0] = "pk1"
            0x1A, 0x05, 0x08, 0x05, 0x1A, 0x01, b'a', // records[0], index 5
        ];
        let entry = entry_with(&payload, &[0u8; CHECKSUM_LEN]);

        match extract_records(&entry).unwrap_err() {
            Error::KeyIndexOutOfRange { index, table_len } => {
                assert_eq!(index, 5);
                assert_eq!(table_len, 1);
            }
            other => panic!("expected KeyIndexOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_ignores_bad_checksum() {
        // Baseline decode trusts the payload; the digest is opt-in.
        let payload = [
            0x0A, 0x03, b'p', b'k', b'1', //
            0x1A, 0x05, 0x08, 0x00, 0x1A, 0x01, b'a',
        ];
        let entry = entry_with(&payload, &[0u8; CHECKSUM_LEN]);

        let records = extract_records(&entry).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data, Bytes::from_static(b"a"));
        assert_eq!(records[0].partition_key, "pk1");

        assert!(!verify_checksum(&entry));
    }

    #[test]
    fn test_verify_checksum_accepts_intact_entry() {
        let payload = [0x0A, 0x03, b'p', b'k', b'1'];
        let digest: [u8; CHECKSUM_LEN] = Md5::digest(payload).into();
        let entry = entry_with(&payload, &digest);
        assert!(verify_checksum(&entry));
    }

    #[test]
    fn test_verify_checksum_false_for_short_or_foreign_input() {
        assert!(!verify_checksum(&[]));
        assert!(!verify_checksum(&MAGIC));
        assert!(!verify_checksum(&[0u8; 64]));
    }
}
