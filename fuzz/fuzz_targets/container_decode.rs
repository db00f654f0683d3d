#![no_main]

use inflow_core::{extract_records, is_aggregated, verify_checksum, Aggregator};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary bytes to the container decode path.
    // All malformed inputs must come back as errors, never panics:
    // - Missing or partial magic prefix
    // - Entries shorter than the 20-byte envelope
    // - Garbage protobuf payloads
    // - Records pointing at missing key-table slots
    // - Corrupted trailing digests
    let _ = is_aggregated(data);
    let _ = verify_checksum(data);

    if let Ok(records) = extract_records(data) {
        for record in &records {
            let _ = record.data.len();
            let _ = record.partition_key.len();
        }

        // Whatever decoded must survive a rebuild through the producer side.
        let mut agg = Aggregator::new();
        for record in records {
            agg.put(record.data, &record.partition_key);
        }
        let entry = agg.drain().unwrap();
        assert!(is_aggregated(&entry.data));
        assert!(verify_checksum(&entry.data));
    }
});
