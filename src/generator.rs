//! Counter engine behind the generation entry points.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use chrono::DateTime;
use sha2::{Digest, Sha256};

use crate::host::HostIdentity;
use crate::Uuid;

/// Counter step applied in variable mode. Large and odd, so consecutive counter values share
/// no common high-order prefix and the low nibble never repeats between neighbors.
const INCREMENT: i32 = 198_491_317;

/// Represents the process-wide generator state: a shared counter and the active counter mode.
///
/// The counter is advanced with an atomic read-modify-write, so concurrent generate calls
/// never observe the same value. The mode flag is a separate atomic; a toggle racing a
/// generate call may produce that one identifier under either mode.
#[derive(Debug)]
pub(crate) struct Engine {
    counter: AtomicI32,
    sequential: AtomicBool,
}

impl Engine {
    /// Creates an engine in variable mode with the given counter seed.
    pub(crate) fn new(seed: i32) -> Self {
        Self {
            counter: AtomicI32::new(seed),
            sequential: AtomicBool::new(false),
        }
    }

    /// Generates a new identifier from the given host identity and `unix_ts_ms`.
    pub(crate) fn generate_at(&self, host: &HostIdentity, unix_ts_ms: u64) -> Uuid {
        Uuid::from_fields(
            self.next_counter_bytes(),
            host.process_id,
            &host.hardware_addr,
            unix_ts_ms,
        )
    }

    /// Advances the counter and returns its four bytes arranged for the active mode.
    fn next_counter_bytes(&self) -> [u8; 4] {
        if self.sequential.load(Ordering::Relaxed) {
            let count = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
            count.to_be_bytes()
        } else {
            let count = self
                .counter
                .fetch_add(INCREMENT, Ordering::Relaxed)
                .wrapping_add(INCREMENT);
            // bytes little-endian with the nibbles of each byte swapped, i.e. the eight
            // nibbles of the counter fully reversed
            (count as u32).to_le_bytes().map(|b| b.rotate_left(4))
        }
    }

    /// Switches to sequential mode. The first transition out of variable mode re-seeds the
    /// counter from the ten-minute UTC bucket containing `unix_ts_ms`; re-entry while already
    /// sequential is a no-op.
    pub(crate) fn set_sequential_at(&self, unix_ts_ms: u64) {
        if !self.sequential.swap(true, Ordering::Relaxed) {
            self.counter
                .store(bucket_seed(unix_ts_ms), Ordering::Relaxed);
        }
    }

    /// Switches back to the default variable mode, leaving the counter where it is.
    pub(crate) fn set_variable(&self) {
        self.sequential.store(false, Ordering::Relaxed);
    }
}

/// Derives a counter seed from the ten-minute UTC bucket containing `unix_ts_ms`, so
/// uncoordinated processes entering sequential mode around the same time start from the same
/// counter value.
fn bucket_seed(unix_ts_ms: u64) -> i32 {
    let utc = DateTime::from_timestamp_millis(unix_ts_ms as i64).expect("timestamp out of range");
    let bucket = utc.format("%Y%m%d%H%M").to_string();
    let digest = Sha256::digest(&bucket.as_bytes()[..11]);
    i32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

#[cfg(test)]
mod tests {
    use super::{bucket_seed, Engine, INCREMENT};
    use crate::host::HostIdentity;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicBool, AtomicI32};

    const TS: u64 = 0x0123_4567_89ab;

    fn host() -> HostIdentity {
        HostIdentity {
            process_id: 0x1234,
            hardware_addr: [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff],
        }
    }

    /// Arranges variable-mode counter bytes with nibbles reversed
    #[test]
    fn arranges_variable_mode_counter_bytes_with_nibbles_reversed() {
        assert_eq!(INCREMENT, 0x0bd4_bcb5);

        let engine = Engine::new(0);
        // first advance lands on INCREMENT = 0x0bd4bcb5, nibble-reversed "5bcb4db0"
        let e = engine.generate_at(&host(), TS);
        assert_eq!(e.to_string(), "5bcb4db0-1234-bcdd-eeff-0123456789ab");
        // second advance lands on 2 * INCREMENT = 0x17a9796a, nibble-reversed "a6979a71"
        let e = engine.generate_at(&host(), TS);
        assert_eq!(e.to_string(), "a6979a71-1234-bcdd-eeff-0123456789ab");
    }

    /// Arranges sequential-mode counter bytes big-endian
    #[test]
    fn arranges_sequential_mode_counter_bytes_big_endian() {
        let engine = Engine {
            counter: AtomicI32::new(41),
            sequential: AtomicBool::new(true),
        };
        let first = engine.generate_at(&host(), TS).to_string();
        assert_eq!(first, "0000002a-1234-bcdd-eeff-0123456789ab");
        let second = engine.generate_at(&host(), TS).to_string();
        assert!(second.starts_with("0000002b-"));
    }

    /// Wraps the sequential counter around the 32-bit boundary
    #[test]
    fn wraps_the_sequential_counter_around_the_32_bit_boundary() {
        let engine = Engine {
            counter: AtomicI32::new(-1),
            sequential: AtomicBool::new(true),
        };
        let text = engine.generate_at(&host(), TS).to_string();
        assert!(text.starts_with("00000000-"));

        let engine = Engine {
            counter: AtomicI32::new(i32::MAX),
            sequential: AtomicBool::new(true),
        };
        let text = engine.generate_at(&host(), TS).to_string();
        assert!(text.starts_with("80000000-"));
    }

    /// Increments by exactly one per identifier in sequential mode
    #[test]
    fn increments_by_exactly_one_per_identifier_in_sequential_mode() {
        let engine = Engine::new(7);
        engine.set_sequential_at(TS);
        let counter_field =
            |text: String| u32::from_str_radix(&text[..8], 16).expect("counter field");
        let mut prev = counter_field(engine.generate_at(&host(), TS).to_string());
        for _ in 0..1_000 {
            let curr = counter_field(engine.generate_at(&host(), TS).to_string());
            assert_eq!(curr, prev.wrapping_add(1));
            prev = curr;
        }
    }

    /// Disperses leading hex digits in variable mode
    #[test]
    fn disperses_leading_hex_digits_in_variable_mode() {
        let engine = Engine::new(rand::random());
        let mut prev = engine.generate_at(&host(), TS).to_string();
        for _ in 0..1_000 {
            let curr = engine.generate_at(&host(), TS).to_string();
            assert_ne!(prev.as_bytes()[0], curr.as_bytes()[0]);
            prev = curr;
        }
    }

    /// Re-seeds once per transition into sequential mode
    #[test]
    fn reseeds_once_per_transition_into_sequential_mode() {
        let a = Engine::new(111);
        let b = Engine::new(-222_222);
        a.set_sequential_at(TS);
        b.set_sequential_at(TS);
        assert_eq!(
            a.generate_at(&host(), TS).to_string(),
            b.generate_at(&host(), TS).to_string()
        );

        // re-entry keeps the running counter instead of seeding again
        a.set_sequential_at(TS);
        let first = a.generate_at(&host(), TS).to_string();
        let second = a.generate_at(&host(), TS).to_string();
        assert_ne!(first[..8], second[..8]);

        // a fresh variable-to-sequential transition seeds again
        a.set_variable();
        a.generate_at(&host(), TS);
        a.set_sequential_at(TS);
        b.set_variable();
        b.generate_at(&host(), TS);
        b.set_sequential_at(TS);
        assert_eq!(
            a.generate_at(&host(), TS).to_string(),
            b.generate_at(&host(), TS).to_string()
        );
    }

    /// Derives equal seeds within a ten-minute bucket
    #[test]
    fn derives_equal_seeds_within_a_ten_minute_bucket() {
        let base = Utc.with_ymd_and_hms(2026, 8, 21, 14, 30, 0).unwrap();
        let ts = base.timestamp_millis() as u64;
        assert_eq!(bucket_seed(ts), bucket_seed(ts + 599_999));
        assert_ne!(bucket_seed(ts), bucket_seed(ts + 600_000));
        assert_ne!(bucket_seed(ts), bucket_seed(ts - 1));
    }

    /// Keeps host and timestamp fields stable across modes
    #[test]
    fn keeps_host_and_timestamp_fields_stable_across_modes() {
        let engine = Engine::new(42);
        let variable = engine.generate_at(&host(), TS);
        engine.set_sequential_at(TS);
        let sequential = engine.generate_at(&host(), TS);
        assert_eq!(variable.as_bytes()[4..], sequential.as_bytes()[4..]);
        assert_eq!(sequential.process_id(), Some(0x1234));
        assert_eq!(
            sequential.mac_fragment(),
            Some([0, 0, 0x0c, 0xdd, 0xee, 0xff])
        );
    }
}
