//! A generator and parser for locality-based vB UUIDs
//!
//! ```rust
//! use locality_uuid::uuidb;
//!
//! let uuid = uuidb();
//! println!("{}", uuid); // e.g. "a2c67bc0-99b4-b6e2-ff41-01a04c2f6e89"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//! ```
//!
//! Each identifier records where and when it was made: a process-wide counter, the process id,
//! a fragment of the host's hardware address, and the wall-clock time in milliseconds.
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            counter                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          process_id           |  ver  |     mac_fragment      |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          mac_fragment         |          unix_ts_ms           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 32-bit `counter` field holds the shared counter advanced atomically on every call.
//!   It is seeded with a random value at process start. In the default variable mode the
//!   counter grows by a large odd increment and its bytes are stored with all eight nibbles
//!   reversed, so consecutive identifiers disperse across the whole leading-character range.
//!   In sequential mode the counter grows by exactly one and is stored big-endian, so
//!   consecutive identifiers sort in generation order.
//! - The 16-bit `process_id` field is the operating-system process id modulo 65536.
//! - The 4-bit `ver` field is set at `1011` (the hexadecimal character `b`).
//! - The 28-bit `mac_fragment` field carries the low three and a half bytes of the hardware
//!   address of the first active network interface, or zeros when none is found.
//! - The 48-bit `unix_ts_ms` field is dedicated to the Unix timestamp in milliseconds.
//!
//! Uniqueness is best effort: within one process the atomic counter never hands the same value
//! to two calls, and the process id, hardware fragment, and timestamp keep identifiers from
//! unrelated origins apart without any coordination channel.
//!
//! # Counter modes
//!
//! [`use_sequential_ids()`] and [`use_variable_ids()`] switch the process-wide counter mode.
//! The first switch into sequential mode re-seeds the counter from a hash of the current
//! ten-minute UTC bucket, so uncoordinated processes entering sequential mode around the same
//! time emit interleaving, roughly chronological streams:
//!
//! ```rust
//! use locality_uuid::{use_sequential_ids, uuidb};
//!
//! use_sequential_ids();
//! let a = uuidb();
//! let b = uuidb();
//! assert!(a < b); // counter fields increase by one
//! ```
//!
//! # Other features
//!
//! Identifiers of foreign versions parse and re-serialize losslessly; their embedded fields
//! read as `None`:
//!
//! ```rust
//! use locality_uuid::Uuid;
//!
//! let e: Uuid = "20be0ffc-314a-7d53-7a50-013a65ca76d2".parse()?;
//! assert_eq!(e.version(), '7');
//! assert_eq!(e.process_id(), None);
//! # Ok::<(), locality_uuid::ParseError>(())
//! ```
//!
//! Optional integrations with `serde` and the `uuid` crate are available through the
//! eponymous Cargo features.

mod id;
pub use id::{FromSliceError, ParseError, Uuid};

mod generator;

mod global_gen;
pub use global_gen::{use_sequential_ids, use_variable_ids, uuidb};

mod host;
