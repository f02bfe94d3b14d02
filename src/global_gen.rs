//! Process-wide generator state and entry point functions.

use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::generator::Engine;
use crate::host::HostIdentity;
use crate::Uuid;

/// Returns the process-wide engine, creating one with a random counter seed if none exists.
fn global_engine() -> &'static Engine {
    static ENGINE: OnceLock<Engine> = OnceLock::new();
    ENGINE.get_or_init(|| Engine::new(rand::random()))
}

/// Returns the host identity, querying the operating system on first use.
fn host_identity() -> &'static HostIdentity {
    static HOST: OnceLock<HostIdentity> = OnceLock::new();
    HOST.get_or_init(HostIdentity::detect)
}

fn unix_ts_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock may have gone backwards")
        .as_millis() as u64
}

/// Generates a vB UUID object.
///
/// This function employs a process-wide engine, combining a shared counter advanced atomically
/// on every call, the host identity queried once at startup, and the current timestamp.
///
/// # Examples
///
/// ```rust
/// let uuid = locality_uuid::uuidb();
/// println!("{}", uuid); // e.g., "a2c67bc0-99b4-b6e2-ff41-01a04c2f6e89"
/// println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
///
/// let uuid_string: String = locality_uuid::uuidb().to_string();
/// ```
pub fn uuidb() -> Uuid {
    global_engine().generate_at(host_identity(), unix_ts_ms())
}

/// Switches the process-wide engine to sequential mode, in which the counter fields of
/// consecutive identifiers increase by exactly one.
///
/// The first transition out of variable mode re-seeds the counter from the current ten-minute
/// UTC bucket, so uncoordinated processes entering sequential mode around the same time
/// produce interleaving identifier streams. Calling this again while already in sequential
/// mode has no effect.
///
/// # Examples
///
/// ```rust
/// use locality_uuid::{use_sequential_ids, uuidb};
///
/// use_sequential_ids();
/// let pair = (uuidb(), uuidb());
/// assert!(pair.0 < pair.1);
/// ```
pub fn use_sequential_ids() {
    global_engine().set_sequential_at(unix_ts_ms());
}

/// Switches the process-wide engine back to the default variable mode, in which counter bytes
/// are placed with their nibbles reversed so that consecutive identifiers spread across the
/// full leading-character range.
pub fn use_variable_ids() {
    global_engine().set_variable();
}
