//! Host identity queried once at process start.

use sysinfo::Networks;

/// Process id and hardware address embedded into every generated identifier.
#[derive(Debug)]
pub(crate) struct HostIdentity {
    pub(crate) process_id: u16,
    pub(crate) hardware_addr: [u8; 6],
}

impl HostIdentity {
    /// Queries the operating system for the current process id (reduced modulo 65536) and the
    /// first usable hardware address.
    pub(crate) fn detect() -> Self {
        Self {
            process_id: std::process::id() as u16,
            hardware_addr: first_hardware_addr(),
        }
    }
}

/// Returns the hardware address of the first network interface reporting a non-zero one, or
/// all zeros when no interface qualifies. Loopback interfaces report zero addresses and are
/// skipped.
fn first_hardware_addr() -> [u8; 6] {
    let networks = Networks::new_with_refreshed_list();
    for (_, data) in &networks {
        let addr = data.mac_address();
        if !addr.is_unspecified() {
            return addr.0;
        }
    }
    [0; 6]
}
