use std::collections::HashMap;
use std::fmt;

use crate::error::CollectError;
use crate::model::ConnectionRecord;

pub mod linux;
pub mod mac;
pub mod tool;

use tool::ToolRunner;

/// Which slice of the inet connection table to ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionKind {
    /// IPv4 and IPv6, TCP and UDP.
    Inet,
    Inet4,
    Inet6,
    Tcp,
    Udp,
    /// Walk processes one at a time and read the sockets each one owns.
    PerProcess,
}

impl ConnectionKind {
    /// Order in which narrower queries are attempted when a broad one is
    /// denied or comes back empty.
    pub const FALLBACK_ORDER: [ConnectionKind; 6] = [
        ConnectionKind::Inet,
        ConnectionKind::Inet4,
        ConnectionKind::Inet6,
        ConnectionKind::Tcp,
        ConnectionKind::Udp,
        ConnectionKind::PerProcess,
    ];
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionKind::Inet => "inet",
            ConnectionKind::Inet4 => "inet4",
            ConnectionKind::Inet6 => "inet6",
            ConnectionKind::Tcp => "tcp",
            ConnectionKind::Udp => "udp",
            ConnectionKind::PerProcess => "per-process",
        };
        f.write_str(s)
    }
}

/// Trait for OS-specific system data collection that sysinfo does not cover.
/// Implementations (MacCollector, LinuxCollector) handle the low-level details.
pub trait SystemCollector: Send {
    /// Enumerate inet sockets of the requested kind.
    fn connections(&self, kind: ConnectionKind) -> Result<Vec<ConnectionRecord>, CollectError>;

    /// Per-interface (drops in, drops out). Empty where the OS does not expose them.
    fn interface_drops(&self) -> HashMap<String, (u64, u64)> {
        HashMap::new()
    }

    /// Negotiated link speed in Mbps.
    fn link_speed(&self, _interface: &str) -> Option<u64> {
        None
    }

    /// Highest frequency the CPU may run at, in MHz.
    fn max_cpu_frequency(&self) -> Option<u64> {
        None
    }
}

/// The collector for the platform we were built for. Helpers it shells out
/// to run through `tools`.
pub fn platform_collector(tools: ToolRunner) -> Box<dyn SystemCollector> {
    if cfg!(target_os = "macos") {
        Box::new(mac::MacCollector::new(tools))
    } else {
        Box::new(linux::LinuxCollector::new())
    }
}
