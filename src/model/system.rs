use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use chrono::{DateTime, Local};

// --- CPU ---

#[derive(Clone, Debug, Default)]
pub struct CpuSnapshot {
    pub physical_cores: Option<usize>,
    pub logical_cores: usize,
    pub usage_per_core: Vec<f32>,
    pub usage_total: f32,
    /// MHz. `None` when the platform does not report a frequency.
    pub frequency_current: Option<u64>,
    pub frequency_max: Option<u64>,
    pub brand: String,
}

// --- Memory ---

#[derive(Clone, Debug, Default)]
pub struct MemorySnapshot {
    pub total: u64,
    pub used: u64,
    pub available: u64,
    pub percent: f64,
    pub swap_total: u64,
    pub swap_used: u64,
    pub swap_percent: f64,
}

impl MemorySnapshot {
    pub fn swap_free(&self) -> u64 {
        self.swap_total.saturating_sub(self.swap_used)
    }
}

/// `part / whole` as a percentage, 0 when `whole` is 0.
pub fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

// --- Disk ---

#[derive(Clone, Debug)]
pub struct DiskSnapshot {
    pub device: String,
    pub mountpoint: String,
    pub fs_type: String,
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f64,
}

// --- Network interfaces ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressFamily {
    Inet,
    Inet6,
    Link,
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Inet => write!(f, "IPv4"),
            AddressFamily::Inet6 => write!(f, "IPv6"),
            AddressFamily::Link => write!(f, "MAC"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceAddress {
    pub family: AddressFamily,
    pub address: String,
    pub netmask: Option<String>,
}

impl InterfaceAddress {
    pub fn ip(ip: IpAddr, netmask: Option<IpAddr>) -> Self {
        let family = match ip {
            IpAddr::V4(_) => AddressFamily::Inet,
            IpAddr::V6(_) => AddressFamily::Inet6,
        };
        Self {
            family,
            address: ip.to_string(),
            netmask: netmask.map(|m| m.to_string()),
        }
    }
}

/// Lifetime I/O counters of one interface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InterfaceIo {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
    pub errin: u64,
    pub errout: u64,
    /// Only Linux exposes drop counters.
    pub dropin: Option<u64>,
    pub dropout: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct NetworkInterface {
    pub name: String,
    pub is_up: bool,
    /// Mbps.
    pub speed: Option<u64>,
    pub mtu: Option<u64>,
    pub addresses: Vec<InterfaceAddress>,
    pub io: Option<InterfaceIo>,
}

// --- Boot ---

#[derive(Clone, Debug)]
pub struct BootInfo {
    pub boot_time: DateTime<Local>,
    pub uptime: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn percent_of_zero_whole() {
        assert_eq!(percent_of(10, 0), 0.0);
        assert!((percent_of(1, 4) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn swap_free_never_underflows() {
        let m = MemorySnapshot {
            swap_total: 10,
            swap_used: 20,
            ..Default::default()
        };
        assert_eq!(m.swap_free(), 0);
    }

    #[test]
    fn interface_address_family_from_ip() {
        let v4 = InterfaceAddress::ip(
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)),
            Some(IpAddr::V4(Ipv4Addr::new(255, 255, 255, 0))),
        );
        assert_eq!(v4.family, AddressFamily::Inet);
        assert_eq!(v4.netmask.as_deref(), Some("255.255.255.0"));

        let v6 = InterfaceAddress::ip(IpAddr::V6(Ipv6Addr::LOCALHOST), None);
        assert_eq!(v6.family, AddressFamily::Inet6);
        assert_eq!(v6.address, "::1");
        assert_eq!(v6.family.to_string(), "IPv6");
    }
}
