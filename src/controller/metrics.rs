//! CPU, memory, disk, interface and boot metrics.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Local};
use sysinfo::{MINIMUM_CPU_UPDATE_INTERVAL, Networks, System};

use super::Monitor;
use crate::model::{
    AddressFamily, BootInfo, CpuSnapshot, DiskSnapshot, InterfaceAddress, InterfaceIo,
    MemorySnapshot, NetworkInterface, percent_of,
};

/// Flags and addresses of one link as the OS reports them.
#[derive(Debug, Default)]
struct LinkInfo {
    is_up: bool,
    addresses: Vec<InterfaceAddress>,
}

impl Monitor {
    /// Blocks for one sampling interval so usage reflects current load.
    pub fn cpu(&mut self) -> CpuSnapshot {
        self.sys.refresh_cpu_usage();
        std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
        self.sys.refresh_cpu_all();

        let cpus = self.sys.cpus();
        CpuSnapshot {
            physical_cores: System::physical_core_count(),
            logical_cores: cpus.len(),
            usage_per_core: cpus.iter().map(|c| c.cpu_usage()).collect(),
            usage_total: self.sys.global_cpu_usage(),
            frequency_current: cpus.first().map(|c| c.frequency()).filter(|f| *f > 0),
            frequency_max: self.collector.max_cpu_frequency(),
            brand: cpus
                .first()
                .map(|c| c.brand().trim().to_string())
                .unwrap_or_default(),
        }
    }

    pub fn memory(&mut self) -> MemorySnapshot {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        let used = self.sys.used_memory();
        let available_raw = self.sys.available_memory();
        // On macOS, available_memory() can return 0; fall back to total - used
        let available = if available_raw > 0 {
            available_raw
        } else {
            total.saturating_sub(used)
        };
        let swap_total = self.sys.total_swap();
        let swap_used = self.sys.used_swap();

        MemorySnapshot {
            total,
            used,
            available,
            percent: percent_of(used, total),
            swap_total,
            swap_used,
            swap_percent: percent_of(swap_used, swap_total),
        }
    }

    /// Mounted filesystems. Ones that report no capacity (pseudo or
    /// unreadable mounts) are left out.
    pub fn disks(&mut self) -> Vec<DiskSnapshot> {
        self.disks.refresh(true);

        let mut disks: Vec<DiskSnapshot> = self
            .disks
            .list()
            .iter()
            .filter(|d| d.total_space() > 0)
            .map(|d| {
                let total = d.total_space();
                let free = d.available_space();
                let used = total.saturating_sub(free);
                DiskSnapshot {
                    device: d.name().to_string_lossy().into_owned(),
                    mountpoint: d.mount_point().to_string_lossy().into_owned(),
                    fs_type: d.file_system().to_string_lossy().into_owned(),
                    total,
                    used,
                    free,
                    percent: percent_of(used, total),
                }
            })
            .collect();
        disks.sort_by(|a, b| a.mountpoint.cmp(&b.mountpoint));
        disks
    }

    /// Every interface the OS knows about, sorted by name.
    pub fn network_interfaces(&mut self) -> Vec<NetworkInterface> {
        self.networks.refresh(true);
        let drops = self.collector.interface_drops();

        let mut links = link_table(&self.networks);
        for name in self.networks.list().keys() {
            links.entry(name.clone()).or_default();
        }

        links
            .into_iter()
            .map(|(name, mut link)| {
                let data = self.networks.list().get(&name);

                if let Some(mac) = data.map(|d| d.mac_address()).filter(|m| !m.is_unspecified()) {
                    link.addresses.push(InterfaceAddress {
                        family: AddressFamily::Link,
                        address: mac.to_string(),
                        netmask: None,
                    });
                }

                let io = data.map(|d| {
                    let (dropin, dropout) = match drops.get(&name) {
                        Some((i, o)) => (Some(*i), Some(*o)),
                        None => (None, None),
                    };
                    InterfaceIo {
                        bytes_sent: d.total_transmitted(),
                        bytes_recv: d.total_received(),
                        packets_sent: d.total_packets_transmitted(),
                        packets_recv: d.total_packets_received(),
                        errin: d.total_errors_on_received(),
                        errout: d.total_errors_on_transmitted(),
                        dropin,
                        dropout,
                    }
                });

                NetworkInterface {
                    speed: self.collector.link_speed(&name),
                    mtu: data.map(|d| d.mtu()).filter(|m| *m > 0),
                    is_up: link.is_up,
                    addresses: link.addresses,
                    io,
                    name,
                }
            })
            .collect()
    }

    pub fn boot(&self) -> BootInfo {
        let boot_time = DateTime::from_timestamp(System::boot_time() as i64, 0)
            .map(|t| t.with_timezone(&Local))
            .unwrap_or_else(Local::now);
        BootInfo {
            boot_time,
            uptime: Duration::from_secs(System::uptime()),
        }
    }
}

#[cfg(unix)]
fn link_table(_networks: &Networks) -> BTreeMap<String, LinkInfo> {
    use std::net::IpAddr;

    use nix::ifaddrs::getifaddrs;
    use nix::net::if_::InterfaceFlags;

    let mut table: BTreeMap<String, LinkInfo> = BTreeMap::new();
    let addrs = match getifaddrs() {
        Ok(addrs) => addrs,
        Err(e) => {
            tracing::warn!(error = %e, "getifaddrs failed");
            return table;
        }
    };

    for ifa in addrs {
        let link = table.entry(ifa.interface_name.clone()).or_default();
        link.is_up |= ifa.flags.contains(InterfaceFlags::IFF_UP);

        let Some(addr) = ifa.address.as_ref() else {
            continue;
        };
        let netmask = ifa.netmask.as_ref();
        if let Some(v4) = addr.as_sockaddr_in() {
            let mask = netmask
                .and_then(|m| m.as_sockaddr_in())
                .map(|m| IpAddr::V4(m.ip()));
            link.addresses.push(InterfaceAddress::ip(IpAddr::V4(v4.ip()), mask));
        } else if let Some(v6) = addr.as_sockaddr_in6() {
            let mask = netmask
                .and_then(|m| m.as_sockaddr_in6())
                .map(|m| IpAddr::V6(m.ip()));
            link.addresses.push(InterfaceAddress::ip(IpAddr::V6(v6.ip()), mask));
        }
    }
    table
}

/// Without getifaddrs, sysinfo's address list is the best we have. Link
/// state is inferred from having any address at all.
#[cfg(not(unix))]
fn link_table(networks: &Networks) -> BTreeMap<String, LinkInfo> {
    networks
        .list()
        .iter()
        .map(|(name, data)| {
            let addresses: Vec<InterfaceAddress> = data
                .ip_networks()
                .iter()
                .map(|n| InterfaceAddress::ip(n.addr, None))
                .collect();
            let link = LinkInfo {
                is_up: !addresses.is_empty(),
                addresses,
            };
            (name.clone(), link)
        })
        .collect()
}
