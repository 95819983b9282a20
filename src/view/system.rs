//! CPU, memory, disk, boot and interface tables.

use crossterm::style::Color;

use super::shared::{format_bytes, format_number, format_uptime, or_na, progress_bar};
use super::widgets::Table;
use crate::model::{BootInfo, CpuSnapshot, DiskSnapshot, MemorySnapshot, NetworkInterface};

/// Interfaces listed in the I/O statistics table.
const MAX_IO_ROWS: usize = 10;

pub fn cpu_table(cpu: &CpuSnapshot) -> Table {
    let mut t = Table::new("CPU Diagnostics")
        .column("Metric", Color::Cyan)
        .column("Value", Color::Green);
    t.row(["Model", if cpu.brand.is_empty() { "N/A" } else { cpu.brand.as_str() }]);
    t.row(["Physical Cores".to_string(), or_na(cpu.physical_cores)]);
    t.row(["Logical Cores".to_string(), cpu.logical_cores.to_string()]);
    t.row([
        "Total Usage".to_string(),
        format!(
            "{} {:.1}%",
            progress_bar(cpu.usage_total as f64, 20),
            cpu.usage_total
        ),
    ]);
    t.row([
        "Current Frequency".to_string(),
        or_na(cpu.frequency_current.map(|f| format!("{} MHz", f))),
    ]);
    t.row([
        "Max Frequency".to_string(),
        or_na(cpu.frequency_max.map(|f| format!("{} MHz", f))),
    ]);
    t
}

pub fn per_core_table(cpu: &CpuSnapshot) -> Table {
    let mut t = Table::new("Per-Core Usage")
        .column("Core", Color::Cyan)
        .column("Usage", Color::Green)
        .column("%", Color::Magenta)
        .empty_message("N/A");
    for (i, usage) in cpu.usage_per_core.iter().enumerate() {
        t.row([
            i.to_string(),
            progress_bar(*usage as f64, 20),
            format!("{:.1}%", usage),
        ]);
    }
    t
}

pub fn memory_table(mem: &MemorySnapshot) -> Table {
    let mut t = Table::new("Memory Diagnostics")
        .column("Type", Color::Cyan)
        .column("Total", Color::Yellow)
        .column("Used", Color::Red)
        .column("Available", Color::Green)
        .column("Usage %", Color::Magenta);
    t.row([
        "RAM".to_string(),
        format_bytes(mem.total),
        format_bytes(mem.used),
        format_bytes(mem.available),
        format!("{:.1}%", mem.percent),
    ]);
    t.row([
        "Swap".to_string(),
        format_bytes(mem.swap_total),
        format_bytes(mem.swap_used),
        format_bytes(mem.swap_free()),
        format!("{:.1}%", mem.swap_percent),
    ]);
    t
}

pub fn disk_table(disks: &[DiskSnapshot]) -> Table {
    let mut t = Table::new("Disk Diagnostics")
        .column("Device", Color::Cyan)
        .column("Mount", Color::Yellow)
        .column("FS Type", Color::Blue)
        .column("Total", Color::Green)
        .column("Used", Color::Red)
        .column("Free", Color::Green)
        .column("Usage %", Color::Magenta)
        .empty_message("No readable partitions");
    for d in disks {
        t.row([
            d.device.clone(),
            d.mountpoint.clone(),
            d.fs_type.clone(),
            format_bytes(d.total),
            format_bytes(d.used),
            format_bytes(d.free),
            format!("{} {:.1}%", progress_bar(d.percent, 10), d.percent),
        ]);
    }
    t
}

pub fn boot_table(boot: &BootInfo) -> Table {
    let mut t = Table::new("Boot")
        .column("Metric", Color::Cyan)
        .column("Value", Color::Green);
    t.row([
        "Boot Time".to_string(),
        boot.boot_time.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]);
    t.row(["Uptime".to_string(), format_uptime(boot.uptime)]);
    t
}

/// Lifetime counters of the first interfaces that expose them.
pub fn io_stats_table(interfaces: &[NetworkInterface]) -> Table {
    let mut t = Table::new("Network I/O Statistics")
        .column("Interface", Color::Cyan)
        .column("Bytes Sent", Color::Yellow)
        .column("Bytes Recv", Color::Green)
        .column("Packets Sent", Color::Blue)
        .column("Packets Recv", Color::Magenta)
        .column("Errors In", Color::Red)
        .column("Errors Out", Color::Red)
        .column("Drops In", Color::DarkYellow)
        .column("Drops Out", Color::DarkYellow)
        .empty_message("N/A");
    for iface in interfaces.iter().filter(|i| i.io.is_some()).take(MAX_IO_ROWS) {
        let Some(io) = &iface.io else { continue };
        t.row([
            iface.name.clone(),
            format_bytes(io.bytes_sent),
            format_bytes(io.bytes_recv),
            format_number(io.packets_sent),
            format_number(io.packets_recv),
            format_number(io.errin),
            format_number(io.errout),
            or_na(io.dropin.map(format_number)),
            or_na(io.dropout.map(format_number)),
        ]);
    }
    t
}

/// One property table per interface.
pub fn interface_tables(interfaces: &[NetworkInterface], limit: usize) -> Vec<Table> {
    interfaces.iter().take(limit).map(interface_table).collect()
}

fn interface_table(iface: &NetworkInterface) -> Table {
    let mut t = Table::new(format!("Interface: {}", iface.name))
        .column("Property", Color::Cyan)
        .column("Value", Color::Green);
    t.row(["Status", if iface.is_up { "Up" } else { "Down" }]);
    t.row([
        "Speed".to_string(),
        or_na(iface.speed.map(|s| format!("{} Mbps", s))),
    ]);
    t.row(["MTU".to_string(), or_na(iface.mtu)]);

    if let Some(io) = &iface.io {
        t.row(["Bytes Sent".to_string(), format_bytes(io.bytes_sent)]);
        t.row(["Bytes Received".to_string(), format_bytes(io.bytes_recv)]);
        t.row(["Packets Sent".to_string(), format_number(io.packets_sent)]);
        t.row(["Packets Received".to_string(), format_number(io.packets_recv)]);
    }

    for addr in &iface.addresses {
        t.row([format!("{} Address", addr.family), addr.address.clone()]);
        if let Some(mask) = &addr.netmask {
            t.row([format!("{} Netmask", addr.family), mask.clone()]);
        }
    }
    t
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use super::*;
    use crate::model::{InterfaceAddress, InterfaceIo};

    fn cpu() -> CpuSnapshot {
        CpuSnapshot {
            physical_cores: None,
            logical_cores: 4,
            usage_per_core: vec![10.0, 20.0, 30.0, 40.0],
            usage_total: 25.0,
            frequency_current: None,
            frequency_max: Some(3600),
            brand: String::new(),
        }
    }

    fn iface(name: &str, io: bool) -> NetworkInterface {
        NetworkInterface {
            name: name.to_string(),
            is_up: true,
            speed: None,
            mtu: Some(1500),
            addresses: vec![InterfaceAddress::ip(
                IpAddr::V4(Ipv4Addr::new(192, 168, 1, 5)),
                Some(IpAddr::V4(Ipv4Addr::new(255, 255, 255, 0))),
            )],
            io: io.then(|| InterfaceIo {
                bytes_sent: 1536,
                bytes_recv: 2048,
                packets_sent: 1234,
                packets_recv: 5,
                errin: 0,
                errout: 0,
                dropin: None,
                dropout: Some(3),
            }),
        }
    }

    fn value<'a>(t: &'a Table, key: &str) -> &'a str {
        t.rows()
            .iter()
            .find(|r| r[0] == key)
            .map(|r| r[1].as_str())
            .unwrap()
    }

    #[test]
    fn cpu_absent_values_are_na() {
        let t = cpu_table(&cpu());
        assert_eq!(value(&t, "Physical Cores"), "N/A");
        assert_eq!(value(&t, "Current Frequency"), "N/A");
        assert_eq!(value(&t, "Max Frequency"), "3600 MHz");
        assert_eq!(value(&t, "Model"), "N/A");
        assert!(value(&t, "Total Usage").ends_with("25.0%"));
    }

    #[test]
    fn per_core_rows() {
        assert_eq!(per_core_table(&cpu()).rows().len(), 4);
    }

    #[test]
    fn memory_rows_use_byte_format() {
        let mem = MemorySnapshot {
            total: 1536,
            used: 1024,
            available: 512,
            percent: 66.666,
            swap_total: 0,
            swap_used: 0,
            swap_percent: 0.0,
        };
        let t = memory_table(&mem);
        assert_eq!(t.rows()[0][1], "1.50 KB");
        assert_eq!(t.rows()[0][4], "66.7%");
        assert_eq!(t.rows()[1][3], "0.00 B");
    }

    #[test]
    fn io_stats_skip_interfaces_without_counters() {
        let t = io_stats_table(&[iface("eth0", true), iface("tun0", false)]);
        assert_eq!(t.rows().len(), 1);
        let row = &t.rows()[0];
        assert_eq!(row[0], "eth0");
        assert_eq!(row[1], "1.50 KB");
        assert_eq!(row[3], "1,234");
        assert_eq!(row[7], "N/A");
        assert_eq!(row[8], "3");
    }

    #[test]
    fn interface_table_properties() {
        let tables = interface_tables(&[iface("eth0", true), iface("lo", false)], 5);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].title(), "Interface: eth0");
        assert_eq!(value(&tables[0], "Speed"), "N/A");
        assert_eq!(value(&tables[0], "MTU"), "1500");
        assert_eq!(value(&tables[0], "IPv4 Address"), "192.168.1.5");
        assert_eq!(value(&tables[0], "IPv4 Netmask"), "255.255.255.0");
        assert!(tables[1].rows().iter().all(|r| r[0] != "Bytes Sent"));
    }

    #[test]
    fn interface_limit() {
        let many: Vec<NetworkInterface> = (0..8).map(|i| iface(&format!("eth{}", i), false)).collect();
        assert_eq!(interface_tables(&many, 5).len(), 5);
    }
}
