use std::collections::{HashMap, HashSet};
use std::fs;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ConnectionKind, SystemCollector};
use crate::error::CollectError;
use crate::model::{ConnStatus, ConnectionRecord, Endpoint, SocketType};

/// Reads connection tables from procfs and interface details from sysfs.
pub struct LinuxCollector {
    proc_root: PathBuf,
    sys_root: PathBuf,
}

/// One `/proc/net/{tcp,tcp6,udp,udp6}` file.
#[derive(Clone, Copy)]
struct SocketTable {
    file: &'static str,
    socket_type: SocketType,
}

const TCP4: SocketTable = SocketTable { file: "tcp", socket_type: SocketType::Stream };
const TCP6: SocketTable = SocketTable { file: "tcp6", socket_type: SocketType::Stream };
const UDP4: SocketTable = SocketTable { file: "udp", socket_type: SocketType::Datagram };
const UDP6: SocketTable = SocketTable { file: "udp6", socket_type: SocketType::Datagram };

const ALL_TABLES: [SocketTable; 4] = [TCP4, TCP6, UDP4, UDP6];

fn tables_for(kind: ConnectionKind) -> &'static [SocketTable] {
    match kind {
        ConnectionKind::Inet | ConnectionKind::PerProcess => &ALL_TABLES,
        ConnectionKind::Inet4 => &[TCP4, UDP4],
        ConnectionKind::Inet6 => &[TCP6, UDP6],
        ConnectionKind::Tcp => &[TCP4, TCP6],
        ConnectionKind::Udp => &[UDP4, UDP6],
    }
}

/// A parsed procfs socket row before its owner is known.
#[derive(Clone, Debug, PartialEq)]
struct RawSocket {
    local: Endpoint,
    remote: Option<Endpoint>,
    status: ConnStatus,
    inode: u64,
    socket_type: SocketType,
}

impl RawSocket {
    fn into_record(self, pid: Option<u32>) -> ConnectionRecord {
        ConnectionRecord {
            local: self.local,
            remote: self.remote,
            status: self.status,
            pid,
            socket_type: self.socket_type,
        }
    }
}

impl LinuxCollector {
    pub fn new() -> Self {
        Self::with_roots("/proc", "/sys")
    }

    /// Point the collector at alternate procfs / sysfs mounts.
    pub fn with_roots(proc_root: impl Into<PathBuf>, sys_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
            sys_root: sys_root.into(),
        }
    }

    // ── helpers ──────────────────────────────────────────────────────────

    /// Read every table in `tables` under `net_dir`. Missing tables (no IPv6)
    /// are skipped; the call only fails when nothing could be read.
    fn read_tables(net_dir: &Path, tables: &[SocketTable]) -> Result<Vec<RawSocket>, CollectError> {
        let mut sockets = Vec::new();
        let mut any_read = false;
        let mut last_err = None;

        for table in tables {
            let path = net_dir.join(table.file);
            match fs::read_to_string(&path) {
                Ok(content) => {
                    any_read = true;
                    sockets.extend(parse_socket_table(&content, table.socket_type));
                }
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "socket table unreadable");
                    last_err = Some(CollectError::from_io(path.display().to_string(), e));
                }
            }
        }

        match (any_read, last_err) {
            (false, Some(err)) => Err(err),
            _ => Ok(sockets),
        }
    }

    /// Numeric entries of the proc root, i.e. live pids.
    fn pid_dirs(&self) -> Result<Vec<(u32, PathBuf)>, CollectError> {
        let entries = fs::read_dir(&self.proc_root)
            .map_err(|e| CollectError::from_io(self.proc_root.display().to_string(), e))?;
        Ok(entries
            .flatten()
            .filter_map(|entry| {
                let pid = entry.file_name().to_str()?.parse::<u32>().ok()?;
                Some((pid, entry.path()))
            })
            .collect())
    }

    /// Socket inodes held open by one process. Denied or vanished processes
    /// yield an empty set.
    fn socket_inodes(pid_dir: &Path) -> HashSet<u64> {
        let Ok(fds) = fs::read_dir(pid_dir.join("fd")) else {
            return HashSet::new();
        };
        fds.flatten()
            .filter_map(|fd| fs::read_link(fd.path()).ok())
            .filter_map(|target| parse_socket_link(&target.to_string_lossy()))
            .collect()
    }

    /// Scan /proc/[pid]/fd/ to build a mapping of socket inode → pid.
    fn build_socket_pid_map(&self) -> HashMap<u64, u32> {
        let mut map = HashMap::new();
        let Ok(pids) = self.pid_dirs() else {
            return map;
        };
        for (pid, dir) in pids {
            for inode in Self::socket_inodes(&dir) {
                map.insert(inode, pid);
            }
        }
        map
    }

    /// Read each process's own view of the socket tables and keep only the
    /// sockets it owns.
    fn read_per_process(&self) -> Result<Vec<ConnectionRecord>, CollectError> {
        let mut seen: HashSet<u64> = HashSet::new();
        let mut records = Vec::new();

        for (pid, dir) in self.pid_dirs()? {
            let owned = Self::socket_inodes(&dir);
            if owned.is_empty() {
                continue;
            }
            let Ok(sockets) = Self::read_tables(&dir.join("net"), &ALL_TABLES) else {
                continue;
            };
            for socket in sockets {
                if owned.contains(&socket.inode) && seen.insert(socket.inode) {
                    records.push(socket.into_record(Some(pid)));
                }
            }
        }
        Ok(records)
    }
}

impl Default for LinuxCollector {
    fn default() -> Self {
        Self::new()
    }
}

// ── procfs parsing ──────────────────────────────────────────────────────

/// `socket:[12345]` → 12345.
fn parse_socket_link(target: &str) -> Option<u64> {
    target
        .strip_prefix("socket:[")
        .and_then(|s| s.strip_suffix(']'))
        .and_then(|s| s.parse().ok())
}

fn tcp_state(code: u8) -> ConnStatus {
    match code {
        0x01 => ConnStatus::Established,
        0x02 => ConnStatus::SynSent,
        0x03 => ConnStatus::SynRecv,
        0x04 => ConnStatus::FinWait1,
        0x05 => ConnStatus::FinWait2,
        0x06 => ConnStatus::TimeWait,
        0x07 => ConnStatus::Close,
        0x08 => ConnStatus::CloseWait,
        0x09 => ConnStatus::LastAck,
        0x0A => ConnStatus::Listen,
        0x0B => ConnStatus::Closing,
        _ => ConnStatus::None,
    }
}

/// Decode `0100007F:0035`. Addresses are printed as native-endian 32-bit words.
fn parse_hex_endpoint(s: &str) -> Option<Endpoint> {
    let (addr, port) = s.split_once(':')?;
    let port = u16::from_str_radix(port, 16).ok()?;
    if !addr.is_ascii() {
        return None;
    }
    let ip = match addr.len() {
        8 => {
            let word = u32::from_str_radix(addr, 16).ok()?;
            IpAddr::V4(Ipv4Addr::from(word.to_ne_bytes()))
        }
        32 => {
            let mut bytes = [0u8; 16];
            for (i, chunk) in bytes.chunks_mut(4).enumerate() {
                let word = u32::from_str_radix(&addr[i * 8..i * 8 + 8], 16).ok()?;
                chunk.copy_from_slice(&word.to_ne_bytes());
            }
            IpAddr::V6(Ipv6Addr::from(bytes))
        }
        _ => return None,
    };
    Some(Endpoint::new(ip, port))
}

fn parse_socket_line(line: &str, socket_type: SocketType) -> Option<RawSocket> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    // col 1 = local, col 2 = remote, col 3 = state (hex), col 9 = inode
    if parts.len() < 10 {
        return None;
    }
    let local = parse_hex_endpoint(parts[1])?;
    let remote = parse_hex_endpoint(parts[2])?;
    let status = match socket_type {
        SocketType::Stream => tcp_state(u8::from_str_radix(parts[3], 16).ok()?),
        SocketType::Datagram => ConnStatus::None,
    };
    let inode = parts[9].parse::<u64>().unwrap_or(0);
    let remote = if remote.ip.is_unspecified() && remote.port == 0 {
        None
    } else {
        Some(remote)
    };
    Some(RawSocket { local, remote, status, inode, socket_type })
}

fn parse_socket_table(content: &str, socket_type: SocketType) -> Vec<RawSocket> {
    content
        .lines()
        .skip(1)
        .filter_map(|line| parse_socket_line(line, socket_type))
        .collect()
}

/// Parse /proc/net/dev into interface → (rx_drop, tx_drop).
fn parse_net_dev_drops(content: &str) -> HashMap<String, (u64, u64)> {
    let mut result = HashMap::new();
    // First two lines are headers.
    for line in content.lines().skip(2) {
        if let Some((iface, rest)) = line.trim().split_once(':') {
            let cols: Vec<&str> = rest.split_whitespace().collect();
            // rx drop is col 3, tx drop is col 11.
            if cols.len() >= 12 {
                let rx = cols[3].parse::<u64>().unwrap_or(0);
                let tx = cols[11].parse::<u64>().unwrap_or(0);
                result.insert(iface.trim().to_string(), (rx, tx));
            }
        }
    }
    result
}

// ── trait implementation ────────────────────────────────────────────────

impl SystemCollector for LinuxCollector {
    fn connections(&self, kind: ConnectionKind) -> Result<Vec<ConnectionRecord>, CollectError> {
        if kind == ConnectionKind::PerProcess {
            return self.read_per_process();
        }

        let sockets = Self::read_tables(&self.proc_root.join("net"), tables_for(kind))?;
        let owners = self.build_socket_pid_map();
        Ok(sockets
            .into_iter()
            .map(|s| {
                let pid = owners.get(&s.inode).copied();
                s.into_record(pid)
            })
            .collect())
    }

    fn interface_drops(&self) -> HashMap<String, (u64, u64)> {
        fs::read_to_string(self.proc_root.join("net/dev"))
            .map(|content| parse_net_dev_drops(&content))
            .unwrap_or_default()
    }

    /// Virtual interfaces report -1 (or refuse the read) and map to `None`.
    fn link_speed(&self, interface: &str) -> Option<u64> {
        let path = self.sys_root.join("class/net").join(interface).join("speed");
        let raw = fs::read_to_string(path).ok()?;
        let speed = raw.trim().parse::<i64>().ok()?;
        u64::try_from(speed).ok().filter(|s| *s > 0)
    }

    /// cpufreq reports kHz.
    fn max_cpu_frequency(&self) -> Option<u64> {
        let path = self
            .sys_root
            .join("devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq");
        let khz = fs::read_to_string(path).ok()?.trim().parse::<u64>().ok()?;
        Some(khz / 1000).filter(|mhz| *mhz > 0)
    }
}
