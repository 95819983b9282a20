use std::fmt;
use std::net::IpAddr;

// --- Processes ---

#[derive(Clone, Debug, PartialEq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub user: Option<String>,
    pub memory_percent: f32,
    pub cpu_percent: f32,
}

// --- Connections ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub ip: IpAddr,
    pub port: u16,
}

impl Endpoint {
    pub fn new(ip: IpAddr, port: u16) -> Self {
        Self { ip, port }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// Socket state, named the way `netstat` prints it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConnStatus {
    Established,
    SynSent,
    SynRecv,
    FinWait1,
    FinWait2,
    TimeWait,
    Close,
    CloseWait,
    LastAck,
    Listen,
    Closing,
    /// Connectionless sockets have no state.
    None,
}

impl ConnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnStatus::Established => "ESTABLISHED",
            ConnStatus::SynSent => "SYN_SENT",
            ConnStatus::SynRecv => "SYN_RECV",
            ConnStatus::FinWait1 => "FIN_WAIT1",
            ConnStatus::FinWait2 => "FIN_WAIT2",
            ConnStatus::TimeWait => "TIME_WAIT",
            ConnStatus::Close => "CLOSE",
            ConnStatus::CloseWait => "CLOSE_WAIT",
            ConnStatus::LastAck => "LAST_ACK",
            ConnStatus::Listen => "LISTEN",
            ConnStatus::Closing => "CLOSING",
            ConnStatus::None => "NONE",
        }
    }

    /// Parse the state names printed by `lsof` / `netstat`.
    pub fn parse(s: &str) -> Self {
        match s {
            "ESTABLISHED" => ConnStatus::Established,
            "SYN_SENT" => ConnStatus::SynSent,
            "SYN_RECV" | "SYN_RCVD" => ConnStatus::SynRecv,
            "FIN_WAIT1" | "FIN_WAIT_1" => ConnStatus::FinWait1,
            "FIN_WAIT2" | "FIN_WAIT_2" => ConnStatus::FinWait2,
            "TIME_WAIT" => ConnStatus::TimeWait,
            "CLOSE" | "CLOSED" => ConnStatus::Close,
            "CLOSE_WAIT" => ConnStatus::CloseWait,
            "LAST_ACK" => ConnStatus::LastAck,
            "LISTEN" => ConnStatus::Listen,
            "CLOSING" => ConnStatus::Closing,
            _ => ConnStatus::None,
        }
    }
}

impl fmt::Display for ConnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SocketType {
    Stream,
    Datagram,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    /// Stream sockets are TCP; every other socket type is reported as UDP.
    pub fn infer(socket_type: SocketType) -> Self {
        match socket_type {
            SocketType::Stream => Protocol::Tcp,
            SocketType::Datagram => Protocol::Udp,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "TCP"),
            Protocol::Udp => write!(f, "UDP"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionRecord {
    pub local: Endpoint,
    pub remote: Option<Endpoint>,
    pub status: ConnStatus,
    pub pid: Option<u32>,
    pub socket_type: SocketType,
}

impl ConnectionRecord {
    pub fn protocol(&self) -> Protocol {
        Protocol::infer(self.socket_type)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListeningPort {
    pub address: String,
    pub port: u16,
    pub pid: Option<u32>,
    pub protocol: Protocol,
    pub process_name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExternalConnection {
    pub remote_ip: String,
    pub remote_port: u16,
    pub local_port: u16,
    pub status: ConnStatus,
    pub pid: Option<u32>,
    pub process_name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionSummaryRow {
    pub status: ConnStatus,
    pub protocol: Protocol,
    pub count: usize,
}

// --- Filesystem ---

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectoryScan {
    pub count: u64,
    pub total_size: u64,
}

// --- Identity ---

#[derive(Clone, Debug, PartialEq)]
pub struct UserContext {
    pub username: String,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub home: String,
    pub shell: String,
    pub primary_group: String,
    pub groups: Vec<String>,
    pub is_privileged: bool,
    /// `Some(true)` when `sudo -n true` succeeds. Filled in by the inventory collector.
    pub passwordless_sudo: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn endpoint_display() {
        let e = Endpoint::new(IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)), 443);
        assert_eq!(e.to_string(), "10.1.2.3:443");
        let e6 = Endpoint::new(IpAddr::V6(Ipv6Addr::LOCALHOST), 22);
        assert_eq!(e6.to_string(), "::1:22");
    }

    #[test]
    fn status_parse_round_trips_known_names() {
        for s in [
            ConnStatus::Established,
            ConnStatus::Listen,
            ConnStatus::TimeWait,
            ConnStatus::CloseWait,
        ] {
            assert_eq!(ConnStatus::parse(s.as_str()), s);
        }
        assert_eq!(ConnStatus::parse("SYN_RCVD"), ConnStatus::SynRecv);
        assert_eq!(ConnStatus::parse("bogus"), ConnStatus::None);
    }

    #[test]
    fn protocol_heuristic() {
        assert_eq!(Protocol::infer(SocketType::Stream), Protocol::Tcp);
        assert_eq!(Protocol::infer(SocketType::Datagram), Protocol::Udp);
    }
}
