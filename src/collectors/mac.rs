use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use tracing::debug;

use super::tool::ToolRunner;
use super::{ConnectionKind, SystemCollector};
use crate::error::CollectError;
use crate::model::{ConnStatus, ConnectionRecord, Endpoint, SocketType};

/// Reads the connection table through `lsof`, which is what macOS offers
/// without private frameworks.
pub struct MacCollector {
    tools: ToolRunner,
    /// Program and leading arguments; the query flags are appended.
    command: Vec<String>,
}

impl MacCollector {
    pub fn new(tools: ToolRunner) -> Self {
        Self::with_command(tools, ["lsof"])
    }

    pub fn with_command<I, S>(tools: ToolRunner, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tools,
            command: command.into_iter().map(Into::into).collect(),
        }
    }

    fn lsof_args(kind: ConnectionKind) -> Vec<String> {
        let mut args: Vec<String> = match kind {
            ConnectionKind::Inet => vec!["-i".into()],
            ConnectionKind::Inet4 => vec!["-i4".into()],
            ConnectionKind::Inet6 => vec!["-i6".into()],
            ConnectionKind::Tcp => vec!["-iTCP".into()],
            ConnectionKind::Udp => vec!["-iUDP".into()],
            // Only our own processes: the one slice lsof can always read.
            ConnectionKind::PerProcess => vec![
                "-i".into(),
                "-a".into(),
                "-u".into(),
                current_uid().to_string(),
            ],
        };
        args.extend(["-n".into(), "-P".into()]);
        args
    }
}

#[cfg(unix)]
fn current_uid() -> u32 {
    nix::unistd::Uid::current().as_raw()
}

#[cfg(not(unix))]
fn current_uid() -> u32 {
    0
}

/// `[::1]:631`, `127.0.0.1:53`, `*:5353` → endpoint.
fn parse_lsof_endpoint(s: &str, v6: bool) -> Option<Endpoint> {
    let (host, port) = s.rsplit_once(':')?;
    let port = if port == "*" { 0 } else { port.parse().ok()? };
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let ip = if host == "*" {
        if v6 {
            IpAddr::V6(Ipv6Addr::UNSPECIFIED)
        } else {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        }
    } else {
        // Scoped link-local addresses carry a `%en0` suffix.
        let host = host.split('%').next().unwrap_or(host);
        host.parse().ok()?
    };
    Some(Endpoint::new(ip, port))
}

/// One row of `lsof -i -n -P`:
/// `COMMAND PID USER FD TYPE DEVICE SIZE/OFF NODE NAME [(STATE)]`
fn parse_lsof_line(line: &str) -> Option<ConnectionRecord> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 9 {
        return None;
    }
    let pid = parts[1].parse::<u32>().ok();
    let v6 = parts[4] == "IPv6";
    let socket_type = match parts[7] {
        "TCP" => SocketType::Stream,
        _ => SocketType::Datagram,
    };

    let (local, remote) = match parts[8].split_once("->") {
        Some((l, r)) => (parse_lsof_endpoint(l, v6)?, parse_lsof_endpoint(r, v6)),
        None => (parse_lsof_endpoint(parts[8], v6)?, None),
    };

    let status = match (socket_type, parts.get(9)) {
        (SocketType::Stream, Some(state)) => {
            ConnStatus::parse(state.trim_start_matches('(').trim_end_matches(')'))
        }
        _ => ConnStatus::None,
    };

    Some(ConnectionRecord { local, remote, status, pid, socket_type })
}

fn parse_lsof_output(text: &str) -> Vec<ConnectionRecord> {
    text.lines().skip(1).filter_map(parse_lsof_line).collect()
}

impl SystemCollector for MacCollector {
    fn connections(&self, kind: ConnectionKind) -> Result<Vec<ConnectionRecord>, CollectError> {
        let Some((program, lead)) = self.command.split_first() else {
            return Err(CollectError::NotFound("lsof".into()));
        };
        let query = Self::lsof_args(kind);
        let args: Vec<&str> = lead
            .iter()
            .chain(query.iter())
            .map(String::as_str)
            .collect();
        let output = self.tools.output(program, &args)?;

        // lsof exits 1 when nothing matched, which is an empty table, not a failure.
        if !output.status.success() && !output.stdout.is_empty() {
            debug!(kind = %kind, status = ?output.status, "lsof reported partial failure");
        }
        let text = String::from_utf8_lossy(&output.stdout);
        if text.trim().is_empty() && String::from_utf8_lossy(&output.stderr).contains("ermission") {
            return Err(CollectError::AccessDenied(format!("lsof {}", kind)));
        }
        Ok(parse_lsof_output(&text))
    }
}
