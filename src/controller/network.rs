//! Connection-table analysis: active/listening filters, external peers, status summary.

use std::collections::HashMap;
use std::net::IpAddr;

use crate::collectors::{ConnectionKind, SystemCollector};
use crate::model::{
    ConnStatus, ConnectionRecord, ConnectionSummaryRow, ExternalConnection, ListeningPort,
    Protocol,
};

const UNKNOWN_PROCESS: &str = "Unknown";

/// Walk the fallback chain until some query yields a non-empty table.
///
/// Every failure is logged and skipped. If nothing works the result is empty.
pub fn connections_with_fallback(collector: &dyn SystemCollector) -> Vec<ConnectionRecord> {
    for kind in ConnectionKind::FALLBACK_ORDER {
        match collector.connections(kind) {
            Ok(conns) if !conns.is_empty() => {
                tracing::debug!(kind = %kind, count = conns.len(), "connection table read");
                return conns;
            }
            Ok(_) => tracing::debug!(kind = %kind, "connection query returned nothing"),
            Err(e) => tracing::debug!(kind = %kind, error = %e, "connection query failed"),
        }
    }
    tracing::warn!("no connection query succeeded");
    Vec::new()
}

/// Connections in ESTABLISHED state.
pub fn active(conns: &[ConnectionRecord]) -> Vec<ConnectionRecord> {
    conns
        .iter()
        .filter(|c| c.status == ConnStatus::Established)
        .cloned()
        .collect()
}

/// Sockets in LISTEN state, with owning process names from `names`.
pub fn listening(conns: &[ConnectionRecord], names: &HashMap<u32, String>) -> Vec<ListeningPort> {
    conns
        .iter()
        .filter(|c| c.status == ConnStatus::Listen)
        .map(|c| ListeningPort {
            address: c.local.ip.to_string(),
            port: c.local.port,
            pid: c.pid,
            protocol: c.protocol(),
            process_name: process_name(c.pid, names),
        })
        .collect()
}

/// Not loopback (`127.0.0.0/8`, `::1`) and not IPv6 link-local (`fe80::/10`).
///
/// The rule is applied to the address as written, so an IPv4-mapped
/// `::ffff:127.0.0.1` counts as external. Link-local covers the whole /10,
/// so `febf::1` is local even though it is not written with a `fe80` prefix.
pub fn is_external(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.octets()[0] != 127,
        IpAddr::V6(v6) => !(v6.is_loopback() || (v6.segments()[0] & 0xffc0) == 0xfe80),
    }
}

/// Connections whose peer is not on this host.
pub fn external(conns: &[ConnectionRecord], names: &HashMap<u32, String>) -> Vec<ExternalConnection> {
    conns
        .iter()
        .filter_map(|c| {
            let remote = c.remote?;
            is_external(&remote.ip).then(|| ExternalConnection {
                remote_ip: remote.ip.to_string(),
                remote_port: remote.port,
                local_port: c.local.port,
                status: c.status,
                pid: c.pid,
                process_name: process_name(c.pid, names),
            })
        })
        .collect()
}

/// Count connections per (status, protocol), largest group first.
///
/// Equal counts are ordered by status then protocol so the table does not
/// shuffle between refreshes.
pub fn summarize(conns: &[ConnectionRecord]) -> Vec<ConnectionSummaryRow> {
    let mut counts: HashMap<(ConnStatus, Protocol), usize> = HashMap::new();
    for c in conns {
        *counts.entry((c.status, c.protocol())).or_insert(0) += 1;
    }

    let mut rows: Vec<ConnectionSummaryRow> = counts
        .into_iter()
        .map(|((status, protocol), count)| ConnectionSummaryRow { status, protocol, count })
        .collect();
    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(a.status.cmp(&b.status))
            .then(a.protocol.cmp(&b.protocol))
    });
    rows
}

fn process_name(pid: Option<u32>, names: &HashMap<u32, String>) -> String {
    pid.and_then(|p| names.get(&p))
        .cloned()
        .unwrap_or_else(|| UNKNOWN_PROCESS.to_string())
}
