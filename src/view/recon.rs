//! Process, connection, port and user tables.

use crossterm::style::Color;

use super::shared::or_na;
use super::widgets::Table;
use crate::model::{
    ConnectionRecord, ConnectionSummaryRow, ExternalConnection, ListeningPort, ProcessRecord,
    UserContext,
};

const MAX_LISTENING_ROWS: usize = 20;
const MAX_EXTERNAL_ROWS: usize = 15;
const MAX_GROUPS_SHOWN: usize = 5;

/// `limit` is the configured row cap; the title names it even when fewer
/// processes are visible.
pub fn process_table(procs: &[ProcessRecord], limit: usize) -> Table {
    let mut t = Table::new(format!("Process Reconnaissance (Top {} by Memory)", limit))
        .column("PID", Color::Cyan)
        .column("Name", Color::Yellow)
        .column("User", Color::Blue)
        .column("Memory %", Color::Red)
        .column("CPU %", Color::Green)
        .empty_message("No processes visible");
    for p in procs.iter().take(limit) {
        t.row([
            p.pid.to_string(),
            p.name.chars().take(30).collect(),
            p.user
                .as_deref()
                .map(|u| u.chars().take(15).collect())
                .unwrap_or_else(|| "N/A".to_string()),
            format!("{:.2}%", p.memory_percent),
            format!("{:.2}%", p.cpu_percent),
        ]);
    }
    t
}

pub fn connections_table(conns: &[ConnectionRecord], limit: usize) -> Table {
    let mut t = Table::new("Network Reconnaissance (Active Connections)")
        .column("Local Address", Color::Cyan)
        .column("Remote Address", Color::Yellow)
        .column("Status", Color::Green)
        .column("PID", Color::Magenta)
        .empty_message("No connections found");
    for c in conns.iter().take(limit) {
        t.row([
            c.local.to_string(),
            or_na(c.remote),
            c.status.to_string(),
            or_na(c.pid),
        ]);
    }
    if conns.len() > limit {
        t = t.caption(format!("showing {} of {}", limit, conns.len()));
    }
    t
}

pub fn summary_table(rows: &[ConnectionSummaryRow]) -> Table {
    let mut t = Table::new("Connection Summary by Status")
        .column("Status", Color::Cyan)
        .column("Count", Color::Green)
        .column("Protocol", Color::Yellow)
        .empty_message("No connections found");
    for r in rows {
        t.row([r.status.to_string(), r.count.to_string(), r.protocol.to_string()]);
    }
    t
}

pub fn listening_table(ports: &[ListeningPort]) -> Table {
    let mut t = Table::new("Listening Ports")
        .column("Address", Color::Cyan)
        .column("Port", Color::Yellow)
        .column("PID", Color::Green)
        .column("Protocol", Color::Magenta)
        .column("Process Name", Color::Blue)
        .empty_message("No listening ports found");
    for p in ports.iter().take(MAX_LISTENING_ROWS) {
        t.row([
            p.address.clone(),
            p.port.to_string(),
            or_na(p.pid),
            p.protocol.to_string(),
            p.process_name.chars().take(25).collect(),
        ]);
    }
    t
}

pub fn external_table(conns: &[ExternalConnection]) -> Table {
    let mut t = Table::new("External Connections")
        .column("Remote IP", Color::Cyan)
        .column("Remote Port", Color::Yellow)
        .column("Local Port", Color::Blue)
        .column("Status", Color::Green)
        .column("Process", Color::Magenta)
        .empty_message("No external connections");
    for c in conns.iter().take(MAX_EXTERNAL_ROWS) {
        t.row([
            c.remote_ip.clone(),
            c.remote_port.to_string(),
            c.local_port.to_string(),
            c.status.to_string(),
            c.process_name.chars().take(20).collect(),
        ]);
    }
    t
}

pub fn user_table(user: &UserContext) -> Table {
    let yes_no = |b: bool| if b { "Yes" } else { "No" }.to_string();
    let mut t = Table::new("Server User & Permissions Info")
        .column("Property", Color::Cyan)
        .column("Value", Color::Green);
    t.row(["Username".to_string(), user.username.clone()]);
    t.row(["UID".to_string(), or_na(user.uid)]);
    t.row(["GID".to_string(), or_na(user.gid)]);
    t.row(["Home Directory".to_string(), user.home.clone()]);
    t.row(["Shell".to_string(), user.shell.clone()]);
    t.row(["Primary Group".to_string(), user.primary_group.clone()]);
    t.row(["Is Root".to_string(), yes_no(user.is_privileged)]);
    t.row([
        "Passwordless Sudo".to_string(),
        or_na(user.passwordless_sudo.map(yes_no)),
    ]);
    let groups: Vec<&str> = user
        .groups
        .iter()
        .take(MAX_GROUPS_SHOWN)
        .map(String::as_str)
        .collect();
    t.row(["Groups".to_string(), groups.join(", ")]);
    t
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use super::*;
    use crate::model::{ConnStatus, Endpoint, Protocol, SocketType};

    fn record(port: u16, remote: bool) -> ConnectionRecord {
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));
        ConnectionRecord {
            local: Endpoint::new(ip, port),
            remote: remote.then(|| Endpoint::new(IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)), 443)),
            status: ConnStatus::Established,
            pid: None,
            socket_type: SocketType::Stream,
        }
    }

    #[test]
    fn empty_sets_show_placeholders() {
        let cases = [
            (connections_table(&[], 20), "No connections found"),
            (listening_table(&[]), "No listening ports found"),
            (external_table(&[]), "No external connections"),
        ];
        for (table, msg) in cases {
            assert!(table.rows().is_empty());
            assert_eq!(table.display_rows()[0][0], msg);
        }
    }

    #[test]
    fn connection_rows_and_cap() {
        let conns: Vec<ConnectionRecord> = (0..25).map(|p| record(40000 + p, p % 2 == 0)).collect();
        let t = connections_table(&conns, 20);
        assert_eq!(t.rows().len(), 20);
        assert_eq!(t.rows()[0][0], "10.0.0.2:40000");
        assert_eq!(t.rows()[0][1], "1.1.1.1:443");
        assert_eq!(t.rows()[1][1], "N/A");
        assert_eq!(t.rows()[0][2], "ESTABLISHED");
        assert_eq!(t.rows()[0][3], "N/A");
    }

    #[test]
    fn process_rows_are_clipped() {
        let p = ProcessRecord {
            pid: 42,
            name: "n".repeat(40),
            user: None,
            memory_percent: 12.345,
            cpu_percent: 0.5,
        };
        let t = process_table(&[p], 20);
        assert_eq!(t.title(), "Process Reconnaissance (Top 20 by Memory)");
        assert_eq!(t.rows().len(), 1);
        assert_eq!(t.rows()[0][1].chars().count(), 30);
        assert_eq!(t.rows()[0][2], "N/A");
        assert_eq!(t.rows()[0][3], "12.35%");
    }

    #[test]
    fn summary_rows() {
        let t = summary_table(&[ConnectionSummaryRow {
            status: ConnStatus::Listen,
            protocol: Protocol::Tcp,
            count: 7,
        }]);
        assert_eq!(t.rows()[0], vec!["LISTEN", "7", "TCP"]);
    }

    #[test]
    fn user_rows() {
        let user = UserContext {
            username: "alice".into(),
            uid: Some(1000),
            gid: Some(1000),
            home: "/home/alice".into(),
            shell: "/bin/zsh".into(),
            primary_group: "alice".into(),
            groups: (0..8).map(|i| format!("g{}", i)).collect(),
            is_privileged: false,
            passwordless_sudo: None,
        };
        let t = user_table(&user);
        let get = |k: &str| t.rows().iter().find(|r| r[0] == k).unwrap()[1].clone();
        assert_eq!(get("UID"), "1000");
        assert_eq!(get("Is Root"), "No");
        assert_eq!(get("Passwordless Sudo"), "N/A");
        assert_eq!(get("Groups"), "g0, g1, g2, g3, g4");
    }
}
