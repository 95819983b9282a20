//! Process, connection, user and filesystem reconnaissance.

use std::fs;
use std::path::Path;

use super::{Monitor, network, process};
use crate::error::CollectError;
use crate::model::{
    ConnectionRecord, ConnectionSummaryRow, DirectoryScan, ExternalConnection, ListeningPort,
    ProcessRecord, UserContext,
};

impl Monitor {
    /// Top processes by memory share.
    pub fn processes(&mut self) -> Vec<ProcessRecord> {
        self.refresh_processes();
        let records = process::build_records(&self.sys, &self.users);
        process::top_by_memory(records, self.top_processes)
    }

    /// The full inet table, narrowing the query until one succeeds.
    pub fn connections(&self) -> Vec<ConnectionRecord> {
        network::connections_with_fallback(self.collector.as_ref())
    }

    pub fn active_connections(&self) -> Vec<ConnectionRecord> {
        network::active(&self.connections())
    }

    pub fn listening_ports(&mut self) -> Vec<ListeningPort> {
        let conns = self.connections();
        let names = self.process_names();
        network::listening(&conns, &names)
    }

    pub fn external_connections(&mut self) -> Vec<ExternalConnection> {
        let conns = self.connections();
        let names = self.process_names();
        network::external(&conns, &names)
    }

    pub fn connection_summary(&self) -> Vec<ConnectionSummaryRow> {
        network::summarize(&self.connections())
    }

    /// Identity of the account this process runs as. `passwordless_sudo`
    /// is left unset here; the inventory collector fills it in.
    pub fn user_context(&self) -> Result<UserContext, CollectError> {
        user::current(&self.tools)
    }
}

/// Count and total size of every entry below `root`, recursively.
///
/// Symlinks are counted but never followed. Entries that vanish or cannot
/// be read mid-walk are skipped. Returns `None` when `root` itself is not a
/// readable directory.
pub fn scan_directory(root: &Path) -> Option<DirectoryScan> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(path = %root.display(), error = %e, "directory scan refused");
            return None;
        }
    };

    let mut scan = DirectoryScan::default();
    let mut pending = vec![entries];
    while let Some(entries) = pending.pop() {
        for entry in entries.flatten() {
            let Ok(meta) = entry.path().symlink_metadata() else {
                continue;
            };
            scan.count += 1;
            if meta.is_dir() {
                if let Ok(children) = fs::read_dir(entry.path()) {
                    pending.push(children);
                }
            } else {
                scan.total_size += meta.len();
            }
        }
    }
    Some(scan)
}

#[cfg(unix)]
mod user {
    use std::env;

    use nix::unistd::{Gid, Group, Uid, User};

    use crate::collectors::tool::ToolRunner;
    use crate::error::CollectError;
    use crate::model::UserContext;

    pub fn current(tools: &ToolRunner) -> Result<UserContext, CollectError> {
        let uid = Uid::effective();
        let gid = Gid::effective();
        let account = User::from_uid(uid).map_err(|e| {
            CollectError::from_io("passwd database", std::io::Error::from(e))
        })?;

        let username = account
            .as_ref()
            .map(|u| u.name.clone())
            .or_else(|| env::var("USER").ok())
            .unwrap_or_else(|| uid.to_string());
        let home = account
            .as_ref()
            .map(|u| u.dir.display().to_string())
            .or_else(|| env::var("HOME").ok())
            .unwrap_or_else(|| "N/A".to_string());
        let shell = account
            .as_ref()
            .map(|u| u.shell.display().to_string())
            .or_else(|| env::var("SHELL").ok())
            .unwrap_or_else(|| "N/A".to_string());

        Ok(UserContext {
            primary_group: group_name(gid).unwrap_or_else(|| "N/A".to_string()),
            groups: supplementary_groups(&username, tools),
            uid: Some(uid.as_raw()),
            gid: Some(gid.as_raw()),
            is_privileged: uid.is_root(),
            passwordless_sudo: None,
            username,
            home,
            shell,
        })
    }

    fn group_name(gid: Gid) -> Option<String> {
        Group::from_gid(gid).ok().flatten().map(|g| g.name)
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    fn supplementary_groups(_username: &str, _tools: &ToolRunner) -> Vec<String> {
        let gids = match nix::unistd::getgroups() {
            Ok(gids) => gids,
            Err(e) => {
                tracing::debug!(error = %e, "getgroups failed");
                return Vec::new();
            }
        };
        let mut names: Vec<String> = gids.into_iter().filter_map(group_name).collect();
        names.sort();
        names.dedup();
        names
    }

    /// getgroups is capped or unavailable on the BSD family; `id` knows better.
    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    fn supplementary_groups(username: &str, tools: &ToolRunner) -> Vec<String> {
        match tools.run("id", &["-Gn", username]) {
            Ok(out) => out.split_whitespace().map(str::to_string).collect(),
            Err(e) => {
                tracing::debug!(error = %e, "id -Gn failed");
                Vec::new()
            }
        }
    }
}

#[cfg(not(unix))]
mod user {
    use std::env;

    use crate::collectors::tool::ToolRunner;
    use crate::error::CollectError;
    use crate::model::UserContext;

    pub fn current(_tools: &ToolRunner) -> Result<UserContext, CollectError> {
        let username = env::var("USERNAME")
            .or_else(|_| env::var("USER"))
            .unwrap_or_else(|_| "unknown".to_string());
        Ok(UserContext {
            username,
            uid: None,
            gid: None,
            home: env::var("USERPROFILE").unwrap_or_else(|_| "N/A".to_string()),
            shell: env::var("COMSPEC").unwrap_or_else(|_| "N/A".to_string()),
            primary_group: "N/A".to_string(),
            groups: Vec::new(),
            is_privileged: false,
            passwordless_sudo: None,
        })
    }
}
