//! System data collection and processing.

mod inventory;
mod metrics;
pub mod network;
pub mod process;
mod recon;

use std::collections::HashMap;

use sysinfo::{Disks, Networks, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind, Users};

use crate::collectors::tool::ToolRunner;
use crate::collectors::{self, SystemCollector};
use crate::config::Config;

pub use inventory::InventoryCollector;
pub use recon::scan_directory;

/// Host identity shown in the dashboard header.
#[derive(Clone, Debug, PartialEq)]
pub struct HostInfo {
    pub hostname: String,
    pub os_name: String,
    pub kernel: String,
}

/// Owns the long-lived OS handles every view samples from.
///
/// sysinfo needs two refreshes to report CPU usage, so the same `System`
/// is kept for the life of the program.
pub struct Monitor {
    sys: System,
    disks: Disks,
    networks: Networks,
    users: Users,
    collector: Box<dyn SystemCollector>,
    tools: ToolRunner,
    processes_primed: bool,
    pub top_processes: usize,
    pub max_connections: usize,
    pub max_interfaces: usize,
}

impl Monitor {
    pub fn new(config: &Config, tools: ToolRunner) -> Self {
        let collector = collectors::platform_collector(tools.clone());
        Self::with_collector(config, tools, collector)
    }

    pub fn with_collector(
        config: &Config,
        tools: ToolRunner,
        collector: Box<dyn SystemCollector>,
    ) -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();

        Self {
            sys,
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
            users: Users::new_with_refreshed_list(),
            collector,
            tools,
            processes_primed: false,
            top_processes: config.top_processes,
            max_connections: config.max_connections,
            max_interfaces: config.max_interfaces,
        }
    }

    pub fn host_info(&self) -> HostInfo {
        let na = || "N/A".to_string();
        HostInfo {
            hostname: System::host_name().unwrap_or_else(na),
            os_name: System::name().unwrap_or_else(na),
            kernel: System::kernel_version().unwrap_or_else(na),
        }
    }

    fn refresh_processes(&mut self) {
        let kind = ProcessRefreshKind::nothing()
            .with_cpu()
            .with_memory()
            .with_user(UpdateKind::OnlyIfNotSet);
        self.sys.refresh_memory();
        self.sys
            .refresh_processes_specifics(ProcessesToUpdate::All, true, kind);

        // Per-process CPU is a delta between two refreshes; the very first
        // call would report zero everywhere without a second sample.
        if !self.processes_primed {
            std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
            self.sys
                .refresh_processes_specifics(ProcessesToUpdate::All, true, kind);
            self.processes_primed = true;
        }
    }

    /// pid → process name, rebuilt from a fresh process refresh on each call.
    fn process_names(&mut self) -> HashMap<u32, String> {
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );
        self.sys
            .processes()
            .values()
            .map(|p| (p.pid().as_u32(), p.name().to_string_lossy().into_owned()))
            .collect()
    }
}
