//! Firmware, package inventory and sudo checks backed by external tools.

use std::sync::Arc;
use std::time::Duration;

use sysinfo::{CpuRefreshKind, RefreshKind, System};

use crate::collectors::tool::run_tool;
use crate::config::Config;
use crate::error::ToolError;
use crate::model::{FirmwareBlob, FirmwareInfo, PackageInventorySummary};

/// Characters of package listing kept for display.
const SAMPLE_CHARS: usize = 1000;

/// Runs platform helpers on the shared tokio runtime, each under its own
/// deadline. A helper that overruns is killed.
pub struct InventoryCollector {
    rt: Arc<tokio::runtime::Runtime>,
    firmware_timeout: Duration,
    package_timeout: Duration,
    sudo_timeout: Duration,
}

impl InventoryCollector {
    pub fn new(rt: Arc<tokio::runtime::Runtime>, config: &Config) -> Self {
        Self {
            rt,
            firmware_timeout: Duration::from_secs(config.firmware_timeout_secs),
            package_timeout: Duration::from_secs(config.package_timeout_secs),
            sudo_timeout: Duration::from_secs(config.sudo_timeout_secs),
        }
    }

    pub fn firmware(&self) -> FirmwareInfo {
        let source: Option<(&str, &[&str])> = if cfg!(target_os = "linux") {
            Some(("dmidecode", &["-t", "bios"][..]))
        } else if cfg!(target_os = "macos") {
            Some(("system_profiler", &["SPHardwareDataType"][..]))
        } else {
            None
        };

        let blob = source.map(|(program, args)| {
            match self
                .rt
                .block_on(run_tool(program, args, self.firmware_timeout))
            {
                Ok(out) if program == "dmidecode" => FirmwareBlob::Bios(out),
                Ok(out) => FirmwareBlob::Hardware(out),
                Err(e) => {
                    tracing::debug!(error = %e, "firmware source unavailable");
                    FirmwareBlob::Unavailable
                }
            }
        });

        FirmwareInfo {
            platform: platform_name().to_string(),
            machine: std::env::consts::ARCH.to_string(),
            processor: processor_name(),
            blob,
        }
    }

    /// First package manager that answers wins.
    pub fn software_inventory(&self) -> Option<PackageInventorySummary> {
        let managers: &[(&str, &[&str])] = if cfg!(target_os = "linux") {
            &[("dpkg", &["-l"][..]), ("rpm", &["-qa"][..]), ("pacman", &["-Q"][..])]
        } else if cfg!(target_os = "macos") {
            &[("brew", &["list"][..])]
        } else {
            &[]
        };

        for (program, args) in managers {
            match self
                .rt
                .block_on(run_tool(program, args, self.package_timeout))
            {
                Ok(out) => return Some(summarize_listing(program, &out)),
                Err(e) => tracing::debug!(error = %e, "package manager query failed"),
            }
        }
        None
    }

    /// `Some(true)` when `sudo -n true` succeeds, `None` when sudo is not
    /// installed or could not be run at all.
    pub fn sudo_without_password(&self) -> Option<bool> {
        match self
            .rt
            .block_on(run_tool("sudo", &["-n", "true"], self.sudo_timeout))
        {
            Ok(_) => Some(true),
            Err(ToolError::Failed(..)) | Err(ToolError::Timeout(..)) => Some(false),
            Err(e) => {
                tracing::debug!(error = %e, "sudo check unavailable");
                None
            }
        }
    }
}

fn summarize_listing(manager: &str, listing: &str) -> PackageInventorySummary {
    PackageInventorySummary {
        manager: manager.to_string(),
        count: listing.trim().lines().count(),
        sample: listing.chars().take(SAMPLE_CHARS).collect(),
    }
}

fn platform_name() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        other => other,
    }
}

fn processor_name() -> String {
    let sys = System::new_with_specifics(
        RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()),
    );
    sys.cpus()
        .first()
        .map(|c| c.brand().trim().to_string())
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| std::env::consts::ARCH.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_count_ignores_trailing_newlines() {
        let summary = summarize_listing("rpm", "bash-5.2\ncoreutils-9.4\nzlib-1.3\n\n");
        assert_eq!(summary.manager, "rpm");
        assert_eq!(summary.count, 3);
    }

    #[test]
    fn listing_sample_is_capped() {
        let listing = "x".repeat(5000);
        assert_eq!(summarize_listing("brew", &listing).sample.len(), SAMPLE_CHARS);
    }
}
