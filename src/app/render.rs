use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use chrono::Local;
use crossterm::style::Color;

use crate::controller::{InventoryCollector, Monitor, scan_directory};
use crate::layout::{Layout, SectionId};
use crate::model::AppView;
use crate::view::{self, Block, Renderer};

const RETURN_HINT: &str = "Press any key to return to menu";
const NO_INTERFACES: &str = "No network interfaces found";

/// Everything one frame needs: the collectors and the output they are
/// drawn to.
pub struct Dashboard<W: Write> {
    monitor: Monitor,
    inventory: InventoryCollector,
    renderer: Renderer<W>,
    refresh: Duration,
}

impl<W: Write> Dashboard<W> {
    pub fn new(
        monitor: Monitor,
        inventory: InventoryCollector,
        renderer: Renderer<W>,
        refresh: Duration,
    ) -> Self {
        Self {
            monitor,
            inventory,
            renderer,
            refresh,
        }
    }

    pub fn into_renderer(self) -> Renderer<W> {
        self.renderer
    }

    pub fn draw_menu(&mut self) -> io::Result<()> {
        self.begin(None)?;
        self.renderer.block(&Block::Panel(view::menu_panel()))?;
        self.renderer.line("", Color::White)?;
        self.renderer.prompt("Select option: ", "")?;
        self.renderer.flush()
    }

    /// Collect every section of `view`, then draw them in one frame so a
    /// slow collector never leaves a half-cleared screen.
    pub fn draw_view(&mut self, view: AppView) -> io::Result<()> {
        let blocks: Vec<Block> = Layout::for_view(view)
            .sections
            .into_iter()
            .flat_map(|id| self.section(id))
            .collect();

        let refresh = view.auto_refresh().then_some(self.refresh);
        self.begin(refresh)?;
        self.renderer.blocks(&blocks)?;
        if refresh.is_none() {
            self.footer()?;
        }
        self.renderer.hide_cursor()?;
        self.renderer.flush()
    }

    /// Path prompt of the directory scan view, redrawn on every keystroke.
    pub fn draw_scan_prompt(&mut self, input: &str) -> io::Result<()> {
        self.begin(None)?;
        self.renderer.prompt("Enter directory path [.]: ", input)?;
        self.renderer.flush()
    }

    pub fn draw_scan(&mut self, path: &Path) -> io::Result<()> {
        let scan = scan_directory(path);
        if scan.is_none() {
            tracing::debug!(path = %path.display(), "directory scan rejected");
        }
        let (text, color) = view::scan_summary(scan.as_ref());

        self.begin(None)?;
        self.renderer.line(&format!("Scanning: {}", path.display()), Color::Cyan)?;
        self.renderer.line(&text, color)?;
        self.footer()?;
        self.renderer.hide_cursor()?;
        self.renderer.flush()
    }

    pub fn draw_error(&mut self, message: &str) -> io::Result<()> {
        self.begin(None)?;
        self.renderer.line(&format!("Error: {}", message), Color::Red)?;
        self.footer()?;
        self.renderer.flush()
    }

    fn begin(&mut self, refresh: Option<Duration>) -> io::Result<()> {
        let time = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let header = view::header_panel(&self.monitor.host_info(), &time, refresh);
        self.renderer.begin_frame()?;
        self.renderer.block(&Block::Panel(header))?;
        self.renderer.line("", Color::White)
    }

    fn footer(&mut self) -> io::Result<()> {
        self.renderer.line("", Color::White)?;
        self.renderer.line(RETURN_HINT, Color::DarkGrey)
    }

    fn section(&mut self, id: SectionId) -> Vec<Block> {
        let m = &mut self.monitor;
        match id {
            SectionId::Cpu => {
                let cpu = m.cpu();
                vec![
                    Block::Table(view::cpu_table(&cpu)),
                    Block::Table(view::per_core_table(&cpu)),
                ]
            }
            SectionId::Memory => vec![Block::Table(view::memory_table(&m.memory()))],
            SectionId::Disks => vec![Block::Table(view::disk_table(&m.disks()))],
            SectionId::Boot => vec![Block::Table(view::boot_table(&m.boot()))],
            SectionId::Processes => vec![Block::Table(view::process_table(
                &m.processes(),
                m.top_processes,
            ))],
            SectionId::ActiveConnections => vec![Block::Table(view::connections_table(
                &m.active_connections(),
                m.max_connections,
            ))],
            SectionId::ConnectionSummary => {
                vec![Block::Table(view::summary_table(&m.connection_summary()))]
            }
            SectionId::NetworkIo => {
                vec![Block::Table(view::io_stats_table(&m.network_interfaces()))]
            }
            SectionId::ExternalConnections => {
                vec![Block::Table(view::external_table(&m.external_connections()))]
            }
            SectionId::ServerUser => match m.user_context() {
                Ok(mut user) => {
                    user.passwordless_sudo = self.inventory.sudo_without_password();
                    vec![Block::Table(view::user_table(&user))]
                }
                Err(e) => {
                    tracing::warn!(error = %e, "user context unavailable");
                    vec![Block::Line(format!("Unable to read user info: {}", e), Color::Red)]
                }
            },
            SectionId::ListeningPorts => {
                vec![Block::Table(view::listening_table(&m.listening_ports()))]
            }
            SectionId::Interfaces => {
                let tables = view::interface_tables(&m.network_interfaces(), m.max_interfaces);
                if tables.is_empty() {
                    vec![Block::Line(NO_INTERFACES.to_string(), Color::Yellow)]
                } else {
                    tables.into_iter().map(Block::Table).collect()
                }
            }
            SectionId::Firmware => {
                let fw = self.inventory.firmware();
                let mut blocks = vec![Block::Table(view::firmware_table(&fw))];
                blocks.extend(view::firmware_panel(&fw).map(Block::Panel));
                blocks
            }
            SectionId::SoftwareInventory => match self.inventory.software_inventory() {
                Some(summary) => vec![Block::Table(view::inventory_table(&summary))],
                None => vec![Block::Line(
                    view::NO_PACKAGE_MANAGER.to_string(),
                    Color::Yellow,
                )],
            },
        }
    }
}
