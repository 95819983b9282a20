/// One screen reachable from the main menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppView {
    SystemDiagnostics,
    Processes,
    Connections,
    AdvancedNetwork,
    ServerInfo,
    Interfaces,
    Firmware,
    SoftwareInventory,
    DirectoryScan,
}

impl AppView {
    pub const ALL: [AppView; 9] = [
        AppView::SystemDiagnostics,
        AppView::Processes,
        AppView::Connections,
        AppView::AdvancedNetwork,
        AppView::ServerInfo,
        AppView::Interfaces,
        AppView::Firmware,
        AppView::SoftwareInventory,
        AppView::DirectoryScan,
    ];

    /// Menu key for this view.
    pub fn key(&self) -> char {
        match self {
            AppView::SystemDiagnostics => '1',
            AppView::Processes => '2',
            AppView::Connections => '3',
            AppView::AdvancedNetwork => '4',
            AppView::ServerInfo => '5',
            AppView::Interfaces => '6',
            AppView::Firmware => '7',
            AppView::SoftwareInventory => '8',
            AppView::DirectoryScan => '9',
        }
    }

    pub fn from_key(key: char) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.key() == key)
    }

    pub fn title(&self) -> &'static str {
        match self {
            AppView::SystemDiagnostics => "System Diagnostics (Full)",
            AppView::Processes => "Process Reconnaissance",
            AppView::Connections => "Network Connections",
            AppView::AdvancedNetwork => "Advanced Network Reconnaissance",
            AppView::ServerInfo => "Server User & Permissions",
            AppView::Interfaces => "Network Interfaces Detail",
            AppView::Firmware => "Firmware & Hardware Info",
            AppView::SoftwareInventory => "Software Inventory",
            AppView::DirectoryScan => "Directory Scan",
        }
    }

    /// Views backed by fast-changing data re-render on a timer.
    pub fn auto_refresh(&self) -> bool {
        !matches!(
            self,
            AppView::Firmware | AppView::SoftwareInventory | AppView::DirectoryScan
        )
    }
}
