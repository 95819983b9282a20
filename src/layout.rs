use crate::model::AppView;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SectionId {
    Cpu,
    Memory,
    Disks,
    Boot,
    Processes,
    ActiveConnections,
    ConnectionSummary,
    NetworkIo,
    ExternalConnections,
    ServerUser,
    ListeningPorts,
    Interfaces,
    Firmware,
    SoftwareInventory,
}

/// Ordered sections making up one view.
pub struct Layout {
    pub sections: Vec<SectionId>,
}

impl Layout {
    /// The directory scan view has no fixed sections; its body depends on
    /// the path the user enters.
    pub fn for_view(view: AppView) -> Self {
        let sections = match view {
            AppView::SystemDiagnostics => vec![
                SectionId::Cpu,
                SectionId::Memory,
                SectionId::Disks,
                SectionId::Boot,
            ],
            AppView::Processes => vec![SectionId::Processes],
            AppView::Connections => vec![SectionId::ActiveConnections],
            AppView::AdvancedNetwork => vec![
                SectionId::ConnectionSummary,
                SectionId::NetworkIo,
                SectionId::ExternalConnections,
            ],
            AppView::ServerInfo => vec![SectionId::ServerUser, SectionId::ListeningPorts],
            AppView::Interfaces => vec![SectionId::Interfaces],
            AppView::Firmware => vec![SectionId::Firmware],
            AppView::SoftwareInventory => vec![SectionId::SoftwareInventory],
            AppView::DirectoryScan => Vec::new(),
        };
        Self { sections }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_view_sections_in_order() {
        let layout = Layout::for_view(AppView::SystemDiagnostics);
        assert_eq!(
            layout.sections,
            vec![SectionId::Cpu, SectionId::Memory, SectionId::Disks, SectionId::Boot]
        );
    }

    #[test]
    fn server_view_includes_listening_ports() {
        let layout = Layout::for_view(AppView::ServerInfo);
        assert_eq!(
            layout.sections,
            vec![SectionId::ServerUser, SectionId::ListeningPorts]
        );
    }

    #[test]
    fn every_view_but_scan_has_sections() {
        for view in AppView::ALL {
            let empty = Layout::for_view(view).sections.is_empty();
            assert_eq!(empty, view == AppView::DirectoryScan, "{:?}", view);
        }
    }
}
