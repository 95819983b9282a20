// Re-export all model types from submodules.

pub use app::AppView;
pub use inventory::{ELEVATED_MARKER, FirmwareBlob, FirmwareInfo, PackageInventorySummary};
pub use recon::{
    ConnStatus, ConnectionRecord, ConnectionSummaryRow, DirectoryScan, Endpoint,
    ExternalConnection, ListeningPort, ProcessRecord, Protocol, SocketType, UserContext,
};
pub use system::{
    AddressFamily, BootInfo, CpuSnapshot, DiskSnapshot, InterfaceAddress, InterfaceIo,
    MemorySnapshot, NetworkInterface, percent_of,
};

mod app;
mod inventory;
mod recon;
mod system;
