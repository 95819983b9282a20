/// Raw hardware description captured from a platform tool.
#[derive(Clone, Debug, PartialEq)]
pub enum FirmwareBlob {
    /// `dmidecode -t bios` output.
    Bios(String),
    /// `system_profiler SPHardwareDataType` output.
    Hardware(String),
    /// The tool was missing, timed out or was denied.
    Unavailable,
}

pub const ELEVATED_MARKER: &str = "Requires elevated privileges";

#[derive(Clone, Debug, PartialEq)]
pub struct FirmwareInfo {
    pub platform: String,
    pub machine: String,
    pub processor: String,
    pub blob: Option<FirmwareBlob>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PackageInventorySummary {
    pub manager: String,
    pub count: usize,
    pub sample: String,
}
