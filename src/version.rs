use semver::Version;
use serde::Serialize;

/// Version of the updater/launcher binary.
pub const UPDATER_VERSION: Version = Version::new(1, 0, 3);

/// Versions reported by the minimal core.
pub const CORE_VERSIONS: VersionInfo = VersionInfo {
    nekobox: Version::new(1, 0, 3),
    sing_box: Version::new(1, 8, 10),
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub nekobox: Version,
    pub sing_box: Version,
}

impl VersionInfo {
    /// First line printed by every core invocation.
    pub fn header(&self) -> String {
        format!("sing-box: {} NekoBox: v{}", self.sing_box, self.nekobox)
    }

    /// Output of `version` / `--version`.
    pub fn banner(&self) -> String {
        format!("nekobox_core v{} (sing-box {})", self.nekobox, self.sing_box)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
