pub const ARCHIVE_URL: &str =
    "https://github.com/MaaAssistantArknights/MaaResource/archive/refs/heads/main.zip";
pub const VERSION_URL: &str =
    "https://raw.githubusercontent.com/MaaAssistantArknights/MaaResource/main/resource/version.json";
pub const EXTRACTED_ROOT: &str = "MaaResource-main";
pub const STAGING_PREFIX: &str = "maa_update";
pub const ARCHIVE_FILE_NAME: &str = "download.zip";
pub const MANAGED_FOLDERS: &[&str] = &["resource", "cache"];

/// Where the resources come from and which parts of them are installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    pub archive_url: String,
    pub version_url: String,
    /// Top-level folder inside the archive (`<repo>-<branch>`).
    pub extracted_root: String,
    pub managed_folders: Vec<String>,
}

impl Default for UpdatePlan {
    fn default() -> Self {
        Self {
            archive_url: ARCHIVE_URL.to_string(),
            version_url: VERSION_URL.to_string(),
            extracted_root: EXTRACTED_ROOT.to_string(),
            managed_folders: MANAGED_FOLDERS.iter().map(|f| f.to_string()).collect(),
        }
    }
}
