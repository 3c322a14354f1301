use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, UpdaterError>;

#[derive(Error, Debug)]
pub enum UpdaterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("No installation directory was selected")]
    UserCancelled,

    #[error("Download failed: {url}: {message}")]
    DownloadError { url: String, message: String },

    #[error("Download failed: {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Extraction failed: {path}: {message}")]
    ExtractionError { path: PathBuf, message: String },

    #[error("Sync failed: source folder {path} does not exist")]
    SyncSourceMissing { path: PathBuf },

    #[error("Sync failed: {path}: {message}")]
    SyncError { path: PathBuf, message: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },
}

/// Coarse failure category shown to the user; the full error goes to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Cancelled,
    Download,
    Extraction,
    Sync,
    Other,
}

impl FailureKind {
    pub fn summary(self) -> &'static str {
        match self {
            FailureKind::Cancelled => "No MAA installation directory was selected.",
            FailureKind::Download => "Downloading the resource archive failed.",
            FailureKind::Extraction => "Extracting the resource archive failed.",
            FailureKind::Sync => "Copying resources into the MAA directory failed.",
            FailureKind::Other => "The update failed.",
        }
    }
}

impl UpdaterError {
    pub fn kind(&self) -> FailureKind {
        match self {
            UpdaterError::UserCancelled => FailureKind::Cancelled,
            UpdaterError::DownloadError { .. } | UpdaterError::HttpStatus { .. } => {
                FailureKind::Download
            }
            UpdaterError::ExtractionError { .. } => FailureKind::Extraction,
            UpdaterError::SyncSourceMissing { .. }
            | UpdaterError::SyncError { .. }
            | UpdaterError::PermissionDenied { .. } => FailureKind::Sync,
            UpdaterError::Io(_) | UpdaterError::ConfigError { .. } => FailureKind::Other,
        }
    }

    pub fn config_error<S: Into<String>>(message: S) -> Self {
        UpdaterError::ConfigError {
            message: message.into(),
        }
    }

    pub fn download_error<S: Into<String>, M: ToString>(url: S, message: M) -> Self {
        UpdaterError::DownloadError {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn extraction_error<P: Into<PathBuf>, M: ToString>(path: P, message: M) -> Self {
        UpdaterError::ExtractionError {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn sync_error<P: Into<PathBuf>, M: ToString>(path: P, message: M) -> Self {
        UpdaterError::SyncError {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
