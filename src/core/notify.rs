use crate::error::FailureKind;
use std::path::PathBuf;

pub const APP_TITLE: &str = "MAA Resource Updater";

/// Outcome signals raised by the updater for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// First run: no installation directory is configured yet.
    Welcome,
    Cancelled,
    Success {
        installation: PathBuf,
        files_copied: u64,
    },
    Failure {
        kind: FailureKind,
        detail: String,
    },
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::Welcome => "First launch",
            Notice::Cancelled => "Error",
            Notice::Success { .. } => "Update complete",
            Notice::Failure { .. } => "Update failed",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::Welcome => format!(
                "Welcome to {APP_TITLE}! Please select the MAA installation directory."
            ),
            Notice::Cancelled => {
                "No MAA installation directory was selected, exiting.".to_string()
            }
            Notice::Success { .. } => "Update complete!".to_string(),
            Notice::Failure { kind, .. } => kind.summary().to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Cancelled | Notice::Failure { .. })
    }
}

pub trait Notifier {
    fn notify(&mut self, notice: &Notice);
}

pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notice: &Notice) {
        match notice {
            Notice::Welcome => println!("👋 {}", notice.message()),
            Notice::Cancelled => eprintln!("❌ {}", notice.message()),
            Notice::Success {
                installation,
                files_copied,
            } => {
                println!("✅ {}", notice.message());
                println!("   {files_copied} file(s) copied into {}", installation.display());
            }
            Notice::Failure { detail, .. } => {
                eprintln!("❌ {}", notice.message());
                eprintln!("   {detail}");
            }
        }
    }
}

/// Native message boxes.
#[cfg(feature = "native-dialogs")]
pub struct DialogNotifier;

#[cfg(feature = "native-dialogs")]
impl Notifier for DialogNotifier {
    fn notify(&mut self, notice: &Notice) {
        let level = if notice.is_error() {
            rfd::MessageLevel::Error
        } else {
            rfd::MessageLevel::Info
        };

        let _ = rfd::MessageDialog::new()
            .set_title(notice.title())
            .set_level(level)
            .set_description(notice.message())
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_stays_terse() {
        let notice = Notice::Failure {
            kind: FailureKind::Download,
            detail: "Download failed: https://example.invalid returned HTTP 502".to_string(),
        };
        assert_eq!(notice.message(), FailureKind::Download.summary());
        assert!(notice.is_error());
    }

    #[test]
    fn test_titles() {
        assert_eq!(Notice::Welcome.title(), "First launch");
        assert!(!Notice::Welcome.is_error());
        assert!(Notice::Cancelled.is_error());
        let success = Notice::Success {
            installation: PathBuf::from("/opt/maa"),
            files_copied: 2,
        };
        assert_eq!(success.title(), "Update complete");
        assert!(!success.is_error());
    }
}
