use dialoguer::Input;
use std::path::PathBuf;

pub const PICK_PROMPT: &str = "Select the MAA installation directory";

/// Asks the user for the MAA installation directory. `None` means cancelled.
pub trait DirectoryPicker {
    fn pick(&mut self) -> Option<PathBuf>;
}

/// Native folder browser.
#[cfg(feature = "native-dialogs")]
pub struct NativePicker;

#[cfg(feature = "native-dialogs")]
impl DirectoryPicker for NativePicker {
    fn pick(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new().set_title(PICK_PROMPT).pick_folder()
    }
}

/// Terminal prompt; an empty answer counts as cancelling.
pub struct PromptPicker;

impl DirectoryPicker for PromptPicker {
    fn pick(&mut self) -> Option<PathBuf> {
        let answer = Input::<String>::new()
            .with_prompt(PICK_PROMPT)
            .allow_empty(true)
            .interact_text();

        match answer {
            Ok(answer) => non_empty_path(&answer),
            Err(e) => {
                log::warn!("Directory prompt failed: {e}");
                None
            }
        }
    }
}

/// Fixed answer, used when the directory is already known up front.
pub struct PresetPicker(pub Option<PathBuf>);

impl DirectoryPicker for PresetPicker {
    fn pick(&mut self) -> Option<PathBuf> {
        self.0.take()
    }
}

fn non_empty_path(answer: &str) -> Option<PathBuf> {
    let trimmed = answer.trim().trim_matches('"');
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}
