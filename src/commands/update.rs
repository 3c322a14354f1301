use crate::core::{
    config::ConfigStore,
    download::Downloader,
    notify::{ConsoleNotifier, Notifier},
    picker::{DirectoryPicker, PromptPicker},
    updater::{StagingPolicy, Updater},
};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    pub keep_staging: bool,
    /// Use the terminal instead of native dialogs.
    pub console: bool,
}

/// Runs the update and returns the process exit code.
pub fn update_resources(options: UpdateOptions) -> Result<i32> {
    let config = ConfigStore::default();
    let downloader = Downloader::new();
    let (mut picker, mut notifier) = frontends(options.console);

    let policy = if options.keep_staging {
        StagingPolicy::Keep
    } else {
        StagingPolicy::Remove
    };

    let report = Updater::new(&config, picker.as_mut(), &downloader, notifier.as_mut())
        .with_staging_policy(policy)
        .run();

    if let Some(staging) = &report.staging_dir {
        println!("📝 Downloaded files kept in {}", staging.display());
    }

    Ok(report.exit_code())
}

#[cfg(feature = "native-dialogs")]
fn frontends(console: bool) -> (Box<dyn DirectoryPicker>, Box<dyn Notifier>) {
    use crate::core::{notify::DialogNotifier, picker::NativePicker};

    if console {
        (Box::new(PromptPicker), Box::new(ConsoleNotifier))
    } else {
        (Box::new(NativePicker), Box::new(DialogNotifier))
    }
}

#[cfg(not(feature = "native-dialogs"))]
fn frontends(console: bool) -> (Box<dyn DirectoryPicker>, Box<dyn Notifier>) {
    if !console {
        log::debug!("Built without native dialogs, using the terminal");
    }
    (Box::new(PromptPicker), Box::new(ConsoleNotifier))
}
