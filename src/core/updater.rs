//! The update pipeline: resolve the installation directory, download the
//! resource archive, unpack it into a staging directory and overlay the
//! managed folders onto the installation.

use crate::core::archive;
use crate::core::config::ConfigStore;
use crate::core::download::Fetcher;
use crate::core::notify::{Notice, Notifier};
use crate::core::picker::DirectoryPicker;
use crate::core::plan::{UpdatePlan, ARCHIVE_FILE_NAME, STAGING_PREFIX};
use crate::core::sync::sync_folder;
use crate::error::{Result, UpdaterError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    Idle,
    ConfigLoaded,
    NeedsDirectory,
    DirectorySelected,
    ConfigSaved,
    Fetching,
    Extracting,
    /// Syncing the managed folder at this index.
    Syncing(usize),
    Done,
    Failed,
}

/// What happens to the staging directory once the run is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StagingPolicy {
    #[default]
    Remove,
    Keep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSummary {
    pub installation: PathBuf,
    pub files_copied: u64,
}

#[derive(Debug)]
pub struct UpdateReport {
    /// Every state entered, in order. The last one is `Done` or `Failed`.
    pub trace: Vec<UpdateState>,
    pub result: Result<UpdateSummary>,
    /// Set when the staging directory was kept.
    pub staging_dir: Option<PathBuf>,
}

impl UpdateReport {
    pub fn final_state(&self) -> UpdateState {
        self.trace.last().copied().unwrap_or(UpdateState::Idle)
    }

    pub fn is_success(&self) -> bool {
        self.final_state() == UpdateState::Done
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

pub struct Updater<'a> {
    config: &'a ConfigStore,
    picker: &'a mut dyn DirectoryPicker,
    fetcher: &'a dyn Fetcher,
    notifier: &'a mut dyn Notifier,
    plan: UpdatePlan,
    staging_policy: StagingPolicy,
    staging_parent: Option<PathBuf>,
    trace: Vec<UpdateState>,
    staging_dir: Option<PathBuf>,
}

impl<'a> Updater<'a> {
    pub fn new(
        config: &'a ConfigStore,
        picker: &'a mut dyn DirectoryPicker,
        fetcher: &'a dyn Fetcher,
        notifier: &'a mut dyn Notifier,
    ) -> Self {
        Self {
            config,
            picker,
            fetcher,
            notifier,
            plan: UpdatePlan::default(),
            staging_policy: StagingPolicy::default(),
            staging_parent: None,
            trace: Vec::new(),
            staging_dir: None,
        }
    }

    pub fn with_plan(mut self, plan: UpdatePlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn with_staging_policy(mut self, policy: StagingPolicy) -> Self {
        self.staging_policy = policy;
        self
    }

    /// Creates staging directories under `dir` instead of the system temp dir.
    pub fn with_staging_parent<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.staging_parent = Some(dir.into());
        self
    }

    /// Runs the pipeline to completion and raises exactly one final notice.
    pub fn run(mut self) -> UpdateReport {
        let result = self.execute();

        let notice = match &result {
            Ok(summary) => {
                self.enter(UpdateState::Done);
                log::info!(
                    "Update finished: {} file(s) copied into {}",
                    summary.files_copied,
                    summary.installation.display()
                );
                Notice::Success {
                    installation: summary.installation.clone(),
                    files_copied: summary.files_copied,
                }
            }
            Err(UpdaterError::UserCancelled) => {
                self.enter(UpdateState::Failed);
                log::warn!("No installation directory selected, nothing to update");
                Notice::Cancelled
            }
            Err(e) => {
                self.enter(UpdateState::Failed);
                log::error!("Update failed: {e}");
                Notice::Failure {
                    kind: e.kind(),
                    detail: e.to_string(),
                }
            }
        };
        self.notifier.notify(&notice);

        UpdateReport {
            trace: self.trace,
            result,
            staging_dir: self.staging_dir,
        }
    }

    fn enter(&mut self, state: UpdateState) {
        log::debug!("Updater state: {state:?}");
        self.trace.push(state);
    }

    fn execute(&mut self) -> Result<UpdateSummary> {
        self.enter(UpdateState::Idle);
        let loaded = self.config.load();
        self.enter(UpdateState::ConfigLoaded);

        let installation = match loaded {
            Some(dir) => {
                log::info!("Using MAA installation at {}", dir.display());
                dir
            }
            None => self.select_installation()?,
        };

        let staging = self.create_staging()?;
        let outcome = self.fetch_and_install(staging.path(), &installation);
        self.finish_staging(staging);

        Ok(UpdateSummary {
            installation,
            files_copied: outcome?,
        })
    }

    fn select_installation(&mut self) -> Result<PathBuf> {
        self.enter(UpdateState::NeedsDirectory);
        self.notifier.notify(&Notice::Welcome);

        let dir = self.picker.pick().ok_or(UpdaterError::UserCancelled)?;
        self.enter(UpdateState::DirectorySelected);
        log::info!("Selected MAA installation at {}", dir.display());

        // Losing the config only means asking again next time
        if let Err(e) = self.config.save(&dir) {
            log::warn!(
                "Failed to save installation directory to {}: {e}",
                self.config.path().display()
            );
        }
        self.enter(UpdateState::ConfigSaved);
        Ok(dir)
    }

    fn create_staging(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGING_PREFIX);
        let staging = match &self.staging_parent {
            Some(parent) => {
                crate::utils::fs::ensure_dir_exists(parent)?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };
        log::debug!("Staging directory: {}", staging.path().display());
        Ok(staging)
    }

    fn fetch_and_install(&mut self, staging: &Path, installation: &Path) -> Result<u64> {
        self.enter(UpdateState::Fetching);
        let archive_path = staging.join(ARCHIVE_FILE_NAME);
        self.fetcher.fetch(&self.plan.archive_url, &archive_path)?;

        self.enter(UpdateState::Extracting);
        archive::extract_zip(&archive_path, staging)?;

        let root = staging.join(&self.plan.extracted_root);
        let folders = self.plan.managed_folders.clone();
        let mut files_copied = 0;
        for (index, folder) in folders.iter().enumerate() {
            self.enter(UpdateState::Syncing(index));
            files_copied += sync_folder(&root.join(folder), &installation.join(folder))?;
        }

        Ok(files_copied)
    }

    fn finish_staging(&mut self, staging: TempDir) {
        match self.staging_policy {
            StagingPolicy::Keep => {
                let path = staging.keep();
                log::info!("Staging directory kept at {}", path.display());
                self.staging_dir = Some(path);
            }
            StagingPolicy::Remove => {
                let path = staging.path().to_path_buf();
                if let Err(e) = staging.close() {
                    log::warn!("Failed to remove staging directory {}: {e}", path.display());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::archive::tests::write_zip;
    use crate::core::picker::PresetPicker;
    use crate::error::FailureKind;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use tempfile::TempDir;

    /// Serves a local archive in place of the network.
    struct LocalFetcher {
        archive: PathBuf,
        calls: Cell<usize>,
    }

    impl LocalFetcher {
        fn new(archive: PathBuf) -> Self {
            Self {
                archive,
                calls: Cell::new(0),
            }
        }
    }

    impl Fetcher for LocalFetcher {
        fn fetch(&self, _url: &str, destination: &Path) -> Result<u64> {
            self.calls.set(self.calls.get() + 1);
            Ok(std::fs::copy(&self.archive, destination)?)
        }
    }

    struct RefusingFetcher;

    impl Fetcher for RefusingFetcher {
        fn fetch(&self, url: &str, _destination: &Path) -> Result<u64> {
            Err(UpdaterError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    #[derive(Default)]
    struct RecordingNotifier(Vec<Notice>);

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, notice: &Notice) {
            self.0.push(notice.clone());
        }
    }

    struct Fixture {
        tmp: TempDir,
        config: ConfigStore,
        archive: PathBuf,
    }

    impl Fixture {
        fn new(entries: &[(&str, &str)]) -> Self {
            let tmp = TempDir::new().unwrap();
            let config = ConfigStore::new(tmp.path().join("update_config.ini"));
            let archive = tmp.path().join("fixture.zip");
            write_zip(&archive, entries);
            Self {
                tmp,
                config,
                archive,
            }
        }

        fn install_dir(&self) -> PathBuf {
            self.tmp.path().join("opt/maa")
        }

        fn staging_parent(&self) -> PathBuf {
            self.tmp.path().join("staging")
        }
    }

    fn test_plan() -> UpdatePlan {
        UpdatePlan {
            extracted_root: "testrepo-main".to_string(),
            ..UpdatePlan::default()
        }
    }

    const TEST_ARCHIVE: &[(&str, &str)] = &[
        ("testrepo-main/resource/a.txt", "a"),
        ("testrepo-main/cache/b.txt", "b"),
        ("testrepo-main/README.md", "readme"),
    ];

    #[test]
    fn test_first_run_end_to_end() {
        let fx = Fixture::new(TEST_ARCHIVE);
        let install = fx.install_dir();
        let mut picker = PresetPicker(Some(install.clone()));
        let fetcher = LocalFetcher::new(fx.archive.clone());
        let mut notifier = RecordingNotifier::default();

        let report = Updater::new(&fx.config, &mut picker, &fetcher, &mut notifier)
            .with_plan(test_plan())
            .with_staging_parent(fx.staging_parent())
            .run();

        assert_eq!(
            std::fs::read_to_string(fx.config.path()).unwrap(),
            install.to_string_lossy()
        );
        assert_eq!(std::fs::read_to_string(install.join("resource/a.txt")).unwrap(), "a");
        assert_eq!(std::fs::read_to_string(install.join("cache/b.txt")).unwrap(), "b");
        assert!(!install.join("README.md").exists());

        assert_eq!(
            report.trace,
            vec![
                UpdateState::Idle,
                UpdateState::ConfigLoaded,
                UpdateState::NeedsDirectory,
                UpdateState::DirectorySelected,
                UpdateState::ConfigSaved,
                UpdateState::Fetching,
                UpdateState::Extracting,
                UpdateState::Syncing(0),
                UpdateState::Syncing(1),
                UpdateState::Done,
            ]
        );
        assert_eq!(report.exit_code(), 0);
        assert_eq!(
            notifier.0,
            vec![
                Notice::Welcome,
                Notice::Success {
                    installation: install.clone(),
                    files_copied: 2,
                },
            ]
        );

        // Staging is removed by default
        assert_eq!(std::fs::read_dir(fx.staging_parent()).unwrap().count(), 0);
        assert_eq!(report.staging_dir, None);
    }

    #[test]
    fn test_configured_run_skips_picker() {
        let fx = Fixture::new(TEST_ARCHIVE);
        fx.config.save(&fx.install_dir()).unwrap();
        let mut picker = PresetPicker(Some(PathBuf::from("/should/not/be/used")));
        let fetcher = LocalFetcher::new(fx.archive.clone());
        let mut notifier = RecordingNotifier::default();

        let report = Updater::new(&fx.config, &mut picker, &fetcher, &mut notifier)
            .with_plan(test_plan())
            .with_staging_parent(fx.staging_parent())
            .run();

        assert!(report.is_success());
        assert_eq!(
            &report.trace[..3],
            &[
                UpdateState::Idle,
                UpdateState::ConfigLoaded,
                UpdateState::Fetching
            ]
        );
        assert!(picker.0.is_some());
        assert_eq!(notifier.0.len(), 1);
    }

    #[test]
    fn test_cancelled_picker_never_fetches() {
        let fx = Fixture::new(TEST_ARCHIVE);
        let mut picker = PresetPicker(None);
        let fetcher = LocalFetcher::new(fx.archive.clone());
        let mut notifier = RecordingNotifier::default();

        let report = Updater::new(&fx.config, &mut picker, &fetcher, &mut notifier)
            .with_plan(test_plan())
            .with_staging_parent(fx.staging_parent())
            .run();

        assert_eq!(report.final_state(), UpdateState::Failed);
        assert_eq!(report.exit_code(), 1);
        assert!(matches!(report.result, Err(UpdaterError::UserCancelled)));
        assert_eq!(fetcher.calls.get(), 0);
        assert!(!fx.config.exists());
        assert_eq!(notifier.0, vec![Notice::Welcome, Notice::Cancelled]);
        assert!(!fx.staging_parent().exists());
    }

    #[test]
    fn test_download_failure_is_reported() {
        let fx = Fixture::new(TEST_ARCHIVE);
        fx.config.save(&fx.install_dir()).unwrap();
        let mut picker = PresetPicker(None);
        let mut notifier = RecordingNotifier::default();

        let report = Updater::new(&fx.config, &mut picker, &RefusingFetcher, &mut notifier)
            .with_plan(test_plan())
            .with_staging_parent(fx.staging_parent())
            .run();

        assert_eq!(
            &report.trace[report.trace.len() - 2..],
            &[UpdateState::Fetching, UpdateState::Failed]
        );
        match &notifier.0[..] {
            [Notice::Failure { kind, detail }] => {
                assert_eq!(*kind, FailureKind::Download);
                assert!(detail.contains("404"));
            }
            other => panic!("unexpected notices: {other:?}"),
        }
        assert!(!fx.install_dir().exists());
    }

    #[test]
    fn test_unreachable_server_raises_single_failure_notice() {
        use crate::core::download::tests::{local_downloader, refused_url};

        let fx = Fixture::new(TEST_ARCHIVE);
        fx.config.save(&fx.install_dir()).unwrap();
        let mut picker = PresetPicker(None);
        let downloader = local_downloader();
        let mut notifier = RecordingNotifier::default();
        let plan = UpdatePlan {
            archive_url: refused_url(),
            ..test_plan()
        };

        let report = Updater::new(&fx.config, &mut picker, &downloader, &mut notifier)
            .with_plan(plan)
            .with_staging_parent(fx.staging_parent())
            .run();

        assert_eq!(report.exit_code(), 1);
        assert!(matches!(
            &notifier.0[..],
            [Notice::Failure {
                kind: FailureKind::Download,
                ..
            }]
        ));
    }

    #[test]
    fn test_corrupt_archive_fails_extraction() {
        let fx = Fixture::new(TEST_ARCHIVE);
        std::fs::write(&fx.archive, "<html>rate limited</html>").unwrap();
        fx.config.save(&fx.install_dir()).unwrap();
        let mut picker = PresetPicker(None);
        let fetcher = LocalFetcher::new(fx.archive.clone());
        let mut notifier = RecordingNotifier::default();

        let report = Updater::new(&fx.config, &mut picker, &fetcher, &mut notifier)
            .with_plan(test_plan())
            .with_staging_parent(fx.staging_parent())
            .run();

        assert_eq!(
            &report.trace[report.trace.len() - 2..],
            &[UpdateState::Extracting, UpdateState::Failed]
        );
        assert!(matches!(
            &notifier.0[..],
            [Notice::Failure {
                kind: FailureKind::Extraction,
                ..
            }]
        ));
    }

    #[test]
    fn test_layout_drift_keeps_partial_update() {
        let fx = Fixture::new(&[("testrepo-main/resource/a.txt", "a")]);
        fx.config.save(&fx.install_dir()).unwrap();
        let mut picker = PresetPicker(None);
        let fetcher = LocalFetcher::new(fx.archive.clone());
        let mut notifier = RecordingNotifier::default();

        let report = Updater::new(&fx.config, &mut picker, &fetcher, &mut notifier)
            .with_plan(test_plan())
            .with_staging_parent(fx.staging_parent())
            .run();

        assert_eq!(
            &report.trace[report.trace.len() - 3..],
            &[
                UpdateState::Syncing(0),
                UpdateState::Syncing(1),
                UpdateState::Failed
            ]
        );
        assert!(matches!(
            report.result,
            Err(UpdaterError::SyncSourceMissing { .. })
        ));
        // resource was already synced when cache turned out to be missing
        assert!(fx.install_dir().join("resource/a.txt").is_file());
        assert!(!fx.install_dir().join("cache").exists());
    }

    #[test]
    fn test_rerun_is_idempotent_and_keeps_local_files() {
        let fx = Fixture::new(TEST_ARCHIVE);
        let install = fx.install_dir();
        std::fs::create_dir_all(install.join("cache")).unwrap();
        std::fs::write(install.join("cache/extra.dat"), "local").unwrap();
        fx.config.save(&install).unwrap();
        let fetcher = LocalFetcher::new(fx.archive.clone());

        for _ in 0..2 {
            let mut picker = PresetPicker(None);
            let mut notifier = RecordingNotifier::default();
            let report = Updater::new(&fx.config, &mut picker, &fetcher, &mut notifier)
                .with_plan(test_plan())
                .with_staging_parent(fx.staging_parent())
                .run();
            assert!(report.is_success());
        }

        let mut cache: Vec<_> = std::fs::read_dir(install.join("cache"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        cache.sort();
        assert_eq!(cache, vec!["b.txt", "extra.dat"]);
        assert_eq!(fetcher.calls.get(), 2);
    }

    #[test]
    fn test_keep_staging_policy() {
        let fx = Fixture::new(TEST_ARCHIVE);
        fx.config.save(&fx.install_dir()).unwrap();
        let mut picker = PresetPicker(None);
        let fetcher = LocalFetcher::new(fx.archive.clone());
        let mut notifier = RecordingNotifier::default();

        let report = Updater::new(&fx.config, &mut picker, &fetcher, &mut notifier)
            .with_plan(test_plan())
            .with_staging_parent(fx.staging_parent())
            .with_staging_policy(StagingPolicy::Keep)
            .run();

        let staging = report.staging_dir.clone().unwrap();
        assert!(staging.starts_with(fx.staging_parent()));
        assert!(staging.join(ARCHIVE_FILE_NAME).is_file());
        assert!(staging.join("testrepo-main/resource/a.txt").is_file());
    }
}
