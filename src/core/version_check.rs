use crate::core::config::ConfigStore;
use crate::core::download::Fetcher;
use crate::core::plan::UpdatePlan;
use crate::error::Result;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const VERSION_FILE: &str = "version.json";
const LAST_UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    NotConfigured,
    LocalMissing { path: PathBuf },
    UpdateAvailable { remote_updated: Option<NaiveDateTime> },
    UpToDate { remote_updated: Option<NaiveDateTime> },
}

#[derive(Debug, Deserialize)]
struct ResourceVersion {
    #[serde(default)]
    last_updated: Option<String>,
}

/// Compares the installed `resource/version.json` with the published one.
pub fn check(
    config: &ConfigStore,
    fetcher: &dyn Fetcher,
    plan: &UpdatePlan,
) -> Result<CheckStatus> {
    let Some(installation) = config.load() else {
        return Ok(CheckStatus::NotConfigured);
    };

    let local_path = local_version_path(&installation);
    if !local_path.is_file() {
        return Ok(CheckStatus::LocalMissing { path: local_path });
    }
    let local = std::fs::read(&local_path)?;

    let scratch = tempfile::Builder::new().prefix("maa_version").tempdir()?;
    let remote_path = scratch.path().join(VERSION_FILE);
    fetcher.fetch(&plan.version_url, &remote_path)?;
    let remote = std::fs::read(&remote_path)?;

    let remote_updated = last_updated(&remote);
    if local == remote {
        Ok(CheckStatus::UpToDate { remote_updated })
    } else {
        Ok(CheckStatus::UpdateAvailable { remote_updated })
    }
}

pub fn local_version_path(installation: &Path) -> PathBuf {
    installation.join("resource").join(VERSION_FILE)
}

fn last_updated(document: &[u8]) -> Option<NaiveDateTime> {
    let version: ResourceVersion = match serde_json::from_slice(document) {
        Ok(version) => version,
        Err(e) => {
            log::debug!("Remote {VERSION_FILE} is not valid JSON: {e}");
            return None;
        }
    };
    let stamp = version.last_updated?;
    NaiveDateTime::parse_from_str(&stamp, LAST_UPDATED_FORMAT)
        .map_err(|e| log::debug!("Unrecognised last_updated stamp {stamp:?}: {e}"))
        .ok()
}
