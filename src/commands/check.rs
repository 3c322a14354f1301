use crate::core::{
    config::ConfigStore,
    download::Downloader,
    plan::UpdatePlan,
    version_check::{check, CheckStatus},
};
use crate::error::Result;

pub fn check_for_updates() -> Result<()> {
    println!("🔄 Checking for resource updates...");

    let config = ConfigStore::default();
    let downloader = Downloader::new();
    let status = check(&config, &downloader, &UpdatePlan::default())?;

    match status {
        CheckStatus::NotConfigured => {
            println!("❌ No MAA installation directory configured");
            println!("   Run 'maa-updater' once to select it");
        }
        CheckStatus::LocalMissing { path } => {
            println!("📦 Local version file {path:?} not found, an update is needed");
            println!("   Run 'maa-updater update'");
        }
        CheckStatus::UpdateAvailable { remote_updated } => {
            println!("🎉 New resources available");
            if let Some(stamp) = remote_updated {
                println!("   Published: {stamp}");
            }
            println!("   Run 'maa-updater update'");
        }
        CheckStatus::UpToDate { remote_updated } => {
            println!("✅ Resources are up to date");
            if let Some(stamp) = remote_updated {
                println!("   Published: {stamp}");
            }
        }
    }

    Ok(())
}
