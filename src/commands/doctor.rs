use crate::core::{config::ConfigStore, plan::UpdatePlan, version_check::local_version_path};
use crate::error::Result;

pub fn check_environment() -> Result<()> {
    check_environment_with(&ConfigStore::default(), &UpdatePlan::default())?;
    Ok(())
}

/// Prints the environment report and returns the number of issues found.
pub fn check_environment_with(config: &ConfigStore, plan: &UpdatePlan) -> Result<usize> {
    println!("🔍 MAA Resource Updater - Environment Check");
    println!();

    let mut issues_found = 0;

    println!("📄 Configuration:");
    println!("  config file: {:?}", config.path());
    let installation = match config.load() {
        Some(dir) => {
            println!("    ✅ installation directory: {:?}", dir);
            Some(dir)
        }
        None if config.exists() => {
            println!("    ❌ config file does not name an installation directory");
            issues_found += 1;
            None
        }
        None => {
            println!("    ⚠️  not created yet, it is written on the first update");
            None
        }
    };

    println!();

    if let Some(installation) = installation {
        println!("📁 Installation:");
        if installation.is_dir() {
            println!("  ✅ {:?} exists", installation);
        } else {
            println!("  ❌ {:?} is missing", installation);
            issues_found += 1;
        }

        for folder in &plan.managed_folders {
            let path = installation.join(folder);
            if path.is_dir() {
                println!("  ✅ {folder}/ present");
            } else {
                println!("  ⚠️  {folder}/ missing, it is created by the next update");
            }
        }

        if local_version_path(&installation).is_file() {
            println!("  ✅ resource/version.json present");
        } else {
            println!("  ⚠️  resource/version.json missing");
        }
        println!();
    }

    if issues_found == 0 {
        println!("🎉 Environment looks good! No issues found.");
    } else {
        println!("⚠️  Found {issues_found} issue(s) that need attention.");
        println!();
        println!("💡 To fix issues:");
        println!("  - Run 'maa-updater config set <dir>' to point at your MAA installation");
        println!("  - Run 'maa-updater config clear' to be asked again on the next update");
    }

    Ok(issues_found)
}
