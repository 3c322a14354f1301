pub mod archive;
pub mod config;
pub mod download;
pub mod notify;
pub mod picker;
pub mod plan;
pub mod sync;
pub mod updater;
pub mod version_check;
