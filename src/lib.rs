//! MAA Resource Updater Library
//!
//! Keeps the `resource` and `cache` folders of a MAA installation in sync with
//! the MaaResource archive. Used by the `maa-updater` CLI.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
