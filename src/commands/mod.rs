pub mod check;
pub mod config;
pub mod doctor;
pub mod update;
