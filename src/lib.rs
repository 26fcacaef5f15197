// lib.rs: shared between the updater/launcher binary and the minimal core.
pub mod config;
pub mod dispatch;
pub mod exec;
pub mod role;
pub mod shutdown;
pub mod update;
pub mod version;
