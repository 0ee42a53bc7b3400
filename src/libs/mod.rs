//! Building blocks of the installer.
//!
//! Leaf modules (`release`, `version`, `download`, `process`, `archive`,
//! `shortcut`) each do one step and never call each other; `orchestrator`
//! sequences them. `config`, `paths`, `http`, `status` and `messages` are the
//! shared plumbing.

pub mod archive;
pub mod config;
pub mod data_storage;
pub mod download;
pub mod error;
pub mod http;
pub mod launcher;
pub mod messages;
pub mod meta;
pub mod orchestrator;
pub mod paths;
pub mod process;
pub mod release;
pub mod shortcut;
pub mod status;
pub mod version;
