//! # techatlas-setup
//!
//! Installer and updater for TechAtlas.
//!
//! One run looks up the latest GitHub release, compares it with the installed
//! version, downloads the release archive, closes a running copy of the
//! application, extracts the archive into the per-user install directory,
//! creates desktop shortcuts and launches the result.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use techatlas_setup::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() {
//!     let code = Cli::menu().await;
//!     std::process::exit(code);
//! }
//! ```

pub mod commands;
pub mod libs;
