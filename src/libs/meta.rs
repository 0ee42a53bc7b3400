//! Installer constants generated by `build.rs` from `[package.metadata]`.

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));
