//! Filesystem adapters for handler code.
//!
//! `handler_core` only sees code through its `CodeLoader` trait; this crate
//! provides the local-disk implementation and the content fingerprint it
//! reports.

pub mod fingerprint;
pub mod local_asset;

pub use local_asset::LocalAssetLoader;
