//! Domain layer of the CropScan admin client.
//!
//! No I/O lives here: only models, the error taxonomy and the trait seams
//! (`ApiClient`, `SnapshotRepository`) that the infrastructure crate fills in.

pub mod api;
pub mod auth;
pub mod config;
pub mod disease;
pub mod error;
pub mod plant;
pub mod snapshot;

pub use error::{CropScanError, Result};
