pub mod auth;
pub mod config;
pub mod diseases;
pub mod plants;

use cropscan_core::CropScanError;

/// Turns a failed store operation into the message the store recorded.
pub(crate) fn store_failure(err: CropScanError, recorded: Option<String>) -> anyhow::Error {
    match recorded {
        Some(message) => anyhow::Error::new(err).context(message),
        None => anyhow::Error::new(err),
    }
}
