//! Utility functions for Alice

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Compute SHA-256 hash of data
pub fn sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Random image name: 64 lowercase hex characters
pub fn random_image_id() -> String {
    sha256(Uuid::new_v4().as_bytes())
}

/// Local timestamp in the build log format (`yyyy-MM-dd HH:mm:ss`)
pub fn log_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
