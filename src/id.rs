//! ID generation utilities for alphadesk
//!
//! Provides identifiers for correlating the jobs of one sweep batch in logs.

use rand::Rng;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

/// Generate a unique sweep batch ID
///
/// Format: `sweep-{timestamp_ms}-{random_hex}`
/// Example: `sweep-1738300800123-a1b2`
pub fn generate_sweep_id() -> String {
    let timestamp = now_ms();
    let random: u16 = rand::rng().random();
    format!("sweep-{}-{:04x}", timestamp, random)
}
