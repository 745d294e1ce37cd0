//! Default value functions for configuration.

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

pub fn default_encoding() -> String {
    "utf-8".to_string()
}

/// Minimum spacing between paced outbound lines, in milliseconds.
pub fn default_queue_interval_ms() -> u64 {
    1000
}

/// Buffered events per subscriber before slow subscribers start lagging.
pub fn default_event_capacity() -> usize {
    256
}
