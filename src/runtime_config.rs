//! # Runtime Configuration Module
//!
//! Environment variable based configuration for the route table.
//!
//! ## Environment Variables
//!
//! ### `URITEMPLATE_SLOW_MATCH_US`
//!
//! Route lookups taking longer than this many microseconds are logged at
//! `warn` level. Accepts values in:
//! - Decimal: `1000`
//! - Hexadecimal: `0x3e8`
//!
//! Default: `1000` (1 ms)
//!
//! ## Usage
//!
//! ```rust
//! use uritemplate::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Slow match threshold: {:?}", config.slow_match_threshold);
//! ```

use std::env;
use std::time::Duration;

const DEFAULT_SLOW_MATCH_US: u64 = 1000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Lookups slower than this are logged as warnings (default: 1 ms)
    pub slow_match_threshold: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            slow_match_threshold: Duration::from_micros(DEFAULT_SLOW_MATCH_US),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let micros = env::var("URITEMPLATE_SLOW_MATCH_US")
            .ok()
            .map_or(DEFAULT_SLOW_MATCH_US, |val| parse_micros(&val));
        RuntimeConfig {
            slow_match_threshold: Duration::from_micros(micros),
        }
    }
}

fn parse_micros(val: &str) -> u64 {
    let val = val.trim();
    if let Some(hex) = val.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).unwrap_or(DEFAULT_SLOW_MATCH_US)
    } else {
        val.parse().unwrap_or(DEFAULT_SLOW_MATCH_US)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_micros() {
        assert_eq!(parse_micros("250"), 250);
        assert_eq!(parse_micros("0x3e8"), 1000);
        assert_eq!(parse_micros("nope"), DEFAULT_SLOW_MATCH_US);
        assert_eq!(parse_micros("0xzz"), DEFAULT_SLOW_MATCH_US);
    }

    #[test]
    fn test_default_threshold() {
        assert_eq!(
            RuntimeConfig::default().slow_match_threshold,
            Duration::from_millis(1)
        );
    }
}
