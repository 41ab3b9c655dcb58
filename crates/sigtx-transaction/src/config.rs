//! Decode limits applied when parsing untrusted transaction bytes.

use serde::{Deserialize, Serialize};

/// Largest serialized transaction accepted by default.
pub const DEFAULT_MAX_TX_SIZE: usize = 4_000_000;

/// Largest single script accepted by default.
pub const DEFAULT_MAX_SCRIPT_SIZE: usize = 1_000_000;

/// Largest input or output count accepted by default.
pub const DEFAULT_MAX_ITEMS: usize = 100_000;

/// Limits for `Tx::from_bytes_with_config`.
///
/// Truncation is always detected regardless of these limits; they only
/// bound what a well-formed but oversized encoding may cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    pub max_tx_size: usize,
    pub max_script_size: usize,
    pub max_items: usize,
}

impl DecodeConfig {
    /// No limits beyond the length of the input itself.
    pub fn unbounded() -> Self {
        DecodeConfig {
            max_tx_size: usize::MAX,
            max_script_size: usize::MAX,
            max_items: usize::MAX,
        }
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        DecodeConfig {
            max_tx_size: DEFAULT_MAX_TX_SIZE,
            max_script_size: DEFAULT_MAX_SCRIPT_SIZE,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_fills_missing_fields_with_defaults() {
        let config: DecodeConfig = serde_json::from_str(r#"{"max_script_size": 520}"#).unwrap();
        assert_eq!(config.max_script_size, 520);
        assert_eq!(config.max_tx_size, DEFAULT_MAX_TX_SIZE);
        assert_eq!(config.max_items, DEFAULT_MAX_ITEMS);

        let empty: DecodeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, DecodeConfig::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = DecodeConfig::unbounded();
        let json = serde_json::to_string(&config).unwrap();
        let back: DecodeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
