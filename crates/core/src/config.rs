//! Tunables for the core.

use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoreConfig {
    /// Minimum seconds between two sync starts for the same favorite
    pub sync_throttle_secs: u64,

    /// How many entities "nearest" lists return
    pub nearest_limit: usize,
}

impl CoreConfig {
    pub const DEFAULT_SYNC_THROTTLE_SECS: u64 = 30;
    pub const DEFAULT_NEAREST_LIMIT: usize = 25;

    pub fn sync_throttle(&self) -> Duration {
        Duration::from_secs(self.sync_throttle_secs)
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            sync_throttle_secs: Self::DEFAULT_SYNC_THROTTLE_SECS,
            nearest_limit: Self::DEFAULT_NEAREST_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.sync_throttle(), Duration::from_secs(30));
        assert_eq!(config.nearest_limit, 25);
    }
}
