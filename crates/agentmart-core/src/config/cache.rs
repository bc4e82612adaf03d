//! Slug lookup cache configuration.

use serde::{Deserialize, Serialize};

/// In-memory cache settings for the public slug resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of slug entries held in memory.
    #[serde(default = "default_max_capacity")]
    pub slug_max_capacity: u64,
    /// TTL for a cached slug mapping in seconds.
    #[serde(default = "default_ttl")]
    pub slug_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            slug_max_capacity: default_max_capacity(),
            slug_ttl_seconds: default_ttl(),
        }
    }
}

fn default_max_capacity() -> u64 {
    10_000
}

fn default_ttl() -> u64 {
    300
}
