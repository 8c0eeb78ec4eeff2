use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Wall-clock lifetime of response-cache entries, in seconds.
    pub ttl_secs: u64,
    /// Maximum number of memoized planner results.
    pub memo_capacity: usize,
    /// Maximum number of cached full responses.
    pub response_capacity: usize,
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: "murus.db".to_string(),
                max_connections: 10,
            },
            cache: CacheConfig {
                ttl_secs: 300,
                memo_capacity: 1000,
                response_capacity: 1000,
            },
        }
    }
}
