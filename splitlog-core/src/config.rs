use std::sync::LazyLock;

use derive_from_env::FromEnv;

/// Tuning for the background writer threads, read once from `SPLITLOG_*`.
#[derive(FromEnv)]
#[from_env(prefix = "SPLITLOG")]
#[allow(non_snake_case)]
pub struct SplitlogConfig {
    #[from_env(default = "100")]
    pub FLUSH_INTERVAL_MS: u64,
    #[from_env(default = "32")]
    pub BATCH_SIZE: usize,
}

impl Default for SplitlogConfig {
    fn default() -> Self {
        Self {
            FLUSH_INTERVAL_MS: 100,
            BATCH_SIZE: 32,
        }
    }
}

pub static SPLITLOG_CONFIG: LazyLock<SplitlogConfig> =
    LazyLock::new(|| SplitlogConfig::from_env().unwrap_or_default());
