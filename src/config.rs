// Configuration module for featurex
// Reads from environment variables with sensible defaults

use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::warn;

static CONFIG: OnceLock<Config> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Config {
    /// Byte cap for string feature values (FEATUREX_MAX_STRING_LEN)
    pub max_string_len: usize,

    /// Source files above this size are skipped (FEATUREX_MAX_FILE_BYTES)
    pub max_file_bytes: u64,

    /// Extra directory names to skip while scanning (FEATUREX_SKIP_DIRS)
    pub extra_skip_dirs: Vec<String>,

    /// Repository thread pool size, 0 = rayon default (FEATUREX_WORKERS)
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_string_len: 200,
            max_file_bytes: 1_000_000,
            extra_skip_dirs: Vec::new(),
            workers: 0,
        }
    }
}

impl Config {
    fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; `from_env` passes `std::env`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        parse_into(&lookup, "FEATUREX_MAX_STRING_LEN", &mut config.max_string_len);
        parse_into(&lookup, "FEATUREX_MAX_FILE_BYTES", &mut config.max_file_bytes);
        parse_into(&lookup, "FEATUREX_WORKERS", &mut config.workers);
        if let Some(val) = lookup("FEATUREX_SKIP_DIRS") {
            config.extra_skip_dirs = val
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }
        config
    }

    pub fn get() -> &'static Config {
        CONFIG.get_or_init(Config::from_env)
    }
}

fn parse_into<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T)
where
    T: FromStr + std::fmt::Display,
{
    let Some(val) = lookup(key) else {
        return;
    };
    match val.trim().parse() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!(key, value = %val, default = %slot, "invalid config value, using default"),
    }
}
