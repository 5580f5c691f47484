use std::fs;

use log::warn;
use serde::{Deserialize, Serialize};

const CONFIG_PATH: &str = "config.json";

/// Persisted interpreter settings, kept as `config.json` in the working
/// directory. Command-line arguments override these per run.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub scale: u32,
    pub freq: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scale: 10,
            freq: 540,
        }
    }
}

impl Config {
    /// Read the config file, recreating it with defaults when it is missing
    /// or malformed.
    pub fn load_or_create() -> Self {
        match fs::read_to_string(CONFIG_PATH) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => return config,
                Err(e) => warn!("ignoring malformed {}: {}", CONFIG_PATH, e),
            },
            Err(e) => warn!("could not read {}: {}", CONFIG_PATH, e),
        }

        let config = Config::default();
        match serde_json::to_string_pretty(&config) {
            Ok(text) => {
                if let Err(e) = fs::write(CONFIG_PATH, text + "\n") {
                    warn!("could not write {}: {}", CONFIG_PATH, e);
                }
            }
            Err(e) => warn!("could not serialize defaults: {}", e),
        }
        config
    }
}
