//! Client configuration.
//!
//! Sources, lowest priority first: built-in defaults, `~/.dino-run/config.json`,
//! the `DINO_RUN_SERVER` environment variable, then command-line flags.

use crate::utils::persistence;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "config.json";
pub const SERVER_ENV_VAR: &str = "DINO_RUN_SERVER";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub server_url: String,
    /// Last player key entered; offered again at the prompt.
    pub player_key: String,
    pub display_name: String,
    pub frame_interval_ms: u64,
    /// Physics step cap in ms. Unset means frames are never clamped.
    pub max_frame_dt_ms: Option<f64>,
    pub request_timeout_ms: Option<u64>,
    /// Obstacle catalog file; the built-in catalog when unset.
    pub catalog_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            player_key: String::new(),
            display_name: String::new(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            max_frame_dt_ms: None,
            request_timeout_ms: None,
            catalog_path: None,
        }
    }
}

/// Overrides parsed from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub server_url: Option<String>,
    pub player_key: Option<String>,
    pub display_name: Option<String>,
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    /// Load `~/.dino-run/config.json`, then apply the environment.
    pub fn load() -> Self {
        let mut config: Config = persistence::load_json_or_default(CONFIG_FILE);
        config.apply_env(std::env::var(SERVER_ENV_VAR).ok());
        config
    }

    pub fn load_from(path: &Path) -> Self {
        persistence::load_json_from(path)
    }

    pub fn apply_env(&mut self, server_url: Option<String>) {
        if let Some(url) = server_url.filter(|u| !u.trim().is_empty()) {
            self.server_url = url;
        }
    }

    pub fn apply_cli(&mut self, overrides: CliOverrides) {
        if let Some(url) = overrides.server_url {
            self.server_url = url;
        }
        if let Some(key) = overrides.player_key {
            self.player_key = key;
        }
        if let Some(name) = overrides.display_name {
            self.display_name = name;
        }
        if overrides.catalog_path.is_some() {
            self.catalog_path = overrides.catalog_path;
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Remember the player for next launch.
    pub fn remember_player(&mut self, player_key: &str, display_name: &str) -> io::Result<()> {
        self.player_key = player_key.to_string();
        self.display_name = display_name.to_string();
        persistence::save_json(CONFIG_FILE, self)
    }
}
