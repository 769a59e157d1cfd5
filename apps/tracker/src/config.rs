use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

pub const CONFIG_FILE: &str = "tracker.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub snapshot_path: Option<PathBuf>,
    pub seed_demo_board: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            seed_demo_board: true,
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    snapshot_path: Option<PathBuf>,
    seed_demo_board: Option<bool>,
    log_filter: Option<String>,
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then `config_path` if it exists and parses, then environment
/// variables looked up through `env`.
pub fn load_settings_from<F>(config_path: &Path, env: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        if let Ok(file_cfg) = toml::from_str::<FileSettings>(&raw) {
            if let Some(v) = file_cfg.snapshot_path {
                settings.snapshot_path = Some(v);
            }
            if let Some(v) = file_cfg.seed_demo_board {
                settings.seed_demo_board = v;
            }
            if let Some(v) = file_cfg.log_filter {
                settings.log_filter = v;
            }
        }
    }

    if let Some(v) = env("TRACKER_SNAPSHOT") {
        settings.snapshot_path = Some(v.into());
    }
    if let Some(v) = env("APP__SNAPSHOT_PATH") {
        settings.snapshot_path = Some(v.into());
    }

    if let Some(v) = env("APP__SEED_DEMO_BOARD") {
        if let Some(parsed) = parse_flag(&v) {
            settings.seed_demo_board = parsed;
        }
    }

    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    settings
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
