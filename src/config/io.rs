use super::models::AppConfig;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const MIN_FONT_SIZE: u32 = 12;
const MAX_FONT_SIZE: u32 = 72;
const MIN_TICK_INTERVAL_MS: u64 = 10;
const MAX_TICK_INTERVAL_MS: u64 = 1000;

/// Read the config at `path`. A missing or malformed file yields defaults.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return AppConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err}");
            AppConfig::default()
        }
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig, toml::de::Error> {
    let mut config = toml::from_str::<AppConfig>(contents)?;
    clamp_config(&mut config);
    Ok(config)
}

pub fn clamp_config(config: &mut AppConfig) {
    fn normalize_key_binding(value: &mut String, fallback: String) {
        let normalized = value.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            *value = fallback;
        } else {
            *value = normalized;
        }
    }

    fn clamp_volume(volume: f32) -> f32 {
        if volume.is_finite() {
            volume.clamp(0.0, 2.0)
        } else {
            1.0
        }
    }

    config.font_size = config.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    config.window_width = config.window_width.clamp(320.0, 7680.0);
    config.window_height = config.window_height.clamp(240.0, 4320.0);
    config.narration_volume = clamp_volume(config.narration_volume);
    config.word_volume = clamp_volume(config.word_volume);
    config.tick_interval_ms = config
        .tick_interval_ms
        .clamp(MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS);
    if config.stories_path.trim().is_empty() {
        config.stories_path = super::defaults::default_stories_path();
    }
    normalize_key_binding(&mut config.key_play, "space".to_string());
    normalize_key_binding(&mut config.key_close_practice, "escape".to_string());
    normalize_key_binding(&mut config.key_safe_quit, "q".to_string());
}
