pub(crate) fn default_font_size() -> u32 {
    28
}

pub(crate) fn default_window_width() -> f32 {
    1024.0
}

pub(crate) fn default_window_height() -> f32 {
    768.0
}

pub(crate) fn default_stories_path() -> String {
    "assets/stories.json".to_string()
}

pub(crate) fn default_assets_dir() -> String {
    "assets".to_string()
}

pub(crate) fn default_story_id() -> i64 {
    1
}

pub(crate) fn default_narration_volume() -> f32 {
    1.0
}

pub(crate) fn default_word_volume() -> f32 {
    1.0
}

pub(crate) fn default_tick_interval_ms() -> u64 {
    50
}

pub(crate) fn default_day_highlight() -> crate::config::HighlightColor {
    crate::config::HighlightColor {
        r: 0.95,
        g: 0.75,
        b: 0.2,
        a: 0.45,
    }
}

pub(crate) fn default_night_highlight() -> crate::config::HighlightColor {
    crate::config::HighlightColor {
        r: 0.8,
        g: 0.8,
        b: 0.5,
        a: 0.35,
    }
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}

pub(crate) fn default_key_play() -> String {
    "space".to_string()
}

pub(crate) fn default_key_close_practice() -> String {
    "escape".to_string()
}

pub(crate) fn default_key_safe_quit() -> String {
    "q".to_string()
}
