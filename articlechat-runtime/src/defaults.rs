use directories::ProjectDirs;
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const BASE_URL_ENV: &str = "ARTICLECHAT_BASE_URL";

/// Per-user config location, e.g. `~/.config/articlechat/config.json` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "articlechat").map(|d| d.config_dir().join(CONFIG_FILE_NAME))
}

/// Config path when none can be derived from the platform (no home directory).
pub fn fallback_config_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn base_url_override() -> Option<String> {
    std::env::var(BASE_URL_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
