use anyhow::{Context, Result};
use std::{
    env, fmt,
    path::{Path, PathBuf},
};

use crate::{provider::weatherapi::DEFAULT_BASE_URL, store::FileProfileStore};

/// Environment variable holding the WeatherAPI key.
pub const API_KEY_VAR: &str = "API_KEY";

/// Optional override of the WeatherAPI base URL.
pub const BASE_URL_VAR: &str = "WEATHER_API_BASE_URL";

/// Process-wide settings, read once at startup.
#[derive(Clone)]
pub struct AppConfig {
    /// Empty when unset; a missing key only shows up as a fetch failure.
    pub api_key: String,
    pub weather_base_url: String,
    pub profile_path: PathBuf,
}

impl AppConfig {
    /// Load `.env` from the working directory (if any), then read the process environment.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }

        let working_dir = env::current_dir().context("Failed to determine working directory")?;

        Ok(Self::from_lookup(&working_dir, |name| env::var(name).ok()))
    }

    /// Build config from an arbitrary variable lookup. Used by `from_env` and tests.
    pub fn from_lookup<F>(working_dir: &Path, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR).unwrap_or_default();
        let weather_base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            api_key,
            weather_base_url,
            profile_path: FileProfileStore::default_path(working_dir),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("weather_base_url", &self.weather_base_url)
            .field("profile_path", &self.profile_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let cfg = AppConfig::from_lookup(Path::new("/srv/app"), lookup_from(&[]));

        assert_eq!(cfg.api_key, "");
        assert_eq!(cfg.weather_base_url, DEFAULT_BASE_URL);
        assert_eq!(
            cfg.profile_path,
            PathBuf::from("/srv/app/config/user-profile-config.toml")
        );
    }

    #[test]
    fn reads_key_and_base_url_override() {
        let cfg = AppConfig::from_lookup(
            Path::new("/srv/app"),
            lookup_from(&[(API_KEY_VAR, "SECRET"), (BASE_URL_VAR, "http://localhost:9000")]),
        );

        assert_eq!(cfg.api_key, "SECRET");
        assert_eq!(cfg.weather_base_url, "http://localhost:9000");
    }

    #[test]
    fn blank_base_url_falls_back_to_default() {
        let cfg = AppConfig::from_lookup(Path::new("."), lookup_from(&[(BASE_URL_VAR, "  ")]));
        assert_eq!(cfg.weather_base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let cfg = AppConfig::from_lookup(Path::new("."), lookup_from(&[(API_KEY_VAR, "SECRET")]));

        let shown = format!("{cfg:?}");
        assert!(!shown.contains("SECRET"));
        assert!(shown.contains("<redacted>"));
    }
}
