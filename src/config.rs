use std::path::PathBuf;
use std::time::Duration;

/// Build mode of the dashboard. Mirrors the dev/prod split of the web deployment:
/// only development builds may point at an absolute API URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Development,
    Production,
}

impl Mode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "dev" | "development" => Some(Mode::Development),
            "prod" | "production" => Some(Mode::Production),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    /// Prefix joined in front of every API path. Empty means same-origin relative paths.
    pub base_url: String,
    /// Origin of the reverse proxy that relative paths are resolved against.
    pub origin: String,
    pub stale_time: Duration,
}

pub const DEFAULT_ORIGIN: &str = "http://localhost:8000";
pub const DEFAULT_STALE_SECS: u64 = 5 * 60;

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: Mode::Production,
            base_url: String::new(),
            origin: DEFAULT_ORIGIN.to_string(),
            stale_time: Duration::from_secs(DEFAULT_STALE_SECS),
        }
    }
}

/// Load `.env` into the process environment, once, before the subscriber is
/// installed so a `RUST_LOG` from the file takes effect.
pub fn load_dotenv() -> Result<PathBuf, dotenvy::Error> {
    dotenvy::dotenv()
}

impl Config {
    /// Read the dashboard settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        // 1. Mode
        if let Some(raw) = lookup("TLC_MODE") {
            match Mode::parse(&raw) {
                Some(mode) => config.mode = mode,
                None => tracing::warn!("Unknown TLC_MODE '{}', using production", raw),
            }
        }

        // 2. Base URL (development only, production always uses relative paths)
        let requested = lookup("TLC_API_URL").unwrap_or_default();
        config.base_url = match config.mode {
            Mode::Development => requested.trim().trim_end_matches('/').to_string(),
            Mode::Production => {
                if !requested.is_empty() {
                    tracing::warn!(
                        "Ignoring TLC_API_URL={} in production, using relative paths",
                        requested
                    );
                }
                String::new()
            }
        };

        // 3. Proxy origin
        if let Some(origin) = lookup("TLC_ORIGIN") {
            let origin = origin.trim().trim_end_matches('/');
            if !origin.is_empty() {
                config.origin = origin.to_string();
            }
        }

        // 4. Staleness window
        if let Some(raw) = lookup("TLC_STALE_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config.stale_time = Duration::from_secs(secs),
                Err(_) => tracing::warn!("Invalid TLC_STALE_SECS '{}', keeping default", raw),
            }
        }

        tracing::debug!(
            "Config resolved: mode={:?} base_url='{}' origin={}",
            config.mode,
            config.base_url,
            config.origin
        );
        config
    }
}
