use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Process-wide configuration, resolved on first access.
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::load().unwrap_or_else(|e| panic!("FATAL: invalid configuration: {e}"))
});

pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "STREAMLINE_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite://streamline.sqlite".to_string(),
            loglevel: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Master key material for the session cookie; at least 32 bytes.
    /// Empty means a random key per process, so sessions do not survive restarts.
    pub session_secret: String,
    pub session_ttl_hours: u32,
    /// Drop the `Secure` cookie attribute so sessions work over plain HTTP.
    pub insecure_cookie: bool,
    pub min_password_length: usize,
    pub signin_attempts_per_minute: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_secret: String::new(),
            session_ttl_hours: 24 * 30,
            insecure_cookie: false,
            min_password_length: 1,
            signin_attempts_per_minute: 10,
        }
    }
}

impl Config {
    /// Defaults, then `config.toml`, then `STREAMLINE_*` env vars (`__` separates sections).
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}
