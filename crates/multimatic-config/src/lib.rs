//! Shared configuration for multimatic tools.
//!
//! TOML profiles, credential resolution (env + plaintext), and translation
//! to `multimatic_core::ClientConfig`. The CLI layers its flag overrides on
//! top of this.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use multimatic_core::{AccountCredentials, ClientConfig};

/// Env var consulted for the password when a profile names none.
pub const PASSWORD_ENV: &str = "MULTIMATIC_PASSWORD";
/// Env var consulted for the username when a profile has none.
pub const USERNAME_ENV: &str = "MULTIMATIC_USERNAME";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("no {what} configured for profile '{profile}'")]
    NoCredentials { profile: String, what: &'static str },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named account profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Account login (e-mail).
    pub username: Option<String>,

    /// Password (plaintext, prefer `password_env`).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Client identifier sent with the auth requests.
    #[serde(default = "default_smartphone_id")]
    pub smartphone_id: String,

    /// Override the service base URL.
    pub base_url: Option<String>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Default facility serial for commands that need one.
    pub facility: Option<String>,

    /// Path to an extra CA certificate.
    pub ca_cert: Option<PathBuf>,
}

fn default_smartphone_id() -> String {
    "multimatic".into()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            password_env: None,
            smartphone_id: default_smartphone_id(),
            base_url: None,
            timeout: None,
            facility: None,
            ca_cert: None,
        }
    }
}

impl Config {
    /// Pick a profile by name, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, &Profile), ConfigError> {
        let name = name
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into());

        self.profiles
            .get(&name)
            .map(|p| (name.clone(), p))
            .ok_or(ConfigError::ProfileNotFound { name })
    }

    /// Render as TOML with plaintext passwords masked.
    pub fn to_redacted_toml(&self) -> Result<String, ConfigError> {
        let profiles = self
            .profiles
            .iter()
            .map(|(name, p)| {
                let mut p = p.clone();
                if p.password.is_some() {
                    p.password = Some("********".into());
                }
                (name.clone(), p)
            })
            .collect();

        let redacted = Config {
            default_profile: self.default_profile.clone(),
            defaults: Defaults {
                timeout: self.defaults.timeout,
            },
            profiles,
        };
        Ok(toml::to_string_pretty(&redacted)?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "multimatic", "multimatic").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("multimatic");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from `path` + environment.
///
/// A missing file is not an error; defaults and env vars still apply.
/// Nested keys use a double underscore, e.g.
/// `MULTIMATIC_PROFILES__HOME__FACILITY`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MULTIMATIC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the account username: profile, then `MULTIMATIC_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    resolve_username_with(profile, profile_name, env_var)
}

/// Resolve the account password.
///
/// Order: the env var named by `password_env`, then `MULTIMATIC_PASSWORD`,
/// then the plaintext `password` field.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_password_with(profile, profile_name, env_var)
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn resolve_username_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| env(USERNAME_ENV))
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
            what: "username",
        })
}

fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(pw) = profile.password_env.as_deref().and_then(&env) {
        return Ok(SecretString::from(pw));
    }

    // 2. Global env var
    if let Some(pw) = env(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
        what: "password",
    })
}

/// Build a `ClientConfig` from a profile.
///
/// `default_timeout` (seconds) applies when the profile sets none.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    default_timeout: u64,
) -> Result<ClientConfig, ConfigError> {
    let credentials = AccountCredentials {
        username: resolve_username(profile, profile_name)?,
        password: resolve_password(profile, profile_name)?,
        smartphone_id: profile.smartphone_id.clone(),
    };

    let mut config = ClientConfig::new(credentials);

    if let Some(ref raw) = profile.base_url {
        config.base_url = raw.parse().map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
    }
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(default_timeout));
    config.ca_cert.clone_from(&profile.ca_cert);

    Ok(config)
}
