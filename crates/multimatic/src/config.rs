//! CLI-side configuration: picks the profile, applies flag overrides and
//! hands a finished `ClientConfig` to core.

use std::path::PathBuf;

use multimatic_config::{Config, Profile, config_path, load_config_from, profile_to_client_config};
use multimatic_core::ClientConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a connected command needs from configuration.
pub struct Resolved {
    pub profile_name: String,
    pub client: ClientConfig,
    /// Facility serial from `--facility` or the profile.
    pub facility: Option<String>,
}

/// Config file path: `--config` if given, else the platform default.
pub fn active_config_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(load_config_from(&active_config_path(global))?)
}

/// Resolve the active profile and apply CLI flag overrides.
///
/// A profile named explicitly with `--profile` must exist. Without one the
/// default profile is used if present, otherwise flags and env vars alone.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load(global)?;

    let profile_name = global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                path: active_config_path(global).display().to_string(),
            });
        }
        None => Profile::default(),
    };

    apply_overrides(&mut profile, global);

    let client = profile_to_client_config(&profile, &profile_name, cfg.defaults.timeout)?;
    tracing::debug!(profile = %profile_name, base_url = %client.base_url, "resolved client config");

    Ok(Resolved {
        profile_name,
        client,
        facility: profile.facility,
    })
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if let Some(ref base_url) = global.base_url {
        profile.base_url = Some(base_url.clone());
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if let Some(ref facility) = global.facility {
        profile.facility = Some(facility.clone());
    }
}
