//! Environment-based configuration.
//!
//! The remote backend is considered enabled only when the minimal credential
//! pair (API key + project id) is present. That decision is made once, here,
//! and carried through `AppConfig` into the stores and views; nothing
//! downstream re-derives it from the environment.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Named credentials for the remote document backend.
///
/// All optional: an empty environment simply means local-only operation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub app_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub sender_id: Option<String>,
}

impl RemoteConfig {
    /// Read credentials from `WAITLIST_*` environment variables.
    ///
    /// Blank values are treated as absent.
    pub fn from_env() -> Self {
        Self {
            api_key: env_string("WAITLIST_API_KEY"),
            auth_domain: env_string("WAITLIST_AUTH_DOMAIN"),
            project_id: env_string("WAITLIST_PROJECT_ID"),
            app_id: env_string("WAITLIST_APP_ID"),
            storage_bucket: env_string("WAITLIST_STORAGE_BUCKET"),
            sender_id: env_string("WAITLIST_SENDER_ID"),
        }
    }

    /// Whether the minimal credential pair is present.
    pub fn minimal_present(&self) -> bool {
        self.api_key.is_some() && self.project_id.is_some()
    }
}

/// Application configuration, computed once at startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote backend credentials.
    pub remote: RemoteConfig,

    /// Directory backing the local key-value storage.
    pub storage_dir: PathBuf,
}

impl AppConfig {
    /// Build configuration from the environment.
    pub fn from_env() -> Self {
        Self {
            remote: RemoteConfig::from_env(),
            storage_dir: env_string("WAITLIST_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./waitlist")),
        }
    }

    /// Whether the remote store is authoritative for display.
    pub fn remote_enabled(&self) -> bool {
        self.remote.minimal_present()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote: RemoteConfig::default(),
            storage_dir: PathBuf::from("./waitlist"),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(api_key: Option<&str>, project_id: Option<&str>) -> RemoteConfig {
        RemoteConfig {
            api_key: api_key.map(String::from),
            project_id: project_id.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_enabled_requires_both_credentials() {
        assert!(!creds(None, None).minimal_present());
        assert!(!creds(Some("key"), None).minimal_present());
        assert!(!creds(None, Some("proj")).minimal_present());
        assert!(creds(Some("key"), Some("proj")).minimal_present());
    }

    #[test]
    fn test_default_config_is_local_only() {
        let config = AppConfig::default();
        assert!(!config.remote_enabled());
        assert_eq!(config.storage_dir, PathBuf::from("./waitlist"));
    }

    #[test]
    fn test_from_env_reads_credentials() {
        // Single test touching the process environment; keeps the env vars
        // out of reach of parallel tests.
        env::set_var("WAITLIST_API_KEY", "test-key");
        env::set_var("WAITLIST_PROJECT_ID", "test-proj");
        env::set_var("WAITLIST_AUTH_DOMAIN", "  ");

        let config = AppConfig::from_env();
        assert!(config.remote_enabled());
        assert_eq!(config.remote.api_key.as_deref(), Some("test-key"));
        // Blank counts as absent.
        assert!(config.remote.auth_domain.is_none());

        env::remove_var("WAITLIST_API_KEY");
        env::remove_var("WAITLIST_PROJECT_ID");
        env::remove_var("WAITLIST_AUTH_DOMAIN");
    }
}
