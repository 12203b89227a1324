//! Runtime configuration resolved from environment variables.
//!
//! # Responsibility
//! - Resolve storage location, logging setup and form behavior for hosts.
//!
//! # Invariants
//! - Blank or unparseable values fall back to defaults; resolution never
//!   fails.

use crate::logging::default_log_level;
use crate::service::contact_form::FormClearPolicy;
use log::warn;
use std::path::PathBuf;

/// Overrides the local storage database file.
pub const ENV_DB_PATH: &str = "PHONEBOOK_DB_PATH";
/// Overrides the log level (`trace|debug|info|warn|error`).
pub const ENV_LOG_LEVEL: &str = "PHONEBOOK_LOG_LEVEL";
/// Overrides the rolling log directory. Must be absolute.
pub const ENV_LOG_DIR: &str = "PHONEBOOK_LOG_DIR";
/// Selects the form clear policy (`always|on_success`).
pub const ENV_FORM_CLEAR: &str = "PHONEBOOK_FORM_CLEAR";

const DEFAULT_DB_FILE_NAME: &str = "phonebook.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "phonebook-logs";

/// Resolved host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonebookConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub form_clear_policy: FormClearPolicy,
}

impl Default for PhonebookConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
            form_clear_policy: FormClearPolicy::default(),
        }
    }
}

impl PhonebookConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = non_blank(lookup(ENV_DB_PATH)) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_blank(lookup(ENV_LOG_LEVEL)) {
            config.log_level = level;
        }
        if let Some(dir) = non_blank(lookup(ENV_LOG_DIR)) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(raw) = non_blank(lookup(ENV_FORM_CLEAR)) {
            match FormClearPolicy::parse(&raw) {
                Some(policy) => config.form_clear_policy = policy,
                None => warn!(
                    "event=config_resolve module=config status=fallback key={} value={}",
                    ENV_FORM_CLEAR, raw
                ),
            }
        }

        config
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}
