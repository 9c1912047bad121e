use crate::env::Environment;

/// Program name or path of the delegate.
pub const DELEGATE_VAR: &str = "STACKX_DELEGATE";
/// `tracing` filter directive, e.g. `debug` or `docker_stackx=trace`.
pub const LOG_VAR: &str = "STACKX_LOG";

pub const DEFAULT_DELEGATE: &str = "docker";
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Runtime settings, read once from the inherited environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub delegate: String,
    pub log_filter: String,
}

impl Settings {
    pub fn from_env(env: &Environment) -> Self {
        let read = |key: &str, default: &str| {
            env.get_str(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default)
                .to_string()
        };
        Self {
            delegate: read(DELEGATE_VAR, DEFAULT_DELEGATE),
            log_filter: read(LOG_VAR, DEFAULT_LOG_FILTER),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delegate: DEFAULT_DELEGATE.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
