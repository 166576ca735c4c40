//! Application constants and runtime configuration.
//!
//! Values are read once from the environment and then passed around
//! explicitly; nothing here is a process-wide singleton.

use std::time::Duration;

use serde::Serialize;

/// Application-level constants
pub const APP_NAME: &str = "Greko";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ═══════════════════════════════════════════════════════════
// Defaults
// ═══════════════════════════════════════════════════════════

/// Model for the primary project extraction.
pub const EXTRACTION_MODEL: &str = "gemini-3-flash-preview";
/// Model for deep analyses, updates and short answers.
pub const ANALYSIS_MODEL: &str = "gemini-1.5-flash";
/// Model for the long-form holistic report.
pub const REPORT_MODEL: &str = "gemini-3-pro-preview";
/// Model retried once after any primary failure.
pub const FALLBACK_MODEL: &str = "gemini-1.5-flash";

pub const DISPATCH_TIMEOUT_SECS: u64 = 60;
pub const STRUCTURED_TEMPERATURE: f32 = 0.2;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const API_KEY_FALLBACK_ENV: &str = "API_KEY";
pub const API_BASE_ENV: &str = "GREKO_API_BASE";
pub const TIMEOUT_ENV: &str = "GREKO_TIMEOUT_SECS";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "greko_lib=debug,greko=debug,warn"
    } else {
        "greko_lib=info,greko=info,warn"
    }
}

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Connection settings for the generative service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub api_key: String,
    pub base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_key: get(API_KEY_ENV)
                .or_else(|| get(API_KEY_FALLBACK_ENV))
                .unwrap_or_default(),
            base_url: get(API_BASE_ENV)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        }
    }
}

/// What happens to a call that lost the timeout race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbandonPolicy {
    /// The call keeps running in the background and its result is dropped.
    #[default]
    Detach,
    /// The call's future is dropped at the deadline.
    Cancel,
}

/// Timeout and fallback settings for the dispatch cascade.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchConfig {
    pub timeout: Duration,
    pub fallback_model: String,
    pub abandon: AbandonPolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DISPATCH_TIMEOUT_SECS),
            fallback_model: FALLBACK_MODEL.to_string(),
            abandon: AbandonPolicy::default(),
        }
    }
}

impl DispatchConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable or zero timeouts keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(secs) = lookup(TIMEOUT_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_abandon(mut self, abandon: AbandonPolicy) -> Self {
        self.abandon = abandon;
        self
    }
}

/// Preferred model per kind of call.
#[derive(Debug, Clone, Serialize)]
pub struct ModelConfig {
    pub extraction: String,
    /// Shared by every deep analysis, the update workflow and Q&A.
    pub analysis: String,
    pub report: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            extraction: EXTRACTION_MODEL.to_string(),
            analysis: ANALYSIS_MODEL.to_string(),
            report: REPORT_MODEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn app_name_is_greko() {
        assert_eq!(APP_NAME, "Greko");
    }

    #[test]
    fn service_config_prefers_gemini_key() {
        let env = vars(&[(API_KEY_ENV, "primary"), (API_KEY_FALLBACK_ENV, "legacy")]);
        let config = ServiceConfig::from_lookup(|k| env.get(k).cloned());
        assert_eq!(config.api_key, "primary");
        assert_eq!(config.base_url, DEFAULT_API_BASE);
    }

    #[test]
    fn service_config_falls_back_to_api_key() {
        let env = vars(&[(API_KEY_ENV, "  "), (API_KEY_FALLBACK_ENV, "legacy")]);
        let config = ServiceConfig::from_lookup(|k| env.get(k).cloned());
        assert_eq!(config.api_key, "legacy");
    }

    #[test]
    fn service_config_trims_base_url() {
        let env = vars(&[(API_BASE_ENV, "http://localhost:8080/v1beta/")]);
        let config = ServiceConfig::from_lookup(|k| env.get(k).cloned());
        assert_eq!(config.base_url, "http://localhost:8080/v1beta");
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn dispatch_defaults() {
        let config = DispatchConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.fallback_model, FALLBACK_MODEL);
        assert_eq!(config.abandon, AbandonPolicy::Detach);
    }

    #[test]
    fn dispatch_timeout_from_env() {
        let env = vars(&[(TIMEOUT_ENV, "90")]);
        let config = DispatchConfig::from_lookup(|k| env.get(k).cloned());
        assert_eq!(config.timeout, Duration::from_secs(90));
    }

    #[test]
    fn dispatch_ignores_bad_timeout() {
        for raw in ["zero", "0", "-5", ""] {
            let env = vars(&[(TIMEOUT_ENV, raw)]);
            let config = DispatchConfig::from_lookup(|k| env.get(k).cloned());
            assert_eq!(config.timeout, Duration::from_secs(DISPATCH_TIMEOUT_SECS));
        }
    }

    #[test]
    fn default_filter_scopes_crate() {
        assert!(default_log_filter().contains("greko_lib="));
    }
}
