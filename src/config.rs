//! # Configuration — Environment Variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `KAI_BIND_ADDR` | `0.0.0.0:3000` | HTTP listen address |
//! | `KAI_LEXICON_PATH` | built-in | lexicon JSON document |
//! | `KAI_TRANSLATION_API_HOST` | unset | translation service; unset disables translation |
//! | `KAI_TRANSLATION_API_KEY` | unset | sent as `X-API-Key` |
//! | `KAI_TRANSLATION_TIMEOUT_SECS` | `8` | bound on one translation call |
//! | `KAI_ESCALATION_WINDOW_MINUTES` | `30` | insistence window |
//! | `KAI_HEALTH_WORKERS` | unset | `name:phone[:role]`, comma-separated |
//!
//! A `.env` file in the working directory is loaded first when present.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use dotenvy::dotenv;

use crate::escalation::tracker::DEFAULT_WINDOW_MINUTES;
use crate::escalation::HealthWorkerContact;
use crate::orchestrator::EngineSettings;
use crate::triage::DEFAULT_TRANSLATION_TIMEOUT;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_ROLE: &str = "Health Worker";

/// Translation service endpoint and credentials.
#[derive(Debug, Clone)]
pub struct TranslationConfig {
    pub host: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub lexicon_path: Option<PathBuf>,
    pub translation: Option<TranslationConfig>,
    pub translation_timeout: Duration,
    pub escalation_window_minutes: i64,
    pub health_workers: Vec<HealthWorkerContact>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let translation = match (get("KAI_TRANSLATION_API_HOST"), get("KAI_TRANSLATION_API_KEY")) {
            (Some(host), api_key) => Some(TranslationConfig {
                host,
                api_key: api_key.unwrap_or_default(),
            }),
            (None, _) => None,
        };

        let translation_timeout = match get("KAI_TRANSLATION_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.parse()
                    .context("KAI_TRANSLATION_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            None => DEFAULT_TRANSLATION_TIMEOUT,
        };

        let escalation_window_minutes = match get("KAI_ESCALATION_WINDOW_MINUTES") {
            Some(v) => v
                .parse()
                .context("KAI_ESCALATION_WINDOW_MINUTES must be a whole number of minutes")?,
            None => DEFAULT_WINDOW_MINUTES,
        };
        if escalation_window_minutes <= 0 {
            bail!("KAI_ESCALATION_WINDOW_MINUTES must be positive");
        }

        let health_workers = match get("KAI_HEALTH_WORKERS") {
            Some(v) => parse_health_workers(&v).context("KAI_HEALTH_WORKERS is malformed")?,
            None => Vec::new(),
        };

        Ok(Self {
            bind_addr: get("KAI_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            lexicon_path: get("KAI_LEXICON_PATH").map(PathBuf::from),
            translation,
            translation_timeout,
            escalation_window_minutes,
            health_workers,
        })
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            translation_timeout: self.translation_timeout,
            escalation_window: chrono::Duration::minutes(self.escalation_window_minutes),
        }
    }
}

/// Parses `name:phone[:role]` entries separated by commas.
pub fn parse_health_workers(raw: &str) -> Result<Vec<HealthWorkerContact>> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let mut parts = item.splitn(3, ':').map(str::trim);
            let name = parts.next().unwrap_or_default();
            let phone = parts.next().unwrap_or_default();
            if phone.is_empty() {
                bail!("`{item}` has no phone number");
            }
            let role = parts.next().filter(|r| !r.is_empty()).unwrap_or(DEFAULT_ROLE);
            Ok(HealthWorkerContact {
                name: name.to_string(),
                phone: phone.to_string(),
                role: role.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let c = config(&[]).unwrap();
        assert_eq!(c.bind_addr, "0.0.0.0:3000");
        assert!(c.lexicon_path.is_none());
        assert!(c.translation.is_none());
        assert_eq!(c.translation_timeout, Duration::from_secs(8));
        assert_eq!(c.escalation_window_minutes, 30);
        assert!(c.health_workers.is_empty());
    }

    #[test]
    fn translation_needs_a_host() {
        let c = config(&[("KAI_TRANSLATION_API_KEY", "secret")]).unwrap();
        assert!(c.translation.is_none());

        let c = config(&[
            ("KAI_TRANSLATION_API_HOST", "https://translate.example.org"),
            ("KAI_TRANSLATION_API_KEY", "secret"),
            ("KAI_TRANSLATION_TIMEOUT_SECS", "3"),
        ])
        .unwrap();
        let t = c.translation.unwrap();
        assert_eq!(t.host, "https://translate.example.org");
        assert_eq!(t.api_key, "secret");
        assert_eq!(c.translation_timeout, Duration::from_secs(3));
    }

    #[test]
    fn bad_numbers_are_rejected() {
        assert!(config(&[("KAI_TRANSLATION_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config(&[("KAI_ESCALATION_WINDOW_MINUTES", "0")]).is_err());
    }

    #[test]
    fn health_workers_default_their_role() {
        let workers = parse_health_workers("Aminata:+23276000001:Nurse, Ibrahim:+23276000002,").unwrap();
        assert_eq!(workers.len(), 2);
        assert_eq!(workers[0].role, "Nurse");
        assert_eq!(workers[1].name, "Ibrahim");
        assert_eq!(workers[1].role, "Health Worker");
    }

    #[test]
    fn health_worker_without_phone_is_an_error() {
        assert!(parse_health_workers("Aminata").is_err());
        assert!(config(&[("KAI_HEALTH_WORKERS", "Aminata:")]).is_err());
    }

    #[test]
    fn engine_settings_follow_config() {
        let c = config(&[("KAI_ESCALATION_WINDOW_MINUTES", "45")]).unwrap();
        assert_eq!(c.engine_settings().escalation_window, chrono::Duration::minutes(45));
    }
}
