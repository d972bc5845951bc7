//! Server settings read from the environment.

use std::env;
use std::path::PathBuf;

/// Settings for the HTTP server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Socket address to bind, e.g. "0.0.0.0:3000".
    pub bind_addr: String,
    /// Directory holding the rate table YAML files.
    pub rates_dir: PathBuf,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            rates_dir: PathBuf::from("./config/rates"),
            log_filter: "tax_engine=info,axum=info".to_string(),
        }
    }
}

impl ServerSettings {
    /// Loads settings from environment variables, reading a `.env` file first
    /// if present.
    ///
    /// - `TAX_ENGINE_BIND_ADDR`
    /// - `TAX_ENGINE_RATES_DIR`
    /// - `TAX_ENGINE_LOG`
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: lookup("TAX_ENGINE_BIND_ADDR").unwrap_or(defaults.bind_addr),
            rates_dir: lookup("TAX_ENGINE_RATES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.rates_dir),
            log_filter: lookup("TAX_ENGINE_LOG").unwrap_or(defaults.log_filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_nothing_set() {
        let settings = ServerSettings::from_lookup(|_| None);
        assert_eq!(settings, ServerSettings::default());
    }

    #[test]
    fn test_values_override_defaults() {
        let vars: HashMap<&str, &str> = [
            ("TAX_ENGINE_BIND_ADDR", "127.0.0.1:8080"),
            ("TAX_ENGINE_RATES_DIR", "/etc/tax/rates"),
        ]
        .into_iter()
        .collect();

        let settings = ServerSettings::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(settings.bind_addr, "127.0.0.1:8080");
        assert_eq!(settings.rates_dir, PathBuf::from("/etc/tax/rates"));
        assert_eq!(settings.log_filter, ServerSettings::default().log_filter);
    }
}
