use chrono::{FixedOffset, Local, Offset};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_FETCH_LIMIT: usize = 1000;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub fetch_limit: usize,
    /// Offset used to turn transaction instants into calendar dates.
    pub utc_offset: FixedOffset,
    pub seed_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("DASHBOARD_PORT") {
            Some(p) => p.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "DASHBOARD_PORT",
                expected: "a port number",
                value: p,
            })?,
            None => 3000,
        };
        let fetch_limit = match lookup("DASHBOARD_FETCH_LIMIT") {
            Some(l) => match l.parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "DASHBOARD_FETCH_LIMIT",
                        expected: "a positive integer",
                        value: l,
                    })
                }
            },
            None => DEFAULT_FETCH_LIMIT,
        };
        let utc_offset = match lookup("DASHBOARD_UTC_OFFSET") {
            Some(o) => o.parse::<FixedOffset>().map_err(|_| ConfigError::Invalid {
                name: "DASHBOARD_UTC_OFFSET",
                expected: "an offset like +05:30",
                value: o,
            })?,
            None => Local::now().offset().fix(),
        };

        Ok(Self {
            host: lookup("DASHBOARD_HOST").unwrap_or_else(|| "127.0.0.1".into()),
            port,
            fetch_limit,
            utc_offset,
            seed_file: lookup("DASHBOARD_SEED_FILE")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:3000");
        assert_eq!(config.fetch_limit, DEFAULT_FETCH_LIMIT);
        assert_eq!(config.seed_file, None);
    }

    #[test]
    fn reads_all_values() {
        let config = config_from(&[
            ("DASHBOARD_HOST", "0.0.0.0"),
            ("DASHBOARD_PORT", "8080"),
            ("DASHBOARD_FETCH_LIMIT", "250"),
            ("DASHBOARD_UTC_OFFSET", "+05:30"),
            ("DASHBOARD_SEED_FILE", "data/sample_transactions.json"),
        ])
        .unwrap();

        assert_eq!(config.address(), "0.0.0.0:8080");
        assert_eq!(config.fetch_limit, 250);
        assert_eq!(config.utc_offset, FixedOffset::east_opt(5 * 3600 + 1800).unwrap());
        assert_eq!(
            config.seed_file,
            Some(PathBuf::from("data/sample_transactions.json"))
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config_from(&[("DASHBOARD_PORT", "http")]).is_err());
        assert!(config_from(&[("DASHBOARD_FETCH_LIMIT", "0")]).is_err());
        assert!(config_from(&[("DASHBOARD_UTC_OFFSET", "IST")]).is_err());
    }
}
