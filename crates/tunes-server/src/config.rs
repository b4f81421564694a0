//! Server Configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).
//! Database settings fall back to local-development defaults; gateway
//! credentials never do.

use std::env;
use std::str::FromStr;

use thiserror::Error;
use tunes_store::MySqlConnectOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Where orders are persisted
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process tables, lost on restart
    Memory,

    /// MySQL server
    MySql(DatabaseTarget),
}

/// How to reach the MySQL server
#[derive(Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// `DATABASE_URL`, already percent-encoded by whoever wrote it
    Url(String),

    /// Individual `DB_*` variables, taken verbatim
    Parts {
        host: String,
        port: Option<u16>,
        user: String,
        password: Option<String>,
        name: String,
    },
}

impl DatabaseTarget {
    /// Build driver options; credentials never pass through a URL string
    pub fn connect_options(&self) -> Result<MySqlConnectOptions, ConfigError> {
        match self {
            DatabaseTarget::Url(url) => {
                MySqlConnectOptions::from_str(url).map_err(|_| ConfigError::Invalid {
                    name: "DATABASE_URL",
                    value: "[REDACTED]".into(),
                })
            }
            DatabaseTarget::Parts { host, port, user, password, name } => {
                let mut options = MySqlConnectOptions::new()
                    .host(host)
                    .username(user)
                    .database(name);
                if let Some(port) = port {
                    options = options.port(*port);
                }
                if let Some(password) = password {
                    options = options.password(password);
                }
                Ok(options)
            }
        }
    }
}

impl std::fmt::Debug for DatabaseTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseTarget::Url(_) => f.write_str("Url([REDACTED])"),
            DatabaseTarget::Parts { host, port, user, password, name } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("password", &password.as_ref().map(|_| "[REDACTED]"))
                .field("name", name)
                .finish(),
        }
    }
}

/// Settings that shape the checkout itself
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// ISO currency sent to the gateway
    pub currency: String,

    /// Merchant name shown in the hosted checkout
    pub merchant_name: String,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            currency: "INR".into(),
            merchant_name: "ForeverTunes".into(),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub store: StoreBackend,
    pub run_migrations: bool,
    pub static_dir: String,
    pub checkout: CheckoutSettings,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let lookup = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self::from_lookup(lookup)
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store = match lookup("STORE_BACKEND").as_deref().unwrap_or("mysql") {
            "memory" => StoreBackend::Memory,
            "mysql" => {
                let target = match lookup("DATABASE_URL") {
                    Some(url) => DatabaseTarget::Url(url),
                    None => database_parts(&lookup)?,
                };
                target.connect_options()?;
                StoreBackend::MySql(target)
            }
            other => {
                return Err(ConfigError::Invalid {
                    name: "STORE_BACKEND",
                    value: other.to_owned(),
                });
            }
        };

        let run_migrations = match lookup("DB_MIGRATE") {
            None => true,
            Some(v) => v.parse::<bool>().map_err(|_| ConfigError::Invalid {
                name: "DB_MIGRATE",
                value: v,
            })?,
        };

        let defaults = CheckoutSettings::default();
        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            store,
            run_migrations,
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "static".into()),
            checkout: CheckoutSettings {
                currency: lookup("GATEWAY_CURRENCY").unwrap_or(defaults.currency),
                merchant_name: lookup("MERCHANT_NAME").unwrap_or(defaults.merchant_name),
            },
        })
    }
}

/// Connection target from the `DB_*` variables
fn database_parts(lookup: &impl Fn(&str) -> Option<String>) -> Result<DatabaseTarget, ConfigError> {
    let port = match lookup("DB_PORT") {
        None => None,
        Some(v) => Some(v.parse::<u16>().map_err(|_| ConfigError::Invalid {
            name: "DB_PORT",
            value: v,
        })?),
    };

    Ok(DatabaseTarget::Parts {
        host: lookup("DB_HOST").unwrap_or_else(|| "localhost".into()),
        port,
        user: lookup("DB_USER").unwrap_or_else(|| "root".into()),
        password: lookup("DB_PASS"),
        name: lookup("DB_NAME").unwrap_or_else(|| "forevertunes_db".into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    fn target(cfg: &AppConfig) -> &DatabaseTarget {
        match &cfg.store {
            StoreBackend::MySql(target) => target,
            StoreBackend::Memory => panic!("expected mysql backend"),
        }
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3000");
        let options = target(&cfg).connect_options().unwrap();
        assert_eq!(options.get_host(), "localhost");
        assert_eq!(options.get_username(), "root");
        assert_eq!(options.get_database(), Some("forevertunes_db"));
        assert!(cfg.run_migrations);
        assert_eq!(cfg.checkout.currency, "INR");
    }

    #[test]
    fn test_db_parts() {
        let cfg = config(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "3307"),
            ("DB_USER", "tunes"),
            ("DB_PASS", "pw"),
            ("DB_NAME", "shop"),
        ])
        .unwrap();
        let options = target(&cfg).connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 3307);
        assert_eq!(options.get_username(), "tunes");
        assert_eq!(options.get_database(), Some("shop"));
    }

    #[test]
    fn test_db_password_with_url_delimiters_is_kept_verbatim() {
        let cfg = config(&[
            ("DB_HOST", "db.internal"),
            ("DB_USER", "tunes"),
            ("DB_PASS", "p@ss:w/rd"),
            ("DB_NAME", "shop"),
        ])
        .unwrap();
        let target = target(&cfg);
        assert!(matches!(
            target,
            DatabaseTarget::Parts { password: Some(p), .. } if p == "p@ss:w/rd"
        ));

        let options = target.connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_username(), "tunes");
        assert_eq!(options.get_database(), Some("shop"));
        assert!(!format!("{cfg:?}").contains("p@ss"));
    }

    #[test]
    fn test_database_url_wins() {
        let cfg = config(&[("DATABASE_URL", "mysql://x@y/z"), ("DB_HOST", "ignored")]).unwrap();
        assert_eq!(target(&cfg), &DatabaseTarget::Url("mysql://x@y/z".into()));
        let options = target(&cfg).connect_options().unwrap();
        assert_eq!(options.get_host(), "y");
        assert_eq!(options.get_database(), Some("z"));
    }

    #[test]
    fn test_memory_backend_and_invalid_values() {
        assert_eq!(config(&[("STORE_BACKEND", "memory")]).unwrap().store, StoreBackend::Memory);
        assert!(config(&[("STORE_BACKEND", "postgres")]).is_err());
        assert!(config(&[("DB_MIGRATE", "sometimes")]).is_err());
        assert!(config(&[("DB_PORT", "mysql")]).is_err());
        assert!(config(&[("DATABASE_URL", "not a url")]).is_err());
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let cfg = config(&[("DATABASE_URL", "mysql://u:secret@h/d")]).unwrap();
        assert!(!format!("{cfg:?}").contains("secret"));
    }
}
