//! Build [`Config`] from environment variables and mounted secret files.

use crate::config::types::*;
use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Merge `.env` from the working directory (or a parent) into the process
/// environment. Existing variables win. Must run before the tracing subscriber
/// is installed so `RUST_LOG` from the file takes effect.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

pub fn load_dotenv_from(path: &Path) -> Option<PathBuf> {
    dotenvy::from_path(path).ok().map(|_| path.to_path_buf())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let target = match get("DATABASE_URL") {
            Some(url) => DatabaseTarget::Url(url),
            None => {
                let password = match get("DB_PASSWORD") {
                    Some(pw) => Some(pw),
                    None => match get("DB_PASSWORD_FILE") {
                        Some(path) => Some(read_secret(&path)?),
                        None => None,
                    },
                };
                DatabaseTarget::Parts {
                    host: get("DB_HOST").unwrap_or_else(|| "localhost".into()),
                    port: parse_or(&get, "DB_PORT", 5432)?,
                    user: get("DB_USER").unwrap_or_else(|| "postgres".into()),
                    password,
                    name: get("DB_NAME").unwrap_or_else(|| "students".into()),
                }
            }
        };

        let max_connections: u32 = parse_or(&get, "DB_MAX_CONNECTIONS", 5)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".into(),
            });
        }

        let database = DatabaseConfig {
            target,
            max_connections,
            acquire_timeout: Duration::from_secs(parse_or(&get, "DB_ACQUIRE_TIMEOUT_SECS", 5)?),
            statement_timeout: Duration::from_secs(parse_or(
                &get,
                "DB_STATEMENT_TIMEOUT_SECS",
                10,
            )?),
            create_database: parse_bool(&get, "DB_CREATE_DATABASE", false)?,
        };

        let defaults = HttpConfig::default();
        let http = HttpConfig {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or(&get, "PORT", defaults.port)?,
            api_prefix: match get("API_PREFIX") {
                Some(p) => normalize_prefix(&p),
                None => defaults.api_prefix,
            },
            request_timeout: Duration::from_secs(parse_or(
                &get,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            max_body_bytes: parse_or(&get, "MAX_BODY_BYTES", defaults.max_body_bytes)?,
        };

        let store_backend = match get("STORE_BACKEND") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                key: "STORE_BACKEND",
                value: v,
            })?,
            None => StoreBackend::Postgres,
        };

        Ok(Config {
            database,
            http,
            store_backend,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key, value: v }),
        None => Ok(default),
    }
}

fn parse_bool<G>(get: &G, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(v) => match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value: v }),
        },
        None => Ok(default),
    }
}

/// `api/v1/` -> `/api/v1`; `/` -> `` (root).
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

fn read_secret(path: &str) -> Result<String, ConfigError> {
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|source| ConfigError::SecretFile {
            path: path.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_without_env() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.store_backend, StoreBackend::Postgres);
        assert_eq!(cfg.http, HttpConfig::default());
        assert_eq!(cfg.database.max_connections, 5);
        assert!(!cfg.database.create_database);
        assert_eq!(
            cfg.database.target,
            DatabaseTarget::Parts {
                host: "localhost".into(),
                port: 5432,
                user: "postgres".into(),
                password: None,
                name: "students".into(),
            }
        );
    }

    #[test]
    fn database_url_takes_precedence() {
        let cfg = config_from(&[
            ("DATABASE_URL", "postgres://app:pw@db/school"),
            ("DB_HOST", "ignored"),
        ])
        .unwrap();
        assert_eq!(
            cfg.database.target,
            DatabaseTarget::Url("postgres://app:pw@db/school".into())
        );
    }

    #[test]
    fn parts_are_read() {
        let cfg = config_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_USER", "app"),
            ("DB_PASSWORD", "pw"),
            ("DB_NAME", "school"),
        ])
        .unwrap();
        match cfg.database.target {
            DatabaseTarget::Parts {
                host,
                port,
                user,
                password,
                name,
            } => {
                assert_eq!(host, "db.internal");
                assert_eq!(port, 6543);
                assert_eq!(user, "app");
                assert_eq!(password.as_deref(), Some("pw"));
                assert_eq!(name, "school");
            }
            other => panic!("unexpected target {other:?}"),
        }
    }

    #[test]
    fn password_file_is_read_and_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "from-vault").unwrap();
        let path = file.path().to_string_lossy().to_string();
        let cfg = config_from(&[("DB_PASSWORD_FILE", path.as_str())]).unwrap();
        match cfg.database.target {
            DatabaseTarget::Parts { password, .. } => {
                assert_eq!(password.as_deref(), Some("from-vault"))
            }
            other => panic!("unexpected target {other:?}"),
        }
    }

    #[test]
    fn password_env_wins_over_file() {
        let cfg = config_from(&[
            ("DB_PASSWORD", "direct"),
            ("DB_PASSWORD_FILE", "/nonexistent/secret"),
        ])
        .unwrap();
        match cfg.database.target {
            DatabaseTarget::Parts { password, .. } => assert_eq!(password.as_deref(), Some("direct")),
            other => panic!("unexpected target {other:?}"),
        }
    }

    #[test]
    fn missing_password_file_is_an_error() {
        let err = config_from(&[("DB_PASSWORD_FILE", "/nonexistent/secret")]).unwrap_err();
        assert!(matches!(err, ConfigError::SecretFile { .. }));
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        match err {
            ConfigError::Invalid { key, value } => {
                assert_eq!(key, "PORT");
                assert_eq!(value, "eighty");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        assert!(config_from(&[("DB_MAX_CONNECTIONS", "0")]).is_err());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = config_from(&[("PORT", "  "), ("DB_HOST", "")]).unwrap();
        assert_eq!(cfg.http.port, 5000);
    }

    #[test]
    fn bool_and_backend_parsing() {
        let cfg = config_from(&[("DB_CREATE_DATABASE", "yes"), ("STORE_BACKEND", "memory")]).unwrap();
        assert!(cfg.database.create_database);
        assert_eq!(cfg.store_backend, StoreBackend::Memory);
        assert!(config_from(&[("DB_CREATE_DATABASE", "maybe")]).is_err());
        assert!(config_from(&[("STORE_BACKEND", "sqlite")]).is_err());
    }

    #[test]
    fn prefix_is_normalized() {
        assert_eq!(normalize_prefix("api/v2/"), "/api/v2");
        assert_eq!(normalize_prefix("/"), "");
        let cfg = config_from(&[("API_PREFIX", "students-api")]).unwrap();
        assert_eq!(cfg.http.api_prefix, "/students-api");
    }
}
