use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot credential; also the root of the init-data verification secret.
    pub bot_token: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Upper bound for one outbound Bot API call, in seconds.
    #[serde(default = "default_send_timeout")]
    pub send_timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_send_timeout() -> u64 {
    5
}

impl Config {
    /// Load `config.toml` (path overridable via CONFIG_PATH); a missing file
    /// falls back to environment variables and defaults. Environment
    /// variables override the file either way.
    pub fn from_toml() -> Result<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::from_toml_path(&config_path)
    }

    pub fn from_toml_path(config_path: &str) -> Result<Self> {
        use std::io::ErrorKind;

        let mut config: Config = match std::fs::read_to_string(config_path) {
            Ok(config_str) => toml::from_str(&config_str)
                .with_context(|| format!("Failed to parse {config_path}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: get_env("DATABASE_URL")
                            .unwrap_or_else(|| "sqlite://gift_roulette.db?mode=rwc".to_string()),
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    telegram: TelegramConfig {
                        bot_token: get_env("BOT_TOKEN").unwrap_or_default(),
                        api_base: get_env("TELEGRAM_API_BASE").unwrap_or_else(default_api_base),
                        send_timeout_secs: get_env_parse(
                            "TELEGRAM_SEND_TIMEOUT_SECS",
                            default_send_timeout(),
                        ),
                    },
                }
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {config_path}"));
            }
        };

        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("BOT_TOKEN") {
            config.telegram.bot_token = v;
        }
        if let Ok(v) = env::var("TELEGRAM_API_BASE") {
            config.telegram.api_base = v;
        }
        if let Ok(v) = env::var("TELEGRAM_SEND_TIMEOUT_SECS")
            && let Ok(n) = v.parse()
        {
            config.telegram.send_timeout_secs = n;
        }

        Ok(config)
    }
}
