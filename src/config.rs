use std::env;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub scheduler: SchedulerConfig,
    pub calendar: CalendarConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origin for the mobile/web client.
    pub frontend_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Base URL of the lesson assignment service (`/schedule`, `/submit_student`, `/len_students`).
    pub base_url: String,
    /// Request timeout. `None` keeps the transport default.
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Instructor name -> event color, in declaration order.
    pub instructor_colors: Vec<(String, String)>,
    /// Color for instructors missing from `instructor_colors`.
    pub default_color: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub lang: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of human-readable text.
    pub json: bool,
}

const DEFAULT_INSTRUCTOR_COLORS: &str = "Johnny=blue,Yotam=red,Yoni=green";

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let base_url = env::var("SCHEDULER_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        url::Url::parse(&base_url)
            .map_err(|_| ConfigError::InvalidValue("SCHEDULER_API_URL".to_string()))?;

        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,
                frontend_url: env::var("FRONTEND_URL")
                    .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            },
            scheduler: SchedulerConfig {
                base_url,
                timeout_seconds: match env::var("SCHEDULER_TIMEOUT_SECS") {
                    Ok(v) => Some(v.parse().map_err(|_| {
                        ConfigError::InvalidValue("SCHEDULER_TIMEOUT_SECS".to_string())
                    })?),
                    Err(_) => None,
                },
            },
            calendar: CalendarConfig {
                instructor_colors: parse_color_table(
                    &env::var("INSTRUCTOR_COLORS")
                        .unwrap_or_else(|_| DEFAULT_INSTRUCTOR_COLORS.to_string()),
                )?,
                default_color: env::var("DEFAULT_EVENT_COLOR")
                    .unwrap_or_else(|_| "gray".to_string()),
            },
            ui: UiConfig {
                lang: env::var("UI_LANG").unwrap_or_else(|_| "en".to_string()),
            },
            logging: LoggingConfig {
                json: match env::var("LOG_FORMAT") {
                    Ok(v) => v.eq_ignore_ascii_case("json"),
                    Err(_) => false,
                },
            },
        })
    }
}

/// Parse `Name=color,Name=color`. Empty entries are ignored.
fn parse_color_table(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, color) = entry
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidValue("INSTRUCTOR_COLORS".to_string()))?;
            let (name, color) = (name.trim(), color.trim());
            if name.is_empty() || color.is_empty() {
                return Err(ConfigError::InvalidValue("INSTRUCTOR_COLORS".to_string()));
            }
            Ok((name.to_string(), color.to_string()))
        })
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                frontend_url: "http://localhost:8081".to_string(),
            },
            scheduler: SchedulerConfig {
                base_url: "http://localhost:8000".to_string(),
                timeout_seconds: None,
            },
            calendar: CalendarConfig {
                instructor_colors: vec![
                    ("Johnny".to_string(), "blue".to_string()),
                    ("Yotam".to_string(), "red".to_string()),
                    ("Yoni".to_string(), "green".to_string()),
                ],
                default_color: "gray".to_string(),
            },
            ui: UiConfig {
                lang: "en".to_string(),
            },
            logging: LoggingConfig { json: false },
        }
    }
}
