use crate::screening::{CombinationPolicy, RuleConfig};
use axum::http::HeaderValue;
use rust_decimal::Decimal;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppInfo,
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub cors: CorsConfig,
    pub rules: RuleConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let app = AppInfo {
            name: env::var("APP_NAME").unwrap_or_else(|_| "Antifraud Rules API".to_string()),
            version: env::var("APP_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
        };

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match optional_var("APP_LOG_FORMAT") {
            None => LogFormat::Compact,
            Some(raw) => LogFormat::parse(&raw).ok_or(ConfigError::Invalid {
                key: "APP_LOG_FORMAT",
                value: raw,
                expected: "`compact` or `json`",
            })?,
        };

        Ok(Self {
            app,
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            cors: CorsConfig::load()?,
            rules: load_rule_config()?,
        })
    }
}

/// Name and version reported by the service endpoints.
#[derive(Debug, Clone)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: AllowedOrigins,
}

impl CorsConfig {
    fn load() -> Result<Self, ConfigError> {
        let raw = optional_var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        let origins: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .collect();

        if origins.is_empty() || origins.contains(&"*") {
            return Ok(Self {
                allowed_origins: AllowedOrigins::Any,
            });
        }

        let list = origins
            .into_iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                    key: "CORS_ORIGINS",
                    value: origin.to_string(),
                    expected: "`*` or a comma-separated list of origins",
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            allowed_origins: AllowedOrigins::List(list),
        })
    }

    /// Origins rendered for diagnostics.
    pub fn origin_labels(&self) -> Vec<String> {
        match &self.allowed_origins {
            AllowedOrigins::Any => vec!["*".to_string()],
            AllowedOrigins::List(origins) => origins
                .iter()
                .map(|origin| String::from_utf8_lossy(origin.as_bytes()).into_owned())
                .collect(),
        }
    }
}

fn load_rule_config() -> Result<RuleConfig, ConfigError> {
    let defaults = RuleConfig::default();

    let high_value_threshold = non_negative_decimal(
        "FRAUD_HIGH_VALUE_THRESHOLD",
        defaults.high_value_threshold,
    )?;
    let suspicious_hour_start = bounded_hour(
        "FRAUD_SUSPICIOUS_HOUR_START",
        defaults.suspicious_hour_start,
        23,
    )?;
    let suspicious_hour_end =
        bounded_hour("FRAUD_SUSPICIOUS_HOUR_END", defaults.suspicious_hour_end, 24)?;
    let large_distance_threshold = non_negative_decimal(
        "FRAUD_LARGE_DISTANCE_KM",
        defaults.large_distance_threshold,
    )?;
    let new_account_age_threshold = parsed_var(
        "FRAUD_NEW_ACCOUNT_AGE_DAYS",
        defaults.new_account_age_threshold,
        "a non-negative integer",
    )?;
    let transaction_count_threshold = parsed_var(
        "FRAUD_TRANSACTION_COUNT_THRESHOLD",
        defaults.transaction_count_threshold,
        "a non-negative integer",
    )?;

    let high_volume_threshold = parsed_var(
        "FRAUD_HIGH_VOLUME_THRESHOLD",
        defaults.high_volume_threshold,
        "a non-negative integer",
    )?;

    let cutoff = weighted_cutoff(
        "FRAUD_WEIGHTED_CUTOFF",
        parsed_var(
            "FRAUD_WEIGHTED_CUTOFF",
            CombinationPolicy::default_cutoff(),
            CUTOFF_EXPECTED,
        )?,
    )?;

    let policy = match optional_var("FRAUD_COMBINATION_POLICY") {
        None => defaults.policy,
        Some(raw) => match raw.to_ascii_lowercase().replace('-', "_").as_str() {
            "first_match" => CombinationPolicy::FirstMatch,
            "weighted_sum" => CombinationPolicy::WeightedSum { cutoff },
            _ => {
                return Err(ConfigError::Invalid {
                    key: "FRAUD_COMBINATION_POLICY",
                    value: raw,
                    expected: "`first_match` or `weighted_sum`",
                })
            }
        },
    };

    Ok(RuleConfig {
        high_value_threshold,
        suspicious_hour_start,
        suspicious_hour_end,
        large_distance_threshold,
        new_account_age_threshold,
        transaction_count_threshold,
        high_volume_threshold,
        policy,
    })
}

const CUTOFF_EXPECTED: &str = "a decimal between 0 and 1";

/// Check a weighted-sum cutoff; `key` names the setting in the error.
pub fn weighted_cutoff(key: &'static str, cutoff: Decimal) -> Result<Decimal, ConfigError> {
    if cutoff < Decimal::ZERO || cutoff > Decimal::ONE {
        return Err(ConfigError::Invalid {
            key,
            value: cutoff.to_string(),
            expected: CUTOFF_EXPECTED,
        });
    }
    Ok(cutoff)
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parsed_var<T: FromStr>(
    key: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match optional_var(key) {
        None => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|_| ConfigError::Invalid {
            key,
            value: raw,
            expected,
        }),
    }
}

fn non_negative_decimal(key: &'static str, default: Decimal) -> Result<Decimal, ConfigError> {
    let expected = "a non-negative decimal";
    let value = parsed_var(key, default, expected)?;
    if value < Decimal::ZERO {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            expected,
        });
    }
    Ok(value)
}

fn bounded_hour(key: &'static str, default: u8, max: u8) -> Result<u8, ConfigError> {
    let expected = "an hour of the day";
    let hour = parsed_var(key, default, expected)?;
    if hour > max {
        return Err(ConfigError::Invalid {
            key,
            value: hour.to_string(),
            expected,
        });
    }
    Ok(hour)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::Invalid {
                key,
                value,
                expected,
            } => write!(f, "{key} must be {expected} (found '{value}')"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::Invalid { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    const KEYS: [&str; 17] = [
        "APP_ENV",
        "APP_NAME",
        "APP_VERSION",
        "APP_HOST",
        "APP_PORT",
        "APP_LOG_LEVEL",
        "APP_LOG_FORMAT",
        "CORS_ORIGINS",
        "FRAUD_HIGH_VALUE_THRESHOLD",
        "FRAUD_SUSPICIOUS_HOUR_START",
        "FRAUD_SUSPICIOUS_HOUR_END",
        "FRAUD_LARGE_DISTANCE_KM",
        "FRAUD_NEW_ACCOUNT_AGE_DAYS",
        "FRAUD_TRANSACTION_COUNT_THRESHOLD",
        "FRAUD_HIGH_VOLUME_THRESHOLD",
        "FRAUD_COMBINATION_POLICY",
        "FRAUD_WEIGHTED_CUTOFF",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.format, LogFormat::Compact);
        assert_eq!(config.cors.allowed_origins, AllowedOrigins::Any);
        assert_eq!(config.rules, RuleConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8000));
        reset_env();
    }

    #[test]
    fn rule_thresholds_can_be_overridden() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FRAUD_HIGH_VALUE_THRESHOLD", "15000.50");
        env::set_var("FRAUD_SUSPICIOUS_HOUR_START", "22");
        env::set_var("FRAUD_SUSPICIOUS_HOUR_END", "5");
        env::set_var("FRAUD_TRANSACTION_COUNT_THRESHOLD", "10");
        env::set_var("FRAUD_HIGH_VOLUME_THRESHOLD", "20");
        env::set_var("FRAUD_COMBINATION_POLICY", "weighted-sum");
        env::set_var("FRAUD_WEIGHTED_CUTOFF", "0.6");

        let config = AppConfig::load().expect("config loads");

        assert_eq!(config.rules.high_value_threshold, Decimal::new(1_500_050, 2));
        assert_eq!(config.rules.suspicious_hour_start, 22);
        assert_eq!(config.rules.suspicious_hour_end, 5);
        assert_eq!(config.rules.transaction_count_threshold, 10);
        assert_eq!(config.rules.high_volume_threshold, 20);
        assert_eq!(
            config.rules.policy,
            CombinationPolicy::WeightedSum {
                cutoff: Decimal::new(6, 1)
            }
        );
        assert_eq!(config.rules.new_account_age_threshold, 30);
        reset_env();
    }

    #[test]
    fn malformed_threshold_is_a_startup_error() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FRAUD_HIGH_VALUE_THRESHOLD", "ten thousand");

        match AppConfig::load() {
            Err(ConfigError::Invalid { key, value, .. }) => {
                assert_eq!(key, "FRAUD_HIGH_VALUE_THRESHOLD");
                assert_eq!(value, "ten thousand");
            }
            other => panic!("expected invalid threshold error, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_out_of_range_hours_and_cutoffs() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FRAUD_SUSPICIOUS_HOUR_START", "24");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::Invalid {
                key: "FRAUD_SUSPICIOUS_HOUR_START",
                ..
            })
        ));

        for cutoff in ["1.5", "-0.1"] {
            reset_env();
            env::set_var("FRAUD_WEIGHTED_CUTOFF", cutoff);
            assert!(matches!(
                AppConfig::load(),
                Err(ConfigError::Invalid {
                    key: "FRAUD_WEIGHTED_CUTOFF",
                    ..
                })
            ));
        }
        reset_env();
    }

    #[test]
    fn weighted_cutoff_accepts_the_closed_unit_interval() {
        for cutoff in [Decimal::ZERO, Decimal::new(5, 1), Decimal::ONE] {
            assert_eq!(weighted_cutoff("--cutoff", cutoff).ok(), Some(cutoff));
        }

        match weighted_cutoff("--cutoff", Decimal::new(101, 2)) {
            Err(ConfigError::Invalid { key, value, .. }) => {
                assert_eq!(key, "--cutoff");
                assert_eq!(value, "1.01");
            }
            other => panic!("expected cutoff rejection, got {other:?}"),
        }
        assert!(weighted_cutoff("--cutoff", Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn unknown_policy_and_log_format_are_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FRAUD_COMBINATION_POLICY", "majority_vote");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::Invalid {
                key: "FRAUD_COMBINATION_POLICY",
                ..
            })
        ));

        reset_env();
        env::set_var("APP_LOG_FORMAT", "xml");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::Invalid {
                key: "APP_LOG_FORMAT",
                ..
            })
        ));
        reset_env();
    }

    #[test]
    fn cors_origins_are_parsed_as_a_list() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var(
            "CORS_ORIGINS",
            "http://localhost:3000, https://app.example.com",
        );

        let config = AppConfig::load().expect("config loads");

        assert_eq!(
            config.cors.origin_labels(),
            vec![
                "http://localhost:3000".to_string(),
                "https://app.example.com".to_string()
            ]
        );
        reset_env();
    }

    #[test]
    fn json_log_format_is_recognized() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_LOG_FORMAT", "JSON");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.telemetry.format, LogFormat::Json);
        reset_env();
    }
}
