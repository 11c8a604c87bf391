use crate::workflows::displacement::{
    AnalysisSettings, BaselineComposition, GroupAcceptancePolicy, AUTHORIZATION_THRESHOLD,
    DEFAULT_HOTEL_CAPACITY, DEFAULT_TAX_RATE,
};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub analysis: AnalysisSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            analysis: load_analysis_settings()?,
        })
    }
}

/// Hotel defaults applied to every analysis that does not bring its own.
fn load_analysis_settings() -> Result<AnalysisSettings, ConfigError> {
    let capacity = match env::var("HOTEL_CAPACITY") {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidCapacity)?,
        Err(_) => DEFAULT_HOTEL_CAPACITY,
    };
    if capacity == 0 {
        return Err(ConfigError::InvalidCapacity);
    }

    let tax_rate = parse_f64("HOTEL_TAX_RATE", DEFAULT_TAX_RATE)?;
    if tax_rate <= -1.0 {
        return Err(ConfigError::InvalidNumber {
            key: "HOTEL_TAX_RATE",
        });
    }
    let authorization_threshold = parse_f64("AUTHORIZATION_THRESHOLD", AUTHORIZATION_THRESHOLD)?;

    let acceptance = match env::var("GROUP_ACCEPTANCE_POLICY") {
        Ok(raw) => GroupAcceptancePolicy::parse(&raw)
            .ok_or(ConfigError::InvalidAcceptancePolicy { value: raw })?,
        Err(_) => GroupAcceptancePolicy::default(),
    };

    let baseline = match env::var("BASELINE_COMPOSITION") {
        Ok(raw) => BaselineComposition::parse(&raw)
            .ok_or(ConfigError::InvalidBaselineComposition { value: raw })?,
        Err(_) => BaselineComposition::default(),
    };

    Ok(AnalysisSettings {
        capacity,
        tax_rate,
        acceptance,
        baseline,
        authorization_threshold,
    })
}

fn parse_f64(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or(ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCapacity,
    InvalidNumber { key: &'static str },
    InvalidAcceptancePolicy { value: String },
    InvalidBaselineComposition { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCapacity => {
                write!(f, "HOTEL_CAPACITY must be a whole number of rooms above zero")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a finite number in range")
            }
            ConfigError::InvalidAcceptancePolicy { value } => write!(
                f,
                "GROUP_ACCEPTANCE_POLICY '{value}' must be honor_requested or net_of_displaced"
            ),
            ConfigError::InvalidBaselineComposition { value } => write!(
                f,
                "BASELINE_COMPOSITION '{value}' must be forecast_otb_and_groups or forecast_and_groups"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
