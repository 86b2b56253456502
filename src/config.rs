//! Static monitor configuration
//!
//! Thresholds, intervals and the watched device list are compiled-in
//! constants; the monitor has no runtime reconfiguration. SMTP settings are
//! the one exception: relay host and credentials come from the environment
//! so they never live in the binary.

use std::time::Duration;

/// Base URL of the structured-data listing endpoint.
pub const DATA_SERVICE_URL: &str = "http://127.0.0.1:8084/listarDatosEstructurados";

/// Project whose devices are watched for daily data presence.
pub const PROJECT_ID: &str = "6";

/// Device codes watched for daily data presence, one alert channel each.
pub const DEVICES: [&str; 8] = [
    "SOIL-01", "SOIL-02", "SOIL-03", "SOIL-04", "SOIL-05", "SOIL-06", "SOIL-07", "SOIL-08",
];

/// How often each device is checked for data on the current date.
pub const DATA_CHECK_INTERVAL: Duration = Duration::from_secs(28 * 60 * 60);
/// How often memory usage is sampled.
pub const MEMORY_CHECK_INTERVAL: Duration = Duration::from_secs(5 * 60);
/// How often CPU usage is sampled.
pub const CPU_CHECK_INTERVAL: Duration = Duration::from_secs(5 * 60);
/// How often free disk space is sampled.
pub const STORAGE_CHECK_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Minimum silence between two dispatched alerts on the same channel.
pub const COOLDOWN_WINDOW: Duration = Duration::from_secs(30 * 60);

/// Alert when memory usage rises above this percentage.
pub const MEMORY_THRESHOLD_PERCENT: f64 = 70.0;
/// Alert when CPU usage rises above this percentage.
pub const CPU_THRESHOLD_PERCENT: f64 = 80.0;
/// Alert when free space on the root volume falls below this many GB.
pub const STORAGE_THRESHOLD_GB: f64 = 80.0;

/// Default SMTP submission port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

const DEFAULT_SENDER: &str = "vigil@localhost";
const DEFAULT_RECIPIENT: &str = "ops@localhost";

/// SMTP relay settings, loaded from the environment.
///
/// | Variable              | Required | Default           |
/// |-----------------------|----------|-------------------|
/// | `VIGIL_SMTP_HOST`     | yes      | —                 |
/// | `VIGIL_SMTP_USER`     | yes      | —                 |
/// | `VIGIL_SMTP_PASSWORD` | yes      | —                 |
/// | `VIGIL_SMTP_PORT`     | no       | `587`             |
/// | `VIGIL_ALERT_FROM`    | no       | `vigil@localhost` |
/// | `VIGIL_ALERT_TO`      | no       | `ops@localhost`   |
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP relay hostname.
    pub host: String,
    /// SMTP relay port.
    pub port: u16,
    /// Relay username.
    pub user: String,
    /// Relay password.
    pub password: String,
    /// RFC 5322 "From" address.
    pub sender: String,
    /// The single fixed alert recipient.
    pub recipient: String,
}

impl SmtpConfig {
    /// Load relay settings from the environment.
    ///
    /// A monitor that cannot deliver alerts must not start silently, so a
    /// missing required variable is a startup error rather than a skipped
    /// mailer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: require("VIGIL_SMTP_HOST")?,
            port: std::env::var("VIGIL_SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            user: require("VIGIL_SMTP_USER")?,
            password: require("VIGIL_SMTP_PASSWORD")?,
            sender: std::env::var("VIGIL_ALERT_FROM").unwrap_or_else(|_| DEFAULT_SENDER.to_string()),
            recipient: std::env::var("VIGIL_ALERT_TO")
                .unwrap_or_else(|_| DEFAULT_RECIPIENT.to_string()),
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_requires_smtp_host() {
        std::env::remove_var("VIGIL_SMTP_HOST");
        let err = SmtpConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("VIGIL_SMTP_HOST"));
    }
}
