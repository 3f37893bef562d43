use std::env;

use crate::error::AppError;
use crate::model::otlp::DEFAULT_MAX_PAYLOAD_BYTES;

const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_HTTP_PORT: u16 = 4318;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_host: String,
    /// OTLP HTTP server port (traces/metrics/logs + health)
    pub http_port: u16,
    /// Upper bound for a single request body, enforced by the encoders
    pub max_payload_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_host: DEFAULT_BIND_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

impl Settings {
    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_host(&self.bind_host)?;
        validate_port(self.http_port)?;
        validate_payload_limit(self.max_payload_bytes)?;
        Ok(())
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.http_port)
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_host = lookup("APP_BIND_HOST").unwrap_or(defaults.bind_host);
        let http_port = match lookup("HTTP_PORT") {
            Some(raw) => parse_var("HTTP_PORT", &raw)?,
            None => defaults.http_port,
        };
        let max_payload_bytes = match lookup("APP_MAX_PAYLOAD_BYTES") {
            Some(raw) => parse_var("APP_MAX_PAYLOAD_BYTES", &raw)?,
            None => defaults.max_payload_bytes,
        };

        let settings = Self {
            bind_host,
            http_port,
            max_payload_bytes,
        };

        // Validate settings before returning
        settings.validate()?;

        Ok(settings)
    }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| AppError::Config(format!("Invalid {name} {raw:?}: {e}")))
}

/// Validates that the host is not empty or whitespace-only.
fn validate_host(host: &str) -> Result<(), AppError> {
    if host.trim().is_empty() {
        return Err(AppError::Config("Host cannot be empty".into()));
    }
    Ok(())
}

/// Validates that the port is in valid range (1-65535).
fn validate_port(port: u16) -> Result<(), AppError> {
    if port == 0 {
        return Err(AppError::Config("Port cannot be 0".into()));
    }
    Ok(())
}

fn validate_payload_limit(max: usize) -> Result<(), AppError> {
    if max == 0 {
        return Err(AppError::Config("Payload limit cannot be 0".into()));
    }
    Ok(())
}

pub fn get_configuration() -> Result<Settings, AppError> {
    Settings::from_lookup(|name| env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_validate_port_valid() {
        assert!(validate_port(80).is_ok());
        assert!(validate_port(4318).is_ok());
        assert!(validate_port(65535).is_ok());
        assert!(validate_port(1).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let err = validate_port(0).unwrap_err();
        assert!(err.to_string().contains("Port cannot be 0"));
    }

    #[test]
    fn test_validate_host_whitespace_fails() {
        assert!(validate_host("localhost").is_ok());
        let err = validate_host("   ").unwrap_err();
        assert!(err.to_string().contains("Host cannot be empty"));
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.bind_address(), "0.0.0.0:4318");
        assert_eq!(settings.max_payload_bytes, 4 * 1024 * 1024);
    }

    #[test]
    fn test_overrides_from_environment() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("APP_BIND_HOST", "127.0.0.1"),
            ("HTTP_PORT", "9600"),
            ("APP_MAX_PAYLOAD_BYTES", "1024"),
        ]))
        .unwrap();

        assert_eq!(settings.bind_address(), "127.0.0.1:9600");
        assert_eq!(settings.max_payload_bytes, 1024);
    }

    #[test]
    fn test_unparsable_port_fails() {
        let err = Settings::from_lookup(lookup_from(&[("HTTP_PORT", "http")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("HTTP_PORT"));
    }

    #[test]
    fn test_zero_values_fail_validation() {
        assert!(Settings::from_lookup(lookup_from(&[("HTTP_PORT", "0")])).is_err());
        assert!(Settings::from_lookup(lookup_from(&[("APP_MAX_PAYLOAD_BYTES", "0")])).is_err());
        assert!(Settings::from_lookup(lookup_from(&[("APP_BIND_HOST", "")])).is_err());
    }
}
