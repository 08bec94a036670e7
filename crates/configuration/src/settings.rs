use crate::error::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub projection: ProjectionSettings,
    pub baseline: BaselineSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Rejects combinations that would make the server or the engine unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be greater than 0".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be greater than 0".to_string(),
            ));
        }
        self.projection.validate()?;
        if self.baseline.window_months == 0 {
            return Err(ConfigError::ValidationError(
                "baseline.window_months must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            ConfigError::ValidationError(format!("server.host '{}' is not an IP address", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Command-line overrides for [`ServerSettings`].
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct ServerOverrides {
    /// Address to bind, overriding `server.host`.
    #[cfg_attr(feature = "clap", arg(long))]
    pub host: Option<String>,
    /// Port to bind, overriding `server.port`.
    #[cfg_attr(feature = "clap", arg(long))]
    pub port: Option<u16>,
}

impl ServerOverrides {
    pub fn apply(&self, server: &mut ServerSettings) {
        if let Some(host) = &self.host {
            server.host = host.clone();
        }
        if let Some(port) = self.port {
            server.port = port;
        }
    }
}

/// Connection settings for PostgreSQL.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Falls back to the `DATABASE_URL` environment variable when unset.
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

/// Longest horizon the engine will simulate (100 years).
pub const MAX_HORIZON_MONTHS: u32 = 1200;

/// Parameters of the break-even projection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectionSettings {
    /// Number of simulated months. "Never breaks even" is relative to this bound.
    pub horizon_months: u32,
    /// Lowest accepted month-over-month growth rate.
    pub min_growth_rate: Decimal,
    /// Highest accepted month-over-month growth rate.
    pub max_growth_rate: Decimal,
}

impl ProjectionSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon_months == 0 || self.horizon_months > MAX_HORIZON_MONTHS {
            return Err(ConfigError::ValidationError(format!(
                "projection.horizon_months must be between 1 and {MAX_HORIZON_MONTHS}, got {}",
                self.horizon_months
            )));
        }
        if self.min_growth_rate >= self.max_growth_rate {
            return Err(ConfigError::ValidationError(format!(
                "projection.min_growth_rate ({}) must be below projection.max_growth_rate ({})",
                self.min_growth_rate, self.max_growth_rate
            )));
        }
        if self.min_growth_rate < dec!(-1) {
            return Err(ConfigError::ValidationError(
                "projection.min_growth_rate cannot be below -1 (negative unit volume)".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            horizon_months: 12,
            min_growth_rate: dec!(-1),
            max_growth_rate: dec!(10),
        }
    }
}

/// How the month-1 unit volume is derived from sales history.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BaselineSettings {
    /// Number of most recent months averaged into the baseline.
    pub window_months: u32,
}

impl Default for BaselineSettings {
    fn default() -> Self {
        Self { window_months: 3 }
    }
}

/// Tracing output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, used when `RUST_LOG` is not set.
    pub filter: String,
    /// When set, logs go to a daily rolling file in this directory instead of stdout.
    pub directory: Option<String>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            directory: None,
            file_prefix: "farmstead.log".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_config_from;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.projection.horizon_months, 12);
        assert_eq!(settings.projection.min_growth_rate, dec!(-1));
        assert_eq!(settings.projection.max_growth_rate, dec!(10));
        assert_eq!(settings.baseline.window_months, 3);
        assert_eq!(
            settings.server.socket_addr().unwrap(),
            "0.0.0.0:3000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.projection, ProjectionSettings::default());
    }

    #[test]
    fn test_partial_file_overrides_only_given_keys() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[projection]
horizon_months = 24
max_growth_rate = "2.5"

[baseline]
window_months = 6
"#
        )
        .unwrap();

        let settings = load_config_from(file.path()).unwrap();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.projection.horizon_months, 24);
        assert_eq!(settings.projection.min_growth_rate, dec!(-1));
        assert_eq!(settings.projection.max_growth_rate, dec!(2.5));
        assert_eq!(settings.baseline.window_months, 6);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[projection]\nhorizon_months = 0").unwrap();
        assert!(matches!(
            load_config_from(file.path()),
            Err(ConfigError::ValidationError(_))
        ));

        let mut settings = Settings::default();
        settings.projection.min_growth_rate = dec!(10);
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.baseline.window_months = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_horizon_upper_bound() {
        let mut projection = ProjectionSettings {
            horizon_months: MAX_HORIZON_MONTHS,
            ..ProjectionSettings::default()
        };
        assert!(projection.validate().is_ok());

        projection.horizon_months = MAX_HORIZON_MONTHS + 1;
        assert!(matches!(
            projection.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        projection.horizon_months = u32::MAX;
        assert!(projection.validate().is_err());

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[projection]\nhorizon_months = 5000000").unwrap();
        assert!(matches!(
            load_config_from(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_server_overrides_apply() {
        let mut server = ServerSettings::default();
        ServerOverrides {
            host: Some("127.0.0.1".to_string()),
            port: None,
        }
        .apply(&mut server);
        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.port, 3000);

        server.host = "not an ip".to_string();
        assert!(server.socket_addr().is_err());
    }
}
