use std::env;

use config::builder::ConfigBuilder;
use config::builder::DefaultState;
use config::Config as ConfigSource;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

/// Flat variable names of earlier deployments and the keys they set.
const LEGACY_ENV_ALIASES: &[(&str, &str)] = &[
    ("PORT", "server.http_port"),
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
    ("JWT_SECRET", "jwt.secret"),
    ("JWT_EXPIRY_HOURS", "jwt.expiration_hours"),
];

/// Upper bound on token lifetime (ten years).
const MAX_EXPIRATION_HOURS: i64 = 87_600;

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Flat legacy variables (JWT_SECRET, DB_HOST, PORT, etc.)
    /// 2. Environment variables (DATABASE__HOST, JWT__SECRET, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    /// 5. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = ConfigSource::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"));

        Self::from_builder(with_legacy_aliases(builder, |name| env::var(name).ok())?)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Config = builder
            .set_default("server.http_port", 8080)?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.expiration_hours", 24)?
            .build()?
            .try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        if self.jwt.expiration_hours <= 0 || self.jwt.expiration_hours > MAX_EXPIRATION_HOURS {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be between 1 and {}, got {}",
                MAX_EXPIRATION_HOURS, self.jwt.expiration_hours
            )));
        }
        Ok(())
    }
}

fn with_legacy_aliases(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for (variable, key) in LEGACY_ENV_ALIASES {
        builder = builder.set_override_option(*key, lookup(variable))?;
    }
    Ok(builder)
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Result<Config, ConfigError> {
        Config::from_builder(
            ConfigSource::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    const MINIMAL: &str = r#"
        [database]
        user = "postgres"
        password = "postgres"
        name = "auth"

        [jwt]
        secret = "development-secret"
    "#;

    #[test]
    fn test_defaults_are_applied() {
        let config = from_toml(MINIMAL).unwrap();

        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.jwt.expiration_hours, 24);
    }

    #[test]
    fn test_file_values_override_defaults() {
        let toml = format!("{MINIMAL}\n[server]\nhttp_port = 9090\n");
        let config = from_toml(&toml).unwrap();

        assert_eq!(config.server.http_port, 9090);
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let toml = r#"
            [database]
            user = "postgres"
            password = "postgres"
            name = "auth"
        "#;

        assert!(from_toml(toml).is_err());
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let toml = MINIMAL.replace("development-secret", "");

        let error = from_toml(&toml).unwrap_err();
        assert!(error.to_string().contains("jwt.secret"));
    }

    #[test]
    fn test_non_positive_expiration_is_rejected() {
        let toml = MINIMAL.replace(
            "secret = \"development-secret\"",
            "secret = \"development-secret\"\nexpiration_hours = 0",
        );

        let error = from_toml(&toml).unwrap_err();
        assert!(error.to_string().contains("expiration_hours"));
    }

    #[test]
    fn test_excessive_expiration_is_rejected() {
        let toml = MINIMAL.replace(
            "secret = \"development-secret\"",
            "secret = \"development-secret\"\nexpiration_hours = 87601",
        );

        let error = from_toml(&toml).unwrap_err();
        assert!(error.to_string().contains("expiration_hours"));

        let toml = MINIMAL.replace(
            "secret = \"development-secret\"",
            "secret = \"development-secret\"\nexpiration_hours = 87600",
        );
        assert_eq!(from_toml(&toml).unwrap().jwt.expiration_hours, 87_600);
    }

    #[test]
    fn test_legacy_variables_are_honoured() {
        let legacy: HashMap<&str, &str> = HashMap::from([
            ("PORT", "9000"),
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("JWT_SECRET", "legacy-secret"),
            ("JWT_EXPIRY_HOURS", "48"),
        ]);

        let builder =
            ConfigSource::builder().add_source(File::from_str(MINIMAL, FileFormat::Toml));
        let builder =
            with_legacy_aliases(builder, |name| legacy.get(name).map(|v| v.to_string())).unwrap();
        let config = Config::from_builder(builder).unwrap();

        assert_eq!(config.server.http_port, 9000);
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.user, "postgres");
        assert_eq!(config.jwt.secret, "legacy-secret");
        assert_eq!(config.jwt.expiration_hours, 48);
    }

    #[test]
    fn test_connect_options() {
        let config = from_toml(MINIMAL).unwrap();
        let options = config.database.connect_options();

        assert_eq!(options.get_host(), "localhost");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_username(), "postgres");
        assert_eq!(options.get_database(), Some("auth"));
    }
}
