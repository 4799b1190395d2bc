//! Configuration module
//!
//! Configuration is read once from the environment at process start and injected into
//! every component. There are no hidden fallbacks for secrets: `JWT_SECRET` and
//! `DATABASE_URL` must be set explicitly.

use std::env;
use std::path::PathBuf;

// Common constants
const SERVER_PORT: u16 = 3001;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_HOURS: i64 = 24;
const RENDER_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_SIZE_MB: usize = 50;
const MAX_IMAGES: usize = 10;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const MIN_JWT_SECRET_LEN: usize = 32;

/// Settings shared by every HTTP-facing component
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub environment: String,
}

/// Document service configuration
#[derive(Clone, Debug)]
pub struct DocumentServiceConfig {
    pub base: BaseConfig,
    pub database_url: String,
    /// Base directory under which every user folder (`ruta`) lives
    pub storage_root: PathBuf,
    /// Word template used by the legacy OOXML path; synthesized when missing
    pub word_template_path: PathBuf,
    pub chromium_path: String,
    pub render_timeout_secs: u64,
    pub max_upload_size_bytes: usize,
    pub max_images: usize,
    /// XML-escape substituted values in Word documents
    pub docx_escape_values: bool,
    /// Requests served at once before new ones wait
    pub http_concurrency_limit: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<DocumentServiceConfig>);

impl Config {
    fn inner(&self) -> &DocumentServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = DocumentServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.inner().base.jwt_expiry_hours
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn storage_root(&self) -> &PathBuf {
        &self.inner().storage_root
    }

    pub fn word_template_path(&self) -> &PathBuf {
        &self.inner().word_template_path
    }

    pub fn chromium_path(&self) -> &str {
        &self.inner().chromium_path
    }

    pub fn render_timeout_secs(&self) -> u64 {
        self.inner().render_timeout_secs
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.inner().max_upload_size_bytes
    }

    pub fn max_images(&self) -> usize {
        self.inner().max_images
    }

    pub fn docx_escape_values(&self) -> bool {
        self.inner().docx_escape_values
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().http_concurrency_limit
    }
}

fn is_production_name(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl DocumentServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: env_or("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: env_or("JWT_EXPIRY_HOURS", JWT_EXPIRY_HOURS),
            environment,
        };

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        Ok(DocumentServiceConfig {
            base,
            database_url,
            storage_root: env::var("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./storage")),
            word_template_path: env::var("WORD_TEMPLATE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./assets/Documentos/plantilla1.docx")),
            chromium_path: env::var("CHROMIUM_PATH").unwrap_or_else(|_| "chromium".to_string()),
            render_timeout_secs: env_or("RENDER_TIMEOUT_SECS", RENDER_TIMEOUT_SECS),
            max_upload_size_bytes: env_or("MAX_UPLOAD_SIZE_MB", MAX_UPLOAD_SIZE_MB) * 1024 * 1024,
            max_images: env_or("MAX_IMAGES", MAX_IMAGES),
            docx_escape_values: env::var("DOCX_ESCAPE_VALUES")
                .map(|v| v.trim().eq_ignore_ascii_case("true") || v.trim() == "1")
                .unwrap_or(false),
            http_concurrency_limit: env_or("HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            ));
        }

        if self.base.jwt_expiry_hours <= 0 {
            return Err(anyhow::anyhow!("JWT_EXPIRY_HOURS must be positive"));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.render_timeout_secs == 0 {
            return Err(anyhow::anyhow!("RENDER_TIMEOUT_SECS cannot be 0"));
        }

        if self.max_images == 0 {
            return Err(anyhow::anyhow!("MAX_IMAGES cannot be 0"));
        }

        if self.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT cannot be 0"));
        }

        if self.storage_root.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("STORAGE_ROOT cannot be empty"));
        }

        let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
        if self.chromium_path.chars().any(|c| dangerous_chars.contains(&c)) {
            return Err(anyhow::anyhow!(
                "CHROMIUM_PATH contains dangerous characters"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentServiceConfig {
        DocumentServiceConfig {
            base: BaseConfig {
                server_port: 3001,
                cors_origins: vec!["*".to_string()],
                db_max_connections: 5,
                db_timeout_seconds: 5,
                jwt_secret: "a".repeat(32),
                jwt_expiry_hours: 24,
                environment: "development".to_string(),
            },
            database_url: "postgres://localhost/acuda".to_string(),
            storage_root: PathBuf::from("./storage"),
            word_template_path: PathBuf::from("./plantilla.docx"),
            chromium_path: "chromium".to_string(),
            render_timeout_secs: 30,
            max_upload_size_bytes: 1024,
            max_images: 10,
            docx_escape_values: false,
            http_concurrency_limit: 100,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut config = sample();
        config.base.jwt_secret = "your-secret-key".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_zero_concurrency_limit_rejected() {
        let mut config = sample();
        config.http_concurrency_limit = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("HTTP_CONCURRENCY_LIMIT"));
    }

    #[test]
    fn test_non_postgres_url_rejected() {
        let mut config = sample();
        config.database_url = "mysql://localhost/acuda".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_chromium_path_with_shell_metacharacters_rejected() {
        let mut config = sample();
        config.chromium_path = "chromium; rm -rf /".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_detection() {
        let mut config = sample();
        config.base.environment = "PROD".to_string();
        assert!(Config(Box::new(config)).is_production());
        assert!(!Config(Box::new(sample())).is_production());
    }
}
