//! Configuration module
//!
//! Environment-driven configuration for the service: HTTP bind port, the
//! public base URL that `dataUrl` values are derived from, and which
//! repository / data-store backends to construct at startup.

use std::env;
use std::str::FromStr;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_MAX_DATA_SIZE_BYTES: usize = 512 * 1024 * 1024;
const DEFAULT_DATA_DIR: &str = "./data/videos";

/// Which persistence backend holds video records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepositoryBackend {
    Memory,
    Postgres,
}

impl FromStr for RepositoryBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(RepositoryBackend::Memory),
            "postgres" => Ok(RepositoryBackend::Postgres),
            other => Err(anyhow::anyhow!(
                "Invalid REPOSITORY_BACKEND '{}': expected 'memory' or 'postgres'",
                other
            )),
        }
    }
}

/// Which backend holds binary video payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataStoreBackend {
    Memory,
    Local,
}

impl FromStr for DataStoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(DataStoreBackend::Memory),
            "local" => Ok(DataStoreBackend::Local),
            other => Err(anyhow::anyhow!(
                "Invalid DATA_STORE_BACKEND '{}': expected 'memory' or 'local'",
                other
            )),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    /// Base URL clients reach this service at; `dataUrl` is derived from it.
    pub public_base_url: String,
    pub repository_backend: RepositoryBackend,
    pub database_url: Option<String>,
    pub data_store_backend: DataStoreBackend,
    pub data_dir: String,
    pub max_data_size_bytes: usize,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let server_port = match env::var("SERVER_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("Invalid SERVER_PORT '{}'", raw))?,
            Err(_) => DEFAULT_SERVER_PORT,
        };

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", server_port));

        let repository_backend = env::var("REPOSITORY_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .parse::<RepositoryBackend>()?;

        let data_store_backend = env::var("DATA_STORE_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .parse::<DataStoreBackend>()?;

        let max_data_size_bytes = match env::var("MAX_DATA_SIZE_BYTES") {
            Ok(raw) => raw
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("Invalid MAX_DATA_SIZE_BYTES '{}'", raw))?,
            Err(_) => DEFAULT_MAX_DATA_SIZE_BYTES,
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Config {
            server_port,
            public_base_url,
            repository_backend,
            database_url: env::var("DATABASE_URL").ok(),
            data_store_backend,
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
            max_data_size_bytes,
            cors_origins,
            environment: env::var("ENVIRONMENT")
                .or_else(|_| env::var("APP_ENV"))
                .unwrap_or_else(|_| "development".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Fail fast on inconsistent configuration.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.repository_backend == RepositoryBackend::Postgres && self.database_url.is_none() {
            return Err(anyhow::anyhow!(
                "DATABASE_URL is required when REPOSITORY_BACKEND is 'postgres'"
            ));
        }

        if self.is_production() && self.cors_origins.contains(&"*".to_string()) {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.max_data_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_DATA_SIZE_BYTES must be positive"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_port: 8080,
            public_base_url: "http://localhost:8080".to_string(),
            repository_backend: RepositoryBackend::Memory,
            database_url: None,
            data_store_backend: DataStoreBackend::Memory,
            data_dir: DEFAULT_DATA_DIR.to_string(),
            max_data_size_bytes: DEFAULT_MAX_DATA_SIZE_BYTES,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
        }
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!(
            "memory".parse::<RepositoryBackend>().unwrap(),
            RepositoryBackend::Memory
        );
        assert_eq!(
            "Postgres".parse::<RepositoryBackend>().unwrap(),
            RepositoryBackend::Postgres
        );
        assert!("redis".parse::<RepositoryBackend>().is_err());
        assert_eq!(
            "local".parse::<DataStoreBackend>().unwrap(),
            DataStoreBackend::Local
        );
        assert!("s3".parse::<DataStoreBackend>().is_err());
    }

    #[test]
    fn test_postgres_backend_requires_database_url() {
        let mut config = base_config();
        config.repository_backend = RepositoryBackend::Postgres;
        assert!(config.validate().is_err());

        config.database_url = Some("postgres://localhost/vidstash".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_rejects_wildcard_cors() {
        let mut config = base_config();
        config.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.cors_origins = vec!["https://example.com".to_string()];
        assert!(config.validate().is_ok());
        assert!(config.is_production());
    }
}
