use std::time::Duration;

use anyhow::{Context, Result};

use crate::apply::orchestrator::MAX_APPLY_CONCURRENCY;
use crate::llm_client::DEFAULT_API_URL;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a numeric one is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub openai_api_key: String,
    pub openai_api_url: String,
    /// Default bucket for bare resume keys. Blob storage is disabled when unset.
    pub s3_bucket: Option<String>,
    pub s3_endpoint: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub aws_region: String,
    pub model_timeout: Duration,
    pub fetch_timeout: Duration,
    pub model_max_retries: u32,
    pub auto_apply_concurrency: usize,
    pub recommendation_cache_ttl: Option<Duration>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| {
            get(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            database_max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", 10)?,
            openai_api_key: require("OPENAI_API_KEY")?,
            openai_api_url: get("OPENAI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            s3_bucket: get("S3_BUCKET"),
            s3_endpoint: get("S3_ENDPOINT"),
            aws_access_key_id: get("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: get("AWS_SECRET_ACCESS_KEY"),
            aws_region: get("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            model_timeout: Duration::from_secs(parse_or(&get, "MODEL_TIMEOUT_SECS", 120)?),
            fetch_timeout: Duration::from_secs(parse_or(&get, "FETCH_TIMEOUT_SECS", 30)?),
            model_max_retries: parse_or(&get, "MODEL_MAX_RETRIES", 3)?,
            auto_apply_concurrency: parse_or::<usize>(&get, "AUTO_APPLY_CONCURRENCY", 1)?
                .clamp(1, MAX_APPLY_CONCURRENCY),
            recommendation_cache_ttl: get("RECOMMENDATION_CACHE_TTL_SECS")
                .map(|v| {
                    v.parse::<u64>()
                        .context("RECOMMENDATION_CACHE_TTL_SECS must be a number of seconds")
                })
                .transpose()?
                .map(Duration::from_secs),
            port: parse_or(&get, "PORT", 8080)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// True when enough is configured to read resumes from blob storage.
    pub fn blob_storage_enabled(&self) -> bool {
        self.s3_bucket.is_some() || self.s3_endpoint.is_some()
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/jobs"),
        ("OPENAI_API_KEY", "sk-test"),
    ];

    #[test]
    fn test_defaults_apply_when_optional_vars_are_absent() {
        let config = config(&REQUIRED).unwrap();

        assert_eq!(config.openai_api_url, DEFAULT_API_URL);
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.model_timeout, Duration::from_secs(120));
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
        assert_eq!(config.model_max_retries, 3);
        assert_eq!(config.auto_apply_concurrency, 1);
        assert_eq!(config.recommendation_cache_ttl, None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.aws_region, "us-east-1");
        assert!(!config.blob_storage_enabled());
    }

    #[test]
    fn test_missing_required_var_fails() {
        let err = config(&[("DATABASE_URL", "postgres://localhost/jobs")]).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));

        let err = config(&[("DATABASE_URL", "  "), ("OPENAI_API_KEY", "sk")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_overrides_are_parsed() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("PORT", "9000"),
            ("AUTO_APPLY_CONCURRENCY", "3"),
            ("RECOMMENDATION_CACHE_TTL_SECS", "600"),
            ("S3_BUCKET", "resumes"),
        ]);
        let config = config(&pairs).unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.auto_apply_concurrency, 3);
        assert_eq!(config.recommendation_cache_ttl, Some(Duration::from_secs(600)));
        assert_eq!(config.s3_bucket.as_deref(), Some("resumes"));
        assert!(config.blob_storage_enabled());
    }

    #[test]
    fn test_concurrency_is_clamped() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("AUTO_APPLY_CONCURRENCY", "64"));
        assert_eq!(config(&pairs).unwrap().auto_apply_concurrency, MAX_APPLY_CONCURRENCY);

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("AUTO_APPLY_CONCURRENCY", "0"));
        assert_eq!(config(&pairs).unwrap().auto_apply_concurrency, 1);
    }

    #[test]
    fn test_malformed_number_fails() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "eighty"));
        let err = config(&pairs).unwrap_err();
        assert!(format!("{err:#}").contains("PORT"));
    }
}
