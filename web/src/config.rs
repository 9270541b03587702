use std::sync::OnceLock;

use thiserror::Error;

static API_CONFIG: OnceLock<ApiConfig> = OnceLock::new();

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be a number, got `{1}`")]
    InvalidNumber(&'static str, String),

    #[error("API configuration already initialized")]
    AlreadyInitialized,

    #[error("API configuration not initialized, call init_api_config() first")]
    NotInitialized,
}

/// Where and as whom the server talks to the upstream content API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub customer_id: i64,
    pub language_code: String,
    pub app_name: String,
    pub api_key: Option<String>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let var = |name: &str, default: &str| std::env::var(name).unwrap_or_else(|_| default.to_string());

        let customer_id = var("EXPLORER_CUSTOMER_ID", "5588");
        let customer_id = customer_id
            .parse()
            .map_err(|_| ConfigError::InvalidNumber("EXPLORER_CUSTOMER_ID", customer_id))?;

        Ok(Self {
            base_url: var("EXPLORER_API_BASE_URL", "https://tsunamiapiv4.localexplorers.com/api")
                .trim_end_matches('/')
                .to_string(),
            customer_id,
            language_code: var("EXPLORER_LANGUAGE_CODE", "en-US"),
            app_name: var("EXPLORER_APP_NAME", "MC"),
            api_key: std::env::var("EXPLORER_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

pub fn init_api_config() -> Result<(), ConfigError> {
    let config = ApiConfig::from_env()?;
    tracing::info!(base_url = %config.base_url, customer_id = config.customer_id, "API configuration loaded");
    API_CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)
}

pub fn api_config() -> Result<&'static ApiConfig, ConfigError> {
    API_CONFIG.get().ok_or(ConfigError::NotInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = ApiConfig {
            base_url: "https://api.example.com/api".to_string(),
            customer_id: 1,
            language_code: "en-US".to_string(),
            app_name: "MC".to_string(),
            api_key: None,
        };
        assert_eq!(
            config.endpoint("/content/v4/getlocations"),
            "https://api.example.com/api/content/v4/getlocations"
        );
    }
}
