//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; nothing is fetched lazily at
//! request time.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL for CORS and results links
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Base URL of the external analysis worker
    pub analysis_api_url: String,
    /// Public base URL of this API (for worker callbacks)
    pub api_url: String,
    /// Server port
    pub port: u16,

    // --- Mail delivery ---
    /// HTTP mail API endpoint; empty disables outbound mail
    pub mail_api_url: String,
    /// Sender address for notification emails
    pub mail_from: String,

    // --- Secrets ---
    /// Mail API key
    pub mail_api_key: String,
    /// Shared secret the analysis worker must present on job callbacks
    pub callback_token: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            gcp_project_id: "test-project".to_string(),
            analysis_api_url: "http://localhost:9090".to_string(),
            api_url: "http://localhost:8080".to_string(),
            port: 8080,
            mail_api_url: String::new(),
            mail_from: "noreply@pavevision.example".to_string(),
            mail_api_key: "test_mail_key".to_string(),
            callback_token: "test_callback_token".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// For local development, secrets can be set via a `.env` file.
    /// In production the deployment injects them as environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            analysis_api_url: env::var("ANALYSIS_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("ANALYSIS_API_URL"))?,
            api_url: env::var("API_URL").unwrap_or_else(|_| "http://localhost:8080".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            mail_api_url: env::var("MAIL_API_URL").unwrap_or_default(),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "noreply@pavevision.example".to_string()),

            mail_api_key: env::var("MAIL_API_KEY").unwrap_or_default(),
            callback_token: env::var("CALLBACK_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("CALLBACK_TOKEN"))?,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("ANALYSIS_API_URL", "http://worker:9090/");
        env::set_var("CALLBACK_TOKEN", "verify-me");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.analysis_api_url, "http://worker:9090");
        assert_eq!(config.callback_token, "verify-me");
        assert_eq!(config.port, 8080);
    }
}
