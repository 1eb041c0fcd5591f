use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    pub log_level: String,

    // Identity used for every authenticated request
    pub current_user_id: u64,

    // Storage configuration
    pub upload_dir: PathBuf,
    pub max_upload_size: usize,

    // Content settings
    pub max_post_length: usize,
    pub max_comment_length: usize,
    pub default_page_size: usize,

    // CORS configuration
    pub cors_allowed_origins: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            environment: "development".to_string(),
            log_level: "rainbow_social=debug,tower_http=debug".to_string(),
            current_user_id: 1,
            upload_dir: PathBuf::from("./uploads"),
            max_upload_size: 10 * 1024 * 1024,
            max_post_length: 5000,
            max_comment_length: 2000,
            default_page_size: 10,
            cors_allowed_origins: "*".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Config::default();

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| defaults.server_port.to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),

            current_user_id: env::var("CURRENT_USER_ID")
                .unwrap_or_else(|_| defaults.current_user_id.to_string())
                .parse()?,

            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .unwrap_or_else(|_| defaults.max_upload_size.to_string())
                .parse()?,

            max_post_length: env::var("MAX_POST_LENGTH")
                .unwrap_or_else(|_| defaults.max_post_length.to_string())
                .parse()?,
            max_comment_length: env::var("MAX_COMMENT_LENGTH")
                .unwrap_or_else(|_| defaults.max_comment_length.to_string())
                .parse()?,
            default_page_size: env::var("DEFAULT_PAGE_SIZE")
                .unwrap_or_else(|_| defaults.default_page_size.to_string())
                .parse()?,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or(defaults.cors_allowed_origins),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.current_user_id, 1);
        assert_eq!(config.default_page_size, 10);
        assert!(config.is_development());
        assert!(!config.is_production());
    }
}
