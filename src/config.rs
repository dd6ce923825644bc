use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Mini app identity
    pub app_domain: String,
    pub app_url: String,

    // JWT verification (tokens are issued by the quick-auth server, not here)
    pub jwt_secret: String,

    // Paymaster budget overrides (demo balance simulation)
    pub paymaster_starting_balance: Option<f64>,
    pub achievement_interval_days: Option<f64>,

    // CORS
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            app_domain: env::var("APP_DOMAIN").unwrap_or_else(|_| "dragman.xyz".to_string()),
            app_url: env::var("APP_URL").unwrap_or_else(|_| "https://dragman.xyz".to_string()),

            jwt_secret: env::var("JWT_SECRET")?,

            paymaster_starting_balance: env::var("PAYMASTER_STARTING_BALANCE")
                .ok()
                .and_then(|s| s.parse().ok()),
            achievement_interval_days: env::var("ACHIEVEMENT_INTERVAL_DAYS")
                .ok()
                .and_then(|s| s.parse().ok()),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET is empty");
        }
        if self.app_domain.trim().is_empty() {
            anyhow::bail!("APP_DOMAIN is empty");
        }
        if !self.app_url.starts_with("http") {
            anyhow::bail!("APP_URL must be an absolute URL");
        }

        if self.jwt_secret.contains("super_secret") {
            tracing::warn!("Detected dev credentials in config");
        }
        if let Some(balance) = self.paymaster_starting_balance {
            if balance <= 0.0 {
                tracing::warn!("PAYMASTER_STARTING_BALANCE should be > 0");
            }
        }
        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
pub fn test_config() -> Config {
    Config {
        host: "0.0.0.0".to_string(),
        port: 3000,
        environment: "development".to_string(),
        app_domain: "dragman.xyz".to_string(),
        app_url: "https://dragman.xyz".to_string(),
        jwt_secret: "test_secret".to_string(),
        paymaster_starting_balance: None,
        achievement_interval_days: None,
        cors_allowed_origins: "*".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty_jwt_secret() {
        let mut config = test_config();
        config.jwt_secret = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_relative_app_url() {
        let mut config = test_config();
        config.app_url = "dragman.xyz".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn development_environment_is_detected() {
        let config = test_config();
        assert!(config.is_development());
    }
}
