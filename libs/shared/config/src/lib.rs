use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_url: String,
    pub backend_api_key: String,
    pub jwt_secret: String,
    pub position_ttl_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            backend_url: env::var("FLIXBOOK_BACKEND_URL")
                .unwrap_or_else(|_| {
                    warn!("FLIXBOOK_BACKEND_URL not set, using empty value");
                    String::new()
                }),
            backend_api_key: env::var("FLIXBOOK_BACKEND_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("FLIXBOOK_BACKEND_API_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("FLIXBOOK_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("FLIXBOOK_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            position_ttl_minutes: env::var("FLIXBOOK_POSITION_TTL_MINUTES")
                .ok()
                .and_then(|raw| match raw.parse::<i64>() {
                    Ok(minutes) if minutes > 0 => Some(minutes),
                    _ => {
                        warn!("FLIXBOOK_POSITION_TTL_MINUTES is not a positive integer, using default");
                        None
                    }
                })
                .unwrap_or(30),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.backend_url.is_empty()
            && !self.jwt_secret.is_empty()
    }
}
