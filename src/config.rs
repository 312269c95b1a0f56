use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub app_name: String,
    pub debug: bool,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Connections kept open in the pool
    pub db_pool_size: u32,
    /// Extra connections allowed on top of `db_pool_size` under load
    pub db_max_overflow: u32,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "roster".to_string(),
            debug: false,
            host: "0.0.0.0".to_string(),
            port: 8000,
            database_url: "sqlite://roster.db?mode=rwc".to_string(),
            db_pool_size: 10,
            db_max_overflow: 20,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            app_name: env::var("APP_NAME").unwrap_or(defaults.app_name),
            debug: env::var("DEBUG")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.debug),
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            db_pool_size: env::var("DB_POOL_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.db_pool_size),
            db_max_overflow: env::var("DB_MAX_OVERFLOW")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.db_max_overflow),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_allowed_origins),
        }
    }

    /// Upper bound on simultaneously checked-out store connections
    pub fn db_max_connections(&self) -> u32 {
        self.db_pool_size + self.db_max_overflow
    }
}
