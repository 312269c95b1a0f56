//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Config;
use crate::domain::UserRepository;
use crate::infrastructure::SeaOrmUserRepository;
use crate::services::UserService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Connection pool; each query checks a connection out and returns it on completion
    db: DatabaseConnection,
    app_name: Arc<str>,
    /// User business rules
    pub users: UserService,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_config(db, &Config::default())
    }

    pub fn with_config(db: DatabaseConnection, config: &Config) -> Self {
        let user_repo: Arc<dyn UserRepository> = Arc::new(SeaOrmUserRepository::new(db.clone()));
        let users = UserService::new(user_repo);

        Self {
            db,
            app_name: Arc::from(config.app_name.as_str()),
            users,
        }
    }

    /// Get the database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }
}

