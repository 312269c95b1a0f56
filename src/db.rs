use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

use crate::config::Config;

/// Connect with default pool settings and bootstrap the schema.
///
/// Used by tests and tools that only have a URL at hand.
pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let config = Config {
        database_url: database_url.to_string(),
        ..Config::default()
    };
    connect(&config).await
}

/// Open the connection pool described by `config` and run migrations.
pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());

    if is_in_memory(&config.database_url) {
        // Every SQLite memory connection is a separate database
        options.max_connections(1).min_connections(1);
    } else {
        options
            .max_connections(config.db_max_connections())
            .min_connections(config.db_pool_size);
    }

    options
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(config.debug);

    tracing::info!(
        "Connecting to database (pool size {}, overflow {})",
        config.db_pool_size,
        config.db_max_overflow
    );

    let db = Database::connect(options).await?;

    run_migrations(&db).await?;

    Ok(db)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Create users table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR(100) NOT NULL,
            email VARCHAR(255) NOT NULL,
            age INTEGER,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Email is the secondary lookup key and must stay unique
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE UNIQUE INDEX IF NOT EXISTS ix_users_email ON users (email)".to_owned(),
    ))
    .await?;

    tracing::debug!("Database schema is up to date");

    Ok(())
}
