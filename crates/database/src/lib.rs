use std::env;

use model::ApiError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub mod data_model;
pub mod queries;
mod schema;

pub use schema::SchemaManager;

pub struct DatabaseConnectionInfo {
    url: String,
}

impl DatabaseConnectionInfo {
    /// Reads `DATABASE_URL`, falling back to the discrete
    /// `DATABASE_{USER,PASSWORD,HOST,PORT,NAME}` variables.
    pub fn from_env() -> Option<Self> {
        if let Ok(url) = env::var("DATABASE_URL") {
            return Some(Self { url });
        }

        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self {
            url: format!("postgres://{username}:{password}@{hostname}:{port}/{database}"),
        })
    }
}

#[derive(Clone)]
pub struct PgDatabase {
    pool: PgPool,
    schema: std::sync::Arc<SchemaManager>,
}

impl PgDatabase {
    pub async fn connect(info: DatabaseConnectionInfo) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&info.url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self {
            pool,
            schema: std::sync::Arc::new(SchemaManager::new()),
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the idempotent, one-shot trip-schedule bootstrap (§4.1). Cheap to
    /// call on every request: after the first success it is a no-op.
    pub async fn ensure_schema(&self) -> Result<(), ApiError> {
        self.schema.ensure(&self.pool).await
    }
}
