use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

/// Process-wide connection pool, created once at startup and handed to
/// handlers through `web::Data`.
pub async fn init_db(database_url: &str) -> MySqlPool {
    MySqlPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .expect("Failed to connect to database")
}
