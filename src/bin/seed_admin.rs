//! Creates the initial ADMIN account. Idempotent: reruns leave an existing
//! account untouched.
//!
//! Environment: DATABASE_URL (required), ADMIN_EMAIL, ADMIN_PASSWORD,
//! ADMIN_NAME (all optional, with development defaults).

use anyhow::{Context, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::mysql::MySqlPoolOptions;
use std::env;

const ADMIN_ROLE_ID: u8 = 1;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let email = env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    let name = env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin User".to_string());

    println!("Creating admin account {} <{}>", name, email);

    let pool = MySqlPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .context("failed to connect to database")?;

    let existing: Option<(u64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&pool)
        .await?;

    if let Some((id,)) = existing {
        println!("Account already exists (id {}), nothing to do", id);
        return Ok(());
    }

    let salt = SaltString::generate(&mut OsRng);
    let hashed = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?
        .to_string();

    let result = sqlx::query(
        r#"
        INSERT INTO users (name, email, password, role_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&name)
    .bind(&email)
    .bind(&hashed)
    .bind(ADMIN_ROLE_ID)
    .execute(&pool)
    .await?;

    println!("Admin account created (id {})", result.last_insert_id());
    println!("Change the default password after first login.");

    Ok(())
}
