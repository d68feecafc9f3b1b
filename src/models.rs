use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "john.doe@company.com")]
    pub email: String,
    #[schema(example = "hunter2secret")]
    pub password: String,
}

/// Credential row fetched at login. Never serialized.
#[derive(FromRow)]
pub struct UserAuthRow {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role_id: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    /// Account email.
    pub sub: String,
    /// Display name.
    pub name: String,
    /// Role id, resolved through `Role::from_id` at the auth boundary.
    pub role: u8,
    pub exp: usize,
    pub jti: String,
    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
