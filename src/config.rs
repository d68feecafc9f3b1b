use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Conversational assistant (OpenAI-compatible endpoint)
    pub chat_api_base: String,
    pub chat_api_key: String,
    pub chat_model: String,

    /// Whether an already-decided leave request may be changed again,
    /// including back to PENDING.
    pub leave_allow_reopen: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env::var("ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| "900".to_string()) // default 15 min
                .parse()
                .unwrap(),
            refresh_token_ttl: env::var("REFRESH_TOKEN_TTL")
                .unwrap_or_else(|_| "604800".to_string()) // default 7 days
                .parse()
                .unwrap(),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_refresh_per_min: env::var("RATE_REFRESH_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            chat_api_base: env::var("CHAT_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            chat_api_key: env::var("CHAT_API_KEY").unwrap_or_default(),
            chat_model: env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),

            leave_allow_reopen: env::var("LEAVE_ALLOW_REOPEN")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap(),
        }
    }
}
