use anyhow::Result;

const DEFAULT_TOKEN_TTL_SECS: u64 = 120 * 60;
const DEFAULT_SERVER_PORT: u16 = 8080;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
    pub initial_admin: Option<InitialAdminConfig>,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: std::env::var("DATABASE_HOST")?,
            port: std::env::var("DATABASE_PORT")?.parse()?,
            username: std::env::var("DATABASE_USERNAME")?,
            password: std::env::var("DATABASE_PASSWORD")?,
            database: std::env::var("DATABASE_NAME")?,
        };
        let redis = RedisConfig {
            host: std::env::var("REDIS_HOST")?,
            port: std::env::var("REDIS_PORT")?.parse()?,
        };
        let auth = AuthConfig {
            ttl: match std::env::var("AUTH_TOKEN_TTL") {
                Ok(v) => v.parse()?,
                Err(_) => DEFAULT_TOKEN_TTL_SECS,
            },
            secret: std::env::var("JWT_SECRET")?,
        };
        let server = ServerConfig {
            port: match std::env::var("SERVER_PORT") {
                Ok(v) => v.parse()?,
                Err(_) => DEFAULT_SERVER_PORT,
            },
        };
        let initial_admin = match (
            std::env::var("ADMIN_USER_NAME"),
            std::env::var("ADMIN_EMAIL"),
            std::env::var("ADMIN_PASSWORD"),
        ) {
            (Ok(user_name), Ok(email), Ok(password)) => Some(InitialAdminConfig {
                user_name,
                email,
                password,
            }),
            _ => None,
        };
        Ok(Self {
            database,
            redis,
            auth,
            server,
            initial_admin,
        })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
pub struct AuthConfig {
    /// Access token lifetime in seconds.
    pub ttl: u64,
    /// HMAC secret used to sign access tokens.
    pub secret: String,
}

pub struct ServerConfig {
    pub port: u16,
}

pub struct InitialAdminConfig {
    pub user_name: String,
    pub email: String,
    pub password: String,
}
