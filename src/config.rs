use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub images_dir: PathBuf,
    pub token_bytes: usize,
    pub reset_ttl_minutes: i64,
    pub max_upload_size: usize,
    pub cookie_secure: bool,
    pub log_level: String,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

/// Reset links stay valid this long unless configured otherwise.
pub const DEFAULT_RESET_TTL_MINUTES: i64 = 60;

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source; `from_env` passes the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let env_required = |key: &str| {
            lookup(key).ok_or_else(|| format!("Missing required environment variable: {key}"))
        };
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = env_required("DATABASE_URL")?;

        let host: IpAddr = env_or("GALLERIA_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid GALLERIA_HOST: {e}"))?;

        let port: u16 = env_or("GALLERIA_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid GALLERIA_PORT: {e}"))?;

        let base_url = env_or("GALLERIA_BASE_URL", &format!("http://{host}:{port}"));

        let images_dir = PathBuf::from(env_or("GALLERIA_IMAGES_DIR", "images"));

        let token_bytes: usize = env_or("GALLERIA_TOKEN_BYTES", "32")
            .parse()
            .map_err(|e| format!("Invalid GALLERIA_TOKEN_BYTES: {e}"))?;

        let reset_ttl_minutes: i64 = match lookup("GALLERIA_RESET_TTL_MINUTES") {
            Some(raw) => raw
                .parse()
                .map_err(|e| format!("Invalid GALLERIA_RESET_TTL_MINUTES: {e}"))?,
            None => DEFAULT_RESET_TTL_MINUTES,
        };
        if reset_ttl_minutes <= 0 {
            return Err("GALLERIA_RESET_TTL_MINUTES must be positive".to_string());
        }

        let max_upload_size: usize = env_or("GALLERIA_MAX_UPLOAD_SIZE", "5242880")
            .parse()
            .map_err(|e| format!("Invalid GALLERIA_MAX_UPLOAD_SIZE: {e}"))?;

        let cookie_secure = matches!(
            env_or("GALLERIA_COOKIE_SECURE", "false").as_str(),
            "1" | "true" | "yes"
        );

        let log_level = env_or("GALLERIA_LOG_LEVEL", "info");

        let smtp = match (
            lookup("GALLERIA_SMTP_HOST"),
            lookup("GALLERIA_SMTP_PORT"),
            lookup("GALLERIA_SMTP_USER"),
            lookup("GALLERIA_SMTP_PASS"),
            lookup("GALLERIA_SMTP_FROM"),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid GALLERIA_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            host,
            port,
            base_url,
            images_dir,
            token_bytes,
            reset_ttl_minutes,
            max_upload_size,
            cookie_secure,
            log_level,
            smtp,
        })
    }
}
