use anyhow::{anyhow, Result};
use std::net::SocketAddr;
use std::str::FromStr;
use url::Url;

pub const DEFAULT_PROVIDER_UPLOAD_URL: &str = "https://telegra.ph/upload?source=bugtracker";
pub const DEFAULT_PROVIDER_ORIGIN_HOST: &str = "telegra.ph";
pub const DEFAULT_BING_API_URL: &str =
    "https://cn.bing.com/HPImageArchive.aspx?format=js&idx=0&n=5";

/// Path segments already claimed by the static routes.
const RESERVED_PATHS: [&str; 3] = ["upload", "bing-images", "delete-images"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub http_addr: String,
    pub domain: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_connect_timeout_seconds: u64,
    pub db_idle_timeout_seconds: u64,
    pub db_max_lifetime_seconds: u64,
    pub username: String,
    pub password: String,
    pub admin_path: String,
    pub nsfw_api_url: Option<String>,
    pub nsfw_threshold: f64,
    pub enable_auth: bool,
    pub provider_upload_url: String,
    pub provider_origin_host: String,
    pub bing_api_url: String,
    pub upstream_timeout_seconds: u64,
    pub upload_max_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let http_addr = env_or("HTTP_ADDR", "0.0.0.0:8080");
        SocketAddr::from_str(&http_addr)
            .map_err(|err| anyhow!("invalid HTTP_ADDR: {}", err))?;

        let database_url = env_or_err("DATABASE_URL").or_else(|_| env_or_err("DATABASE"))?;

        let admin_path = env_or_err("ADMIN_PATH")?;
        validate_admin_path(&admin_path)?;

        let nsfw_api_url = std::env::var("NSFW_API_URL")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        if let Some(ref endpoint) = nsfw_api_url {
            Url::parse(endpoint).map_err(|err| anyhow!("invalid NSFW_API_URL: {}", err))?;
        }

        let nsfw_threshold: f64 = env_or_parse("NSFW_THRESHOLD", "0.25")?;
        if !nsfw_threshold.is_finite() {
            return Err(anyhow!("invalid NSFW_THRESHOLD: must be a finite number"));
        }

        let provider_upload_url = env_or("PROVIDER_UPLOAD_URL", DEFAULT_PROVIDER_UPLOAD_URL);
        Url::parse(&provider_upload_url)
            .map_err(|err| anyhow!("invalid PROVIDER_UPLOAD_URL: {}", err))?;
        let bing_api_url = env_or("BING_API_URL", DEFAULT_BING_API_URL);
        Url::parse(&bing_api_url).map_err(|err| anyhow!("invalid BING_API_URL: {}", err))?;

        Ok(Self {
            http_addr,
            domain: env_or_err("DOMAIN")?,
            database_url,
            db_max_connections: env_or_parse("DB_MAX_CONNECTIONS", "25")?,
            db_connect_timeout_seconds: env_or_parse("DB_CONNECT_TIMEOUT_SECONDS", "5")?,
            db_idle_timeout_seconds: env_or_parse("DB_IDLE_TIMEOUT_SECONDS", "300")?,
            db_max_lifetime_seconds: env_or_parse("DB_MAX_LIFETIME_SECONDS", "1800")?,
            username: env_or_err("USERNAME")?,
            password: env_or_err("PASSWORD")?,
            admin_path,
            nsfw_api_url,
            nsfw_threshold,
            enable_auth: parse_flag(&env_or("ENABLE_AUTH", "false")),
            provider_upload_url,
            provider_origin_host: env_or("PROVIDER_ORIGIN_HOST", DEFAULT_PROVIDER_ORIGIN_HOST),
            bing_api_url,
            upstream_timeout_seconds: env_or_parse("UPSTREAM_TIMEOUT_SECONDS", "30")?,
            upload_max_bytes: env_or_parse("UPLOAD_MAX_BYTES", "10485760")?,
        })
    }
}

/// Only the literal `true` enables a flag; anything else reads as off.
pub fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

pub fn validate_admin_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(anyhow!("invalid ADMIN_PATH: must not be empty"));
    }
    if path.contains('/') {
        return Err(anyhow!("invalid ADMIN_PATH: must be a single path segment"));
    }
    if path.starts_with(':') || path.starts_with('*') {
        return Err(anyhow!("invalid ADMIN_PATH: must be a literal segment"));
    }
    if RESERVED_PATHS.contains(&path) {
        return Err(anyhow!("invalid ADMIN_PATH: `{}` is a reserved route", path));
    }
    Ok(())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_err(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| anyhow!("missing required env var: {}", key))
}

fn env_or_parse<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    value
        .parse::<T>()
        .map_err(|err| anyhow!("invalid {}: {}", key, err))
}
