/*
 * Responsibility
 * - 環境変数や設定の読み込み (セッション検証鍵、CORS 許可、sign-in ページ、policy ファイルなど)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::api::routes;

pub const DEFAULT_SIGN_IN_PATH: &str = "/sign-in";
pub const DEFAULT_SESSION_COOKIE_NAME: &str = "__session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub auth_issuer: String,
    pub auth_audience: String,
    pub session_token_leeway_seconds: u64,
    pub session_jwt_public_key_pem: String,
    pub session_cookie_name: String,

    pub sign_in_path: String,
    pub access_policy_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = split_list(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let auth_issuer =
            std::env::var("AUTH_ISSUER").map_err(|_| ConfigError::Missing("AUTH_ISSUER"))?;

        let auth_audience =
            std::env::var("AUTH_AUDIENCE").map_err(|_| ConfigError::Missing("AUTH_AUDIENCE"))?;

        let session_token_leeway_seconds = std::env::var("SESSION_TOKEN_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        let session_jwt_public_key_pem = std::env::var("SESSION_JWT_PUBLIC_KEY_PEM")
            .map_err(|_| ConfigError::Missing("SESSION_JWT_PUBLIC_KEY_PEM"))?
            .replace("\\n", "\n");

        let session_cookie_name = std::env::var("SESSION_COOKIE_NAME")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_COOKIE_NAME.to_string());

        let sign_in_path = validate_sign_in_path(
            std::env::var("SIGN_IN_PATH").unwrap_or_else(|_| DEFAULT_SIGN_IN_PATH.to_string()),
        )?;

        let access_policy_path = std::env::var("ACCESS_POLICY_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            auth_issuer,
            auth_audience,
            session_token_leeway_seconds,
            session_jwt_public_key_pem,
            session_cookie_name,
            sign_in_path,
            access_policy_path,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// The sign-in page is a plain path on this host, never a full URL or a route template,
// and it must not shadow a page the router already serves.
fn validate_sign_in_path(raw: String) -> Result<String, ConfigError> {
    let path = raw.trim();
    if !path.starts_with('/')
        || path.starts_with("//")
        || path.contains(|c: char| c.is_whitespace() || matches!(c, '{' | '}' | '*'))
        || routes::is_reserved_path(path)
    {
        return Err(ConfigError::Invalid("SIGN_IN_PATH"));
    }
    Ok(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_env_accepts_short_production_name() {
        assert_eq!(AppEnv::parse("PROD"), AppEnv::Production);
        assert_eq!(AppEnv::parse("production"), AppEnv::Production);
        assert_eq!(AppEnv::parse("staging"), AppEnv::Development);
    }

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            split_list(" https://a.test, ,https://b.test "),
            vec!["https://a.test", "https://b.test"]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn sign_in_path_must_be_local() {
        assert_eq!(validate_sign_in_path("/sign-in".into()).unwrap(), "/sign-in");
        assert!(validate_sign_in_path("sign-in".into()).is_err());
        assert!(validate_sign_in_path("//evil.test/sign-in".into()).is_err());
        assert!(validate_sign_in_path("https://evil.test".into()).is_err());
    }

    #[test]
    fn sign_in_path_must_not_collide_with_served_routes() {
        for taken in ["/admin", "/profile", "/health", "/tutor/", "/List/tutors", "/List"] {
            assert!(
                matches!(
                    validate_sign_in_path(taken.into()),
                    Err(ConfigError::Invalid("SIGN_IN_PATH"))
                ),
                "{taken} should be rejected"
            );
        }
        assert!(validate_sign_in_path("/login/{id}".into()).is_err());
        assert!(validate_sign_in_path("/admin-login".into()).is_ok());
    }
}
