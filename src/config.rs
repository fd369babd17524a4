use crate::error::{QrfeedzError, Result};
use log::{info, warn};
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://qrfeedz.db?mode=rwc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub database_url: String,
    pub app_env: String,
    pub super_admin: Option<Credentials>,
    pub admin: Option<Credentials>,
    pub crocrock_affiliate: Option<Credentials>,
    pub crocrock_admin: Option<Credentials>,
    pub crocrock_user: Option<Credentials>,
    pub roche_townhall_admin_password: Option<String>,
}

impl Config {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Self {
        match dotenv::dotenv() {
            Ok(path) => info!("loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("could not read .env: {}", e),
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "local".to_string()),
            super_admin: credentials("QRFEEDZ_SUPER_ADMIN"),
            admin: credentials("QRFEEDZ_ADMIN"),
            crocrock_affiliate: credentials("CROCROCK_AFFILIATE"),
            crocrock_admin: credentials("CROCROCK_ADMIN"),
            crocrock_user: credentials("CROCROCK_USER"),
            roche_townhall_admin_password: non_empty(env::var("ROCHE_TOWNHALL_ADMIN_PASSWORD").ok()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    pub fn require<'a>(
        value: &'a Option<Credentials>,
        prefix: &'static str,
    ) -> Result<&'a Credentials> {
        value.as_ref().ok_or(QrfeedzError::MissingEnv(prefix))
    }
}

fn credentials(prefix: &str) -> Option<Credentials> {
    let get = |suffix: &str| non_empty(env::var(format!("{}_{}", prefix, suffix)).ok());
    match (get("NAME"), get("EMAIL"), get("PASSWORD")) {
        (Some(name), Some(email), Some(password)) => Some(Credentials {
            name,
            email,
            password,
        }),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
