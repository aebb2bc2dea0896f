use std::{
    net::IpAddr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{File, FileFormat};
use folio_models::Sensitive;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Colon separated list of config files, later files take precedence.
pub const CONFIG_PATHS_ENV: &str = "FOLIO_CONFIG";
pub const EMAIL_USER_ENV: &str = "EMAIL_USER";
pub const EMAIL_PASSWORD_ENV: &str = "EMAIL_PASS";

/// Load the config from the files listed in `FOLIO_CONFIG` (or the default
/// config file) and apply the mail account from `EMAIL_USER` / `EMAIL_PASS`.
pub fn load() -> anyhow::Result<Config> {
    let paths = match std::env::var_os(CONFIG_PATHS_ENV) {
        Some(paths) => std::env::split_paths(&paths).collect(),
        None => vec![PathBuf::from(DEFAULT_CONFIG_PATH)],
    };

    let overrides = Overrides {
        email_user: std::env::var(EMAIL_USER_ENV).ok(),
        email_password: std::env::var(EMAIL_PASSWORD_ENV).ok(),
    };

    load_paths(&paths, overrides)
}

/// Values that take precedence over everything read from config files.
#[derive(Debug, Default)]
pub struct Overrides {
    pub email_user: Option<String>,
    pub email_password: Option<String>,
}

pub fn load_paths(paths: &[impl AsRef<Path>], overrides: Overrides) -> anyhow::Result<Config> {
    paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .set_override_option("email.user", overrides.email_user)?
        .set_override_option("email.password", overrides.email_password)?
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub health: HealthConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub relay: String,
    pub port: Option<u16>,
    pub smtp_url: Option<String>,
    pub timeout: Option<Duration>,
    pub user: Option<String>,
    pub password: Option<Sensitive<String>>,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

impl From<Duration> for std::time::Duration {
    fn from(value: Duration) -> Self {
        value.0
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s)
            .map(Self)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid duration: {s:?}")))
    }
}

/// Parse durations like `"1d 2h 3m 4s"`. A number without a unit counts as
/// seconds.
fn parse_duration(s: &str) -> Option<std::time::Duration> {
    s.split_whitespace()
        .try_fold(std::time::Duration::ZERO, |total, part| {
            let split = part
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(part.len());
            let (value, unit) = part.split_at(split);
            let value = match value {
                "" => 0,
                value => value.parse::<u64>().ok()?,
            };
            let factor = match unit {
                "" | "s" => 1,
                "m" => 60,
                "h" => 60 * 60,
                "d" => 24 * 60 * 60,
                _ => return None,
            };
            Some(total + std::time::Duration::from_secs(value * factor))
        })
}
