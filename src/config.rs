use std::str::FromStr;

use anyhow::Context;

/// What the `status` field of an error body reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorStatusMode {
    /// The HTTP status of the response.
    #[default]
    Actual,
    /// Always 400, for clients written against the old behavior.
    Legacy,
}

impl FromStr for ErrorStatusMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "actual" => Ok(Self::Actual),
            "legacy" => Ok(Self::Legacy),
            other => anyhow::bail!("unknown error status mode '{}' (expected actual|legacy)", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub error_status: ErrorStatusMode,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            error_status: match std::env::var("ERROR_STATUS_MODE") {
                Ok(raw) => raw.parse().context("ERROR_STATUS_MODE is invalid")?,
                Err(_) => ErrorStatusMode::default(),
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            error_status: ErrorStatusMode::default(),
        }
    }
}
