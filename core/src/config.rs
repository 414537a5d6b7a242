//! Endpoint and mode resolution from environment signals.
//!
//! # Design
//! Resolution is a pure function of `(api_url, runtime)` so the policy can
//! be tested without touching the process environment. The result is
//! computed once and owned by the client; there is no re-resolution hook.
//!
//! | `API_URL`        | `APP_ENV`    | Result                       |
//! |------------------|--------------|------------------------------|
//! | set, non-loopback| any          | Live, that URL               |
//! | set, loopback    | development  | Live, that URL               |
//! | set, loopback    | production   | Demo                         |
//! | set, unparseable | production   | Demo                         |
//! | set, unparseable | development  | `ConfigError::InvalidUrl`    |
//! | unset            | development  | Live, `http://localhost:8000/api` |
//! | unset            | production   | Demo                         |

use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};
use url::{Host, Url};

pub const DEFAULT_LOCAL_URL: &str = "http://localhost:8000/api";
pub const DEMO_PLACEHOLDER_URL: &str = "https://demo.invalid/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

pub const API_URL_VAR: &str = "API_URL";
pub const APP_ENV_VAR: &str = "APP_ENV";
pub const TIMEOUT_VAR: &str = "API_TIMEOUT_SECS";

/// Whether the client talks to the network at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Demo,
}

/// The runtime flavour the process was started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    Production,
    Development,
}

impl Runtime {
    /// Only the literal `production` selects production.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("production") => Runtime::Production,
            _ => Runtime::Development,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API_URL is not a valid URL: {0}")]
    InvalidUrl(String),

    #[error("API_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub mode: Mode,
    pub runtime: Runtime,
    pub timeout: Duration,
    pub health_timeout: Duration,
}

impl ClientConfig {
    /// Apply the resolution policy.
    ///
    /// A production deployment without a usable URL degrades to Demo mode
    /// instead of failing.
    pub fn resolve(api_url: Option<&str>, runtime: Runtime) -> Self {
        let api_url = api_url.map(str::trim).filter(|u| !u.is_empty());
        let (base_url, mode) = match api_url {
            Some(url) if runtime == Runtime::Development || !is_loopback(url) => {
                (url.to_string(), Mode::Live)
            }
            _ if runtime == Runtime::Development => (DEFAULT_LOCAL_URL.to_string(), Mode::Live),
            _ => (DEMO_PLACEHOLDER_URL.to_string(), Mode::Demo),
        };
        Self {
            base_url,
            mode,
            runtime,
            timeout: DEFAULT_TIMEOUT,
            health_timeout: HEALTH_TIMEOUT,
        }
    }

    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let runtime = Runtime::parse(lookup(APP_ENV_VAR).as_deref());
        let api_url = lookup(API_URL_VAR);
        // Production never fails here: an unparseable URL resolves to Demo.
        if runtime == Runtime::Development {
            if let Some(url) = api_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
                Url::parse(url).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
            }
        }

        let mut config = Self::resolve(api_url.as_deref(), runtime);
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs: u64 = raw
                .trim()
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
            config.timeout = Duration::from_secs(secs);
        }

        match config.mode {
            Mode::Live => info!(base_url = %config.base_url, ?runtime, "using live API"),
            Mode::Demo => warn!(?runtime, "no usable API URL, serving demo data"),
        }
        Ok(config)
    }

    pub fn is_demo(&self) -> bool {
        self.mode == Mode::Demo
    }

    /// Requests are logged in development runtimes only.
    pub fn logs_requests(&self) -> bool {
        self.runtime == Runtime::Development
    }
}

/// `true` when `url` points at this machine. Unparseable URLs are treated
/// as loopback so they never win in production.
pub fn is_loopback(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return true;
    };
    match parsed.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.to_ascii_lowercase();
            domain == "localhost" || domain.ends_with(".localhost")
        }
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => true,
    }
}
