//! Smoke check for the deployed documentation site.
//!
//! ```text
//! 1. Liveness   GET base_url up to `retries` times; 200/301/302 = live
//! 2. Paths      GET base_url ⨝ path for every configured path
//! 3. Report     JSON { base_url, checks: [...] } + exit code
//! ```
//!
//! Exit codes: `0` every path returned 2xx, `1` at least one path failed,
//! `2` the site never came up (no paths are attempted).
//!
//! HTTP goes through the [`Fetcher`] trait; [`HttpFetcher`] is the real
//! `reqwest` client.

use crate::config::SiteCheckConfig;
use reqwest::Url;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Statuses that count as "the site is up" during the liveness phase.
const LIVE_STATUSES: [u16; 3] = [200, 301, 302];

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Request failed: {0}")]
    Request(String),
}

/// Status and body of one GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

pub trait Fetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, CheckError>;
}

/// Blocking `reqwest` client that follows redirects.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, CheckError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, CheckError> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(FetchResponse { status, body })
    }
}

/// Outcome for one checked path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathCheck {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_markers: Option<BTreeMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub base_url: String,
    pub checks: Vec<PathCheck>,
}

impl CheckReport {
    pub fn is_live(&self) -> bool {
        self.error.is_none()
    }

    pub fn failed(&self) -> usize {
        self.checks.iter().filter(|c| !c.ok).count()
    }

    pub fn exit_code(&self) -> u8 {
        if !self.is_live() {
            2
        } else if self.failed() > 0 {
            1
        } else {
            0
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Ensure the base URL ends with `/` so relative paths join beneath it.
pub fn normalize_base(base_url: &str) -> String {
    if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    }
}

/// Resolve `path` against `base` the way a browser resolves a relative link.
pub fn join_url(base: &str, path: &str) -> Result<String, CheckError> {
    let invalid = |e: &dyn std::fmt::Display| CheckError::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    };
    let base = Url::parse(base).map_err(|e| invalid(&e))?;
    let joined = base.join(path).map_err(|e| invalid(&e))?;
    Ok(joined.to_string())
}

/// Poll `base` until it answers with a live status or attempts run out.
///
/// Sleeps `delay` between attempts, not after the last one.
pub fn wait_until_live(fetcher: &dyn Fetcher, base: &str, retries: u32, delay: Duration) -> bool {
    for attempt in 1..=retries {
        match fetcher.get(base) {
            Ok(response) if LIVE_STATUSES.contains(&response.status) => return true,
            _ => {}
        }
        if attempt < retries && !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
    false
}

/// GET one path and record status and marker presence.
pub fn check_path(fetcher: &dyn Fetcher, base: &str, path: &str, markers: &[String]) -> PathCheck {
    let url = match join_url(base, path) {
        Ok(url) => url,
        Err(e) => return failed_check(format!("{base}{path}"), e),
    };
    match fetcher.get(&url) {
        Ok(response) => {
            let ok = (200..300).contains(&response.status);
            let has_markers = ok.then(|| {
                let body = response.body.to_lowercase();
                markers
                    .iter()
                    .map(|m| (m.clone(), body.contains(&m.to_lowercase())))
                    .collect()
            });
            PathCheck {
                url,
                status: Some(response.status),
                ok,
                has_markers,
                error: None,
            }
        }
        Err(e) => failed_check(url, e),
    }
}

fn failed_check(url: String, error: CheckError) -> PathCheck {
    PathCheck {
        url,
        status: None,
        ok: false,
        has_markers: None,
        error: Some(error.to_string()),
    }
}

/// Run the full check: liveness, then every path.
pub fn run_check(fetcher: &dyn Fetcher, config: &SiteCheckConfig) -> CheckReport {
    let base_url = normalize_base(&config.base_url);
    let live = wait_until_live(
        fetcher,
        &base_url,
        config.retries,
        Duration::from_secs(config.retry_delay_secs),
    );
    if !live {
        return CheckReport {
            error: Some("Site not live yet".to_string()),
            base_url,
            checks: Vec::new(),
        };
    }

    let checks = config
        .paths
        .iter()
        .map(|path| check_path(fetcher, &base_url, path, &config.markers))
        .collect();
    CheckReport {
        error: None,
        base_url,
        checks,
    }
}
