use std::time::Duration;

use rand::Rng;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::check::{CheckResult, RangeSource, check_password};
use crate::digest::RangePrefix;
use crate::error::Error;

/// Range endpoint of the Pwned Passwords API.
pub const DEFAULT_BASE_URL: &str = "https://api.pwnedpasswords.com/range/";

/// Base delay for exponential backoff (doubles each retry)
pub const RETRY_BASE_DELAY_MS: u64 = 100;

/// Settings for [`RangeClient`].
///
/// The defaults issue exactly one request per check against the public API,
/// with no padding and the transport's default timeout.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Option<Duration>,
    /// Ask the API to pad responses with decoy `SUFFIX:0` entries.
    pub padding: bool,
    pub max_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("hibp-range/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
            padding: false,
            max_retries: 0,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_padding(mut self, padding: bool) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Client for the Pwned Passwords range API.
#[derive(Debug, Clone)]
pub struct RangeClient {
    http: reqwest::Client,
    base_url: String,
    padding: bool,
    max_retries: u32,
}

impl RangeClient {
    /// Creates a client with [`ClientConfig::default`].
    pub fn new() -> Result<Self, Error> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(Error::ClientBuild)?;

        let mut base_url = config.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self { http, base_url, padding: config.padding, max_retries: config.max_retries })
    }

    /// Hashes `password` and looks it up in the breach corpus.
    pub async fn check_password(&self, password: &str) -> Result<CheckResult, Error> {
        check_password(self, password).await
    }

    async fn request_once(&self, url: &str, prefix: RangePrefix) -> Result<String, Error> {
        let mut request = self.http.get(url);
        if self.padding {
            request = request.header("Add-Padding", "true");
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::HttpRequest { prefix: prefix.to_string(), source: e })?;

        let status = response.status();
        debug!(%prefix, status = status.as_u16(), "range response");
        if !status.is_success() {
            return Err(Error::HttpStatus { prefix: prefix.to_string(), status: status.as_u16() });
        }

        response
            .text()
            .await
            .map_err(|e| Error::HttpRequest { prefix: prefix.to_string(), source: e })
    }
}

impl RangeSource for RangeClient {
    #[tracing::instrument(level = "debug", skip_all, fields(prefix = %prefix))]
    async fn fetch_range(&self, prefix: RangePrefix) -> Result<String, Error> {
        let url = format!("{}{}", self.base_url, prefix);

        let mut attempt = 0;
        loop {
            match self.request_once(&url, prefix).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.max_retries && is_retryable(&e) => {
                    attempt += 1;
                    let delay = backoff_delay(attempt);
                    warn!(error = %e, attempt, ?delay, "range query failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn padded(&self) -> bool {
        self.padding
    }
}

/// Transport errors, rate limiting and server errors are worth another try.
/// Any other status will not change on retry.
fn is_retryable(error: &Error) -> bool {
    match error {
        Error::HttpRequest { .. } => true,
        Error::HttpStatus { status, .. } => StatusCode::from_u16(*status)
            .map(|s| s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error())
            .unwrap_or(false),
        _ => false,
    }
}

/// Exponential backoff for retry `attempt` (1-based) with up to 50% jitter.
fn backoff_delay(attempt: u32) -> Duration {
    let base = RETRY_BASE_DELAY_MS * (1 << (attempt - 1).min(10));
    let jitter = rand::thread_rng().gen_range(0..=base / 2);
    Duration::from_millis(base + jitter)
}
