use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use tokio::time::{Duration, sleep};

use crate::config::Config;
use crate::core::constants::{defaults, http_status, timeouts};
use crate::core::error::Result;
use crate::core::types::ProbeResult;
use crate::reporting::logging;
use crate::validation::page;

/// A single liveness probe.
///
/// Implementations never fail: network-level problems are reported in the
/// returned [`ProbeResult`] with an `Error` status.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeResult;
}

/// When and how long to wait before re-issuing a request.
///
/// Only responses whose status is in `status_codes` are retried; connection
/// errors fail immediately. The first retry is immediate and retry `n >= 2`
/// waits `backoff_base * 2^(n-1)`, capped at two minutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u8,
    pub backoff_base: Duration,
    pub status_codes: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: defaults::RETRY_ATTEMPTS,
            backoff_base: Duration::from_millis(timeouts::DEFAULT_BACKOFF_BASE_MS),
            status_codes: http_status::RETRYABLE.to_vec(),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.retry_attempts.unwrap_or(defaults::RETRY_ATTEMPTS),
            backoff_base: config.backoff_base_duration(),
            status_codes: config
                .retry_status_codes
                .clone()
                .unwrap_or_else(|| http_status::RETRYABLE.to_vec()),
        }
    }

    pub fn should_retry(&self, status: u16) -> bool {
        self.status_codes.contains(&status)
    }

    /// Delay before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(retry - 1);
        self.backoff_base
            .saturating_mul(factor)
            .min(Duration::from_millis(timeouts::MAX_BACKOFF_MS))
    }
}

/// Probes URLs over a shared HTTP client.
///
/// The client is built once and owned here; clone the checker (cheap, the
/// client is reference counted) to share it between tasks.
#[derive(Debug, Clone)]
pub struct LivenessChecker {
    client: reqwest::Client,
    retry: RetryPolicy,
    wrap_width: usize,
}

impl LivenessChecker {
    pub fn new(client: reqwest::Client, retry: RetryPolicy, wrap_width: usize) -> Self {
        Self {
            client,
            retry,
            wrap_width,
        }
    }

    /// Build the HTTP client and retry policy described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let concurrency = config.effective_concurrency();

        let mut client_builder = reqwest::Client::builder()
            .timeout(config.timeout_duration())
            .redirect(Policy::limited(30))
            .user_agent(config.effective_user_agent())
            .pool_max_idle_per_host(concurrency.min(20))
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60));

        if accepts_invalid_certs(config) {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build()?;
        let wrap_width = config
            .title_wrap_width
            .unwrap_or(defaults::TITLE_WRAP_WIDTH);

        Ok(Self::new(client, RetryPolicy::from_config(config), wrap_width))
    }

    /// GET `url`, re-issuing the request while the status is retryable and
    /// retries remain. The last response is returned whatever its status.
    async fn get_with_retry(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        let mut retries: u32 = 0;

        loop {
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();

            if !self.retry.should_retry(status) || retries >= u32::from(self.retry.max_retries) {
                return Ok(response);
            }

            retries += 1;
            let delay = self.retry.backoff(retries);
            logging::log_retry(url, status, retries, delay.as_millis());
            drop(response);

            if !delay.is_zero() {
                sleep(delay).await;
            }
        }
    }

    async fn fetch(&self, url: &str) -> reqwest::Result<(u16, Option<String>)> {
        let response = self.get_with_retry(url).await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await?;
        let html = page::decode_body(&body, content_type.as_deref());

        Ok((status, page::extract_title(&html)))
    }
}

#[async_trait]
impl Probe for LivenessChecker {
    async fn probe(&self, url: &str) -> ProbeResult {
        let url = normalize_url(url);

        let result = match self.fetch(&url).await {
            Ok((status, title)) => ProbeResult::success(
                url,
                status,
                page::display_title(title.as_deref(), self.wrap_width),
            ),
            Err(err) => {
                let description = describe_error(&err);
                ProbeResult::error(url, page::wrap_text(&description, self.wrap_width))
            }
        };

        logging::log_probe_result(&result.url, result.status, &result.title);
        result
    }
}

/// Certificates go unchecked unless `verify_tls` is set.
pub fn accepts_invalid_certs(config: &Config) -> bool {
    !config.verify_tls.unwrap_or(false)
}

/// Prefix `http://` unless the URL already carries an http(s) scheme.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

/// The error and its whole source chain, e.g.
/// `error sending request for url (...): client error (Connect): tcp connect error: Connection refused`.
pub fn describe_error(err: &(dyn std::error::Error + 'static)) -> String {
    let mut description = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !description.contains(&cause_text) {
            description.push_str(": ");
            description.push_str(&cause_text);
        }
        source = cause.source();
    }

    description
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::core::types::ProbeStatus;
    use mockito::Server;

    fn test_config() -> Config {
        Config {
            timeout: Some(5), // 5 seconds for CI stability
            concurrency: Some(1),
            backoff_base_ms: Some(1),
            ..Default::default()
        }
    }

    fn checker() -> LivenessChecker {
        LivenessChecker::from_config(&test_config()).expect("client should build")
    }

    fn refused_url() -> String {
        // Bind then drop to get a local port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}/")
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("10.0.0.1:8080"), "http://10.0.0.1:8080");
        assert_eq!(normalize_url("http://a.com"), "http://a.com");
        assert_eq!(normalize_url("https://a.com"), "https://a.com");
        assert_eq!(normalize_url(" www.a.com "), "http://www.a.com");
    }

    #[test]
    fn test_retry_policy__backoff_schedule() {
        let policy = RetryPolicy {
            backoff_base: Duration::from_secs(1),
            ..Default::default()
        };

        assert_eq!(policy.backoff(1), Duration::ZERO);
        assert_eq!(policy.backoff(2), Duration::from_secs(2));
        assert_eq!(policy.backoff(3), Duration::from_secs(4));
        assert_eq!(policy.backoff(40), Duration::from_secs(120));
    }

    #[test]
    fn test_retry_policy__status_allow_list() {
        let policy = RetryPolicy::default();

        for status in [500, 502, 503, 504] {
            assert!(policy.should_retry(status));
        }
        for status in [200, 301, 404, 429, 501] {
            assert!(!policy.should_retry(status));
        }
        assert_eq!(policy.max_retries, 3);
    }

    #[test]
    fn test_retry_policy__from_config() {
        let config = Config {
            retry_attempts: Some(1),
            backoff_base_ms: Some(50),
            retry_status_codes: Some(vec![429]),
            ..Default::default()
        };
        let policy = RetryPolicy::from_config(&config);

        assert_eq!(policy.max_retries, 1);
        assert_eq!(policy.backoff_base, Duration::from_millis(50));
        assert!(policy.should_retry(429));
        assert!(!policy.should_retry(503));
    }

    #[tokio::test]
    async fn test_probe__records_status_and_title() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/home")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<html><head><title>Router Admin</title></head></html>")
            .create_async()
            .await;
        let endpoint = server.url() + "/home";

        let result = checker().probe(&endpoint).await;

        assert_eq!(result.url, endpoint);
        assert_eq!(result.status, ProbeStatus::Code(200));
        assert_eq!(result.title, "Router Admin");
    }

    #[tokio::test]
    async fn test_probe__missing_title_is_null() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/plain")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let result = checker().probe(&(server.url() + "/plain")).await;

        assert_eq!(result.status, ProbeStatus::Code(404));
        assert_eq!(result.title, "null");
    }

    #[tokio::test]
    async fn test_probe__long_title_is_wrapped() {
        let mut server = Server::new_async().await;
        let long_title = "word ".repeat(30);
        let _m = server
            .mock("GET", "/long")
            .with_status(200)
            .with_body(format!("<title>{long_title}</title>"))
            .create_async()
            .await;

        let result = checker().probe(&(server.url() + "/long")).await;

        assert!(result.title.contains('\n'));
        assert!(result.title.lines().all(|line| line.chars().count() <= 80));
    }

    #[tokio::test]
    async fn test_probe__persistent_503_reports_status_after_retries() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/busy")
            .with_status(503)
            .expect(4) // initial request + 3 retries
            .create_async()
            .await;

        let result = checker().probe(&(server.url() + "/busy")).await;

        assert_eq!(result.status, ProbeStatus::Code(503));
        assert!(!result.is_error());
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_probe__non_retryable_status_is_requested_once() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/missing")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let result = checker().probe(&(server.url() + "/missing")).await;

        assert_eq!(result.status, ProbeStatus::Code(404));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_probe__retries_disabled() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/down")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;
        let config = Config {
            retry_attempts: Some(0),
            ..test_config()
        };
        let checker = LivenessChecker::from_config(&config).unwrap();

        let result = checker.probe(&(server.url() + "/down")).await;

        assert_eq!(result.status, ProbeStatus::Code(500));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_probe__connection_refused_is_error() {
        let endpoint = refused_url();

        let result = checker().probe(&endpoint).await;

        assert_eq!(result.url, endpoint);
        assert_eq!(result.status, ProbeStatus::Error);
        assert!(!result.title.is_empty());
        assert_ne!(result.title, "null");
    }

    #[tokio::test]
    async fn test_probe__normalizes_scheme_less_url() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(200)
            .create_async()
            .await;
        let host = server.host_with_port();

        let result = checker().probe(&host).await;

        assert_eq!(result.url, format!("http://{host}"));
        assert_eq!(result.status, ProbeStatus::Code(200));
    }

    #[tokio::test]
    async fn test_probe__sends_browser_user_agent() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/ua")
            .match_header("user-agent", defaults::USER_AGENT)
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let result = checker().probe(&(server.url() + "/ua")).await;

        assert_eq!(result.status, ProbeStatus::Code(200));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_probe__timeout_is_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/", listener.local_addr().unwrap());
        // Accept and hold the connection without ever answering
        let silent = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            sleep(Duration::from_secs(30)).await;
        });
        let config = Config {
            timeout: Some(1),
            ..test_config()
        };
        let checker = LivenessChecker::from_config(&config).unwrap();

        let result = checker.probe(&endpoint).await;
        silent.abort();

        assert_eq!(result.status, ProbeStatus::Error);
        assert!(!result.title.is_empty());
        assert_ne!(result.title, "null");
    }

    #[test]
    fn test_accepts_invalid_certs__by_default() {
        assert!(accepts_invalid_certs(&Config::default()));
        assert!(LivenessChecker::from_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_accepts_invalid_certs__not_when_verifying() {
        let config = Config {
            verify_tls: Some(true),
            ..Default::default()
        };
        assert!(!accepts_invalid_certs(&config));
    }

    #[test]
    fn test_describe_error_includes_source_chain() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let outer = crate::core::error::NetSiftError::Io(inner);

        let description = describe_error(&outer);

        // The io source repeats text already in the outer message
        assert_eq!(description, "IO error: refused");
    }
}
