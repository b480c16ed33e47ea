//! Page fetching with request pacing.
//!
//! The calendar and timetable sites are small university services; every
//! request waits until the configured delay has passed since the previous one.

use crate::config::ScraperConfig;
use crate::error::FetchError;
use rand::Rng;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Source of raw page markup.
pub trait PageFetcher {
    fn get(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;

    /// Posts an `application/x-www-form-urlencoded` body.
    fn post_form(
        &self,
        url: &str,
        body: &str,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Enforces a minimum spacing between requests.
pub struct Pacer {
    delay: Duration,
    jitter: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(delay: Duration, jitter: Duration) -> Self {
        Self {
            delay,
            jitter,
            last_request: Mutex::new(None),
        }
    }

    /// Waits until the next request may be sent and records it as sent.
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let target = self.delay + self.random_jitter();
            let elapsed = previous.elapsed();
            if elapsed < target {
                let pause = target - elapsed;
                debug!(pause_ms = pause.as_millis() as u64, "Pacing request");
                tokio::time::sleep(pause).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn random_jitter(&self) -> Duration {
        let max = self.jitter.as_millis() as u64;
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max))
    }
}

/// HTTP fetcher for the live sites.
pub struct HttpFetcher {
    client: Client,
    pacer: Pacer,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.request_timeout())
            .cookie_store(true)
            .build()
            .map_err(|e| FetchError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            pacer: Pacer::new(
                config.request_delay(),
                Duration::from_millis(config.request_jitter_ms),
            ),
        })
    }

    async fn read_body(response: reqwest::Response) -> Result<String, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: response.url().to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

impl PageFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        self.pacer.wait().await;
        info!(url = %url, "GET");
        let response = self.client.get(url).send().await?;
        Self::read_body(response).await
    }

    async fn post_form(&self, url: &str, body: &str) -> Result<String, FetchError> {
        self.pacer.wait().await;
        info!(url = %url, "POST");
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body.to_string())
            .send()
            .await?;
        Self::read_body(response).await
    }
}
