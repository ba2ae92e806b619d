use std::time::Duration;

use futures_util::StreamExt;
use monitor_logging::monitor_debug;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(12),
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

/// What one GET of a candidate URL yielded. The fetch capability never
/// fails: transport errors, timeouts and oversized responses all surface
/// as `body: None` with the status code (0 when no response was seen).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub body: Option<String>,
    pub status: u16,
}

impl PageSnapshot {
    pub fn page(status: u16, body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            status,
        }
    }

    pub fn failed(status: u16) -> Self {
        Self { body: None, status }
    }
}

#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> PageSnapshot;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Option<reqwest::Client> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .ok()
    }
}

#[async_trait::async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> PageSnapshot {
        let parsed = match reqwest::Url::parse(url) {
            Ok(parsed) => parsed,
            Err(err) => {
                monitor_debug!("invalid url {}: {}", url, err);
                return PageSnapshot::failed(0);
            }
        };
        let client = match self.build_client() {
            Some(client) => client,
            None => return PageSnapshot::failed(0),
        };

        let response = match client.get(parsed).send().await {
            Ok(response) => response,
            Err(err) => {
                monitor_debug!("fetch of {} failed: {}", url, err);
                return PageSnapshot::failed(0);
            }
        };

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return PageSnapshot::failed(status);
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                monitor_debug!("response from {} too large ({} bytes)", url, content_len);
                return PageSnapshot::failed(status);
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => {
                    monitor_debug!("body read from {} failed: {}", url, err);
                    return PageSnapshot::failed(status);
                }
            };
            if bytes.len() as u64 + chunk.len() as u64 > self.settings.max_bytes {
                monitor_debug!("response from {} exceeded {} bytes", url, self.settings.max_bytes);
                return PageSnapshot::failed(status);
            }
            bytes.extend_from_slice(&chunk);
        }

        let body = String::from_utf8_lossy(&bytes).into_owned();
        PageSnapshot::page(status, body)
    }
}
