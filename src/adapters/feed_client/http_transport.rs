//! reqwest-backed [`FeedTransport`].

use crate::domain::error::FeedError;
use crate::domain::settings::ClientSettings;
use crate::ports::transport_port::{FeedTransport, TransportResponse};

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self, FeedError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| FeedError::Transport {
            reason: format!("failed to build HTTP client: {e}"),
        })?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl FeedTransport for HttpTransport {
    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<TransportResponse, FeedError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| FeedError::Transport {
                reason: format!("GET {url}: {e}"),
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| FeedError::Transport {
            reason: format!("reading {url}: {e}"),
        })?;
        tracing::trace!(%url, status, "feed response");
        Ok(TransportResponse { status, body })
    }
}
