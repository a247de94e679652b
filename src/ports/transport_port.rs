//! Outbound transport port used by the client-side feed adapter.

use std::future::Future;

use crate::domain::error::FeedError;

/// Raw answer to one GET, before any protocol decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Issues a single GET against the feed server.
///
/// Implementations report network-level failures as [`FeedError::Transport`] and
/// return every HTTP answer, including 4xx/5xx, as a [`TransportResponse`].
pub trait FeedTransport: Send + Sync {
    fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> impl Future<Output = Result<TransportResponse, FeedError>> + Send;
}
