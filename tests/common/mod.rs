#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use synthfeed::domain::error::FeedError;
use synthfeed::domain::settings::FeedSettings;
use synthfeed::ports::transport_port::{FeedTransport, TransportResponse};

#[cfg(feature = "web")]
pub use router_transport::*;

pub fn test_settings() -> FeedSettings {
    FeedSettings::default()
}

pub fn uri(path: &str, query: &[(&str, String)]) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let pairs: Vec<String> = query
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect();
    format!("{path}?{}", pairs.join("&"))
}

#[cfg(feature = "web")]
mod router_transport {
    use super::*;
    use axum::{Router, body::Body, http::Request};
    use http_body_util::BodyExt;
    use synthfeed::adapters::web::{AppState, build_router};
    use tower::ServiceExt;

    pub fn test_router() -> Router {
        build_router(AppState {
            settings: test_settings(),
        })
    }

    /// Dispatches requests straight into an in-process router.
    pub struct RouterTransport {
        router: Router,
    }

    impl RouterTransport {
        pub fn new(router: Router) -> Self {
            Self { router }
        }
    }

    impl FeedTransport for RouterTransport {
        async fn get(
            &self,
            path: &str,
            query: &[(&str, String)],
        ) -> Result<TransportResponse, FeedError> {
            let request = Request::builder()
                .uri(uri(path, query))
                .body(Body::empty())
                .map_err(|e| FeedError::Transport {
                    reason: e.to_string(),
                })?;
            let response = self
                .router
                .clone()
                .oneshot(request)
                .await
                .map_err(|never| -> FeedError { match never {} })?;
            let status = response.status().as_u16();
            let bytes = response
                .into_body()
                .collect()
                .await
                .map_err(|e| FeedError::Transport {
                    reason: e.to_string(),
                })?
                .to_bytes();
            Ok(TransportResponse {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            })
        }
    }
}

/// Answers each path with a canned response and records every call.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: HashMap<String, Result<TransportResponse, String>>,
    pub calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, path: &str, status: u16, body: &str) -> Self {
        self.responses.insert(
            path.to_string(),
            Ok(TransportResponse {
                status,
                body: body.to_string(),
            }),
        );
        self
    }

    pub fn with_failure(mut self, path: &str, reason: &str) -> Self {
        self.responses
            .insert(path.to_string(), Err(reason.to_string()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_query(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap()
            .last()
            .map(|(_, q)| q.clone())
            .unwrap_or_default()
    }
}

impl FeedTransport for ScriptedTransport {
    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<TransportResponse, FeedError> {
        self.calls.lock().unwrap().push((
            path.to_string(),
            query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        ));
        match self.responses.get(path) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(reason)) => Err(FeedError::Transport {
                reason: reason.clone(),
            }),
            None => Ok(TransportResponse {
                status: 404,
                body: r#"{"error":"no such endpoint"}"#.to_string(),
            }),
        }
    }
}
