//! Snapshot fetcher
//!
//! Issues the HTTP requests the dashboard core lives on and normalizes
//! their outcomes. The fetcher never retries; retry cadence belongs to the
//! refresh loop. An authorization failure is reported distinctly because it
//! is terminal for the session, unlike every other failure.

use crate::config::Config;
use crate::model::{
    Barista, CreateOrderRequest, Order, SessionUser, TestCase, TestCaseResponse,
};
use crate::types::OrderId;
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors reported by the fetch boundary
#[derive(Debug, Error)]
pub enum FetchError {
    /// The backend rejected the session credential (401)
    #[error("session expired or not signed in")]
    Unauthorized,

    /// Any other non-success HTTP status
    #[error("backend returned HTTP {0}")]
    Status(u16),

    /// Network, timeout, or response-decoding failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    /// Check if this is the terminal authorization failure
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Check if the next scheduled refresh may simply try again
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        !self.is_unauthorized()
    }

    /// Get the appropriate log level for this error
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        match self {
            // Losing the session needs attention right away
            Self::Unauthorized => tracing::Level::ERROR,
            // Everything else is retried on the next tick
            Self::Status(_) | Self::Transport(_) => tracing::Level::WARN,
        }
    }
}

/// Point-in-time copy of the backend's orders and staff
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub orders: Vec<Order>,
    pub baristas: Vec<Barista>,
}

/// Source of live snapshots, abstracted so the refresh loop can be driven
/// by an in-process double in tests
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the current orders and baristas as one consistent snapshot
    async fn fetch_snapshot(&self) -> Result<Snapshot, FetchError>;
}

/// HTTP client for the café backend
///
/// Requests carry the session cookie; a 401 on any of them surfaces as
/// [`FetchError::Unauthorized`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from configuration
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.backend.request_timeout())
            .cookie_store(true)
            .build()?;
        Ok(Self {
            http,
            base_url: config.backend.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn check_status(response: &Response) -> Result<(), FetchError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            Err(FetchError::Unauthorized)
        } else if status.is_success() {
            Ok(())
        } else {
            Err(FetchError::Status(status.as_u16()))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::check_status(&response)?;
        Ok(response.json().await?)
    }

    async fn post_empty(&self, path: &str) -> Result<(), FetchError> {
        let response = self.http.post(self.url(path)).send().await?;
        Self::check_status(&response)
    }

    /// Fetch the current order list
    pub async fn fetch_orders(&self) -> Result<Vec<Order>, FetchError> {
        self.get_json("/api/orders").await
    }

    /// Fetch the current staff list
    pub async fn fetch_baristas(&self) -> Result<Vec<Barista>, FetchError> {
        self.get_json("/api/baristas").await
    }

    /// Fetch orders and baristas concurrently as one snapshot
    ///
    /// Both requests must succeed. A 401 on either wins over any other
    /// failure, since it invalidates the whole session rather than one
    /// request.
    pub async fn fetch_live_snapshot(&self) -> Result<Snapshot, FetchError> {
        let (orders, baristas) = tokio::join!(self.fetch_orders(), self.fetch_baristas());
        match (orders, baristas) {
            (Ok(orders), Ok(baristas)) => Ok(Snapshot { orders, baristas }),
            (Err(err), _) | (_, Err(err)) if err.is_unauthorized() => Err(err),
            (Err(err), _) | (_, Err(err)) => Err(err),
        }
    }

    /// Fetch the canned analytics test cases
    pub async fn fetch_test_cases(&self) -> Result<Vec<TestCase>, FetchError> {
        let response: TestCaseResponse = self.get_json("/api/analytics/test-cases").await?;
        Ok(response.test_cases)
    }

    /// Submit a new order; only success or failure is interpreted
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<(), FetchError> {
        let response = self
            .http
            .post(self.url("/api/orders"))
            .json(request)
            .send()
            .await?;
        Self::check_status(&response)
    }

    /// Mark an order completed
    pub async fn complete_order(&self, id: OrderId) -> Result<(), FetchError> {
        self.post_empty(&format!("/api/orders/{}/complete", id)).await
    }

    /// Populate the demo staff roster
    pub async fn seed_baristas(&self) -> Result<(), FetchError> {
        self.post_empty("/api/baristas/seed").await
    }

    /// Probe the current session identity
    pub async fn current_session(&self) -> Result<SessionUser, FetchError> {
        self.get_json("/api/auth/me").await
    }
}

#[async_trait]
impl SnapshotSource for ApiClient {
    async fn fetch_snapshot(&self) -> Result<Snapshot, FetchError> {
        self.fetch_live_snapshot().await
    }
}

#[async_trait]
impl<T: SnapshotSource + ?Sized> SnapshotSource for std::sync::Arc<T> {
    async fn fetch_snapshot(&self) -> Result<Snapshot, FetchError> {
        (**self).fetch_snapshot().await
    }
}
