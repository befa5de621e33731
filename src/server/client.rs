use std::{
    error::Error,
    fmt::{Display, Formatter},
};

use axum::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use super::api::{aggregate_request::AggregateRequest, aggregate_response::RawAggregateResponse};

#[derive(Debug)]
pub enum AggregationError {
    /// The request never produced a response
    Transport(String),
    /// The service answered with a failure status
    Status { status: StatusCode, body: String },
    /// The response body is not an aggregate result
    Decode(String),
}

impl Display for AggregationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregationError::Transport(message) => {
                write!(f, "Aggregation service unreachable: {}", message)
            }
            AggregationError::Status { status, body } => {
                write!(f, "Aggregation service returned {}: {}", status, body)
            }
            AggregationError::Decode(message) => {
                write!(f, "Aggregation service returned an invalid result: {}", message)
            }
        }
    }
}
impl Error for AggregationError {}

impl From<reqwest::Error> for AggregationError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// The remote service computing pivot tables.
#[async_trait]
pub trait AggregationService: Send + Sync {
    async fn aggregate(
        &self,
        request: &AggregateRequest,
    ) -> Result<RawAggregateResponse, AggregationError>;

    async fn ping(&self) -> Result<(), AggregationError>;
}

pub struct HttpAggregationService {
    client: reqwest::Client,
    url: String,
}

impl HttpAggregationService {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl AggregationService for HttpAggregationService {
    async fn aggregate(
        &self,
        request: &AggregateRequest,
    ) -> Result<RawAggregateResponse, AggregationError> {
        let response = self.client.post(&self.url).json(request).send().await?;

        let status = response.status();
        if response.error_for_status_ref().is_err() {
            return Err(AggregationError::Status {
                status,
                body: response.text().await?,
            });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "received aggregate result");

        serde_json::from_str(&body).map_err(|err| AggregationError::Decode(err.to_string()))
    }

    async fn ping(&self) -> Result<(), AggregationError> {
        // any answer counts, the service only routes POST requests
        let _response = self.client.get(&self.url).send().await?;

        Ok(())
    }
}

/// Serves `body` with `status` for every request on a local port.
#[cfg(test)]
pub(crate) fn spawn_stub(status: StatusCode, body: &'static str) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let app = axum::Router::new().route(
        "/",
        axum::routing::any(move || async move { (status, body) }),
    );
    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(app.into_make_service());
    tokio::spawn(server);

    format!("http://{}/", addr)
}
