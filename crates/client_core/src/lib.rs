pub mod config;
pub mod form_controller;

use async_trait::async_trait;
use reqwest::{Client, Method};
use shared::protocol::{DiagnosisRequest, ReportResponse};
use thiserror::Error;
use tracing::debug;

pub use config::{load_settings, prepare_api_url, Settings};
pub use form_controller::{
    ControllerError, FormController, FormData, SubmitOutcome, ViewState, SUBMIT_FAILURE_ALERT,
};

/// Request kind handed to a [`ReportFetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Send a completed form for diagnosis.
    Submit,
}

impl Verb {
    pub fn method(self) -> Method {
        match self {
            Self::Submit => Method::POST,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("diagnosis service request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid diagnosis service response payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("diagnosis service response did not include a report")]
    MissingReport,
    #[error("report fetcher unavailable: {0}")]
    Unavailable(String),
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Request(err) if err.is_status() => "status",
            Self::Request(_) => "transport",
            Self::Decode(_) => "decode",
            Self::MissingReport => "missing_report",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

/// The one outbound call of the form: turn a completed request into a report.
#[async_trait]
pub trait ReportFetcher: Send + Sync {
    async fn fetch_report(
        &self,
        request: &DiagnosisRequest,
        verb: Verb,
    ) -> Result<ReportResponse, FetchError>;
}

/// Talks to the diagnosis service over HTTP with a JSON body.
///
/// No request timeout is set: a pending call runs until the service answers
/// or the connection fails.
pub struct HttpReportFetcher {
    http: Client,
    endpoint: String,
}

impl HttpReportFetcher {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReportFetcher for HttpReportFetcher {
    async fn fetch_report(
        &self,
        request: &DiagnosisRequest,
        verb: Verb,
    ) -> Result<ReportResponse, FetchError> {
        debug!(endpoint = %self.endpoint, verb = verb.as_str(), "requesting diagnosis report");
        let body = self
            .http
            .request(verb.method(), &self.endpoint)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
