//! Events delivered from the backend worker to the UI thread.

use client_core::FetchError;
use shared::protocol::ReportResponse;

pub enum UiEvent {
    Info(String),
    ReportFetched(Result<ReportResponse, FetchError>),
}
