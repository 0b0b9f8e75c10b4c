//! View-state machine behind the diagnosis form.
//!
//! The controller is the only owner of the form values and of the current
//! view. Every mutation goes through one of the transition methods below and
//! each one checks the view it is allowed from.

use shared::{
    domain::{FormField, Gender, Severity},
    protocol::{DiagnosisRequest, ReportResponse},
};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::{FetchError, ReportFetcher, Verb};

/// Message shown to the user whenever a submission does not yield a report.
pub const SUBMIT_FAILURE_ALERT: &str = "Error fetching diagnosis report. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Form,
    Loading,
    Report(String),
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Loading => "loading",
            Self::Report(_) => "report",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn report(&self) -> Option<&str> {
        match self {
            Self::Report(text) => Some(text),
            _ => None,
        }
    }
}

/// Patient input as currently held by the form controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    name: String,
    age: String,
    gender: Option<Gender>,
    symptoms: String,
    duration: String,
    severity: Option<Severity>,
}

impl FormData {
    /// Current control value; unset selects read as the empty string.
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Age => &self.age,
            FormField::Gender => self.gender.map(Gender::key).unwrap_or(""),
            FormField::Symptoms => &self.symptoms,
            FormField::Duration => &self.duration,
            FormField::Severity => self.severity.map(Severity::key).unwrap_or(""),
        }
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }

    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|field| self.value(*field).is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    fn set(&mut self, field: FormField, value: &str) -> Result<(), ControllerError> {
        if !field.accepts(value) {
            return Err(ControllerError::RejectedInput {
                field,
                value: value.to_string(),
            });
        }

        // `accepts` already vetted the select keys.
        match field {
            FormField::Name => self.name = value.to_string(),
            FormField::Age => self.age = value.to_string(),
            FormField::Gender => self.gender = value.parse().ok(),
            FormField::Symptoms => self.symptoms = value.to_string(),
            FormField::Duration => self.duration = value.to_string(),
            FormField::Severity => self.severity = value.parse().ok(),
        }
        Ok(())
    }

    fn to_request(&self) -> Result<DiagnosisRequest, ControllerError> {
        let missing = self.missing_fields();
        match (self.gender, self.severity) {
            (Some(gender), Some(severity)) if missing.is_empty() => Ok(DiagnosisRequest {
                name: self.name.clone(),
                age: self.age.clone(),
                gender,
                symptoms: self.symptoms.clone(),
                duration: self.duration.clone(),
                severity,
            }),
            _ => Err(ControllerError::Incomplete { missing }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("cannot {action} while the {state} view is shown")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("{field} input does not accept {value:?}")]
    RejectedInput { field: FormField, value: String },
    #[error("required fields are not filled: {missing:?}")]
    Incomplete { missing: Vec<FormField> },
}

/// What the user should see once a submission settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Reported,
    Alert(&'static str),
}

#[derive(Debug, Default)]
pub struct FormController {
    view: ViewState,
    form: FormData,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn edit_field(&mut self, field: FormField, value: &str) -> Result<(), ControllerError> {
        self.require_form("edit the form")?;
        self.form.set(field, value)
    }

    /// Hides the form and hands back the snapshot to send.
    ///
    /// Nothing changes when the form is incomplete, so the fetcher is never
    /// reached with a missing field.
    pub fn begin_submit(&mut self) -> Result<DiagnosisRequest, ControllerError> {
        self.require_form("submit")?;
        let request = self.form.to_request().inspect_err(|err| {
            debug!(error = %err, "submission refused");
        })?;
        self.view = ViewState::Loading;
        info!("diagnosis report requested");
        Ok(request)
    }

    /// Settles the pending submission with whatever the fetcher produced.
    ///
    /// A response without report text counts as a failure. Failures are logged,
    /// turned into the fixed alert, and leave the form values in place.
    pub fn complete_submit(
        &mut self,
        result: Result<ReportResponse, FetchError>,
    ) -> Result<SubmitOutcome, ControllerError> {
        if !self.view.is_loading() {
            return Err(ControllerError::InvalidTransition {
                action: "complete a submission",
                state: self.view.name(),
            });
        }

        let report = result.and_then(|response| {
            response
                .report_text()
                .map(str::to_owned)
                .ok_or(FetchError::MissingReport)
        });

        match report {
            Ok(text) => {
                info!(report_len = text.len(), "diagnosis report received");
                self.view = ViewState::Report(text);
                Ok(SubmitOutcome::Reported)
            }
            Err(err) => {
                error!(kind = err.kind(), error = %err, "error fetching diagnosis report");
                self.view = ViewState::Form;
                Ok(SubmitOutcome::Alert(SUBMIT_FAILURE_ALERT))
            }
        }
    }

    /// Runs a whole submission against `fetcher`.
    ///
    /// The returned future must be awaited to completion: dropping it midway
    /// leaves the view in `Loading`, since only `complete_submit` leaves it.
    pub async fn submit(
        &mut self,
        fetcher: &dyn ReportFetcher,
    ) -> Result<SubmitOutcome, ControllerError> {
        let request = self.begin_submit()?;
        let result = fetcher.fetch_report(&request, Verb::Submit).await;
        self.complete_submit(result)
    }

    /// Leaves the report and starts over with an empty form.
    pub fn return_to_form(&mut self) -> Result<(), ControllerError> {
        if !matches!(self.view, ViewState::Report(_)) {
            return Err(ControllerError::InvalidTransition {
                action: "return to the form",
                state: self.view.name(),
            });
        }
        self.view = ViewState::Form;
        self.form = FormData::default();
        Ok(())
    }

    fn require_form(&self, action: &'static str) -> Result<(), ControllerError> {
        if self.view == ViewState::Form {
            Ok(())
        } else {
            Err(ControllerError::InvalidTransition {
                action,
                state: self.view.name(),
            })
        }
    }
}

#[cfg(test)]
#[path = "tests/form_controller_tests.rs"]
mod tests;
