use serde::{Deserialize, Serialize};

use crate::domain::{Gender, Severity};

/// Body posted to the diagnosis service.
///
/// Every value travels as a string: `age` is the digits the patient typed and
/// the select fields use their lowercase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisRequest {
    pub name: String,
    pub age: String,
    pub gender: Gender,
    pub symptoms: String,
    pub duration: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResponse {
    #[serde(default)]
    pub report: Option<String>,
}

impl ReportResponse {
    pub fn with_report(report: impl Into<String>) -> Self {
        Self {
            report: Some(report.into()),
        }
    }

    /// The report text, if the service produced a non-empty one.
    pub fn report_text(&self) -> Option<&str> {
        self.report.as_deref().filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_as_flat_string_object() {
        let request = DiagnosisRequest {
            name: "Ada".to_string(),
            age: "36".to_string(),
            gender: Gender::Female,
            symptoms: "fever".to_string(),
            duration: "2 days".to_string(),
            severity: Severity::Moderate,
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Ada",
                "age": "36",
                "gender": "female",
                "symptoms": "fever",
                "duration": "2 days",
                "severity": "moderate",
            })
        );
    }

    #[test]
    fn response_without_report_field_decodes_to_none() {
        let response: ReportResponse = serde_json::from_str("{}").expect("decode");
        assert_eq!(response.report, None);
        assert_eq!(response.report_text(), None);

        let response: ReportResponse =
            serde_json::from_str(r#"{"report":"Flu likely","confidence":0.8}"#).expect("decode");
        assert_eq!(response.report_text(), Some("Flu likely"));
    }

    #[test]
    fn empty_report_is_not_report_text() {
        assert_eq!(ReportResponse::with_report("").report_text(), None);
    }
}
