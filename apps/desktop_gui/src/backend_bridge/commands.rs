//! Backend commands queued from UI to backend worker.

use shared::protocol::DiagnosisRequest;

pub enum BackendCommand {
    SubmitDiagnosis { request: DiagnosisRequest },
}
