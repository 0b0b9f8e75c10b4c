//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ReportFetcher, Verb};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Starts the backend worker. It owns the tokio runtime and runs until the
/// UI side drops its command sender.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    fetcher: Arc<dyn ReportFetcher>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Info(format!(
                    "Backend worker startup failure: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::SubmitDiagnosis { request } => {
                        tracing::info!("backend: submit_diagnosis");
                        let result = fetcher.fetch_report(&request, Verb::Submit).await;
                        if let Err(err) = &result {
                            tracing::warn!(kind = err.kind(), "backend: submit_diagnosis failed: {err}");
                        }
                        // Blocks while the UI is behind; only fails once the UI is gone.
                        if ui_tx.send(UiEvent::ReportFetched(result)).is_err() {
                            tracing::error!("backend: ui closed before diagnosis result arrived");
                            break;
                        }
                    }
                }
            }
            tracing::debug!("backend: command queue closed, worker exiting");
        });
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use client_core::FetchError;
    use crossbeam_channel::bounded;
    use shared::{
        domain::{Gender, Severity},
        protocol::{DiagnosisRequest, ReportResponse},
    };

    use super::*;

    struct EchoFetcher;

    #[async_trait]
    impl ReportFetcher for EchoFetcher {
        async fn fetch_report(
            &self,
            request: &DiagnosisRequest,
            verb: Verb,
        ) -> Result<ReportResponse, FetchError> {
            if request.name.is_empty() {
                return Err(FetchError::Unavailable("no name".to_string()));
            }
            Ok(ReportResponse::with_report(format!(
                "{} via {}",
                request.name,
                verb.as_str()
            )))
        }
    }

    fn request(name: &str) -> DiagnosisRequest {
        DiagnosisRequest {
            name: name.to_string(),
            age: "50".to_string(),
            gender: Gender::Other,
            symptoms: "rash".to_string(),
            duration: "3 days".to_string(),
            severity: Severity::Mild,
        }
    }

    fn next_result(ui_rx: &Receiver<UiEvent>) -> Result<ReportResponse, FetchError> {
        loop {
            match ui_rx
                .recv_timeout(Duration::from_secs(5))
                .expect("backend event")
            {
                UiEvent::ReportFetched(result) => return result,
                UiEvent::Info(_) => continue,
            }
        }
    }

    #[test]
    fn worker_fetches_and_reports_back() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(16);
        let worker = launch(cmd_rx, ui_tx, Arc::new(EchoFetcher));

        cmd_tx
            .send(BackendCommand::SubmitDiagnosis {
                request: request("Ada"),
            })
            .expect("send");
        let response = next_result(&ui_rx).expect("report");
        assert_eq!(response.report_text(), Some("Ada via submit"));

        cmd_tx
            .send(BackendCommand::SubmitDiagnosis {
                request: request(""),
            })
            .expect("send");
        assert!(matches!(
            next_result(&ui_rx),
            Err(FetchError::Unavailable(_))
        ));

        drop(cmd_tx);
        worker.join().expect("worker exits once the queue closes");
    }

    #[test]
    fn results_wait_for_a_slow_ui_instead_of_being_dropped() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(1);
        let worker = launch(cmd_rx, ui_tx, Arc::new(EchoFetcher));

        for name in ["Ada", "Grace", "Edsger"] {
            cmd_tx
                .send(BackendCommand::SubmitDiagnosis {
                    request: request(name),
                })
                .expect("send");
        }
        std::thread::sleep(Duration::from_millis(200));

        for name in ["Ada", "Grace", "Edsger"] {
            let response = next_result(&ui_rx).expect("report");
            assert_eq!(
                response.report_text(),
                Some(format!("{name} via submit").as_str())
            );
        }

        drop(cmd_tx);
        worker.join().expect("worker exits once the queue closes");
    }
}
