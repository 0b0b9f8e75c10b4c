use client_core::{FetchError, FormController, SubmitOutcome, ViewState};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{
    domain::{FormField, Gender, Severity},
    protocol::ReportResponse,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub api_url: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            api_url: client_core::config::DEFAULT_API_URL.to_string(),
        }
    }
}

pub struct DiagnosisFormApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    controller: FormController,
    alert: Option<&'static str>,
    status: String,
    api_url: String,
}

impl DiagnosisFormApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            controller: FormController::new(),
            alert: None,
            status: "Backend worker starting...".to_string(),
            api_url: startup.api_url,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::ReportFetched(result) => self.settle_submission(result),
            }
        }
    }

    fn submit(&mut self) {
        let request = match self.controller.begin_submit() {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(error = %err, "submit ignored");
                return;
            }
        };

        if let Err(reason) =
            dispatch_backend_command(&self.cmd_tx, BackendCommand::SubmitDiagnosis { request })
        {
            self.settle_submission(Err(FetchError::Unavailable(reason)));
        }
    }

    fn settle_submission(&mut self, result: Result<ReportResponse, FetchError>) {
        match self.controller.complete_submit(result) {
            Ok(SubmitOutcome::Reported) => {}
            Ok(SubmitOutcome::Alert(message)) => self.alert = Some(message),
            Err(err) => tracing::warn!(error = %err, "dropping diagnosis result"),
        }
    }

    fn go_back(&mut self) {
        if let Err(err) = self.controller.return_to_form() {
            tracing::warn!(error = %err, "back action ignored");
        }
    }

    fn edit(&mut self, field: FormField, value: &str) {
        // A rejected keystroke simply never lands, like a numeric input
        // ignoring letters.
        if let Err(err) = self.controller.edit_field(field, value) {
            tracing::trace!(error = %err, "input rejected");
        }
    }

    fn text_field(&mut self, ui: &mut egui::Ui, field: FormField, hint: &str, multiline: bool) {
        ui.label(egui::RichText::new(field.label()).strong());
        let mut buf = self.controller.form().value(field).to_string();
        let edit = if multiline {
            egui::TextEdit::multiline(&mut buf).desired_rows(4)
        } else {
            egui::TextEdit::singleline(&mut buf)
        };
        let response = ui.add(
            edit.id_salt(field.key())
                .hint_text(hint)
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            self.edit(field, &buf);
        }
    }

    fn gender_field(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new(FormField::Gender.label()).strong());
        let mut selected = self.controller.form().gender();
        egui::ComboBox::from_id_salt(FormField::Gender.key())
            .selected_text(selected.map(Gender::label).unwrap_or("Select Gender"))
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut selected, None, "Select Gender");
                for gender in Gender::ALL {
                    ui.selectable_value(&mut selected, Some(*gender), gender.label());
                }
            });
        if selected != self.controller.form().gender() {
            self.edit(FormField::Gender, selected.map(Gender::key).unwrap_or(""));
        }
    }

    fn severity_field(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new(FormField::Severity.label()).strong());
        let mut selected = self.controller.form().severity();
        egui::ComboBox::from_id_salt(FormField::Severity.key())
            .selected_text(selected.map(Severity::label).unwrap_or("Select Severity"))
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut selected, None, "Select Severity");
                for severity in Severity::ALL {
                    ui.selectable_value(&mut selected, Some(*severity), severity.label());
                }
            });
        if selected != self.controller.form().severity() {
            self.edit(FormField::Severity, selected.map(Severity::key).unwrap_or(""));
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Medical Diagnosis Form");
        ui.add_space(8.0);

        ui.add_enabled_ui(self.alert.is_none(), |ui| {
            ui.style_mut().spacing.item_spacing = egui::vec2(8.0, 6.0);

            self.text_field(ui, FormField::Name, "", false);
            self.text_field(ui, FormField::Age, "", false);
            self.gender_field(ui);
            self.text_field(ui, FormField::Symptoms, "", true);
            self.text_field(ui, FormField::Duration, "e.g., 2 days", false);
            self.severity_field(ui);

            ui.add_space(10.0);

            let missing = self.controller.form().missing_fields();
            let btn = egui::Button::new(
                egui::RichText::new("Generate Diagnosis Report")
                    .strong()
                    .size(16.0),
            )
            .min_size(egui::vec2(ui.available_width(), 36.0));
            let response = ui.add_enabled(missing.is_empty(), btn);
            let response = if missing.is_empty() {
                response
            } else {
                let labels: Vec<&str> = missing.iter().map(|field| field.label()).collect();
                response.on_disabled_hover_text(format!(
                    "Please fill out: {}",
                    labels.join(", ")
                ))
            };
            if response.clicked() {
                self.submit();
            }
        });
    }

    fn show_loading(&self, ui: &mut egui::Ui) {
        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            ui.spinner();
            ui.label("Generating Report...");
        });
    }

    fn show_report(&mut self, ui: &mut egui::Ui, report: &str) {
        if ui.button("← Back to Form").clicked() {
            self.go_back();
        }
        ui.add_space(6.0);
        ui.heading("Diagnosis Report");
        ui.separator();
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.label(report);
        });
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alert else {
            return;
        };
        egui::Window::new("Error")
            .id(egui::Id::new("submit_failure_alert"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(6.0);
                if ui.button("OK").clicked() {
                    self.alert = None;
                }
            });
    }
}

impl eframe::App for DiagnosisFormApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
                ui.small(egui::RichText::new(format!("· {}", self.api_url)).weak());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.set_max_width(560.0);
                ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                    match self.controller.view().clone() {
                        ViewState::Form => self.show_form(ui),
                        ViewState::Loading => self.show_loading(ui),
                        ViewState::Report(report) => self.show_report(ui, &report),
                    }
                });
            });
        });

        self.show_alert(ctx);

        if self.controller.view().is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use client_core::SUBMIT_FAILURE_ALERT;
    use crossbeam_channel::bounded;

    use super::*;

    fn filled_app() -> (DiagnosisFormApp, Receiver<BackendCommand>, Sender<UiEvent>) {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(16);
        let mut app = DiagnosisFormApp::bootstrap(cmd_tx, ui_rx, StartupConfig::default());
        for (field, value) in [
            (FormField::Name, "Ada"),
            (FormField::Age, "36"),
            (FormField::Gender, "female"),
            (FormField::Symptoms, "sore throat"),
            (FormField::Duration, "3 days"),
            (FormField::Severity, "mild"),
        ] {
            app.edit(field, value);
        }
        (app, cmd_rx, ui_tx)
    }

    #[test]
    fn submit_queues_request_and_shows_loading() {
        let (mut app, cmd_rx, _ui_tx) = filled_app();

        app.submit();

        assert!(app.controller.view().is_loading());
        let BackendCommand::SubmitDiagnosis { request } = cmd_rx.try_recv().expect("queued");
        assert_eq!(request.name, "Ada");
        assert_eq!(request.severity, Severity::Mild);
    }

    #[test]
    fn incomplete_form_queues_nothing() {
        let (mut app, cmd_rx, _ui_tx) = filled_app();
        app.edit(FormField::Symptoms, "");

        app.submit();

        assert_eq!(app.controller.view(), &ViewState::Form);
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn fetched_report_switches_to_report_view() {
        let (mut app, _cmd_rx, ui_tx) = filled_app();
        app.submit();

        ui_tx
            .send(UiEvent::ReportFetched(Ok(ReportResponse::with_report(
                "Flu likely",
            ))))
            .expect("send");
        app.process_ui_events();

        assert_eq!(app.controller.view().report(), Some("Flu likely"));
        assert_eq!(app.alert, None);

        app.go_back();
        assert_eq!(app.controller.view(), &ViewState::Form);
        assert!(!app.controller.form().is_complete());
    }

    #[test]
    fn failed_fetch_raises_alert_and_keeps_values() {
        let (mut app, _cmd_rx, ui_tx) = filled_app();
        app.submit();

        ui_tx
            .send(UiEvent::ReportFetched(Ok(ReportResponse::default())))
            .expect("send");
        app.process_ui_events();

        assert_eq!(app.controller.view(), &ViewState::Form);
        assert_eq!(app.alert, Some(SUBMIT_FAILURE_ALERT));
        assert_eq!(app.controller.form().value(FormField::Name), "Ada");
    }

    #[test]
    fn disconnected_backend_fails_submission_immediately() {
        let (mut app, cmd_rx, _ui_tx) = filled_app();
        drop(cmd_rx);

        app.submit();

        assert_eq!(app.controller.view(), &ViewState::Form);
        assert_eq!(app.alert, Some(SUBMIT_FAILURE_ALERT));
        assert!(app.controller.form().is_complete());
    }

    #[test]
    fn info_events_update_status() {
        let (mut app, _cmd_rx, ui_tx) = filled_app();
        ui_tx.send(UiEvent::Info("Ready".to_string())).expect("send");
        app.process_ui_events();
        assert_eq!(app.status, "Ready");
    }
}
