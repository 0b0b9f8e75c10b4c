use anyhow::{bail, Result};
use clap::Parser;
use client_core::{
    load_settings, prepare_api_url, FormController, HttpReportFetcher, SubmitOutcome,
};
use shared::domain::{FormField, Gender, Severity};

/// Submits one symptom report and prints the diagnosis.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    name: String,
    #[arg(long)]
    age: u32,
    #[arg(long)]
    gender: Gender,
    #[arg(long)]
    symptoms: String,
    /// For example "2 days".
    #[arg(long)]
    duration: String,
    #[arg(long)]
    severity: Severity,
    /// Diagnosis service endpoint; overrides diagnose.toml and the environment.
    #[arg(long)]
    api_url: Option<String>,
}

impl Args {
    fn field_values(&self) -> [(FormField, String); 6] {
        [
            (FormField::Name, self.name.clone()),
            (FormField::Age, self.age.to_string()),
            (FormField::Gender, self.gender.key().to_string()),
            (FormField::Symptoms, self.symptoms.clone()),
            (FormField::Duration, self.duration.clone()),
            (FormField::Severity, self.severity.key().to_string()),
        ]
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_url) = args.api_url.clone() {
        settings.api_url = api_url;
    }
    let fetcher = HttpReportFetcher::new(prepare_api_url(&settings.api_url)?);
    tracing::info!(api_url = fetcher.endpoint(), "using diagnosis service");

    let mut controller = FormController::new();
    for (field, value) in args.field_values() {
        controller.edit_field(field, &value)?;
    }

    match controller.submit(&fetcher).await? {
        SubmitOutcome::Reported => {
            if let Some(report) = controller.view().report() {
                println!("Diagnosis Report\n\n{report}");
            }
            Ok(())
        }
        SubmitOutcome::Alert(message) => bail!("{message}"),
    }
}
