//! UI layer for the desktop form: app shell and the three views.

pub mod app;

pub use app::{DiagnosisFormApp, StartupConfig};
