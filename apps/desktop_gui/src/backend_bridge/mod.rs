//! Bridge between the UI thread and the worker that performs report fetches.

pub mod commands;
pub mod runtime;
