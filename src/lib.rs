//! Library exports for the binary, integration tests and benchmarks.
/// Backend API envelopes and data sources.
pub mod api;
/// Application directory resolution.
pub mod app_dirs;
/// Chart datasets built from API envelopes.
pub mod chart;
/// Command-line overrides.
pub mod cli;
/// Persisted settings.
pub mod config;
/// Shared HTTP agent and bounded body reads.
pub mod http_client;
/// Tracing subscriber setup.
pub mod logging;
/// egui rendering.
pub mod ui;
/// View state and the controller that drives it.
pub mod views;
