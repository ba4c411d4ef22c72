//! Backend API access: wire envelopes and the data sources that fetch them.

mod client;
mod envelope;

pub use client::{DataSource, HttpDataSource, KnnRequest, ROOMS_RANGE};
pub use envelope::{
    CurrentFeatures, DatasetSplit, Description, Formula, Metrics, Prediction, PredictResponse,
    Price, RegressionLine, ResultEnvelope, SplitArrays,
};

/// Errors surfaced while loading a view's data or requesting a prediction.
///
/// The `Display` output is the message shown to the user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    /// Network failure before an HTTP response was received.
    #[error("Network error: {0}")]
    Transport(String),
    /// The server answered with an error status and no usable envelope.
    #[error("Server error (HTTP {code}): {body}")]
    Status { code: u16, body: String },
    /// The response body was not valid JSON for the expected shape.
    #[error("Invalid response: {0}")]
    Json(String),
    /// The backend reported `success: false`.
    #[error("{0}")]
    Domain(String),
    /// The envelope parsed but violates its structural invariants.
    #[error("Malformed data: {0}")]
    Malformed(String),
}
