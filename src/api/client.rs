use std::ops::RangeInclusive;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::{LoadError, Prediction, PredictResponse, ResultEnvelope};
use crate::http_client::{self, HttpSettings};

const KNN_DATA_PATH: &str = "api/knn/data";
const REGRESSION_DATA_PATH: &str = "api/regression/data";
const REGRESSION_PREDICT_PATH: &str = "api/regression/predict";

/// Room counts the predict endpoint accepts from the UI.
pub const ROOMS_RANGE: RangeInclusive<f64> = 1.0..=15.0;

/// Parameters of one KNN data load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KnnRequest {
    pub k: u32,
    pub feature_x: usize,
    pub feature_y: usize,
}

/// Source of view data. Each call is one independent request with no retry.
pub trait DataSource: Send + Sync {
    fn knn_data(&self, request: &KnnRequest) -> Result<ResultEnvelope, LoadError>;
    fn regression_data(&self) -> Result<ResultEnvelope, LoadError>;
    fn predict_price(&self, rooms: f64) -> Result<Prediction, LoadError>;
}

/// [`DataSource`] backed by the demo backend's HTTP API.
pub struct HttpDataSource {
    base_url: Url,
    agent: ureq::Agent,
    max_response_bytes: usize,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl HttpDataSource {
    pub fn new(base_url: &str, settings: &HttpSettings) -> Result<Self, url::ParseError> {
        let mut base_url = Url::parse(base_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            agent: http_client::agent(settings),
            max_response_bytes: settings.max_response_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, LoadError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|err| LoadError::Transport(format!("Invalid endpoint {path}: {err}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, LoadError> {
        tracing::debug!("GET {url}");
        let response = match self.agent.get(url.as_str()).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = http_client::read_body_limited(response, self.max_response_bytes)
                    .unwrap_or_else(|err| err);
                return Err(map_status_error(code, body));
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(LoadError::Transport(err.to_string()));
            }
        };
        let body = http_client::read_body_limited(response, self.max_response_bytes)
            .map_err(LoadError::Json)?;
        parse_json(&body)
    }
}

impl DataSource for HttpDataSource {
    fn knn_data(&self, request: &KnnRequest) -> Result<ResultEnvelope, LoadError> {
        let url = self.endpoint(
            KNN_DATA_PATH,
            &[
                ("k", request.k.to_string()),
                ("feature_x", request.feature_x.to_string()),
                ("feature_y", request.feature_y.to_string()),
            ],
        )?;
        self.get_json::<ResultEnvelope>(&url)?.into_result()
    }

    fn regression_data(&self) -> Result<ResultEnvelope, LoadError> {
        let url = self.endpoint(REGRESSION_DATA_PATH, &[])?;
        self.get_json::<ResultEnvelope>(&url)?.into_result()
    }

    fn predict_price(&self, rooms: f64) -> Result<Prediction, LoadError> {
        let url = self.endpoint(REGRESSION_PREDICT_PATH, &[("rooms", rooms.to_string())])?;
        self.get_json::<PredictResponse>(&url)?.into_prediction()
    }
}

/// The backend answers failures with `500` and a `{success:false,error}` body.
fn map_status_error(code: u16, body: String) -> LoadError {
    match serde_json::from_str::<ErrorBody>(body.trim()) {
        Ok(ErrorBody { error: Some(message) }) => LoadError::Domain(message),
        _ => LoadError::Status { code, body },
    }
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, LoadError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(LoadError::Json("Empty response body".to_string()));
    }
    serde_json::from_str(trimmed).map_err(|err| LoadError::Json(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path_and_encodes_query() {
        let source =
            HttpDataSource::new("http://127.0.0.1:5000/demo", &HttpSettings::default()).unwrap();
        let url = source
            .endpoint(KNN_DATA_PATH, &[("k", "7".to_string()), ("feature_x", "2".to_string())])
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/demo/api/knn/data?k=7&feature_x=2");
    }

    #[test]
    fn rooms_query_uses_shortest_float_form() {
        let source = HttpDataSource::new("http://localhost:5000", &HttpSettings::default()).unwrap();
        let url = source
            .endpoint(REGRESSION_PREDICT_PATH, &[("rooms", 6.5f64.to_string())])
            .unwrap();
        assert_eq!(url.query(), Some("rooms=6.5"));
    }

    #[test]
    fn status_error_prefers_envelope_message() {
        let err = map_status_error(500, r#"{"success": false, "error": "boom"}"#.to_string());
        assert_eq!(err, LoadError::Domain("boom".to_string()));
    }

    #[test]
    fn status_error_without_envelope_keeps_code() {
        let err = map_status_error(404, "Not Found".to_string());
        assert_eq!(
            err,
            LoadError::Status {
                code: 404,
                body: "Not Found".to_string()
            }
        );
    }

    #[test]
    fn empty_body_is_a_json_error() {
        let err = parse_json::<ResultEnvelope>("  ").unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(HttpDataSource::new("not a url", &HttpSettings::default()).is_err());
    }
}
