use serde::{Deserialize, Deserializer};

use super::LoadError;

/// Top-level response of the `/data` endpoints.
///
/// Replaced wholesale on every fetch; views never mutate one in place.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResultEnvelope {
    pub success: bool,
    pub error: Option<String>,
    pub data: DatasetSplit,
    pub metrics: Metrics,
    pub description: Description,
    pub target_names: Option<Vec<String>>,
    pub feature_names: Option<Vec<String>>,
    pub k_neighbors: Option<u32>,
    pub current_features: Option<CurrentFeatures>,
}

/// Train/test samples plus the optional fitted regression line.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatasetSplit {
    pub train: SplitArrays,
    pub test: SplitArrays,
    pub regression_line: Option<RegressionLine>,
}

/// Column-major sample arrays; index `i` refers to the same sample in every column.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SplitArrays {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub labels: Option<Vec<usize>>,
    pub predictions: Option<Vec<usize>>,
    pub y_pred: Option<Vec<f64>>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegressionLine {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Display-only model metrics. KNN fills `accuracy`; regression fills the rest.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Metrics {
    pub accuracy: Option<f64>,
    pub confusion_matrix: Option<Vec<Vec<u32>>>,
    pub r2_score: Option<f64>,
    pub mse: Option<f64>,
    pub rmse: Option<f64>,
    pub coefficient: Option<f64>,
    pub intercept: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Description {
    pub dataset: String,
    pub samples: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub classes: Option<usize>,
    pub feature_name: Option<String>,
    pub feature_unit: Option<String>,
    pub target_name: Option<String>,
    pub target_unit: Option<String>,
    pub info: Option<String>,
}

/// Feature pair the KNN endpoint actually used (it may clamp the request).
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CurrentFeatures {
    pub x: String,
    pub y: String,
    pub x_idx: usize,
    pub y_idx: usize,
}

/// Response of `/api/regression/predict`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PredictResponse {
    pub success: bool,
    pub error: Option<String>,
    pub prediction: Option<Prediction>,
    pub formula: Option<Formula>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Prediction {
    pub price: Price,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Formula {
    pub coefficient: f64,
    pub intercept: f64,
    pub equation: String,
}

/// Predicted price, kept as the server formatted it plus its numeric value.
#[derive(Clone, Debug, PartialEq)]
pub struct Price {
    pub text: String,
    pub value: f64,
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PriceWire {
            Number(serde_json::Number),
            Text(String),
        }

        match PriceWire::deserialize(deserializer)? {
            PriceWire::Number(number) => {
                let value = number
                    .as_f64()
                    .ok_or_else(|| serde::de::Error::custom("price is not a finite number"))?;
                Ok(Price {
                    text: number.to_string(),
                    value,
                })
            }
            PriceWire::Text(text) => {
                let value = text
                    .trim()
                    .parse::<f64>()
                    .map_err(|err| serde::de::Error::custom(format!("price '{text}': {err}")))?;
                Ok(Price { text, value })
            }
        }
    }
}

impl ResultEnvelope {
    /// Turn a parsed envelope into a usable one, or the error the user should see.
    pub fn into_result(self) -> Result<Self, LoadError> {
        if !self.success {
            return Err(LoadError::Domain(
                self.error
                    .unwrap_or_else(|| "Server reported failure without a message".to_string()),
            ));
        }
        self.data.validate()?;
        Ok(self)
    }

    /// Number of classes declared by the envelope (zero for regression).
    pub fn class_count(&self) -> usize {
        self.target_names.as_ref().map_or(0, Vec::len)
    }

    pub fn target_name(&self, class: usize) -> String {
        self.target_names
            .as_ref()
            .and_then(|names| names.get(class))
            .cloned()
            .unwrap_or_else(|| format!("Class {class}"))
    }

    pub fn feature_name(&self, index: usize) -> String {
        self.feature_names
            .as_ref()
            .and_then(|names| names.get(index))
            .cloned()
            .unwrap_or_else(|| format!("Feature {index}"))
    }
}

impl DatasetSplit {
    fn validate(&self) -> Result<(), LoadError> {
        self.train.validate("train")?;
        self.test.validate("test")?;
        if let Some(line) = &self.regression_line
            && line.x.len() != line.y.len()
        {
            return Err(LoadError::Malformed(format!(
                "regression_line: y has {} entries, expected {}",
                line.y.len(),
                line.x.len()
            )));
        }
        Ok(())
    }
}

impl SplitArrays {
    /// Number of samples in this split.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    fn validate(&self, split: &str) -> Result<(), LoadError> {
        let expected = self.x.len();
        let columns = [
            ("y", Some(self.y.len())),
            ("labels", self.labels.as_ref().map(Vec::len)),
            ("predictions", self.predictions.as_ref().map(Vec::len)),
            ("y_pred", self.y_pred.as_ref().map(Vec::len)),
        ];
        for (name, len) in columns {
            if let Some(len) = len
                && len != expected
            {
                return Err(LoadError::Malformed(format!(
                    "{split} split: {name} has {len} entries, expected {expected}"
                )));
            }
        }
        Ok(())
    }
}

impl PredictResponse {
    /// Extract the prediction, mapping `success: false` to a domain error.
    pub fn into_prediction(self) -> Result<Prediction, LoadError> {
        if !self.success {
            return Err(LoadError::Domain(
                self.error
                    .unwrap_or_else(|| "Prediction failed without a message".to_string()),
            ));
        }
        self.prediction
            .ok_or_else(|| LoadError::Malformed("prediction missing from response".to_string()))
    }
}
