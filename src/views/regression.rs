use thiserror::Error;

use super::sequence::RequestSequence;
use super::status::MetricTone;
use crate::api::{Prediction, ROOMS_RANGE, ResultEnvelope};
use crate::chart::{ChartError, ChartSlot, build_regression_chart};

/// Rejected rooms input. Both variants show the same hint to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Enter a valid room count (1-15)")]
    NotANumber(String),
    #[error("Enter a valid room count (1-15)")]
    OutOfRange(f64),
}

/// Parse the rooms field; anything non-numeric or outside 1-15 is rejected.
pub fn parse_rooms(input: &str) -> Result<f64, InputError> {
    let trimmed = input.trim();
    let rooms = trimmed
        .parse::<f64>()
        .map_err(|_| InputError::NotANumber(trimmed.to_string()))?;
    check_rooms(rooms)
}

/// Range check shared by typed input and clicked samples.
pub fn check_rooms(rooms: f64) -> Result<f64, InputError> {
    if !rooms.is_finite() || !ROOMS_RANGE.contains(&rooms) {
        return Err(InputError::OutOfRange(rooms));
    }
    Ok(rooms)
}

/// Last successful prediction, as displayed under the input.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionDisplay {
    pub rooms: f64,
    pub price_text: String,
    pub unit: Option<String>,
}

impl PredictionDisplay {
    /// Price exactly as the backend formatted it.
    pub fn text(&self) -> &str {
        &self.price_text
    }

    /// Unit shown in its own label next to the price, if the backend sent one.
    pub fn unit_text(&self) -> Option<&str> {
        self.unit.as_deref().filter(|unit| !unit.is_empty())
    }
}

/// State owned by the regression tab.
#[derive(Debug)]
pub struct RegressionViewState {
    pub chart: ChartSlot,
    pub rooms_input: String,
    pub predicted: Option<PredictionDisplay>,
    pub(crate) requests: RequestSequence,
    pub(crate) predictions: RequestSequence,
    envelope: Option<ResultEnvelope>,
}

impl Default for RegressionViewState {
    fn default() -> Self {
        Self {
            chart: ChartSlot::default(),
            rooms_input: "6".to_string(),
            predicted: None,
            requests: RequestSequence::default(),
            predictions: RequestSequence::default(),
            envelope: None,
        }
    }
}

impl RegressionViewState {
    pub fn envelope(&self) -> Option<&ResultEnvelope> {
        self.envelope.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.requests.is_loading()
    }

    pub fn is_predicting(&self) -> bool {
        self.predictions.is_loading()
    }

    pub(crate) fn apply_envelope(&mut self, envelope: ResultEnvelope) -> Result<(), ChartError> {
        let chart = build_regression_chart(&envelope)?;
        self.chart.install(chart);
        self.envelope = Some(envelope);
        Ok(())
    }

    /// Show the price and move the single prediction marker to `(rooms, price)`.
    /// Without a mounted chart only the text is updated.
    pub(crate) fn apply_prediction(&mut self, rooms: f64, prediction: Prediction) {
        if let Some(instance) = self.chart.current_mut() {
            instance.set_prediction(rooms, prediction.price.value);
        }
        self.predicted = Some(PredictionDisplay {
            rooms,
            price_text: prediction.price.text,
            unit: prediction.unit,
        });
    }

    /// Copy a clicked sample's x into the input. Returns the raw x to predict,
    /// or `None` for the line, the marker, or stale indices.
    pub fn take_clicked_rooms(&mut self, dataset: usize, point: usize) -> Option<f64> {
        let resolved = self.chart.current()?.chart().resolve(dataset, point)?;
        if !resolved.role.is_sample() {
            return None;
        }
        self.rooms_input = format!("{:.1}", resolved.point.x);
        Some(resolved.point.x)
    }

    pub fn r2_score(&self) -> Option<f64> {
        self.envelope.as_ref()?.metrics.r2_score
    }

    /// `(label, value)` metric rows in display order.
    pub fn metric_rows(&self) -> Vec<(&'static str, String)> {
        let Some(envelope) = &self.envelope else {
            return Vec::new();
        };
        let metrics = &envelope.metrics;
        [
            ("R²", metrics.r2_score),
            ("MSE", metrics.mse),
            ("RMSE", metrics.rmse),
            ("Coefficient", metrics.coefficient),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|value| (label, value.to_string())))
        .collect()
    }

    pub fn formula_text(&self) -> Option<String> {
        let metrics = &self.envelope.as_ref()?.metrics;
        Some(format!(
            "price = {} × rooms + {}",
            metrics.coefficient?, metrics.intercept?
        ))
    }

    pub fn model_info(&self) -> Vec<(&'static str, String)> {
        let Some(envelope) = &self.envelope else {
            return Vec::new();
        };
        let description = &envelope.description;
        let mut rows = vec![
            ("Dataset", description.dataset.clone()),
            ("Samples", description.samples.to_string()),
            ("Training set", description.train_size.to_string()),
            ("Test set", description.test_size.to_string()),
        ];
        if let Some(feature) = &description.feature_name {
            rows.push(("Feature", feature.clone()));
        }
        if let Some(target) = &description.target_name {
            rows.push(("Target", target.clone()));
        }
        rows
    }

    pub fn info_text(&self) -> Option<&str> {
        self.envelope.as_ref()?.description.info.as_deref()
    }
}

pub fn r2_tone(r2: f64) -> MetricTone {
    if r2 > 0.7 {
        MetricTone::Good
    } else if r2 > 0.4 {
        MetricTone::Fair
    } else {
        MetricTone::Poor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DatasetSplit, Description, Metrics, Price, RegressionLine, SplitArrays};
    use crate::chart::DatasetRole;

    fn envelope() -> ResultEnvelope {
        ResultEnvelope {
            success: true,
            data: DatasetSplit {
                train: SplitArrays {
                    x: vec![5.2, 6.8],
                    y: vec![180.0, 260.0],
                    ..Default::default()
                },
                test: SplitArrays {
                    x: vec![6.1],
                    y: vec![230.0],
                    ..Default::default()
                },
                regression_line: Some(RegressionLine {
                    x: vec![4.0, 9.0],
                    y: vec![120.0, 400.0],
                }),
            },
            metrics: Metrics {
                r2_score: Some(0.4835),
                mse: Some(43.6),
                rmse: Some(6.6),
                coefficient: Some(9.1),
                intercept: Some(-34.6),
                ..Default::default()
            },
            description: Description {
                dataset: "Boston Housing".into(),
                feature_name: Some("Rooms".into()),
                feature_unit: Some("rooms".into()),
                target_name: Some("Price".into()),
                target_unit: Some("k$".into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn prediction(text: &str, value: f64) -> Prediction {
        Prediction {
            price: Price {
                text: text.into(),
                value,
            },
            unit: Some("k$".into()),
        }
    }

    fn role_index(view: &RegressionViewState, role: DatasetRole) -> usize {
        view.chart
            .current()
            .unwrap()
            .chart()
            .config
            .datasets
            .iter()
            .position(|dataset| dataset.role == role)
            .unwrap()
    }

    #[test]
    fn rooms_validation() {
        assert_eq!(parse_rooms(" 6.5 "), Ok(6.5));
        assert_eq!(parse_rooms("1"), Ok(1.0));
        assert_eq!(parse_rooms("15"), Ok(15.0));
        assert_eq!(parse_rooms("0.5"), Err(InputError::OutOfRange(0.5)));
        assert_eq!(parse_rooms("16"), Err(InputError::OutOfRange(16.0)));
        assert!(matches!(parse_rooms("abc"), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_rooms(""), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_rooms("NaN"), Err(InputError::OutOfRange(_))));
        assert_eq!(
            parse_rooms("20").unwrap_err().to_string(),
            "Enter a valid room count (1-15)"
        );
    }

    #[test]
    fn clicked_values_use_the_same_range() {
        assert_eq!(check_rooms(6.9), Ok(6.9));
        assert_eq!(check_rooms(0.4999), Err(InputError::OutOfRange(0.4999)));
        assert_eq!(check_rooms(15.0001), Err(InputError::OutOfRange(15.0001)));
        assert!(check_rooms(f64::INFINITY).is_err());
    }

    #[test]
    fn prediction_places_single_marker() {
        let mut view = RegressionViewState::default();
        view.apply_envelope(envelope()).unwrap();
        view.apply_prediction(6.5, prediction("245.3", 245.3));
        view.apply_prediction(7.0, prediction("260.1", 260.1));
        let instance = view.chart.current().unwrap();
        assert_eq!(instance.prediction_count(), 1);
        let marker = instance
            .chart()
            .config
            .datasets_with_role(DatasetRole::Prediction)
            .next()
            .unwrap();
        assert_eq!((marker.points[0].x, marker.points[0].y), (7.0, 260.1));
        let predicted = view.predicted.as_ref().unwrap();
        assert_eq!(predicted.text(), "260.1");
        assert_eq!(predicted.unit_text(), Some("k$"));
    }

    #[test]
    fn prediction_without_chart_only_updates_text() {
        let mut view = RegressionViewState::default();
        view.apply_prediction(6.5, prediction("245.3", 245.3));
        assert!(!view.chart.is_mounted());
        assert_eq!(view.predicted.as_ref().unwrap().price_text, "245.3");
    }

    #[test]
    fn clicking_sample_fills_input_with_one_decimal() {
        let mut view = RegressionViewState::default();
        view.apply_envelope(envelope()).unwrap();
        let test = role_index(&view, DatasetRole::Test);
        assert_eq!(view.take_clicked_rooms(test, 0), Some(6.1));
        assert_eq!(view.rooms_input, "6.1");
    }

    #[test]
    fn clicking_line_or_marker_is_ignored() {
        let mut view = RegressionViewState::default();
        view.apply_envelope(envelope()).unwrap();
        view.rooms_input = "3".into();
        let line = role_index(&view, DatasetRole::Line);
        assert_eq!(view.take_clicked_rooms(line, 0), None);
        view.apply_prediction(6.5, prediction("245.3", 245.3));
        let marker = role_index(&view, DatasetRole::Prediction);
        assert_eq!(view.take_clicked_rooms(marker, 0), None);
        assert_eq!(view.rooms_input, "3");
    }

    #[test]
    fn metrics_and_formula_follow_envelope() {
        let mut view = RegressionViewState::default();
        assert!(view.formula_text().is_none());
        view.apply_envelope(envelope()).unwrap();
        assert_eq!(view.formula_text().unwrap(), "price = 9.1 × rooms + -34.6");
        let rows = view.metric_rows();
        assert_eq!(rows[0], ("R²", "0.4835".to_string()));
        assert_eq!(rows.len(), 4);
        assert_eq!(r2_tone(view.r2_score().unwrap()), MetricTone::Fair);
    }

    #[test]
    fn r2_thresholds_are_exclusive() {
        assert_eq!(r2_tone(0.71), MetricTone::Good);
        assert_eq!(r2_tone(0.7), MetricTone::Fair);
        assert_eq!(r2_tone(0.4), MetricTone::Poor);
    }
}
