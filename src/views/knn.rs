use super::sequence::RequestSequence;
use super::status::MetricTone;
use crate::api::{KnnRequest, ResultEnvelope};
use crate::chart::{ChartError, ChartSlot, KNN_AXIS_UNIT, build_knn_chart, displayed_features};
use crate::config::{K_RANGE, KnnSettings};

/// K slider that updates its label on every drag tick but only commits on release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KSlider {
    value: u32,
    committed: u32,
}

impl KSlider {
    pub fn new(k: u32) -> Self {
        let k = clamp_k(k);
        Self {
            value: k,
            committed: k,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn committed(&self) -> u32 {
        self.committed
    }

    pub fn drag_to(&mut self, k: u32) {
        self.value = clamp_k(k);
    }

    /// Commit the dragged value. Returns the K to load when it changed.
    pub fn release(&mut self) -> Option<u32> {
        if self.value == self.committed {
            return None;
        }
        self.committed = self.value;
        Some(self.value)
    }

    pub fn label(&self) -> String {
        format!("K = {}", self.value)
    }
}

fn clamp_k(k: u32) -> u32 {
    k.clamp(*K_RANGE.start(), *K_RANGE.end())
}

/// Outcome line under a clicked sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Training,
    Correct,
    Wrong { predicted: String },
}

/// Detail panel contents for one clicked KNN sample.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassificationDetail {
    pub x_feature: String,
    pub x_value: f64,
    pub y_feature: String,
    pub y_value: f64,
    pub actual: String,
    pub verdict: Verdict,
}

impl ClassificationDetail {
    pub fn x_text(&self) -> String {
        format!("{:.2} {KNN_AXIS_UNIT}", self.x_value)
    }

    pub fn y_text(&self) -> String {
        format!("{:.2} {KNN_AXIS_UNIT}", self.y_value)
    }

    /// Only test samples carry a correctness banner.
    pub fn has_banner(&self) -> bool {
        !matches!(self.verdict, Verdict::Training)
    }

    pub fn verdict_text(&self) -> String {
        match &self.verdict {
            Verdict::Training => "Training sample".to_string(),
            Verdict::Correct => "✓ Correct prediction".to_string(),
            Verdict::Wrong { predicted } => format!("✗ Predicted as {predicted}"),
        }
    }
}

/// State owned by the KNN tab.
#[derive(Debug)]
pub struct KnnViewState {
    pub chart: ChartSlot,
    pub slider: KSlider,
    pub detail: Option<ClassificationDetail>,
    pub(crate) requests: RequestSequence,
    envelope: Option<ResultEnvelope>,
    features: (usize, usize),
    shown_k: Option<u32>,
}

impl KnnViewState {
    pub fn new(settings: &KnnSettings) -> Self {
        Self {
            chart: ChartSlot::default(),
            slider: KSlider::new(settings.default_k),
            detail: None,
            requests: RequestSequence::default(),
            envelope: None,
            features: (settings.feature_x, settings.feature_y),
            shown_k: None,
        }
    }

    pub fn request_for(&self, k: u32) -> KnnRequest {
        KnnRequest {
            k: clamp_k(k),
            feature_x: self.features.0,
            feature_y: self.features.1,
        }
    }

    pub fn envelope(&self) -> Option<&ResultEnvelope> {
        self.envelope.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.requests.is_loading()
    }

    /// K of the chart currently on screen, which may differ from the slider.
    pub fn shown_k(&self) -> Option<u32> {
        self.shown_k
    }

    /// Swap in a freshly loaded envelope. On error nothing changes.
    pub(crate) fn apply_envelope(
        &mut self,
        envelope: ResultEnvelope,
        request: KnnRequest,
    ) -> Result<(), ChartError> {
        let chart = build_knn_chart(&envelope, (request.feature_x, request.feature_y))?;
        self.chart.install(chart);
        self.detail = None;
        self.shown_k = Some(envelope.k_neighbors.unwrap_or(request.k));
        self.envelope = Some(envelope);
        Ok(())
    }

    /// Show the detail panel for a clicked point. Returns whether it hit a sample.
    pub fn select_point(&mut self, dataset: usize, point: usize) -> bool {
        let detail = self.classification_detail(dataset, point);
        let hit = detail.is_some();
        if hit {
            self.detail = detail;
        }
        hit
    }

    fn classification_detail(&self, dataset: usize, point: usize) -> Option<ClassificationDetail> {
        let envelope = self.envelope.as_ref()?;
        let resolved = self.chart.current()?.chart().resolve(dataset, point)?;
        resolved.sample?;
        let label = resolved.point.label?;
        let verdict = if !resolved.role.is_test() {
            Verdict::Training
        } else {
            match resolved.point.prediction {
                Some(predicted) if predicted != label => Verdict::Wrong {
                    predicted: envelope.target_name(predicted),
                },
                _ => Verdict::Correct,
            }
        };
        let (feature_x, feature_y) = displayed_features(envelope, self.features);
        Some(ClassificationDetail {
            x_feature: envelope.feature_name(feature_x),
            x_value: resolved.point.x,
            y_feature: envelope.feature_name(feature_y),
            y_value: resolved.point.y,
            actual: envelope.target_name(label),
            verdict,
        })
    }

    pub fn accuracy(&self) -> Option<f64> {
        self.envelope.as_ref()?.metrics.accuracy
    }

    /// `(label, value)` rows for the model info panel.
    pub fn model_info(&self) -> Vec<(&'static str, String)> {
        let Some(envelope) = &self.envelope else {
            return Vec::new();
        };
        let description = &envelope.description;
        let classes = description.classes.unwrap_or_else(|| envelope.class_count());
        let mut rows = vec![
            ("Dataset", description.dataset.clone()),
            ("Samples", description.samples.to_string()),
            ("Training set", description.train_size.to_string()),
            ("Test set", description.test_size.to_string()),
            ("Classes", classes.to_string()),
        ];
        if let Some(k) = self.shown_k {
            rows.push(("K", k.to_string()));
        }
        rows
    }
}

pub fn accuracy_text(accuracy: f64) -> String {
    format!("{:.1}%", accuracy * 100.0)
}

pub fn accuracy_tone(accuracy: f64) -> MetricTone {
    if accuracy >= 0.95 {
        MetricTone::Good
    } else if accuracy >= 0.85 {
        MetricTone::Fair
    } else {
        MetricTone::Poor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DatasetSplit, SplitArrays};
    use crate::chart::DatasetRole;

    fn envelope() -> ResultEnvelope {
        ResultEnvelope {
            success: true,
            target_names: Some(vec!["setosa".into(), "versicolor".into(), "virginica".into()]),
            feature_names: Some(vec![
                "sepal length".into(),
                "sepal width".into(),
                "petal length".into(),
                "petal width".into(),
            ]),
            k_neighbors: Some(5),
            data: DatasetSplit {
                train: SplitArrays {
                    x: vec![1.4, 4.5],
                    y: vec![0.2, 1.5],
                    labels: Some(vec![0, 1]),
                    ..Default::default()
                },
                test: SplitArrays {
                    x: vec![1.5, 5.0],
                    y: vec![0.3, 1.7],
                    labels: Some(vec![0, 1]),
                    predictions: Some(vec![0, 2]),
                    ..Default::default()
                },
                regression_line: None,
            },
            ..Default::default()
        }
    }

    fn loaded_view() -> KnnViewState {
        let mut view = KnnViewState::new(&KnnSettings::default());
        let request = view.request_for(5);
        view.apply_envelope(envelope(), request).unwrap();
        view
    }

    fn dataset_index(view: &KnnViewState, role: DatasetRole) -> usize {
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
    fn dragging_updates_label_without_committing() {
        let mut slider = KSlider::new(5);
        slider.drag_to(8);
        assert_eq!(slider.label(), "K = 8");
        assert_eq!(slider.committed(), 5);
        assert_eq!(slider.release(), Some(8));
        assert_eq!(slider.committed(), 8);
    }

    #[test]
    fn release_without_change_does_not_reload() {
        let mut slider = KSlider::new(5);
        slider.drag_to(9);
        slider.drag_to(5);
        assert_eq!(slider.release(), None);
    }

    #[test]
    fn slider_clamps_to_backend_range() {
        let mut slider = KSlider::new(0);
        assert_eq!(slider.value(), 1);
        slider.drag_to(50);
        assert_eq!(slider.value(), 20);
        assert_eq!(slider.release(), Some(20));
    }

    #[test]
    fn training_click_has_no_banner() {
        let mut view = loaded_view();
        let dataset = dataset_index(&view, DatasetRole::Train);
        assert!(view.select_point(dataset, 0));
        let detail = view.detail.as_ref().unwrap();
        assert_eq!(detail.verdict, Verdict::Training);
        assert!(!detail.has_banner());
        assert_eq!(detail.x_feature, "petal length");
        assert_eq!(detail.x_text(), "1.40 cm");
        assert_eq!(detail.actual, "setosa");
    }

    #[test]
    fn wrong_test_click_names_prediction() {
        let mut view = loaded_view();
        let dataset = dataset_index(&view, DatasetRole::TestWrong);
        assert!(view.select_point(dataset, 0));
        let detail = view.detail.as_ref().unwrap();
        assert!(detail.has_banner());
        assert_eq!(detail.actual, "versicolor");
        assert_eq!(detail.verdict_text(), "✗ Predicted as virginica");
        assert_eq!(detail.y_text(), "1.70 cm");
    }

    #[test]
    fn correct_test_click_shows_banner() {
        let mut view = loaded_view();
        let dataset = dataset_index(&view, DatasetRole::TestCorrect);
        assert!(view.select_point(dataset, 0));
        assert_eq!(view.detail.as_ref().unwrap().verdict, Verdict::Correct);
    }

    #[test]
    fn stale_click_keeps_previous_detail() {
        let mut view = loaded_view();
        assert!(view.select_point(0, 0));
        assert!(!view.select_point(40, 0));
        assert!(view.detail.is_some());
    }

    #[test]
    fn reload_clears_detail_and_releases_chart() {
        let mut view = loaded_view();
        view.select_point(0, 0);
        let request = view.request_for(7);
        let mut next = envelope();
        next.k_neighbors = Some(7);
        view.apply_envelope(next, request).unwrap();
        assert!(view.detail.is_none());
        assert_eq!(view.chart.released_count(), 1);
        assert_eq!(view.shown_k(), Some(7));
    }

    #[test]
    fn failed_build_keeps_previous_chart() {
        let mut view = loaded_view();
        let id = view.chart.current().unwrap().id();
        let mut broken = envelope();
        broken.data.test.predictions = None;
        let request = view.request_for(3);
        assert!(view.apply_envelope(broken, request).is_err());
        assert_eq!(view.chart.current().unwrap().id(), id);
        assert_eq!(view.shown_k(), Some(5));
    }

    #[test]
    fn accuracy_formatting_and_tone() {
        assert_eq!(accuracy_text(0.9778), "97.8%");
        assert_eq!(accuracy_tone(0.95), MetricTone::Good);
        assert_eq!(accuracy_tone(0.9), MetricTone::Fair);
        assert_eq!(accuracy_tone(0.5), MetricTone::Poor);
    }

    #[test]
    fn model_info_lists_current_k() {
        let view = loaded_view();
        let rows = view.model_info();
        assert!(rows.contains(&("Classes", "3".to_string())));
        assert!(rows.contains(&("K", "5".to_string())));
    }
}
