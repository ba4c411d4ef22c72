//! Chart model shared by both views: datasets, styles and the sample index.
//!
//! Builders turn a validated [`ResultEnvelope`](crate::api::ResultEnvelope)
//! into a [`BuiltChart`]; the UI layer only paints what is described here and
//! resolves clicks back to samples through [`BuiltChart::resolve`].

mod colors;
mod knn;
mod regression;
mod slot;

pub use colors::{ERROR_FILL, ERROR_STROKE, class_fill, class_stroke};
pub use knn::{KNN_AXIS_UNIT, build_knn_chart, displayed_features};
pub use regression::{PREDICTION_LABEL, build_regression_chart, set_prediction};
pub use slot::{ChartInstance, ChartSlot};

use egui::Color32;

/// What a dataset represents. Set at construction; click handling keys off it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DatasetRole {
    Train,
    /// Held-out samples without a correctness split (regression).
    Test,
    TestCorrect,
    TestWrong,
    Line,
    Prediction,
}

impl DatasetRole {
    pub fn is_test(self) -> bool {
        matches!(self, Self::Test | Self::TestCorrect | Self::TestWrong)
    }

    /// Whether points of this role map back to a sample of the envelope.
    pub fn is_sample(self) -> bool {
        matches!(
            self,
            Self::Train | Self::Test | Self::TestCorrect | Self::TestWrong
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Triangle,
    CrossRot,
    Star,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesKind {
    Scatter,
    /// Points joined by straight segments, drawn without markers.
    Line,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesStyle {
    pub fill: Color32,
    pub stroke: Color32,
    pub marker: MarkerShape,
    pub radius: f32,
    pub hover_radius: f32,
    pub stroke_width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub label: Option<usize>,
    pub prediction: Option<usize>,
}

impl ChartPoint {
    pub fn plain(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            label: None,
            prediction: None,
        }
    }

    /// A point without a prediction counts as correct, matching its own label.
    pub fn is_correct(&self) -> bool {
        self.prediction.is_none_or(|prediction| Some(prediction) == self.label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleSplit {
    Train,
    Test,
}

/// Location of a sample inside the envelope's split arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleRef {
    pub split: SampleSplit,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartDataset {
    pub label: String,
    pub role: DatasetRole,
    pub class: Option<usize>,
    pub kind: SeriesKind,
    pub style: SeriesStyle,
    pub points: Vec<ChartPoint>,
    /// Parallel to `points`; empty for roles that are not samples.
    pub sources: Vec<SampleRef>,
    pub in_legend: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisConfig {
    pub title: String,
}

/// Text fragments used to describe a hovered point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipTemplate {
    pub x_prefix: String,
    pub x_suffix: String,
    pub y_prefix: String,
    pub y_suffix: String,
    /// Extra line shown for points that react to clicks.
    pub click_hint: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartConfig {
    pub title: String,
    pub x_axis: AxisConfig,
    pub y_axis: AxisConfig,
    pub tooltip: TooltipTemplate,
    pub datasets: Vec<ChartDataset>,
}

/// Axis-aligned extent of every point in a chart, in data coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

/// A chart ready for display plus everything needed to answer clicks.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltChart {
    pub config: ChartConfig,
}

/// A click resolved to the sample it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedPoint {
    pub role: DatasetRole,
    pub point: ChartPoint,
    pub sample: Option<SampleRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChartError {
    #[error("{split} data is missing the '{column}' column")]
    MissingColumn {
        split: &'static str,
        column: &'static str,
    },
    #[error("Envelope declares no classes")]
    NoClasses,
    #[error("Regression line is missing from the response")]
    MissingRegressionLine,
}

impl ChartConfig {
    pub fn legend_entries(&self) -> impl Iterator<Item = &ChartDataset> {
        self.datasets.iter().filter(|dataset| dataset.in_legend)
    }

    pub fn datasets_with_role(&self, role: DatasetRole) -> impl Iterator<Item = &ChartDataset> {
        self.datasets.iter().filter(move |dataset| dataset.role == role)
    }

    /// Bounds of all points, padded by 5% so markers never touch the frame.
    pub fn data_bounds(&self) -> Option<DataBounds> {
        let mut points = self.datasets.iter().flat_map(|dataset| dataset.points.iter());
        let first = points.next()?;
        let mut bounds = DataBounds {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        for point in points {
            bounds.min_x = bounds.min_x.min(point.x);
            bounds.max_x = bounds.max_x.max(point.x);
            bounds.min_y = bounds.min_y.min(point.y);
            bounds.max_y = bounds.max_y.max(point.y);
        }
        let pad_x = ((bounds.max_x - bounds.min_x) * 0.05).max(0.5);
        let pad_y = ((bounds.max_y - bounds.min_y) * 0.05).max(0.5);
        bounds.min_x -= pad_x;
        bounds.max_x += pad_x;
        bounds.min_y -= pad_y;
        bounds.max_y += pad_y;
        Some(bounds)
    }

    /// Tooltip lines for one point, or `None` when the indices are stale.
    pub fn tooltip_lines(&self, dataset: usize, point: usize) -> Option<Vec<String>> {
        let set = self.datasets.get(dataset)?;
        let value = set.points.get(point)?;
        let tooltip = &self.tooltip;
        let mut lines = vec![format!(
            "{}: {}{:.2}{}{}{:.2}{}",
            set.label,
            tooltip.x_prefix,
            value.x,
            tooltip.x_suffix,
            tooltip.y_prefix,
            value.y,
            tooltip.y_suffix
        )];
        if set.role.is_sample() && !tooltip.click_hint.is_empty() {
            lines.push(tooltip.click_hint.clone());
        }
        Some(lines)
    }
}

impl BuiltChart {
    /// Map a rendered `(dataset, point)` pair back to its originating sample.
    pub fn resolve(&self, dataset: usize, point: usize) -> Option<ResolvedPoint> {
        let set = self.config.datasets.get(dataset)?;
        let value = *set.points.get(point)?;
        Some(ResolvedPoint {
            role: set.role,
            point: value,
            sample: set.sources.get(point).copied(),
        })
    }
}
