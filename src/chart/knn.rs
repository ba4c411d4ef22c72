use super::{
    AxisConfig, BuiltChart, ChartConfig, ChartDataset, ChartError, ChartPoint, DatasetRole,
    MarkerShape, SampleRef, SampleSplit, SeriesKind, SeriesStyle, TooltipTemplate, colors,
};
use crate::api::{ResultEnvelope, SplitArrays};

/// Unit appended to both KNN axes (the iris features are lengths).
pub const KNN_AXIS_UNIT: &str = "cm";

/// Build the KNN scatter chart: one training series per class, then the
/// correct and wrong test series per class. Empty groups are skipped.
///
/// `features` is the `(x, y)` feature index pair that was requested; the
/// envelope's `current_features` wins when the backend echoes one.
pub fn build_knn_chart(
    envelope: &ResultEnvelope,
    features: (usize, usize),
) -> Result<BuiltChart, ChartError> {
    let class_count = envelope.class_count();
    if class_count == 0 {
        return Err(ChartError::NoClasses);
    }
    let train = &envelope.data.train;
    let test = &envelope.data.test;
    let train_labels = required(train.labels.as_deref(), "train", "labels")?;
    let test_labels = required(test.labels.as_deref(), "test", "labels")?;
    let test_predictions = required(test.predictions.as_deref(), "test", "predictions")?;

    let train_points = collect_points(train, SampleSplit::Train, train_labels, None);
    let test_points = collect_points(test, SampleSplit::Test, test_labels, Some(test_predictions));

    let mut datasets = Vec::new();
    for class in 0..class_count {
        let name = envelope.target_name(class);
        let (points, sources) = of_class(&train_points, class, |_| true);
        if !points.is_empty() {
            datasets.push(ChartDataset {
                label: format!("{name} (train)"),
                role: DatasetRole::Train,
                class: Some(class),
                kind: SeriesKind::Scatter,
                style: SeriesStyle {
                    fill: colors::class_fill(class),
                    stroke: colors::class_stroke(class),
                    marker: MarkerShape::Circle,
                    radius: 6.0,
                    hover_radius: 9.0,
                    stroke_width: 2.0,
                },
                points,
                sources,
                in_legend: true,
            });
        }
    }

    for class in 0..class_count {
        let name = envelope.target_name(class);
        let (correct, correct_sources) = of_class(&test_points, class, ChartPoint::is_correct);
        if !correct.is_empty() {
            datasets.push(ChartDataset {
                label: format!("{name} (test, correct)"),
                role: DatasetRole::TestCorrect,
                class: Some(class),
                kind: SeriesKind::Scatter,
                style: SeriesStyle {
                    fill: colors::class_fill(class),
                    stroke: colors::class_stroke(class),
                    marker: MarkerShape::Triangle,
                    radius: 8.0,
                    hover_radius: 11.0,
                    stroke_width: 3.0,
                },
                points: correct,
                sources: correct_sources,
                in_legend: false,
            });
        }
        let (wrong, wrong_sources) = of_class(&test_points, class, |point| !point.is_correct());
        if !wrong.is_empty() {
            datasets.push(ChartDataset {
                label: format!("{name} (test, wrong)"),
                role: DatasetRole::TestWrong,
                class: Some(class),
                kind: SeriesKind::Scatter,
                style: SeriesStyle {
                    fill: colors::ERROR_FILL,
                    stroke: colors::ERROR_STROKE,
                    marker: MarkerShape::CrossRot,
                    radius: 10.0,
                    hover_radius: 13.0,
                    stroke_width: 3.0,
                },
                points: wrong,
                sources: wrong_sources,
                in_legend: false,
            });
        }
    }

    let (feature_x, feature_y) = displayed_features(envelope, features);
    let k_label = envelope
        .k_neighbors
        .map(|k| k.to_string())
        .unwrap_or_else(|| "?".to_string());

    Ok(BuiltChart {
        config: ChartConfig {
            title: format!("KNN classification (K={k_label})"),
            x_axis: AxisConfig {
                title: format!("{} ({KNN_AXIS_UNIT})", envelope.feature_name(feature_x)),
            },
            y_axis: AxisConfig {
                title: format!("{} ({KNN_AXIS_UNIT})", envelope.feature_name(feature_y)),
            },
            tooltip: TooltipTemplate {
                x_prefix: String::new(),
                x_suffix: format!(" {KNN_AXIS_UNIT}"),
                y_prefix: " × ".to_string(),
                y_suffix: format!(" {KNN_AXIS_UNIT}"),
                click_hint: "Click for details".to_string(),
            },
            datasets,
        },
    })
}

/// Feature index pair shown on the axes: the echoed pair when present,
/// otherwise the requested one.
pub fn displayed_features(envelope: &ResultEnvelope, requested: (usize, usize)) -> (usize, usize) {
    envelope
        .current_features
        .as_ref()
        .map(|current| (current.x_idx, current.y_idx))
        .unwrap_or(requested)
}

fn required<'a, T>(
    column: Option<&'a [T]>,
    split: &'static str,
    name: &'static str,
) -> Result<&'a [T], ChartError> {
    column.ok_or(ChartError::MissingColumn {
        split,
        column: name,
    })
}

fn collect_points(
    arrays: &SplitArrays,
    split: SampleSplit,
    labels: &[usize],
    predictions: Option<&[usize]>,
) -> Vec<(ChartPoint, SampleRef)> {
    arrays
        .x
        .iter()
        .zip(&arrays.y)
        .zip(labels)
        .enumerate()
        .map(|(index, ((&x, &y), &label))| {
            let point = ChartPoint {
                x,
                y,
                label: Some(label),
                prediction: predictions.and_then(|values| values.get(index).copied()),
            };
            (point, SampleRef { split, index })
        })
        .collect()
}

fn of_class(
    points: &[(ChartPoint, SampleRef)],
    class: usize,
    keep: impl Fn(&ChartPoint) -> bool,
) -> (Vec<ChartPoint>, Vec<SampleRef>) {
    points
        .iter()
        .filter(|(point, _)| point.label == Some(class) && keep(point))
        .map(|(point, source)| (*point, *source))
        .unzip()
}
