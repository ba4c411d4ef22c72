use egui::Color32;

use super::{
    AxisConfig, BuiltChart, ChartConfig, ChartDataset, ChartError, ChartPoint, DatasetRole,
    MarkerShape, SampleRef, SampleSplit, SeriesKind, SeriesStyle, TooltipTemplate,
};
use crate::api::{ResultEnvelope, SplitArrays};

/// Label of the single user prediction marker.
pub const PREDICTION_LABEL: &str = "Your prediction";

const TRAIN_FILL: Color32 = Color32::from_rgba_premultiplied(61, 76, 140, 153);
const TRAIN_STROKE: Color32 = Color32::from_rgb(102, 126, 234);
const TEST_FILL: Color32 = Color32::from_rgba_premultiplied(142, 60, 100, 153);
const TEST_STROKE: Color32 = Color32::from_rgb(237, 100, 166);
const LINE_STROKE: Color32 = Color32::from_rgb(245, 158, 11);
const PREDICTION_FILL: Color32 = Color32::from_rgb(255, 193, 7);
const PREDICTION_STROKE: Color32 = Color32::from_rgb(255, 152, 0);

/// Build the regression chart: training points, test points and the fitted line.
pub fn build_regression_chart(envelope: &ResultEnvelope) -> Result<BuiltChart, ChartError> {
    let line = envelope
        .data
        .regression_line
        .as_ref()
        .ok_or(ChartError::MissingRegressionLine)?;
    let sample_style = |fill, stroke| SeriesStyle {
        fill,
        stroke,
        marker: MarkerShape::Circle,
        radius: 6.0,
        hover_radius: 8.0,
        stroke_width: 1.0,
    };
    let (train_points, train_sources) = samples(&envelope.data.train, SampleSplit::Train);
    let (test_points, test_sources) = samples(&envelope.data.test, SampleSplit::Test);
    let datasets = vec![
        ChartDataset {
            label: "Training data".to_string(),
            role: DatasetRole::Train,
            class: None,
            kind: SeriesKind::Scatter,
            style: sample_style(TRAIN_FILL, TRAIN_STROKE),
            points: train_points,
            sources: train_sources,
            in_legend: true,
        },
        ChartDataset {
            label: "Test data".to_string(),
            role: DatasetRole::Test,
            class: None,
            kind: SeriesKind::Scatter,
            style: sample_style(TEST_FILL, TEST_STROKE),
            points: test_points,
            sources: test_sources,
            in_legend: true,
        },
        ChartDataset {
            label: "Regression line".to_string(),
            role: DatasetRole::Line,
            class: None,
            kind: SeriesKind::Line,
            style: SeriesStyle {
                fill: Color32::TRANSPARENT,
                stroke: LINE_STROKE,
                marker: MarkerShape::Circle,
                radius: 0.0,
                hover_radius: 0.0,
                stroke_width: 3.0,
            },
            points: line
                .x
                .iter()
                .zip(&line.y)
                .map(|(&x, &y)| ChartPoint::plain(x, y))
                .collect(),
            sources: Vec::new(),
            in_legend: true,
        },
    ];

    let description = &envelope.description;
    let feature = description.feature_name.as_deref().unwrap_or("Feature");
    let feature_unit = description.feature_unit.as_deref().unwrap_or("");
    let target = description.target_name.as_deref().unwrap_or("Target");
    let target_unit = description.target_unit.as_deref().unwrap_or("");

    Ok(BuiltChart {
        config: ChartConfig {
            title: format!("{feature} vs {target}"),
            x_axis: AxisConfig {
                title: axis_title(feature, feature_unit),
            },
            y_axis: AxisConfig {
                title: axis_title(target, target_unit),
            },
            tooltip: TooltipTemplate {
                x_prefix: String::new(),
                x_suffix: format!(" {feature_unit}").trim_end().to_string(),
                y_prefix: format!(", {target} "),
                y_suffix: format!(" {target_unit}").trim_end().to_string(),
                click_hint: "Click to predict this point".to_string(),
            },
            datasets,
        },
    })
}

/// Replace any previous prediction marker with a single point at `(x, y)`.
pub fn set_prediction(chart: &mut BuiltChart, x: f64, y: f64) {
    let datasets = &mut chart.config.datasets;
    datasets.retain(|dataset| dataset.role != DatasetRole::Prediction);
    datasets.push(ChartDataset {
        label: PREDICTION_LABEL.to_string(),
        role: DatasetRole::Prediction,
        class: None,
        kind: SeriesKind::Scatter,
        style: SeriesStyle {
            fill: PREDICTION_FILL,
            stroke: PREDICTION_STROKE,
            marker: MarkerShape::Star,
            radius: 12.0,
            hover_radius: 15.0,
            stroke_width: 3.0,
        },
        points: vec![ChartPoint::plain(x, y)],
        sources: Vec::new(),
        in_legend: true,
    });
}

fn axis_title(name: &str, unit: &str) -> String {
    if unit.is_empty() {
        name.to_string()
    } else {
        format!("{name} ({unit})")
    }
}

fn samples(arrays: &SplitArrays, split: SampleSplit) -> (Vec<ChartPoint>, Vec<SampleRef>) {
    arrays
        .x
        .iter()
        .zip(&arrays.y)
        .enumerate()
        .map(|(index, (&x, &y))| (ChartPoint::plain(x, y), SampleRef { split, index }))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DatasetSplit, Description, RegressionLine};

    fn envelope() -> ResultEnvelope {
        ResultEnvelope {
            success: true,
            data: DatasetSplit {
                train: SplitArrays {
                    x: vec![4.0, 5.5, 7.2],
                    y: vec![180.0, 220.0, 300.0],
                    ..Default::default()
                },
                test: SplitArrays {
                    x: vec![6.1],
                    y: vec![240.0],
                    ..Default::default()
                },
                regression_line: Some(RegressionLine {
                    x: vec![4.0, 7.2],
                    y: vec![170.0, 310.0],
                }),
            },
            description: Description {
                dataset: "housing".into(),
                feature_name: Some("Average rooms".into()),
                feature_unit: Some("rooms".into()),
                target_name: Some("Price".into()),
                target_unit: Some("k$".into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn builds_three_fixed_datasets() {
        let chart = build_regression_chart(&envelope()).unwrap();
        let roles: Vec<_> = chart.config.datasets.iter().map(|d| d.role).collect();
        assert_eq!(
            roles,
            vec![DatasetRole::Train, DatasetRole::Test, DatasetRole::Line]
        );
        let line = &chart.config.datasets[2];
        assert_eq!(line.kind, SeriesKind::Line);
        assert_eq!(line.style.radius, 0.0);
        assert_eq!(line.points.len(), 2);
        assert_eq!(chart.config.x_axis.title, "Average rooms (rooms)");
        assert_eq!(chart.config.y_axis.title, "Price (k$)");
        assert_eq!(chart.config.title, "Average rooms vs Price");
    }

    #[test]
    fn repeated_predictions_keep_a_single_marker() {
        let mut chart = build_regression_chart(&envelope()).unwrap();
        set_prediction(&mut chart, 5.0, 210.0);
        set_prediction(&mut chart, 6.5, 245.3);
        let markers: Vec<_> = chart
            .config
            .datasets_with_role(DatasetRole::Prediction)
            .collect();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].points, vec![ChartPoint::plain(6.5, 245.3)]);
        assert_eq!(markers[0].style.marker, MarkerShape::Star);
        assert_eq!(chart.config.datasets.len(), 4);
    }

    #[test]
    fn test_points_resolve_to_test_split() {
        let chart = build_regression_chart(&envelope()).unwrap();
        let resolved = chart.resolve(1, 0).unwrap();
        assert_eq!(resolved.point.x, 6.1);
        assert_eq!(
            resolved.sample,
            Some(SampleRef {
                split: SampleSplit::Test,
                index: 0
            })
        );
        assert!(chart.resolve(2, 0).unwrap().sample.is_none());
    }

    #[test]
    fn missing_line_is_an_error() {
        let mut envelope = envelope();
        envelope.data.regression_line = None;
        assert_eq!(
            build_regression_chart(&envelope).unwrap_err(),
            ChartError::MissingRegressionLine
        );
    }
}
