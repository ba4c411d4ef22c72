use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use mlscope::api::{DatasetSplit, Description, RegressionLine, ResultEnvelope, SplitArrays};
use mlscope::chart::{build_knn_chart, build_regression_chart};

const SAMPLE_COUNT: usize = 2_000;

fn knn_envelope(samples: usize) -> ResultEnvelope {
    let split = |count: usize, offset: f64, with_predictions: bool| {
        let labels: Vec<usize> = (0..count).map(|i| i % 3).collect();
        SplitArrays {
            x: (0..count).map(|i| 1.0 + (i as f64 * 0.37 + offset) % 6.0).collect(),
            y: (0..count).map(|i| 0.1 + (i as f64 * 0.11 + offset) % 2.4).collect(),
            predictions: with_predictions.then(|| {
                labels
                    .iter()
                    .enumerate()
                    .map(|(i, label)| if i % 7 == 0 { (label + 1) % 3 } else { *label })
                    .collect()
            }),
            labels: Some(labels),
            y_pred: None,
        }
    };
    let test_count = samples / 4;
    ResultEnvelope {
        success: true,
        target_names: Some(vec!["setosa".into(), "versicolor".into(), "virginica".into()]),
        k_neighbors: Some(5),
        data: DatasetSplit {
            train: split(samples - test_count, 0.0, false),
            test: split(test_count, 0.5, true),
            regression_line: None,
        },
        description: Description {
            dataset: "Iris".into(),
            samples,
            classes: Some(3),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn regression_envelope(samples: usize) -> ResultEnvelope {
    let split = |count: usize, offset: f64| {
        let x: Vec<f64> = (0..count).map(|i| 3.0 + (i as f64 * 0.013 + offset) % 6.0).collect();
        let y = x.iter().map(|x| 50.0 * x - 100.0 + (x * 17.0) % 20.0).collect();
        SplitArrays {
            x,
            y,
            ..Default::default()
        }
    };
    let test_count = samples / 5;
    ResultEnvelope {
        success: true,
        data: DatasetSplit {
            train: split(samples - test_count, 0.0),
            test: split(test_count, 0.25),
            regression_line: Some(RegressionLine {
                x: vec![3.0, 9.0],
                y: vec![50.0, 350.0],
            }),
        },
        description: Description {
            dataset: "California housing".into(),
            samples,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn bench_knn_chart(c: &mut Criterion) {
    let envelope = knn_envelope(SAMPLE_COUNT);
    c.bench_with_input(
        BenchmarkId::new("knn_chart", SAMPLE_COUNT),
        &envelope,
        |b, envelope| b.iter(|| build_knn_chart(black_box(envelope), (2, 3))),
    );
}

fn bench_regression_chart(c: &mut Criterion) {
    let envelope = regression_envelope(SAMPLE_COUNT);
    c.bench_with_input(
        BenchmarkId::new("regression_chart", SAMPLE_COUNT),
        &envelope,
        |b, envelope| b.iter(|| build_regression_chart(black_box(envelope))),
    );
}

criterion_group!(benches, bench_knn_chart, bench_regression_chart);
criterion_main!(benches);
