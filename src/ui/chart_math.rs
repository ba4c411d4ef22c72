use eframe::egui;

use crate::chart::{ChartConfig, DataBounds, SeriesKind};

/// Minimum pointer distance, in points, that still counts as hovering a marker.
const MIN_HIT_RADIUS: f32 = 6.0;

/// Maps data coordinates into a screen rect, y growing upwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PlotTransform {
    rect: egui::Rect,
    bounds: DataBounds,
}

impl PlotTransform {
    pub(crate) fn new(rect: egui::Rect, bounds: DataBounds) -> Self {
        Self { rect, bounds }
    }

    pub(crate) fn rect(&self) -> egui::Rect {
        self.rect
    }

    pub(crate) fn bounds(&self) -> DataBounds {
        self.bounds
    }

    pub(crate) fn to_screen(&self, x: f64, y: f64) -> egui::Pos2 {
        let span_x = (self.bounds.max_x - self.bounds.min_x).max(f64::EPSILON);
        let span_y = (self.bounds.max_y - self.bounds.min_y).max(f64::EPSILON);
        let tx = ((x - self.bounds.min_x) / span_x) as f32;
        let ty = ((y - self.bounds.min_y) / span_y) as f32;
        egui::pos2(
            self.rect.left() + tx * self.rect.width(),
            self.rect.bottom() - ty * self.rect.height(),
        )
    }

    pub(crate) fn to_data(&self, pos: egui::Pos2) -> (f64, f64) {
        let width = self.rect.width().max(f32::EPSILON) as f64;
        let height = self.rect.height().max(f32::EPSILON) as f64;
        let tx = (pos.x - self.rect.left()) as f64 / width;
        let ty = (self.rect.bottom() - pos.y) as f64 / height;
        (
            self.bounds.min_x + tx * (self.bounds.max_x - self.bounds.min_x),
            self.bounds.min_y + ty * (self.bounds.max_y - self.bounds.min_y),
        )
    }
}

/// Nearest hoverable marker under the pointer as `((dataset, point), screen_pos)`.
///
/// Line series are never hit. Later datasets win ties since they paint on top.
pub(crate) fn find_hover_point(
    config: &ChartConfig,
    transform: &PlotTransform,
    pointer: Option<egui::Pos2>,
) -> Option<((usize, usize), egui::Pos2)> {
    let pointer = pointer?;
    if !transform.rect().contains(pointer) {
        return None;
    }
    let mut best: Option<((usize, usize), egui::Pos2, f32)> = None;
    for (dataset_index, dataset) in config.datasets.iter().enumerate() {
        if dataset.kind == SeriesKind::Line {
            continue;
        }
        let hit = dataset.style.radius.max(MIN_HIT_RADIUS);
        for (point_index, point) in dataset.points.iter().enumerate() {
            let pos = transform.to_screen(point.x, point.y);
            let dist_sq = pos.distance_sq(pointer);
            if dist_sq > hit * hit {
                continue;
            }
            match best {
                Some((_, _, best_sq)) if dist_sq > best_sq => {}
                _ => best = Some(((dataset_index, point_index), pos, dist_sq)),
            }
        }
    }
    best.map(|(key, pos, _)| (key, pos))
}

/// Round tick positions covering `[min, max]`, roughly `target` of them.
pub(crate) fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || max <= min || target == 0 {
        return Vec::new();
    }
    let raw = (max - min) / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|factor| factor * magnitude)
        .find(|step| *step >= raw)
        .unwrap_or(10.0 * magnitude);
    let first = (min / step).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;
    // Dividing by the inverse keeps fractional ticks such as 0.3 exact.
    let inverse = (1.0 / step).round();
    (first..=last)
        .map(|index| {
            if step < 1.0 {
                index as f64 / inverse
            } else {
                index as f64 * step
            }
        })
        .collect()
}

pub(crate) fn format_tick(value: f64, step: f64) -> String {
    let decimals = (-step.log10() - 1e-9).ceil().max(0.0) as usize;
    format!("{value:.decimals$}")
}

pub(crate) fn triangle_points(center: egui::Pos2, radius: f32) -> Vec<egui::Pos2> {
    let half_width = radius * 0.866;
    vec![
        egui::pos2(center.x, center.y - radius),
        egui::pos2(center.x + half_width, center.y + radius * 0.5),
        egui::pos2(center.x - half_width, center.y + radius * 0.5),
    ]
}

/// Five-pointed star outline, tips first, starting straight up.
pub(crate) fn star_points(center: egui::Pos2, outer: f32, inner: f32) -> Vec<egui::Pos2> {
    (0..10)
        .map(|index| {
            let radius = if index % 2 == 0 { outer } else { inner };
            let angle = -std::f32::consts::FRAC_PI_2 + index as f32 * std::f32::consts::PI / 5.0;
            egui::pos2(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{
        ChartDataset, ChartPoint, DatasetRole, MarkerShape, SeriesStyle,
    };

    fn transform() -> PlotTransform {
        PlotTransform::new(
            egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0)),
            DataBounds {
                min_x: 0.0,
                max_x: 10.0,
                min_y: 0.0,
                max_y: 10.0,
            },
        )
    }

    fn dataset(kind: SeriesKind, radius: f32, points: &[(f64, f64)]) -> ChartDataset {
        ChartDataset {
            label: "set".into(),
            role: DatasetRole::Train,
            class: None,
            kind,
            style: SeriesStyle {
                fill: egui::Color32::WHITE,
                stroke: egui::Color32::WHITE,
                marker: MarkerShape::Circle,
                radius,
                hover_radius: radius,
                stroke_width: 1.0,
            },
            points: points.iter().map(|&(x, y)| ChartPoint::plain(x, y)).collect(),
            sources: Vec::new(),
            in_legend: true,
        }
    }

    #[test]
    fn y_axis_grows_upwards() {
        let transform = transform();
        assert_eq!(transform.to_screen(0.0, 0.0), egui::pos2(0.0, 100.0));
        assert_eq!(transform.to_screen(10.0, 10.0), egui::pos2(100.0, 0.0));
        let (x, y) = transform.to_data(egui::pos2(25.0, 75.0));
        assert!((x - 2.5).abs() < 1e-6);
        assert!((y - 2.5).abs() < 1e-6);
    }

    #[test]
    fn hover_picks_nearest_marker_within_radius() {
        let config = ChartConfig {
            datasets: vec![
                dataset(SeriesKind::Scatter, 4.0, &[(5.0, 5.0), (5.3, 5.0)]),
                dataset(SeriesKind::Scatter, 4.0, &[(9.0, 9.0)]),
            ],
            ..Default::default()
        };
        let hit = find_hover_point(&config, &transform(), Some(egui::pos2(52.0, 50.0)));
        assert_eq!(hit.map(|(key, _)| key), Some((0, 1)));
        assert!(find_hover_point(&config, &transform(), Some(egui::pos2(70.0, 50.0))).is_none());
        assert!(find_hover_point(&config, &transform(), None).is_none());
    }

    #[test]
    fn large_markers_extend_hit_area() {
        let config = ChartConfig {
            datasets: vec![dataset(SeriesKind::Scatter, 12.0, &[(5.0, 5.0)])],
            ..Default::default()
        };
        let hit = find_hover_point(&config, &transform(), Some(egui::pos2(60.0, 50.0)));
        assert_eq!(hit.map(|(key, _)| key), Some((0, 0)));
    }

    #[test]
    fn line_series_are_not_hoverable() {
        let config = ChartConfig {
            datasets: vec![dataset(SeriesKind::Line, 0.0, &[(5.0, 5.0)])],
            ..Default::default()
        };
        assert!(find_hover_point(&config, &transform(), Some(egui::pos2(50.0, 50.0))).is_none());
    }

    #[test]
    fn ticks_use_round_steps() {
        assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(nice_ticks(0.05, 0.45, 4), vec![0.1, 0.2, 0.3, 0.4]);
        assert!(nice_ticks(3.0, 3.0, 5).is_empty());
        assert_eq!(format_tick(0.30000000000000004, 0.1), "0.3");
        assert_eq!(format_tick(250.0, 50.0), "250");
    }

    #[test]
    fn star_has_ten_vertices_with_top_tip() {
        let points = star_points(egui::pos2(0.0, 0.0), 10.0, 4.0);
        assert_eq!(points.len(), 10);
        assert!((points[0].x).abs() < 1e-4);
        assert!((points[0].y + 10.0).abs() < 1e-4);
    }
}
