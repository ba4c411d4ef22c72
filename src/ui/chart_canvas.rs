use eframe::egui::{self, Align2, FontId, RichText, Shape, Stroke, epaint::TextShape};

use super::chart_math::{self, PlotTransform};
use super::style;
use crate::chart::{ChartConfig, ChartInstance, MarkerShape, SeriesKind, SeriesStyle};

const PLOT_MARGIN_LEFT: f32 = 64.0;
const PLOT_MARGIN_RIGHT: f32 = 16.0;
const PLOT_MARGIN_TOP: f32 = 12.0;
const PLOT_MARGIN_BOTTOM: f32 = 44.0;
const TICK_TARGET: usize = 6;

/// Paint one mounted chart and return the `(dataset, point)` clicked this frame.
pub(crate) fn render_chart(
    ui: &mut egui::Ui,
    instance: &mut ChartInstance,
    height: f32,
) -> Option<(usize, usize)> {
    let palette = style::palette();
    let config = &instance.chart().config;
    ui.label(RichText::new(&config.title).strong().color(palette.text_primary));
    render_legend(ui, config);

    let size = egui::vec2(ui.available_width(), height.max(120.0));
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, style::chart_fill());
    painter.rect_stroke(rect, 0.0, style::section_stroke(), egui::StrokeKind::Inside);

    let Some(bounds) = config.data_bounds() else {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "No data to display",
            FontId::proportional(14.0),
            palette.text_muted,
        );
        instance.hovered = None;
        return None;
    };
    let plot_rect = egui::Rect::from_min_max(
        rect.min + egui::vec2(PLOT_MARGIN_LEFT, PLOT_MARGIN_TOP),
        rect.max - egui::vec2(PLOT_MARGIN_RIGHT, PLOT_MARGIN_BOTTOM),
    );
    let transform = PlotTransform::new(plot_rect, bounds);
    paint_axes(&painter, &transform, config);

    for dataset in &config.datasets {
        match dataset.kind {
            SeriesKind::Line => {
                let points = dataset
                    .points
                    .iter()
                    .map(|point| transform.to_screen(point.x, point.y))
                    .collect::<Vec<_>>();
                if points.len() >= 2 {
                    painter.add(Shape::line(
                        points,
                        Stroke::new(dataset.style.stroke_width, dataset.style.stroke),
                    ));
                }
            }
            SeriesKind::Scatter => {
                for point in &dataset.points {
                    let pos = transform.to_screen(point.x, point.y);
                    if plot_rect.expand(dataset.style.radius).contains(pos) {
                        paint_marker(&painter, pos, &dataset.style, dataset.style.radius);
                    }
                }
            }
        }
    }

    let hovered = chart_math::find_hover_point(config, &transform, response.hover_pos());
    if let Some(((dataset, point), pos)) = hovered {
        if let Some(set) = config.datasets.get(dataset) {
            paint_marker(&painter, pos, &set.style, set.style.hover_radius);
        }
        if let Some(lines) = config.tooltip_lines(dataset, point) {
            egui::Tooltip::always_open(
                ui.ctx().clone(),
                ui.layer_id(),
                egui::Id::new(("chart_hover_tooltip", instance.id())),
                egui::PopupAnchor::Pointer,
            )
            .show(|ui| {
                for line in &lines {
                    ui.label(line);
                }
            });
        }
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }

    let clicked = if response.clicked() {
        hovered.map(|(key, _)| key)
    } else {
        None
    };
    instance.hovered = hovered.map(|(key, _)| key);
    clicked
}

fn render_legend(ui: &mut egui::Ui, config: &ChartConfig) {
    let palette = style::palette();
    ui.horizontal_wrapped(|ui| {
        for dataset in config.legend_entries() {
            let (swatch, _) = ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::hover());
            match dataset.kind {
                SeriesKind::Line => {
                    ui.painter().line_segment(
                        [swatch.left_center(), swatch.right_center()],
                        Stroke::new(dataset.style.stroke_width, dataset.style.stroke),
                    );
                }
                SeriesKind::Scatter => {
                    paint_marker(ui.painter(), swatch.center(), &dataset.style, 5.0);
                }
            }
            ui.label(RichText::new(&dataset.label).color(palette.text_primary));
            ui.add_space(8.0);
        }
    });
}

fn paint_axes(painter: &egui::Painter, transform: &PlotTransform, config: &ChartConfig) {
    let palette = style::palette();
    let plot_rect = transform.rect();
    let bounds = transform.bounds();
    let font = FontId::proportional(11.0);

    let x_ticks = chart_math::nice_ticks(bounds.min_x, bounds.max_x, TICK_TARGET);
    let x_step = tick_step(&x_ticks);
    for value in &x_ticks {
        let x = transform.to_screen(*value, bounds.min_y).x;
        painter.line_segment(
            [egui::pos2(x, plot_rect.top()), egui::pos2(x, plot_rect.bottom())],
            style::chart_grid(),
        );
        painter.text(
            egui::pos2(x, plot_rect.bottom() + 4.0),
            Align2::CENTER_TOP,
            chart_math::format_tick(*value, x_step),
            font.clone(),
            palette.text_muted,
        );
    }

    let y_ticks = chart_math::nice_ticks(bounds.min_y, bounds.max_y, TICK_TARGET);
    let y_step = tick_step(&y_ticks);
    for value in &y_ticks {
        let y = transform.to_screen(bounds.min_x, *value).y;
        painter.line_segment(
            [egui::pos2(plot_rect.left(), y), egui::pos2(plot_rect.right(), y)],
            style::chart_grid(),
        );
        painter.text(
            egui::pos2(plot_rect.left() - 6.0, y),
            Align2::RIGHT_CENTER,
            chart_math::format_tick(*value, y_step),
            font.clone(),
            palette.text_muted,
        );
    }

    painter.line_segment(
        [plot_rect.left_bottom(), plot_rect.right_bottom()],
        style::chart_axis(),
    );
    painter.line_segment(
        [plot_rect.left_bottom(), plot_rect.left_top()],
        style::chart_axis(),
    );

    painter.text(
        egui::pos2(plot_rect.center().x, plot_rect.bottom() + 22.0),
        Align2::CENTER_TOP,
        &config.x_axis.title,
        FontId::proportional(12.0),
        palette.text_primary,
    );
    let galley = painter.layout_no_wrap(
        config.y_axis.title.clone(),
        FontId::proportional(12.0),
        palette.text_primary,
    );
    let anchor = egui::pos2(
        plot_rect.left() - PLOT_MARGIN_LEFT + 4.0,
        plot_rect.center().y + galley.size().x * 0.5,
    );
    painter.add(TextShape::new(anchor, galley, palette.text_primary).with_angle(-std::f32::consts::FRAC_PI_2));
}

fn tick_step(ticks: &[f64]) -> f64 {
    match ticks {
        [first, second, ..] => second - first,
        _ => 1.0,
    }
}

pub(crate) fn paint_marker(painter: &egui::Painter, pos: egui::Pos2, style: &SeriesStyle, radius: f32) {
    let stroke = Stroke::new(style.stroke_width, style.stroke);
    match style.marker {
        MarkerShape::Circle => {
            painter.circle(pos, radius, style.fill, stroke);
        }
        MarkerShape::Triangle => {
            painter.add(Shape::convex_polygon(
                chart_math::triangle_points(pos, radius),
                style.fill,
                stroke,
            ));
        }
        MarkerShape::CrossRot => {
            let d = radius * std::f32::consts::FRAC_1_SQRT_2;
            painter.line_segment([pos + egui::vec2(-d, -d), pos + egui::vec2(d, d)], stroke);
            painter.line_segment([pos + egui::vec2(-d, d), pos + egui::vec2(d, -d)], stroke);
        }
        MarkerShape::Star => {
            let points = chart_math::star_points(pos, radius, radius * 0.45);
            // Concave outline: fill as a fan of convex slivers around the center.
            for (index, corner) in points.iter().enumerate() {
                let next = points[(index + 1) % points.len()];
                painter.add(Shape::convex_polygon(
                    vec![pos, *corner, next],
                    style.fill,
                    Stroke::NONE,
                ));
            }
            painter.add(Shape::closed_line(points, stroke));
        }
    }
}
