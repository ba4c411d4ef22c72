use eframe::egui::{self, RichText};

use super::{MlScopeApp, SIDEBAR_WIDTH, chart_canvas, style};
use crate::config::K_RANGE;
use crate::views::{ClassificationDetail, MetricTone, Verdict, accuracy_text, accuracy_tone};

impl MlScopeApp {
    pub(super) fn render_knn_panel(&mut self, ui: &mut egui::Ui) {
        self.render_knn_controls(ui);
        ui.separator();
        let chart_width = (ui.available_width() - SIDEBAR_WIDTH - 16.0).max(240.0);
        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.set_width(chart_width);
                self.render_knn_chart(ui);
            });
            ui.separator();
            ui.vertical(|ui| {
                ui.set_width(SIDEBAR_WIDTH);
                self.render_knn_sidebar(ui);
            });
        });
    }

    fn render_knn_controls(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        let mut k = self.controller.knn.slider.value();
        ui.horizontal(|ui| {
            ui.label(RichText::new("Neighbors").color(palette.text_primary));
            let response = ui.add(egui::Slider::new(&mut k, K_RANGE).show_value(false));
            if response.changed() {
                self.controller.knn_slider_dragged(k);
            }
            // Keyboard steps change the value without a drag; treat them as a release.
            if response.drag_stopped() || (response.changed() && !response.dragged()) {
                self.controller.knn_slider_released();
            }
            ui.label(
                RichText::new(self.controller.knn.slider.label())
                    .strong()
                    .color(palette.accent_ice),
            );
            if self.controller.knn.is_loading() {
                ui.add(egui::Spinner::new());
                ui.label(RichText::new("Loading…").color(palette.text_muted));
            }
        });
    }

    fn render_knn_chart(&mut self, ui: &mut egui::Ui) {
        let height = (ui.available_height() - 48.0).max(320.0);
        let clicked = match self.controller.knn.chart.current_mut() {
            Some(instance) => chart_canvas::render_chart(ui, instance, height),
            None => {
                render_placeholder(ui, self.controller.knn.is_loading(), height);
                None
            }
        };
        if let Some((dataset, point)) = clicked {
            self.controller.knn_point_clicked(dataset, point);
        }
    }

    fn render_knn_sidebar(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        let knn = &self.controller.knn;
        ui.heading("Accuracy");
        match knn.accuracy() {
            Some(accuracy) => {
                ui.label(
                    RichText::new(accuracy_text(accuracy))
                        .size(28.0)
                        .strong()
                        .color(accuracy_tone(accuracy).color()),
                );
            }
            None => {
                ui.label(RichText::new("—").color(palette.text_muted));
            }
        }
        ui.add_space(8.0);

        ui.heading("Classification");
        match &knn.detail {
            Some(detail) => render_detail(ui, detail),
            None => {
                ui.label(
                    RichText::new("Click a point on the chart to see its classification.")
                        .color(palette.text_muted),
                );
            }
        }
        ui.add_space(8.0);

        if let Some(envelope) = knn.envelope()
            && let Some(matrix) = &envelope.metrics.confusion_matrix
        {
            ui.heading("Confusion matrix");
            egui::Grid::new("knn_confusion_matrix")
                .striped(true)
                .show(ui, |ui| {
                    ui.label("");
                    for column in 0..matrix.len() {
                        ui.label(RichText::new(envelope.target_name(column)).color(palette.text_muted));
                    }
                    ui.end_row();
                    for (row, counts) in matrix.iter().enumerate() {
                        ui.label(RichText::new(envelope.target_name(row)).color(palette.text_muted));
                        for count in counts {
                            ui.label(count.to_string());
                        }
                        ui.end_row();
                    }
                });
            ui.add_space(8.0);
        }

        ui.heading("Model");
        super::render_info_grid(ui, "knn_model_info", &knn.model_info());
    }
}

fn render_detail(ui: &mut egui::Ui, detail: &ClassificationDetail) {
    let palette = style::palette();
    egui::Grid::new("knn_detail").num_columns(2).show(ui, |ui| {
        ui.label(RichText::new(&detail.x_feature).color(palette.text_muted));
        ui.label(RichText::new(detail.x_text()).strong());
        ui.end_row();
        ui.label(RichText::new(&detail.y_feature).color(palette.text_muted));
        ui.label(RichText::new(detail.y_text()).strong());
        ui.end_row();
        ui.label(RichText::new("Actual species").color(palette.text_muted));
        ui.label(RichText::new(&detail.actual).strong().size(16.0));
        ui.end_row();
    });
    let color = match detail.verdict {
        Verdict::Training => palette.text_muted,
        Verdict::Correct => MetricTone::Good.color(),
        Verdict::Wrong { .. } => MetricTone::Poor.color(),
    };
    ui.label(RichText::new(detail.verdict_text()).color(color).strong());
}

pub(super) fn render_placeholder(ui: &mut egui::Ui, loading: bool, height: f32) {
    let palette = style::palette();
    let size = egui::vec2(ui.available_width(), height);
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    ui.painter().rect_filled(rect, 0.0, style::chart_fill());
    let text = if loading {
        "Loading data…"
    } else {
        "No chart loaded"
    };
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        text,
        egui::FontId::proportional(14.0),
        palette.text_muted,
    );
}
