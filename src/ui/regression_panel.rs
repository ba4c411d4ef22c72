use eframe::egui::{self, RichText};

use super::knn_panel::render_placeholder;
use super::{MlScopeApp, SIDEBAR_WIDTH, chart_canvas, style};
use crate::views::r2_tone;

impl MlScopeApp {
    pub(super) fn render_regression_panel(&mut self, ui: &mut egui::Ui) {
        self.render_prediction_controls(ui);
        ui.separator();
        let chart_width = (ui.available_width() - SIDEBAR_WIDTH - 16.0).max(240.0);
        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.set_width(chart_width);
                self.render_regression_chart(ui);
            });
            ui.separator();
            ui.vertical(|ui| {
                ui.set_width(SIDEBAR_WIDTH);
                self.render_regression_sidebar(ui);
            });
        });
    }

    fn render_prediction_controls(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        ui.horizontal(|ui| {
            ui.label(RichText::new("Rooms").color(palette.text_primary));
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.controller.regression.rooms_input)
                    .desired_width(80.0)
                    .hint_text("1-15"),
            );
            let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let clicked = ui.button("Predict").clicked();
            if entered || clicked {
                self.controller.submit_rooms();
            }
            if self.controller.regression.is_predicting() {
                ui.add(egui::Spinner::new());
            }
            ui.separator();
            match &self.controller.regression.predicted {
                Some(predicted) => {
                    ui.label(RichText::new("Predicted price").color(palette.text_muted));
                    ui.label(
                        RichText::new(predicted.text())
                            .size(20.0)
                            .strong()
                            .color(palette.accent_ice),
                    );
                    if let Some(unit) = predicted.unit_text() {
                        ui.label(RichText::new(unit).color(palette.text_muted));
                    }
                }
                None => {
                    ui.label(
                        RichText::new("Enter a room count or click a point to predict.")
                            .color(palette.text_muted),
                    );
                }
            }
        });
    }

    fn render_regression_chart(&mut self, ui: &mut egui::Ui) {
        let height = (ui.available_height() - 48.0).max(320.0);
        let clicked = match self.controller.regression.chart.current_mut() {
            Some(instance) => chart_canvas::render_chart(ui, instance, height),
            None => {
                render_placeholder(ui, self.controller.regression.is_loading(), height);
                None
            }
        };
        if let Some((dataset, point)) = clicked {
            self.controller.regression_point_clicked(dataset, point);
        }
    }

    fn render_regression_sidebar(&mut self, ui: &mut egui::Ui) {
        let palette = style::palette();
        let regression = &self.controller.regression;
        ui.heading("Metrics");
        let r2 = regression.r2_score();
        egui::Grid::new("regression_metrics")
            .num_columns(2)
            .show(ui, |ui| {
                for (label, value) in regression.metric_rows() {
                    ui.label(RichText::new(label).color(palette.text_muted));
                    let text = RichText::new(value).strong();
                    match (label, r2) {
                        ("R²", Some(r2)) => ui.label(text.color(r2_tone(r2).color())),
                        _ => ui.label(text),
                    };
                    ui.end_row();
                }
            });
        if let Some(formula) = regression.formula_text() {
            ui.add_space(6.0);
            ui.label(RichText::new(formula).monospace().color(palette.accent_ice));
        }
        ui.add_space(8.0);

        ui.heading("Model");
        super::render_info_grid(ui, "regression_model_info", &regression.model_info());
        if let Some(info) = regression.info_text() {
            ui.add_space(6.0);
            ui.label(RichText::new(info).color(palette.text_muted));
        }
        if regression.is_loading() {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new());
                ui.label(RichText::new("Loading…").color(palette.text_muted));
            });
        }
    }
}
