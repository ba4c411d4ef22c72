//! egui renderer for both views.
//!
//! Rendering only reads view state and forwards user intent to
//! [`ViewController`]; all network work happens off the UI thread.

mod chart_canvas;
mod chart_math;
mod knn_panel;
mod regression_panel;
mod style;

use eframe::egui::{self, Align2, Frame, Margin, RichText, StrokeKind};

use crate::views::{ActiveView, ViewController};

/// Smallest window that still fits a chart next to the sidebar.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(960.0, 640.0);
const SIDEBAR_WIDTH: f32 = 300.0;

/// Top-level eframe app.
pub struct MlScopeApp {
    controller: ViewController,
    visuals_set: bool,
}

impl MlScopeApp {
    /// Wire repaint notifications to `ctx` and start loading both views.
    pub fn new(ctx: &egui::Context, mut controller: ViewController) -> Self {
        controller.set_repaint_context(ctx.clone());
        controller.load_all();
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("top_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .inner_margin(Margin::symmetric(8, 6)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for view in [ActiveView::Knn, ActiveView::Regression] {
                        ui.selectable_value(&mut self.controller.active, view, view.title());
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Reload").clicked() {
                            match self.controller.active {
                                ActiveView::Knn => {
                                    let k = self.controller.knn.slider.committed();
                                    self.controller.load_knn(k);
                                }
                                ActiveView::Regression => self.controller.load_regression(),
                            }
                        }
                    });
                });
            });
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .stroke(style::section_stroke())
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                let status = &self.controller.status;
                ui.horizontal(|ui| {
                    ui.add_space(6.0);
                    let (badge_rect, _) =
                        ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::hover());
                    ui.painter().rect_filled(badge_rect, 0.0, status.badge_color);
                    ui.painter().rect_stroke(
                        badge_rect,
                        0.0,
                        style::chart_grid(),
                        StrokeKind::Inside,
                    );
                    ui.add_space(8.0);
                    ui.label(RichText::new(&status.badge_label).color(palette.text_primary));
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(palette.text_primary))
                        .on_hover_text(status.log_text());
                });
            });
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.controller.notice().cloned() else {
            return;
        };
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.controller.dismiss_notice();
            return;
        }
        let palette = style::palette();
        let mut open = true;
        let mut dismissed = false;
        egui::Window::new(notice.title.as_str())
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .order(egui::Order::Foreground)
            .collapsible(false)
            .resizable(false)
            .default_width(380.0)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(RichText::new(&notice.message).color(palette.text_primary));
                ui.add_space(12.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if !open || dismissed {
            self.controller.dismiss_notice();
        }
    }
}

impl eframe::App for MlScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_background_jobs();
        self.render_top_bar(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| match self.controller.active {
            ActiveView::Knn => self.render_knn_panel(ui),
            ActiveView::Regression => self.render_regression_panel(ui),
        });
        self.render_notice(ctx);
    }
}

fn render_info_grid(ui: &mut egui::Ui, id: &str, rows: &[(&'static str, String)]) {
    let palette = style::palette();
    if rows.is_empty() {
        ui.label(RichText::new("No model loaded").color(palette.text_muted));
        return;
    }
    egui::Grid::new(id).num_columns(2).show(ui, |ui| {
        for (label, value) in rows {
            ui.label(RichText::new(*label).color(palette.text_muted));
            ui.label(RichText::new(value).strong());
            ui.end_row();
        }
    });
}
