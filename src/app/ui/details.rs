use eframe::egui::{self, Context, RichText};

use super::super::ChartView;

impl ChartView {
    /// Shows the record picked by the last bubble click until the window is closed.
    pub(in crate::app) fn draw_details(&self, ctx: &Context) {
        let Some(datum) = self.selected.borrow().clone() else {
            return;
        };

        let mut open = true;
        egui::Window::new("Details")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(RichText::new(datum.name.as_str()).strong());
                ui.label(format!("Change: {}", datum.change_label()));
                ui.label(format!("Class: {}", datum.color_class()));
                ui.separator();
                match serde_json::to_string_pretty(&datum) {
                    Ok(json) => {
                        ui.monospace(json);
                    }
                    Err(error) => {
                        ui.label(format!("Failed to serialize record: {error}"));
                    }
                }
            });

        if !open {
            self.selected.borrow_mut().take();
        }
    }
}
