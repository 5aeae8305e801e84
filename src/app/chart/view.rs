use eframe::egui::{self, Align2, CursorIcon, FontId, Painter, Sense, Stroke, Ui, Vec2, vec2};

use bubble_chart::chart::{BodyId, DragPhase};

use super::super::ChartView;
use super::super::render_utils::{
    FILL_OPACITY, LABEL_COLOR, LabelLayout, RING_STROKE_WIDTH, bubble_stroke, class_color,
    draw_background, draw_shadow, with_opacity,
};

impl ChartView {
    pub(in crate::app) fn draw_chart(&mut self, ui: &mut Ui) {
        // The layout area tracks the panel; the chart adds its own overscroll below.
        self.chart.resize(Some(ui.available_size()));
        let size = self.chart.viewport().size();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());

                self.handle_mouse_drag(ui, rect, &response);
                self.handle_touch_drags(ui, rect);
                self.handle_click(rect, &response);
                self.hovered = self.hovered_body(rect, &response);

                let running = self.chart.tick();
                if running || self.chart.drag_phase() == DragPhase::Dragging {
                    ui.ctx().request_repaint();
                }

                if let Some(body) = self.hovered {
                    let icon = if self.chart.is_dragging(body) {
                        CursorIcon::Grabbing
                    } else {
                        CursorIcon::PointingHand
                    };
                    ui.output_mut(|output| output.cursor_icon = icon);
                }

                let painter = ui.painter_at(rect);
                draw_background(&painter, rect);
                self.paint_bubbles(&painter, rect.min.to_vec2());
            });
    }

    fn paint_bubbles(&self, painter: &Painter, origin: Vec2) {
        for (index, body) in self.chart.bodies().iter().enumerate() {
            let id = BodyId(index);
            let center = body.position() + origin;
            let radius = body.radius();
            let color = class_color(body.class());

            draw_shadow(painter, center, radius, color);
            painter.circle(
                center,
                radius,
                with_opacity(color, FILL_OPACITY),
                bubble_stroke(color, self.hovered == Some(id)),
            );

            let Some(datum) = self.chart.datum(id) else {
                continue;
            };
            let layout = LabelLayout::for_radius(radius);
            painter.text(
                center + vec2(0.0, layout.name_offset),
                Align2::CENTER_CENTER,
                datum.label(),
                FontId::proportional(layout.name_size),
                LABEL_COLOR,
            );
            painter.text(
                center + vec2(0.0, layout.change_offset),
                Align2::CENTER_CENTER,
                datum.change_label(),
                FontId::proportional(layout.change_size),
                LABEL_COLOR,
            );
            painter.circle_stroke(
                center + vec2(0.0, layout.ring_offset),
                layout.ring_radius,
                Stroke::new(RING_STROKE_WIDTH, LABEL_COLOR),
            );
        }
    }
}
