use eframe::egui::{Event, PointerButton, Pos2, Rect, Response, TouchPhase, Ui};

use bubble_chart::chart::{BodyId, PointerId};

use super::super::ChartView;

const MOUSE_POINTER: PointerId = PointerId(0);

/// Screen position to chart coordinates, where the chart's top-left corner is the origin.
pub(super) fn to_chart(rect: Rect, screen: Pos2) -> Pos2 {
    (screen - rect.min).to_pos2()
}

/// Touch contacts are shifted past the mouse pointer id.
fn touch_pointer(id: u64) -> PointerId {
    PointerId(id.saturating_add(1))
}

impl ChartView {
    pub(in crate::app) fn hovered_body(&self, rect: Rect, response: &Response) -> Option<BodyId> {
        response
            .hover_pos()
            .and_then(|pointer| self.chart.body_at(to_chart(rect, pointer)))
    }

    pub(in crate::app) fn handle_mouse_drag(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        if response.drag_started_by(PointerButton::Primary) {
            let origin = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(origin) = origin {
                self.start_mouse_drag(to_chart(rect, origin));
            }
        }

        if response.dragged_by(PointerButton::Primary)
            && let Some(at) = response.interact_pointer_pos()
        {
            self.move_mouse_drag(to_chart(rect, at));
        }

        if response.drag_stopped() {
            self.end_mouse_drag();
        }
    }

    fn start_mouse_drag(&mut self, at: Pos2) {
        if let Some(body) = self.chart.body_at(at)
            && self.chart.drag_start(MOUSE_POINTER, body, at)
        {
            self.mouse_drag = Some(MOUSE_POINTER);
        }
    }

    // A restart drops every gesture, so a rejected update ends the local drag as well.
    fn move_mouse_drag(&mut self, at: Pos2) {
        if let Some(pointer) = self.mouse_drag
            && !self.chart.drag_update(pointer, at)
        {
            self.mouse_drag = None;
        }
    }

    fn end_mouse_drag(&mut self) {
        if let Some(pointer) = self.mouse_drag.take() {
            self.chart.drag_end(pointer);
        }
    }

    /// Each touch contact drags its own bubble.
    pub(in crate::app) fn handle_touch_drags(&mut self, ui: &Ui, rect: Rect) {
        let touches = ui.input(|input| {
            input
                .events
                .iter()
                .filter_map(|event| match event {
                    Event::Touch { id, phase, pos, .. } => {
                        Some((touch_pointer(id.0), *phase, *pos))
                    }
                    _ => None,
                })
                .collect::<Vec<_>>()
        });

        for (pointer, phase, pos) in touches {
            let at = to_chart(rect, pos);
            match phase {
                TouchPhase::Start => {
                    if rect.contains(pos)
                        && let Some(body) = self.chart.body_at(at)
                    {
                        self.chart.drag_start(pointer, body, at);
                    }
                }
                TouchPhase::Move => {
                    self.chart.drag_update(pointer, at);
                }
                TouchPhase::End | TouchPhase::Cancel => {
                    self.chart.drag_end(pointer);
                }
            }
        }
    }

    pub(in crate::app) fn handle_click(&self, rect: Rect, response: &Response) {
        if !response.clicked_by(PointerButton::Primary) {
            return;
        }

        if let Some(at) = response.interact_pointer_pos()
            && let Some(body) = self.chart.body_at(to_chart(rect, at))
        {
            self.chart.click(body);
        }
    }
}

#[cfg(test)]
mod tests {
    use bubble_chart::data::{Dataset, Datum};
    use eframe::egui::{pos2, vec2};

    use super::*;

    fn view() -> ChartView {
        let dataset = Dataset::new(vec![Datum::new("Apple Inc", 62.0), Datum::new("X", -5.0)])
            .unwrap();
        ChartView::new(dataset, Some(vec2(800.0, 500.0)), Some(3))
    }

    #[test]
    fn mouse_drag_follows_the_pointer() {
        let mut view = view();
        let grab = view.chart.bodies()[1].position();
        view.start_mouse_drag(grab);
        assert_eq!(view.mouse_drag, Some(MOUSE_POINTER));
        assert!(view.chart.is_dragging(BodyId(1)));

        view.move_mouse_drag(pos2(200.0, 150.0));
        view.chart.tick();
        assert_eq!(view.chart.bodies()[1].position(), pos2(200.0, 150.0));

        view.end_mouse_drag();
        assert_eq!(view.mouse_drag, None);
        assert!(!view.chart.is_dragging(BodyId(1)));
    }

    #[test]
    fn restart_mid_drag_clears_the_mouse_drag() {
        let mut view = view();
        let grab = view.chart.bodies()[0].position();
        view.start_mouse_drag(grab);
        assert!(view.mouse_drag.is_some());

        assert!(view.chart.resize(Some(vec2(600.0, 400.0))));
        view.move_mouse_drag(pos2(100.0, 100.0));
        assert_eq!(view.mouse_drag, None);
        assert!(!view.chart.bodies()[0].is_pinned());
    }

    #[test]
    fn press_on_empty_space_starts_nothing() {
        let mut view = view();
        view.start_mouse_drag(pos2(-10.0, -10.0));
        assert_eq!(view.mouse_drag, None);
    }

    #[test]
    fn chart_coordinates_start_at_rect_corner() {
        let rect = Rect::from_min_size(pos2(40.0, 25.0), vec2(800.0, 600.0));
        assert_eq!(to_chart(rect, pos2(40.0, 25.0)), pos2(0.0, 0.0));
        assert_eq!(to_chart(rect, pos2(140.0, 75.0)), pos2(100.0, 50.0));
    }

    #[test]
    fn touch_ids_never_reuse_the_mouse_pointer() {
        assert_ne!(touch_pointer(0), MOUSE_POINTER);
        assert_eq!(touch_pointer(4), PointerId(5));
    }
}
