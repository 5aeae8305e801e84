use std::collections::HashMap;

use eframe::egui::{Pos2, Vec2};
use log::debug;

use super::simulation::{BodyId, Simulation};

/// Identifies one pointer (mouse or touch contact) taking part in a drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
}

#[derive(Clone, Copy, Debug)]
struct Gesture {
    body: BodyId,
    /// Body center minus pointer position at grab time.
    grab_offset: Vec2,
}

/// Turns pointer gestures into pins on simulation bodies.
///
/// Every pointer drags at most one body and every body is held by at most one pointer. The first
/// active gesture reheats the simulation; the last one to end lets it cool down again.
#[derive(Debug, Default)]
pub struct DragController {
    gestures: HashMap<PointerId, Gesture>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        if self.gestures.is_empty() {
            DragPhase::Idle
        } else {
            DragPhase::Dragging
        }
    }

    pub fn phase_of(&self, body: BodyId) -> DragPhase {
        if self.is_dragging(body) {
            DragPhase::Dragging
        } else {
            DragPhase::Idle
        }
    }

    pub fn is_dragging(&self, body: BodyId) -> bool {
        self.gestures.values().any(|gesture| gesture.body == body)
    }

    pub fn active_count(&self) -> usize {
        self.gestures.len()
    }

    /// Grabs `body` with `pointer` at `at`. Returns `false` when the body does not exist or
    /// is already held by another pointer.
    pub fn start(
        &mut self,
        simulation: &mut Simulation,
        pointer: PointerId,
        body: BodyId,
        at: Pos2,
    ) -> bool {
        if self.gestures.contains_key(&pointer) {
            self.end(simulation, pointer);
        }

        if self.is_dragging(body) {
            debug!(body = body.0, pointer = pointer.0; "Body already held by another pointer");
            return false;
        }

        let Some(position) = simulation.body(body).map(|state| state.position()) else {
            return false;
        };

        if self.gestures.is_empty() {
            simulation.set_alpha_target(simulation.config().drag_alpha_target);
            simulation.restart();
        }

        simulation.pin(body, position);
        self.gestures.insert(
            pointer,
            Gesture {
                body,
                grab_offset: position - at,
            },
        );
        debug!(body = body.0, pointer = pointer.0, active = self.gestures.len(); "Drag started");
        true
    }

    /// Moves the body held by `pointer` so it keeps its grab offset from `at`.
    pub fn update(&mut self, simulation: &mut Simulation, pointer: PointerId, at: Pos2) -> bool {
        match self.gestures.get(&pointer) {
            Some(gesture) => simulation.pin(gesture.body, at + gesture.grab_offset),
            None => false,
        }
    }

    /// Releases the body held by `pointer`. Returns the released body, if any.
    pub fn end(&mut self, simulation: &mut Simulation, pointer: PointerId) -> Option<BodyId> {
        let gesture = self.gestures.remove(&pointer)?;
        simulation.unpin(gesture.body);
        if self.gestures.is_empty() {
            simulation.set_alpha_target(0.0);
        }
        debug!(
            body = gesture.body.0,
            pointer = pointer.0,
            active = self.gestures.len();
            "Drag ended"
        );
        Some(gesture.body)
    }

    /// Forgets every gesture without touching any simulation, for when the bodies they refer to
    /// have been replaced.
    pub fn release_all(&mut self) {
        if !self.gestures.is_empty() {
            debug!(active = self.gestures.len(); "Dropping drag gestures");
        }
        self.gestures.clear();
    }

    /// Ends every gesture against `simulation`, unpinning the held bodies.
    pub fn end_all(&mut self, simulation: &mut Simulation) {
        let pointers = self.gestures.keys().copied().collect::<Vec<_>>();
        for pointer in pointers {
            self.end(simulation, pointer);
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;
    use float_cmp::assert_approx_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::chart::SimulationConfig;
    use crate::chart::simulation::BodySpec;
    use crate::chart::viewport::Viewport;
    use crate::data::ColorClass;

    fn settled_simulation(count: usize) -> Simulation {
        let specs = (0..count)
            .map(|index| BodySpec {
                id: format!("b{index}"),
                class: ColorClass::Negative,
                radius: 15.0,
            })
            .collect();
        let mut simulation = Simulation::seeded(
            specs,
            Viewport::new(800.0, 600.0),
            SimulationConfig::default(),
            None,
            &mut StdRng::seed_from_u64(21),
        );
        simulation.settle(1_000);
        simulation
    }

    #[test]
    fn start_reheats_and_pins_in_place() {
        let mut simulation = settled_simulation(3);
        assert!(!simulation.is_running());
        let before = simulation.body(BodyId(1)).unwrap().position();

        let mut drag = DragController::new();
        let grab = before + Vec2::new(4.0, -2.0);
        assert!(drag.start(&mut simulation, PointerId(0), BodyId(1), grab));

        assert!(simulation.is_running());
        assert_approx_eq!(f32, simulation.alpha_target(), 0.3);
        assert_eq!(simulation.body(BodyId(1)).unwrap().pin(), Some(before));
        assert_eq!(drag.phase(), DragPhase::Dragging);
        assert_eq!(drag.phase_of(BodyId(1)), DragPhase::Dragging);
        assert_eq!(drag.phase_of(BodyId(0)), DragPhase::Idle);
    }

    #[test]
    fn update_keeps_grab_offset() {
        let mut simulation = settled_simulation(2);
        let before = simulation.body(BodyId(0)).unwrap().position();
        let mut drag = DragController::new();
        drag.start(&mut simulation, PointerId(0), BodyId(0), before + Vec2::new(5.0, 5.0));

        let pointer = pos2(300.0, 250.0);
        assert!(drag.update(&mut simulation, PointerId(0), pointer));
        simulation.tick();

        assert_eq!(
            simulation.body(BodyId(0)).unwrap().position(),
            pos2(295.0, 245.0)
        );
    }

    #[test]
    fn end_unpins_and_cools_down() {
        let mut simulation = settled_simulation(2);
        let at = simulation.body(BodyId(0)).unwrap().position();
        let mut drag = DragController::new();
        drag.start(&mut simulation, PointerId(0), BodyId(0), at);

        assert_eq!(drag.end(&mut simulation, PointerId(0)), Some(BodyId(0)));
        assert!(!simulation.body(BodyId(0)).unwrap().is_pinned());
        assert_approx_eq!(f32, simulation.alpha_target(), 0.0);
        assert_eq!(drag.phase(), DragPhase::Idle);
        assert_eq!(drag.end(&mut simulation, PointerId(0)), None);
    }

    #[test]
    fn simultaneous_drags_are_independent() {
        let mut simulation = settled_simulation(4);
        let mut drag = DragController::new();
        let first = simulation.body(BodyId(0)).unwrap().position();
        let second = simulation.body(BodyId(3)).unwrap().position();
        drag.start(&mut simulation, PointerId(1), BodyId(0), first);
        drag.start(&mut simulation, PointerId(2), BodyId(3), second);
        assert_eq!(drag.active_count(), 2);

        drag.update(&mut simulation, PointerId(1), pos2(100.0, 100.0));
        drag.update(&mut simulation, PointerId(2), pos2(600.0, 400.0));
        simulation.tick();
        assert_eq!(simulation.body(BodyId(0)).unwrap().position(), pos2(100.0, 100.0));
        assert_eq!(simulation.body(BodyId(3)).unwrap().position(), pos2(600.0, 400.0));

        drag.end(&mut simulation, PointerId(1));
        assert!(!simulation.body(BodyId(0)).unwrap().is_pinned());
        assert!(simulation.body(BodyId(3)).unwrap().is_pinned());
        // The remaining gesture keeps the simulation warm.
        assert_approx_eq!(f32, simulation.alpha_target(), 0.3);

        drag.end(&mut simulation, PointerId(2));
        assert_approx_eq!(f32, simulation.alpha_target(), 0.0);
    }

    #[test]
    fn held_body_cannot_be_grabbed_twice() {
        let mut simulation = settled_simulation(2);
        let at = simulation.body(BodyId(0)).unwrap().position();
        let mut drag = DragController::new();
        assert!(drag.start(&mut simulation, PointerId(1), BodyId(0), at));
        assert!(!drag.start(&mut simulation, PointerId(2), BodyId(0), at));
        assert_eq!(drag.active_count(), 1);
    }

    #[test]
    fn unknown_body_is_not_grabbed() {
        let mut simulation = settled_simulation(1);
        let mut drag = DragController::new();
        assert!(!drag.start(&mut simulation, PointerId(0), BodyId(9), pos2(1.0, 1.0)));
        assert_eq!(drag.phase(), DragPhase::Idle);
        assert!(!simulation.is_running());
    }

    #[test]
    fn end_all_releases_every_pin() {
        let mut simulation = settled_simulation(3);
        let mut drag = DragController::new();
        for index in 0..3 {
            let at = simulation.body(BodyId(index)).unwrap().position();
            drag.start(&mut simulation, PointerId(index as u64), BodyId(index), at);
        }

        drag.end_all(&mut simulation);
        assert!(simulation.bodies().iter().all(|body| !body.is_pinned()));
        assert_eq!(drag.phase(), DragPhase::Idle);
    }
}
