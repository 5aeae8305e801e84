//! The bubble chart core: a dataset laid out by a force simulation inside a viewport, plus the
//! interaction state a presentation layer drives.

mod config;
mod drag;
mod events;
mod simulation;
mod viewport;

use std::fmt;
use std::rc::Rc;

use eframe::egui::{Pos2, Vec2};
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::data::{Dataset, Datum};
pub use config::SimulationConfig;
pub use drag::{DragController, DragPhase, PointerId};
pub use events::{Subscription, TickEvent};
use events::TickListeners;
pub use simulation::{Body, BodyId, BodySpec, Simulation};
pub use viewport::{FALLBACK_VIEWPORT, OVERSCROLL_FACTOR, Viewport, ViewportManager};

/// Callback run with the record behind a clicked bubble.
///
/// Identity matters: installing a different handler restarts the layout, re-installing a clone
/// of the current one does not.
#[derive(Clone)]
pub struct ClickHandler(Rc<dyn Fn(&Datum)>);

impl ClickHandler {
    pub fn new(handler: impl Fn(&Datum) + 'static) -> Self {
        Self(Rc::new(handler))
    }

    pub fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ClickHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClickHandler")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

pub struct BubbleChart {
    config: SimulationConfig,
    dataset: Dataset,
    viewport: ViewportManager,
    simulation: Simulation,
    drag: DragController,
    click_handler: Option<ClickHandler>,
    listeners: TickListeners,
    rng: StdRng,
    generation: u64,
    disposed: bool,
}

impl BubbleChart {
    /// Lays out `dataset` in the area derived from `available`. A `seed` makes the initial
    /// placement reproducible.
    pub fn new(
        dataset: Dataset,
        available: Option<Vec2>,
        config: SimulationConfig,
        seed: Option<u64>,
    ) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let viewport = ViewportManager::new(available);
        let simulation = Simulation::seeded(
            BodySpec::from_dataset(&dataset, config.min_radius),
            viewport.current(),
            config,
            None,
            &mut rng,
        );

        info!(
            bodies = dataset.len(),
            width = viewport.current().width(),
            height = viewport.current().height();
            "Bubble chart created"
        );

        Self {
            config,
            dataset,
            viewport,
            simulation,
            drag: DragController::new(),
            click_handler: None,
            listeners: TickListeners::default(),
            rng,
            generation: 1,
            disposed: false,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn bodies(&self) -> &[Body] {
        self.simulation.bodies()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.current()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    pub fn is_dragging(&self, body: BodyId) -> bool {
        self.drag.is_dragging(body)
    }

    pub fn is_running(&self) -> bool {
        !self.disposed && self.simulation.is_running()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn datum(&self, body: BodyId) -> Option<&Datum> {
        self.dataset.get(body.0)
    }

    /// Replaces the dataset and restarts the layout.
    pub fn set_data(&mut self, dataset: Dataset) {
        if self.disposed {
            return;
        }
        self.dataset = dataset;
        self.restart("dataset");
    }

    /// Installs the click handler, restarting the layout when its identity changes.
    pub fn set_click_handler(&mut self, handler: Option<ClickHandler>) {
        let unchanged = match (&self.click_handler, &handler) {
            (Some(current), Some(next)) => current.same_as(next),
            (None, None) => true,
            _ => false,
        };
        self.click_handler = handler;
        if !unchanged {
            self.restart("click handler");
        }
    }

    /// Feeds the latest available size. Returns `true` when it changed the layout area, in
    /// which case the layout restarted.
    pub fn resize(&mut self, available: Option<Vec2>) -> bool {
        if !self.viewport.observe(available) {
            return false;
        }
        self.restart("viewport");
        true
    }

    /// Raises alpha back to 1 without rebuilding bodies.
    pub fn reheat(&mut self) {
        if self.disposed {
            return;
        }
        self.simulation.set_alpha(1.0);
        self.simulation.restart();
    }

    fn restart(&mut self, reason: &str) {
        if self.disposed {
            return;
        }

        // Pins belong to bodies that are about to be replaced.
        self.drag.release_all();
        self.simulation = Simulation::seeded(
            BodySpec::from_dataset(&self.dataset, self.config.min_radius),
            self.viewport.current(),
            self.config,
            Some(&self.simulation),
            &mut self.rng,
        );
        self.generation += 1;
        info!(
            reason = reason,
            generation = self.generation,
            bodies = self.dataset.len();
            "Layout restarted"
        );
    }

    /// Runs one simulation step and notifies tick listeners. Returns whether further ticks are
    /// needed.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }

        let running = self.simulation.tick();
        let event = TickEvent {
            generation: self.generation,
            tick: self.simulation.tick_count(),
            alpha: self.simulation.alpha(),
            running,
            bodies: self.simulation.bodies(),
        };
        self.listeners.emit(&event);
        running
    }

    /// Registers `listener` to run after every tick, after previously registered ones.
    pub fn on_tick(&mut self, listener: impl FnMut(&TickEvent<'_>) + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn drag_start(&mut self, pointer: PointerId, body: BodyId, at: Pos2) -> bool {
        !self.disposed && self.drag.start(&mut self.simulation, pointer, body, at)
    }

    pub fn drag_update(&mut self, pointer: PointerId, at: Pos2) -> bool {
        !self.disposed && self.drag.update(&mut self.simulation, pointer, at)
    }

    pub fn drag_end(&mut self, pointer: PointerId) -> Option<BodyId> {
        if self.disposed {
            return None;
        }
        self.drag.end(&mut self.simulation, pointer)
    }

    /// Hands the record behind `body` to the click handler. Returns `false` when there is no
    /// such body or no handler.
    pub fn click(&self, body: BodyId) -> bool {
        if self.disposed {
            return false;
        }
        let (Some(handler), Some(datum)) = (self.click_handler.as_ref(), self.dataset.get(body.0))
        else {
            return false;
        };

        debug!(body = body.0, name = datum.name.as_str(); "Bubble clicked");
        // Nothing is borrowed mutably here, so a panicking handler leaves the layout intact.
        (handler.0)(datum);
        true
    }

    /// Topmost body under `point`; later bodies are drawn over earlier ones.
    pub fn body_at(&self, point: Pos2) -> Option<BodyId> {
        self.simulation
            .bodies()
            .iter()
            .rposition(|body| body.contains(point))
            .map(BodyId)
    }

    /// Stops ticking, releases every pin and unregisters every tick listener. Safe to call more
    /// than once; also runs on drop.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        self.drag.end_all(&mut self.simulation);
        self.simulation.stop();
        self.listeners.clear();
        self.click_handler = None;
        self.disposed = true;
        info!(generation = self.generation; "Bubble chart disposed");
    }
}

impl Drop for BubbleChart {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use eframe::egui::{pos2, vec2};

    use super::*;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Datum::new("Apple Inc", 62.0),
            Datum::new("X", -5.0),
            Datum::new("Tech", 12.0),
        ])
        .unwrap()
    }

    fn chart() -> BubbleChart {
        BubbleChart::new(
            dataset(),
            Some(vec2(800.0, 500.0)),
            SimulationConfig::default(),
            Some(7),
        )
    }

    fn run_to_rest(chart: &mut BubbleChart) {
        for _ in 0..1_000 {
            if !chart.tick() {
                break;
            }
        }
    }

    #[test]
    fn viewport_includes_overscroll() {
        let chart = chart();
        assert_eq!(chart.viewport(), Viewport::new(800.0, 600.0));
    }

    #[test]
    fn set_data_restarts_with_fresh_generation() {
        let mut chart = chart();
        run_to_rest(&mut chart);
        assert!(!chart.is_running());

        chart.set_data(dataset());
        assert_eq!(chart.generation(), 2);
        assert!(chart.is_running());
        assert!((chart.simulation().alpha() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn identical_dataset_keeps_settled_positions() {
        let mut chart = chart();
        run_to_rest(&mut chart);
        let before = chart.bodies().iter().map(Body::position).collect::<Vec<_>>();

        chart.set_data(dataset());
        let carried = chart.bodies().iter().map(Body::position).collect::<Vec<_>>();
        assert_eq!(before, carried);

        run_to_rest(&mut chart);
        for (old, new) in before.iter().zip(chart.bodies()) {
            assert!(old.distance(new.position()) < 15.0);
        }
    }

    #[test]
    fn resize_restarts_only_on_change() {
        let mut chart = chart();
        assert!(!chart.resize(Some(vec2(800.0, 500.0))));
        assert_eq!(chart.generation(), 1);

        assert!(chart.resize(Some(vec2(400.0, 300.0))));
        assert_eq!(chart.generation(), 2);
        assert_eq!(chart.viewport(), Viewport::new(400.0, 360.0));

        run_to_rest(&mut chart);
        for body in chart.bodies() {
            assert!(body.position().x <= 400.0 - body.radius());
        }
    }

    #[test]
    fn click_handler_identity_controls_restart() {
        let mut chart = chart();
        let handler = ClickHandler::new(|_| {});

        chart.set_click_handler(Some(handler.clone()));
        assert_eq!(chart.generation(), 2);
        chart.set_click_handler(Some(handler));
        assert_eq!(chart.generation(), 2);
        chart.set_click_handler(Some(ClickHandler::new(|_| {})));
        assert_eq!(chart.generation(), 3);
    }

    #[test]
    fn click_passes_the_record() {
        let mut chart = chart();
        let clicked = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&clicked);
        chart.set_click_handler(Some(ClickHandler::new(move |datum| {
            *sink.borrow_mut() = Some(datum.clone());
        })));

        assert!(chart.click(BodyId(1)));
        assert_eq!(clicked.borrow().as_ref().map(|datum| datum.name.as_str()), Some("X"));
        assert!(!chart.click(BodyId(10)));
    }

    #[test]
    fn restart_drops_active_drags() {
        let mut chart = chart();
        let at = chart.bodies()[0].position();
        assert!(chart.drag_start(PointerId(0), BodyId(0), at));
        assert_eq!(chart.drag_phase(), DragPhase::Dragging);
        assert!(chart.is_dragging(BodyId(0)));

        chart.set_data(dataset());
        assert_eq!(chart.drag_phase(), DragPhase::Idle);
        assert!(!chart.is_dragging(BodyId(0)));
        assert!(chart.bodies().iter().all(|body| !body.is_pinned()));
        assert!(!chart.drag_update(PointerId(0), pos2(10.0, 10.0)));
    }

    #[test]
    fn drag_update_lands_before_next_tick() {
        let mut chart = chart();
        let at = chart.bodies()[2].position();
        chart.drag_start(PointerId(0), BodyId(2), at);
        chart.drag_update(PointerId(0), pos2(200.0, 200.0));
        chart.tick();
        assert_eq!(chart.bodies()[2].position(), pos2(200.0, 200.0));
    }

    #[test]
    fn tick_listeners_see_each_tick() {
        let mut chart = chart();
        let seen = Rc::new(Cell::new(0u64));
        let sink = Rc::clone(&seen);
        let subscription = chart.on_tick(move |event| {
            assert_eq!(event.bodies.len(), 3);
            sink.set(event.tick);
        });

        chart.tick();
        chart.tick();
        assert_eq!(seen.get(), 2);
        assert_eq!(chart.listener_count(), 1);

        drop(subscription);
        chart.tick();
        assert_eq!(seen.get(), 2);
        assert_eq!(chart.listener_count(), 0);
    }

    #[test]
    fn dispose_stops_everything() {
        let mut chart = chart();
        let subscription = chart.on_tick(|_| {});
        let at = chart.bodies()[0].position();
        chart.drag_start(PointerId(0), BodyId(0), at);

        chart.dispose();
        assert!(chart.is_disposed());
        assert!(!chart.tick());
        assert!(!subscription.is_active());
        assert!(chart.bodies().iter().all(|body| !body.is_pinned()));
        assert!(!chart.drag_start(PointerId(0), BodyId(0), at));

        chart.dispose();
    }

    #[test]
    fn set_data_after_dispose_is_ignored() {
        let mut chart = chart();
        chart.dispose();

        chart.set_data(Dataset::new(vec![Datum::new("Other", 1.0)]).unwrap());
        assert_eq!(chart.dataset(), &dataset());
        assert_eq!(chart.generation(), 1);
        assert_eq!(chart.datum(BodyId(0)).map(|datum| datum.name.as_str()), Some("Apple Inc"));
    }

    #[test]
    fn drop_releases_subscriptions() {
        let chart_subscription = {
            let mut chart = chart();
            chart.on_tick(|_| {})
        };
        assert!(!chart_subscription.is_active());
    }

    #[test]
    fn body_at_prefers_topmost() {
        let mut chart = chart();
        let at = chart.bodies()[1].position();
        assert!(chart.body_at(at).is_some());
        chart.drag_start(PointerId(0), BodyId(0), chart.bodies()[0].position());
        chart.drag_update(PointerId(0), pos2(300.0, 300.0));
        chart.drag_start(PointerId(1), BodyId(1), chart.bodies()[1].position());
        chart.drag_update(PointerId(1), pos2(300.0, 300.0));
        chart.tick();
        assert_eq!(chart.body_at(pos2(300.0, 300.0)), Some(BodyId(1)));
        assert_eq!(chart.body_at(pos2(-50.0, -50.0)), None);
    }
}
