//! Force-directed layout of non-overlapping circles inside a rectangle.
//!
//! Each tick applies many-body repulsion, centroid centering and collision avoidance, integrates
//! velocities, overrides pinned bodies and finally clamps every body into the viewport.

mod body;
mod forces;
mod quadtree;

use std::collections::{HashMap, VecDeque};

use eframe::egui::{Pos2, Vec2, pos2};
use log::{debug, trace};
use rand::Rng;

use super::config::SimulationConfig;
use super::viewport::Viewport;
pub use body::{Body, BodyId, BodySpec};
use forces::{
    ChargeParams, CollisionParams, accumulate_charge, accumulate_collisions, centering_offset,
};
use quadtree::QuadTree;

#[derive(Default)]
struct Scratch {
    positions: Vec<Vec2>,
    radii: Vec<f32>,
    deltas: Vec<Vec2>,
}

pub struct Simulation {
    bodies: Vec<Body>,
    viewport: Viewport,
    config: SimulationConfig,
    alpha: f32,
    alpha_target: f32,
    running: bool,
    tick_count: u64,
    scratch: Scratch,
}

impl Simulation {
    /// Places `specs` in `viewport` at alpha 1.
    ///
    /// Bodies whose id also exists in `prior` start where that body was; the rest are placed
    /// uniformly at random. Duplicate ids are matched up in order.
    pub fn seeded(
        specs: Vec<BodySpec>,
        viewport: Viewport,
        config: SimulationConfig,
        prior: Option<&Simulation>,
        rng: &mut impl Rng,
    ) -> Self {
        let mut carried: HashMap<&str, VecDeque<Pos2>> = HashMap::new();
        if let Some(prior) = prior {
            for body in &prior.bodies {
                carried
                    .entry(body.id())
                    .or_default()
                    .push_back(body.position);
            }
        }

        let mut reused = 0usize;
        let bodies = specs
            .into_iter()
            .map(|spec| {
                let position = match carried
                    .get_mut(spec.id.as_str())
                    .and_then(VecDeque::pop_front)
                {
                    Some(position) => {
                        reused += 1;
                        position
                    }
                    None => pos2(
                        rng.random_range(0.0..viewport.width()),
                        rng.random_range(0.0..viewport.height()),
                    ),
                };
                Body {
                    spec,
                    position,
                    velocity: Vec2::ZERO,
                    pin: None,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            bodies = bodies.len(),
            reused = reused,
            width = viewport.width(),
            height = viewport.height();
            "Seeded simulation"
        );

        Self {
            bodies,
            viewport,
            config,
            alpha: 1.0,
            alpha_target: 0.0,
            running: true,
            tick_count: 0,
            scratch: Scratch::default(),
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.max(0.0);
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.max(0.0);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Resumes ticking without touching alpha.
    pub fn restart(&mut self) {
        if !self.running {
            debug!(alpha = self.alpha, target = self.alpha_target; "Simulation resumed");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Holds body `id` at `position`, moved inside the viewport if needed.
    ///
    /// Returns `false` for an unknown body.
    pub fn pin(&mut self, id: BodyId, position: Pos2) -> bool {
        let viewport = self.viewport;
        let Some(body) = self.bodies.get_mut(id.0) else {
            debug!(body = id.0; "Ignoring pin of unknown body");
            return false;
        };

        let pinned = viewport.clamp_circle(position, body.radius());
        body.pin = Some(pinned);
        body.position = pinned;
        true
    }

    pub fn unpin(&mut self, id: BodyId) -> bool {
        match self.bodies.get_mut(id.0) {
            Some(body) => {
                body.pin = None;
                true
            }
            None => false,
        }
    }

    /// Advances the layout by one step. Returns whether the simulation is still running.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        self.apply_forces();
        self.integrate();
        self.tick_count += 1;

        if self.alpha < self.config.alpha_min {
            self.running = false;
            debug!(ticks = self.tick_count, alpha = self.alpha; "Simulation settled");
        }
        self.running
    }

    /// Ticks until the simulation stops on its own or `max_ticks` have run.
    pub fn settle(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks && self.tick() {
            ticks += 1;
        }
        ticks
    }

    fn apply_forces(&mut self) {
        let count = self.bodies.len();
        if count == 0 {
            return;
        }

        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch
            .positions
            .extend(self.bodies.iter().map(|body| body.position.to_vec2()));

        if count > 1
            && self.config.charge_strength != 0.0
            && let Some(tree) = QuadTree::build(&scratch.positions)
        {
            let params = ChargeParams {
                strength: self.config.charge_strength * self.alpha,
                theta_sq: self.config.theta * self.config.theta,
            };
            for (index, body) in self.bodies.iter_mut().enumerate() {
                accumulate_charge(&tree, index, &scratch.positions, params, &mut body.velocity);
            }
        }

        let shift = centering_offset(
            &scratch.positions,
            self.viewport.center().to_vec2(),
            self.config.center_strength,
        );
        if shift != Vec2::ZERO {
            for body in &mut self.bodies {
                body.position += shift;
            }
        }

        if count < 2 || self.config.collision_strength <= 0.0 {
            return;
        }

        // Collisions are resolved on where bodies are about to be, not where they are.
        scratch.positions.clear();
        scratch.radii.clear();
        let mut max_radius = 0.0_f32;
        for body in &self.bodies {
            scratch.positions.push(body.position.to_vec2() + body.velocity);
            let radius = body.radius() + self.config.collision_padding;
            scratch.radii.push(radius);
            max_radius = max_radius.max(radius);
        }

        scratch.deltas.clear();
        scratch.deltas.resize(count, Vec2::ZERO);
        if let Some(tree) = QuadTree::build(&scratch.positions) {
            let reach = max_radius * 2.0;
            accumulate_collisions(
                &tree,
                &tree,
                true,
                &scratch.positions,
                &scratch.radii,
                CollisionParams {
                    strength: self.config.collision_strength,
                    reach_sq: reach * reach,
                },
                &mut scratch.deltas,
            );
        }

        for (body, delta) in self.bodies.iter_mut().zip(&scratch.deltas) {
            body.velocity += *delta;
        }
    }

    fn integrate(&mut self) {
        let retained = 1.0 - self.config.velocity_decay;
        let viewport = self.viewport;
        for body in &mut self.bodies {
            body.velocity *= retained;
            if !body.velocity.x.is_finite() || !body.velocity.y.is_finite() {
                trace!(body = body.id(); "Discarding non-finite velocity");
                body.velocity = Vec2::ZERO;
            }

            body.position = match body.pin {
                Some(pin) => pin,
                None => body.position + body.velocity,
            };
            body.position = viewport.clamp_circle(body.position, body.radius());
        }
    }
}
