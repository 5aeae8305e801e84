use std::fmt;

use eframe::egui::{Pos2, Vec2};

use crate::data::{ColorClass, Dataset};

/// Index of a body within its simulation generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub usize);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the engine needs to know about a body before it is placed.
#[derive(Clone, Debug, PartialEq)]
pub struct BodySpec {
    pub id: String,
    pub class: ColorClass,
    pub radius: f32,
}

impl BodySpec {
    pub fn from_dataset(dataset: &Dataset, min_radius: f32) -> Vec<Self> {
        dataset
            .iter()
            .map(|datum| Self {
                id: datum.name.clone(),
                class: datum.color_class(),
                radius: datum.radius(min_radius),
            })
            .collect()
    }
}

/// Engine-owned state of one bubble. Read access only outside the simulation.
#[derive(Clone, Debug)]
pub struct Body {
    pub(super) spec: BodySpec,
    pub(super) position: Pos2,
    pub(super) velocity: Vec2,
    pub(super) pin: Option<Pos2>,
}

impl Body {
    pub fn id(&self) -> &str {
        &self.spec.id
    }

    pub fn class(&self) -> ColorClass {
        self.spec.class
    }

    pub fn radius(&self) -> f32 {
        self.spec.radius
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn pin(&self) -> Option<Pos2> {
        self.pin
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }

    pub fn contains(&self, point: Pos2) -> bool {
        self.position.distance_sq(point) <= self.spec.radius * self.spec.radius
    }
}
