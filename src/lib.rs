//! Force-directed bubble chart: signed changes drawn as colored circles sized by magnitude and
//! kept apart by a small physics simulation.

pub mod chart;
pub mod data;
pub mod util;
