use crate::util::MIN_RADIUS;

/// Physical constants of the layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Many-body charge; negative values repel.
    pub charge_strength: f32,
    /// How far each tick moves the centroid toward the viewport center (0..=1).
    pub center_strength: f32,
    /// Extra gap added to every body's collision radius.
    pub collision_padding: f32,
    /// Fraction of an overlap corrected per tick.
    pub collision_strength: f32,
    pub alpha_decay: f32,
    /// Below this alpha the simulation stops ticking.
    pub alpha_min: f32,
    /// Alpha target held while at least one body is being dragged.
    pub drag_alpha_target: f32,
    /// Fraction of velocity lost per tick.
    pub velocity_decay: f32,
    /// Barnes-Hut opening angle.
    pub theta: f32,
    pub min_radius: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            charge_strength: -10.0,
            center_strength: 1.0,
            collision_padding: 5.0,
            collision_strength: 0.7,
            alpha_decay: 0.1,
            alpha_min: 0.001,
            drag_alpha_target: 0.3,
            velocity_decay: 0.4,
            theta: 0.9,
            min_radius: MIN_RADIUS,
        }
    }
}

impl SimulationConfig {
    /// Ticks needed for alpha to fall from 1 to `alpha_min` with a zero target.
    pub fn ticks_to_settle(&self) -> usize {
        let decay = self.alpha_decay.clamp(f32::EPSILON, 1.0);
        let remaining = (1.0 - decay).max(f32::EPSILON);
        let ticks = self.alpha_min.max(f32::MIN_POSITIVE).ln() / remaining.ln();
        if ticks.is_finite() {
            ticks.ceil().max(1.0) as usize
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settles_in_about_66_ticks() {
        assert_eq!(SimulationConfig::default().ticks_to_settle(), 66);
    }

    #[test]
    fn instant_decay_settles_in_one_tick() {
        let config = SimulationConfig {
            alpha_decay: 1.0,
            ..SimulationConfig::default()
        };
        assert_eq!(config.ticks_to_settle(), 1);
    }
}
