use eframe::egui::{Pos2, Vec2, pos2};
use log::debug;

/// Extra vertical room so the chart can be scrolled slightly past the visible area.
pub const OVERSCROLL_FACTOR: f32 = 1.2;
/// Size used when no window size can be observed.
pub const FALLBACK_VIEWPORT: Viewport = Viewport {
    width: 800.0,
    height: 600.0,
};
const MIN_EXTENT: f32 = 1.0;

/// The rectangle bodies are laid out in, with its origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        FALLBACK_VIEWPORT
    }
}

impl Viewport {
    /// Degenerate extents are raised to 1; non-finite ones fall back entirely.
    pub fn new(width: f32, height: f32) -> Self {
        if !width.is_finite() || !height.is_finite() {
            return FALLBACK_VIEWPORT;
        }

        Self {
            width: width.max(MIN_EXTENT),
            height: height.max(MIN_EXTENT),
        }
    }

    /// Derives the layout area from the space a host can give the chart.
    pub fn from_available(available: Option<Vec2>) -> Self {
        match available {
            Some(size) if size.x.is_finite() && size.y.is_finite() => {
                Self::new(size.x, size.y * OVERSCROLL_FACTOR)
            }
            _ => FALLBACK_VIEWPORT,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Pos2 {
        pos2(self.width * 0.5, self.height * 0.5)
    }

    /// Moves `position` so a circle of `radius` lies fully inside the viewport.
    pub fn clamp_circle(&self, position: Pos2, radius: f32) -> Pos2 {
        pos2(
            clamp_axis(position.x, radius, self.width),
            clamp_axis(position.y, radius, self.height),
        )
    }
}

fn clamp_axis(value: f32, radius: f32, extent: f32) -> f32 {
    let low = radius;
    let high = extent - radius;
    if high < low {
        // Too narrow to hold the circle: centering keeps it as far inside as possible.
        extent * 0.5
    } else if value.is_nan() {
        (low + high) * 0.5
    } else {
        value.clamp(low, high)
    }
}

/// Tracks the observed drawing area and reports when it changes.
#[derive(Debug, Default)]
pub struct ViewportManager {
    current: Viewport,
}

impl ViewportManager {
    pub fn new(initial: Option<Vec2>) -> Self {
        Self {
            current: Viewport::from_available(initial),
        }
    }

    pub fn current(&self) -> Viewport {
        self.current
    }

    /// Records the latest available size. Returns `true` when the layout area changed.
    pub fn observe(&mut self, available: Option<Vec2>) -> bool {
        let next = Viewport::from_available(available);
        if next == self.current {
            return false;
        }

        debug!(
            width = next.width,
            height = next.height,
            previous_width = self.current.width,
            previous_height = self.current.height;
            "Viewport resized"
        );
        self.current = next;
        true
    }
}
