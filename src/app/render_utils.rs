use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};

use bubble_chart::data::ColorClass;

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(0xDB, 0xFE, 0xFF);
pub(super) const LABEL_COLOR: Color32 = Color32::from_rgb(0x33, 0x33, 0x33);

const POSITIVE: Color32 = Color32::from_rgb(0x5E, 0xB1, 0xBF);
const NEGATIVE: Color32 = Color32::from_rgb(0xFF, 0x6B, 0x6B);

pub(super) const FILL_OPACITY: f32 = 0.7;
pub(super) const STROKE_DARKEN: f32 = 0.3;
pub(super) const STROKE_WIDTH: f32 = 2.0;
pub(super) const HOVER_STROKE_WIDTH: f32 = 4.0;
pub(super) const RING_STROKE_WIDTH: f32 = 2.0;

const SHADOW_OFFSET: Vec2 = vec2(5.0, 5.0);
const SHADOW_BLUR: f32 = 10.0;
const SHADOW_LAYERS: usize = 6;
const SHADOW_ALPHA: f32 = 0.12;

pub(super) fn class_color(class: ColorClass) -> Color32 {
    match class {
        ColorClass::Positive => POSITIVE,
        ColorClass::Negative => NEGATIVE,
    }
}

/// Scales every channel by `0.7^k`, leaving alpha alone.
pub(super) fn darker(color: Color32, k: f32) -> Color32 {
    let factor = 0.7_f32.powf(k);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor).round() as u8,
        (color.g() as f32 * factor).round() as u8,
        (color.b() as f32 * factor).round() as u8,
        color.a(),
    )
}

pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, BACKGROUND);
}

/// Offset, blurred copy of the bubble drawn as stacked translucent discs.
pub(super) fn draw_shadow(painter: &Painter, center: Pos2, radius: f32, color: Color32) {
    let center = center + SHADOW_OFFSET;
    for layer in 0..SHADOW_LAYERS {
        let spread = 1.0 - layer as f32 / SHADOW_LAYERS as f32;
        painter.circle_filled(
            center,
            radius + SHADOW_BLUR * spread,
            with_opacity(color, SHADOW_ALPHA * (1.0 - spread * 0.8)),
        );
    }
}

pub(super) fn bubble_stroke(color: Color32, hovered: bool) -> Stroke {
    let width = if hovered {
        HOVER_STROKE_WIDTH
    } else {
        STROKE_WIDTH
    };
    Stroke::new(width, darker(color, STROKE_DARKEN))
}

/// Font sizes and vertical offsets of a bubble's decorations, relative to its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct LabelLayout {
    pub(super) name_size: f32,
    pub(super) name_offset: f32,
    pub(super) change_size: f32,
    pub(super) change_offset: f32,
    pub(super) ring_radius: f32,
    pub(super) ring_offset: f32,
}

impl LabelLayout {
    pub(super) fn for_radius(radius: f32) -> Self {
        Self {
            name_size: radius * 0.4,
            name_offset: radius * 0.2,
            change_size: radius * 0.3,
            change_offset: radius * 0.2 + radius * 0.4 + (radius * 0.02).max(6.0),
            ring_radius: radius * 0.3,
            ring_offset: -radius * 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn darker_scales_channels_only() {
        let stroke = darker(POSITIVE, STROKE_DARKEN);
        // 0.7^0.3 ≈ 0.8985
        assert_eq!(stroke, Color32::from_rgb(84, 159, 172));
        assert_eq!(darker(NEGATIVE, 0.0), NEGATIVE);
    }

    #[test]
    fn opacity_sets_alpha() {
        let fill = with_opacity(NEGATIVE, FILL_OPACITY);
        assert!((178..=179).contains(&fill.a()));
    }

    #[test]
    fn label_layout_follows_radius() {
        let layout = LabelLayout::for_radius(100.0);
        assert_approx_eq!(f32, layout.name_size, 40.0);
        assert_approx_eq!(f32, layout.name_offset, 20.0);
        assert_approx_eq!(f32, layout.change_size, 30.0);
        assert_approx_eq!(f32, layout.change_offset, 66.0);
        assert_approx_eq!(f32, layout.ring_offset, -50.0);

        // Small bubbles keep a minimum gap between the two labels.
        let small = LabelLayout::for_radius(10.0);
        assert_approx_eq!(f32, small.change_offset, 12.0);
    }

    #[test]
    fn hover_thickens_stroke() {
        assert_approx_eq!(f32, bubble_stroke(POSITIVE, false).width, 2.0);
        assert_approx_eq!(f32, bubble_stroke(POSITIVE, true).width, 4.0);
    }
}
