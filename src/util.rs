/// Smallest radius a bubble can have, regardless of magnitude.
pub const MIN_RADIUS: f32 = 8.0;

const LINEAR_GROWTH_LIMIT: f32 = 50.0;
const LINEAR_GROWTH_RATE: f32 = 1.5;

/// Maps a magnitude to a bubble radius.
///
/// Growth is 1.5 units per unit of magnitude up to 50 and 1 unit per unit past it, which keeps
/// outliers from dwarfing everything else. The sign of `magnitude` is ignored.
pub fn radius_for(magnitude: f32, min_radius: f32) -> f32 {
    let magnitude = magnitude.abs();
    if magnitude <= LINEAR_GROWTH_LIMIT {
        min_radius + magnitude * LINEAR_GROWTH_RATE
    } else {
        min_radius + LINEAR_GROWTH_LIMIT * LINEAR_GROWTH_RATE + (magnitude - LINEAR_GROWTH_LIMIT)
    }
}

/// Uppercase initials of every space-separated word in `name`.
pub fn abbreviate(name: &str) -> String {
    name.split(' ')
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Text drawn inside a bubble: initials for multi-word names, the name itself otherwise.
pub fn display_label(name: &str) -> String {
    if name.split_whitespace().nth(1).is_some() {
        abbreviate(name)
    } else {
        name.to_owned()
    }
}

/// Secondary bubble label: the change with a percent sign, `62` as `62%`.
pub fn format_change(magnitude: f64) -> String {
    format!("{magnitude}%")
}
