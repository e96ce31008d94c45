//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::ChartPlotter;
pub use renderer::{ChartRenderer, RenderError};

/// Histogram fill (RGB)
pub const HISTOGRAM_RGB: (u8, u8, u8) = (31, 119, 180);

/// Per-brand bar colors (RGB), cycled by group index
pub const PALETTE_RGB: [(u8, u8, u8); 10] = [
    (99, 110, 250),  // Indigo
    (239, 85, 59),   // Red
    (0, 204, 150),   // Green
    (171, 99, 250),  // Purple
    (255, 161, 90),  // Orange
    (25, 211, 243),  // Cyan
    (255, 102, 146), // Pink
    (182, 232, 128), // Lime
    (255, 151, 255), // Magenta
    (254, 203, 82),  // Yellow
];

pub fn group_rgb(index: usize) -> (u8, u8, u8) {
    PALETTE_RGB[index % PALETTE_RGB.len()]
}

/// Axis label for a categorical x position, blank between categories.
pub fn category_tick(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_rgb_cycles() {
        assert_eq!(group_rgb(0), group_rgb(PALETTE_RGB.len()));
        assert_ne!(group_rgb(0), group_rgb(1));
    }

    #[test]
    fn test_category_tick() {
        let labels = vec!["BMW".to_string(), "Ford".to_string()];
        assert_eq!(category_tick(&labels, 0.0), "BMW");
        assert_eq!(category_tick(&labels, 1.0), "Ford");
        assert_eq!(category_tick(&labels, 0.5), "");
        assert_eq!(category_tick(&labels, -1.0), "");
        assert_eq!(category_tick(&labels, 2.0), "");
    }
}
