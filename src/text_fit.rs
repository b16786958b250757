//! Text-fitting size heuristic for components and interfaces. Estimates how
//! many characters a box of a given shape kind can hold and grows the box
//! until the label fits or the shape's maximum size is reached.

use crate::config::TextFitConfig;
use crate::ir::ShapeKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Fraction of the bounding box usable for text, per shape kind. Triangles
/// and diamonds hold fewer characters per unit area than rectangles.
fn packing_factor(kind: ShapeKind) -> f64 {
    match kind {
        ShapeKind::Rectangle | ShapeKind::RectangleRounded => 1.0,
        ShapeKind::InterfaceProvide | ShapeKind::InterfaceRequire => 1.0,
        ShapeKind::Octagon | ShapeKind::Hexagon => 0.8,
        ShapeKind::Parallelogram | ShapeKind::Trapeze => 0.75,
        ShapeKind::Circle | ShapeKind::Ellipse => 0.7,
        ShapeKind::Diamond => 0.5,
        ShapeKind::Triangle => 0.35,
    }
}

fn capacity(width: f64, height: f64, factor: f64, config: &TextFitConfig) -> usize {
    let columns = (width / config.char_width).floor();
    let rows = (height / config.line_height).floor();
    (columns * rows * factor) as usize
}

/// Grows a box from its minimum size, preserving aspect ratio, until the
/// estimated character capacity covers `text` or `min * max_scale` is hit.
/// An oversized label is accepted at maximum size; truncation is a rendering
/// concern and never happens here.
pub fn fit_dimensions(
    min_width: f64,
    min_height: f64,
    max_scale: f64,
    text: &str,
    kind: ShapeKind,
    config: &TextFitConfig,
) -> Dimensions {
    let needed = text.chars().count();
    let factor = packing_factor(kind);
    let max_width = min_width * max_scale;
    let max_height = min_height * max_scale;
    let aspect = if min_width > 0.0 {
        min_height / min_width
    } else {
        1.0
    };

    let mut width = min_width;
    let mut height = min_height;
    while capacity(width, height, factor, config) < needed {
        let next_width = (width + config.growth_step).min(max_width);
        let next_height = (height + config.growth_step * aspect).min(max_height);
        // A non-positive growth step or hitting the maximum on both axes
        // makes no progress; stop rather than spin.
        if next_width <= width && next_height <= height {
            break;
        }
        width = next_width;
        height = next_height;
    }

    Dimensions { width, height }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TextFitConfig {
        TextFitConfig::default()
    }

    #[test]
    fn short_label_keeps_minimum_size() {
        let dims = fit_dimensions(150.0, 150.0, 5.0, "Order Service", ShapeKind::Rectangle, &config());
        assert_eq!(dims.width, 150.0);
        assert_eq!(dims.height, 150.0);
    }

    #[test]
    fn never_exceeds_maximum_size() {
        let huge = "x".repeat(100_000);
        for kind in [
            ShapeKind::Rectangle,
            ShapeKind::Triangle,
            ShapeKind::Diamond,
            ShapeKind::Octagon,
            ShapeKind::Ellipse,
        ] {
            let dims = fit_dimensions(150.0, 150.0, 5.0, &huge, kind, &config());
            assert!(dims.width <= 750.0, "{kind:?}: width {}", dims.width);
            assert!(dims.height <= 750.0, "{kind:?}: height {}", dims.height);
        }
    }

    #[test]
    fn monotone_in_text_length() {
        let mut last = Dimensions {
            width: 0.0,
            height: 0.0,
        };
        for len in 0..2000 {
            let text = "a".repeat(len);
            let dims = fit_dimensions(100.0, 100.0, 8.0, &text, ShapeKind::Triangle, &config());
            assert!(
                dims.width >= last.width && dims.height >= last.height,
                "shrank at len {len}"
            );
            last = dims;
        }
    }

    #[test]
    fn triangles_grow_faster_than_rectangles() {
        let text = "a".repeat(120);
        let rect = fit_dimensions(100.0, 100.0, 10.0, &text, ShapeKind::Rectangle, &config());
        let tri = fit_dimensions(100.0, 100.0, 10.0, &text, ShapeKind::Triangle, &config());
        assert!(tri.width > rect.width);
    }

    #[test]
    fn non_positive_growth_step_terminates_at_minimum_size() {
        for step in [0.0, -5.0] {
            let cfg = TextFitConfig {
                growth_step: step,
                ..TextFitConfig::default()
            };
            let dims = fit_dimensions(150.0, 150.0, 5.0, &"x".repeat(10_000), ShapeKind::Rectangle, &cfg);
            assert_eq!(dims.width, 150.0);
            assert_eq!(dims.height, 150.0);
        }
    }

    #[test]
    fn aspect_ratio_is_preserved_while_growing() {
        let text = "a".repeat(200);
        let dims = fit_dimensions(100.0, 50.0, 10.0, &text, ShapeKind::Rectangle, &config());
        let ratio = dims.height / dims.width;
        assert!((ratio - 0.5).abs() < 1e-9, "ratio {ratio}");
    }
}
