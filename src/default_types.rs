//! Built-in component type descriptors available without registration.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::ir::{ComponentType, ShapeKind, ShapeStyle};
use crate::theme::{BLACK, WHITE};

static DEFAULT_TYPES: Lazy<HashMap<&'static str, ComponentType>> = Lazy::new(|| {
    let style = |radius: f64| ShapeStyle {
        min_width: 150.0,
        min_height: 150.0,
        max_scale: 5.0,
        color: WHITE.to_string(),
        stroke: BLACK.to_string(),
        stroke_width: 2.0,
        stroke_dasharray: String::new(),
        radius,
    };

    HashMap::from([
        (
            "Component",
            ComponentType {
                name: "Component".to_string(),
                shape: ShapeKind::Rectangle,
                style: style(0.0),
            },
        ),
        (
            "Library",
            ComponentType {
                name: "Library".to_string(),
                shape: ShapeKind::RectangleRounded,
                style: style(5.0),
            },
        ),
    ])
});

pub fn is_default_type(name: &str) -> bool {
    DEFAULT_TYPES.contains_key(name)
}

pub fn default_type(name: &str) -> Option<ComponentType> {
    DEFAULT_TYPES.get(name).cloned()
}

pub fn default_type_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = DEFAULT_TYPES.keys().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_types_resolve() {
        assert!(is_default_type("Component"));
        assert!(is_default_type("Library"));
        assert!(!is_default_type("Database"));

        let library = default_type("Library").unwrap();
        assert_eq!(library.shape, ShapeKind::RectangleRounded);
        assert_eq!(library.style.radius, 5.0);
    }

    #[test]
    fn names_are_sorted() {
        assert_eq!(default_type_names(), vec!["Component", "Library"]);
    }
}
