//! Light/dark re-theming of all visual elements in a single traversal.

use crate::canvas::{Canvas, Element};
use crate::ir::Entity;

pub const WHITE: &str = "#ffffff";
pub const BLACK: &str = "#000000";
/// Fully transparent fill, kept by required interfaces in every theme.
pub const TRANSPARENT: &str = "#00000000";

#[derive(Debug, Clone)]
pub struct Palette {
    pub component_dark_fill: String,
    pub badge_light_fill: String,
    pub badge_light_stroke: String,
    pub badge_dark_fill: String,
    pub badge_dark_stroke: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            component_dark_fill: "#486581".to_string(),
            badge_light_fill: "#aaaaff".to_string(),
            badge_light_stroke: BLACK.to_string(),
            badge_dark_fill: "#215a8f".to_string(),
            badge_dark_stroke: WHITE.to_string(),
        }
    }
}

struct ComponentRestyle {
    shape_id: String,
    stroke: String,
    fill: String,
    white_text: bool,
    interfaces: Vec<(String, bool)>,
    issues: Vec<(String, String)>,
}

/// Recolors every element according to the two-state policy:
///
/// - components keep user-chosen colors and only swap the defaults; turning
///   dark mode off restores the colors recorded on the type descriptor, so
///   repeated toggling cannot drift. Stroke/fill propagate to attached
///   interfaces and issue folders, except that a non-open interface keeps a
///   transparent fill.
/// - version badges use a fixed two-color pair.
/// - connections and sub-connections only swap pure black and pure white.
///
/// Ids are snapshotted before any mutation; every mutated element gets a
/// repaint notification.
pub fn set_dark_mode(canvas: &mut Canvas, enabled: bool) {
    let palette = Palette::default();
    for id in canvas.snapshot_ids() {
        restyle_element(canvas, &id, enabled, &palette);
    }
}

fn restyle_element(canvas: &mut Canvas, id: &str, enabled: bool, palette: &Palette) {
    let Some(element) = canvas.get(id) else {
        return;
    };
    match element {
        Element::Shape(shape) => match &shape.entity {
            Some(Entity::Component(_)) => {
                if let Some(plan) = component_plan(canvas, id, enabled, palette) {
                    apply_component_plan(canvas, plan, enabled);
                }
            }
            Some(Entity::VersionBadge) => restyle_badge(canvas, id, enabled, palette),
            // Interfaces and issue folders are restyled through their owner.
            _ => {}
        },
        Element::Connection(conn) => {
            let swaps = matches!(
                conn.entity,
                Some(Entity::Connection(_)) | Some(Entity::SubConnection(_))
            );
            if !swaps {
                return;
            }
            let stroke = if enabled && conn.style.color == BLACK {
                WHITE
            } else if !enabled && conn.style.color == WHITE {
                BLACK
            } else {
                return;
            };
            if let Some(conn) = canvas.get_mut(id).and_then(Element::as_connection_mut) {
                conn.style.color = stroke.to_string();
            }
            canvas.fire_changed(id);
        }
    }
}

fn component_plan(
    canvas: &Canvas,
    id: &str,
    enabled: bool,
    palette: &Palette,
) -> Option<ComponentRestyle> {
    let shape = canvas.get(id)?.as_shape()?;
    let Some(Entity::Component(data)) = &shape.entity else {
        return None;
    };

    let descriptor = &data.component_type.style;
    let (stroke, fill, white_text) = if enabled {
        // Only elements still wearing the default colors are swapped.
        let stroke = if shape.style.stroke == BLACK {
            WHITE.to_string()
        } else {
            shape.style.stroke.clone()
        };
        let (fill, white_text) = if shape.style.fill == WHITE {
            (palette.component_dark_fill.clone(), true)
        } else {
            (shape.style.fill.clone(), shape.style.white_text)
        };
        (stroke, fill, white_text)
    } else {
        (descriptor.stroke.clone(), descriptor.color.clone(), false)
    };

    Some(ComponentRestyle {
        shape_id: id.to_string(),
        stroke,
        fill,
        white_text,
        interfaces: data
            .interfaces
            .iter()
            .map(|interface| (interface.shape_id.clone(), interface.open))
            .collect(),
        issues: data
            .issues
            .iter()
            .map(|issue| (issue.shape_id.clone(), issue.color.clone()))
            .collect(),
    })
}

fn apply_component_plan(canvas: &mut Canvas, plan: ComponentRestyle, enabled: bool) {
    if let Some(shape) = canvas.get_mut(&plan.shape_id).and_then(Element::as_shape_mut) {
        shape.style.stroke = plan.stroke.clone();
        shape.style.fill = plan.fill.clone();
        shape.style.white_text = plan.white_text;
    }
    canvas.fire_changed(&plan.shape_id);

    for (shape_id, open) in &plan.interfaces {
        let Some(shape) = canvas.get_mut(shape_id).and_then(Element::as_shape_mut) else {
            log::warn!(
                "skipping theme update for interface shape {shape_id}: missing from registry"
            );
            continue;
        };
        shape.style.stroke = plan.stroke.clone();
        if *open {
            shape.style.fill = plan.fill.clone();
        }
        shape.style.white_text = enabled;
        canvas.fire_changed(shape_id);
    }

    for (shape_id, own_color) in &plan.issues {
        let Some(shape) = canvas.get_mut(shape_id).and_then(Element::as_shape_mut) else {
            log::warn!(
                "skipping theme update for issue folder shape {shape_id}: missing from registry"
            );
            continue;
        };
        // An issue folder's fill is its own color attribute and its stroke
        // is transparent by construction; reverting goes back to those
        // rather than to the owner's colors.
        if enabled {
            shape.style.stroke = plan.stroke.clone();
            shape.style.fill = plan.fill.clone();
        } else {
            shape.style.stroke = TRANSPARENT.to_string();
            shape.style.fill = own_color.clone();
        }
        canvas.fire_changed(shape_id);
    }
}

fn restyle_badge(canvas: &mut Canvas, id: &str, enabled: bool, palette: &Palette) {
    if let Some(shape) = canvas.get_mut(id).and_then(Element::as_shape_mut) {
        if enabled {
            shape.style.stroke = palette.badge_dark_stroke.clone();
            shape.style.fill = palette.badge_dark_fill.clone();
            shape.style.white_text = true;
        } else {
            shape.style.stroke = palette.badge_light_stroke.clone();
            shape.style.fill = palette.badge_light_fill.clone();
            shape.style.white_text = false;
        }
    }
    canvas.fire_changed(id);
}
