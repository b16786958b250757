//! Automatic layout bridge. The canvas graph is compiled into a nested
//! group/node/edge structure, handed to an asynchronous [`LayoutEngine`]
//! implementation, and the returned positions are folded back onto the
//! canvas. [`StackedEngine`] is the built-in engine.

use std::collections::HashMap;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Element};
use crate::config::LayoutSpacing;
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::ir::{Entity, Point};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Bend points, relative to the owning group's origin.
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutChild {
    Node(LayoutNode),
    Group(LayoutGroup),
}

/// A container in the layout graph. Child coordinates are relative to the
/// group's own origin.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutGroup {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub children: Vec<LayoutChild>,
    pub edges: Vec<LayoutEdge>,
}

/// An algorithm that assigns positions to a layout graph. Engines run
/// asynchronously so an out-of-process service can implement this as well as
/// an in-memory algorithm.
pub trait LayoutEngine {
    fn layout(&self, root: LayoutGroup) -> BoxFuture<'static, std::result::Result<LayoutGroup, String>>;
}

/// Compiles the canvas into the nested layout graph: one group per
/// component holding the component node and its interface and issue-folder
/// nodes, tethered by intra-group edges, with top-level connections as edges
/// of the root group.
///
/// Returns the graph and a map from generated edge ids back to canvas
/// connection ids, so the routed points can be written back after layout.
pub fn build_layout_graph(
    canvas: &Canvas,
    spacing: &LayoutSpacing,
) -> (LayoutGroup, HashMap<String, String>) {
    let mut root = LayoutGroup {
        id: "root".to_string(),
        ..LayoutGroup::default()
    };
    let mut edge_ids = HashMap::new();
    let mut next_edge = 0u64;

    let mut sub_connections: HashMap<String, Vec<&crate::canvas::Connection>> = HashMap::new();
    for element in canvas.iter() {
        if let Element::Connection(conn) = element
            && matches!(conn.entity, Some(Entity::SubConnection(_)))
        {
            sub_connections.entry(conn.source.clone()).or_default().push(conn);
        }
    }

    for element in canvas.iter() {
        match element {
            Element::Shape(shape) => {
                let Some(Entity::Component(_)) = &shape.entity else {
                    continue;
                };
                let mut group = LayoutGroup {
                    id: format!("group_{}", shape.id),
                    ..LayoutGroup::default()
                };
                group.children.push(LayoutChild::Node(LayoutNode {
                    id: shape.id.clone(),
                    x: 0.0,
                    y: 0.0,
                    width: shape.width,
                    height: shape.height + spacing.label_headroom,
                }));

                for tether in sub_connections.get(&shape.id).into_iter().flatten() {
                    let Some(child) = canvas.get(&tether.target).and_then(Element::as_shape)
                    else {
                        log::warn!(
                            "layout: sub-connection {} targets missing shape {}",
                            tether.id,
                            tether.target
                        );
                        continue;
                    };
                    let headroom = match child.entity {
                        Some(Entity::Interface(_)) => spacing.label_headroom,
                        _ => 0.0,
                    };
                    group.children.push(LayoutChild::Node(LayoutNode {
                        id: child.id.clone(),
                        x: 0.0,
                        y: 0.0,
                        width: child.width,
                        height: child.height + headroom,
                    }));

                    let edge_id = format!("edge_{next_edge}");
                    next_edge += 1;
                    edge_ids.insert(edge_id.clone(), tether.id.clone());
                    group.edges.push(LayoutEdge {
                        id: edge_id,
                        source: tether.source.clone(),
                        target: tether.target.clone(),
                        points: Vec::new(),
                    });
                }

                root.children.push(LayoutChild::Group(group));
            }
            Element::Connection(conn) => {
                if !matches!(conn.entity, Some(Entity::Connection(_))) {
                    continue;
                }
                let edge_id = format!("edge_{next_edge}");
                next_edge += 1;
                edge_ids.insert(edge_id.clone(), conn.id.clone());
                root.edges.push(LayoutEdge {
                    id: edge_id,
                    source: conn.source.clone(),
                    target: conn.target.clone(),
                    points: Vec::new(),
                });
            }
        }
    }

    (root, edge_ids)
}

/// Moves a shape to an absolute position. A component's version badge
/// follows by the same delta.
pub fn move_shape(canvas: &mut Canvas, shape_id: &str, x: f64, y: f64) {
    let Some(shape) = canvas.get_mut(shape_id).and_then(Element::as_shape_mut) else {
        log::warn!("layout: cannot move missing shape {shape_id}");
        return;
    };
    let dx = x - shape.x;
    let dy = y - shape.y;
    shape.x = x;
    shape.y = y;
    let badge = shape.version_badge.clone();
    canvas.fire_changed(shape_id);

    if let Some(badge_id) = badge {
        if let Some(badge) = canvas.get_mut(&badge_id).and_then(Element::as_shape_mut) {
            badge.x += dx;
            badge.y += dy;
        }
        canvas.fire_changed(&badge_id);
    }
}

/// Folds a laid-out graph back onto the canvas, accumulating group offsets
/// so node positions and edge points become absolute coordinates.
fn apply_group(
    canvas: &mut Canvas,
    group: &LayoutGroup,
    origin: Point,
    edge_ids: &HashMap<String, String>,
) {
    let origin = Point::new(origin.x + group.x, origin.y + group.y);

    for child in &group.children {
        match child {
            LayoutChild::Node(node) => {
                move_shape(canvas, &node.id, origin.x + node.x, origin.y + node.y);
            }
            LayoutChild::Group(inner) => apply_group(canvas, inner, origin, edge_ids),
        }
    }

    for edge in &group.edges {
        let Some(conn_id) = edge_ids.get(&edge.id) else {
            log::warn!("layout: unknown edge id {} in engine output", edge.id);
            continue;
        };
        let waypoints: Vec<Point> = edge
            .points
            .iter()
            .map(|point| Point::new(origin.x + point.x, origin.y + point.y))
            .collect();
        if waypoints.is_empty() {
            continue;
        }
        if let Some(conn) = canvas.get_mut(conn_id).and_then(Element::as_connection_mut) {
            conn.waypoints = waypoints;
        }
        canvas.fire_changed(conn_id);
    }
}

impl Editor {
    /// Runs the engine over the current graph and applies the result. Canvas
    /// positions are untouched when the engine fails.
    pub async fn autolayout(&mut self, engine: &dyn LayoutEngine) -> Result<()> {
        let (graph, edge_ids) = build_layout_graph(&self.canvas, &self.config.layout);
        let laid_out = engine
            .layout(graph)
            .await
            .map_err(Error::EngineFailure)?;
        let origin = Point::new(self.config.layout.root_x, self.config.layout.root_y);
        apply_group(&mut self.canvas, &laid_out, origin, &edge_ids);
        Ok(())
    }
}

const GROUP_PADDING: f64 = 20.0;
const NODE_GAP: f64 = 60.0;
const GROUP_GAP: f64 = 80.0;

/// Built-in deterministic engine. Groups are stacked vertically, a group's
/// children run left to right, and every edge is routed as a straight
/// segment from the source's right center to the target's left center.
#[derive(Debug, Clone, Default)]
pub struct StackedEngine;

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl StackedEngine {
    fn layout_sync(root: LayoutGroup) -> LayoutGroup {
        let mut root = root;
        Self::place_children(&mut root);
        root.x = 0.0;
        root.y = 0.0;

        let mut positions = HashMap::new();
        Self::collect_positions(&root, Point::new(0.0, 0.0), &mut positions);
        Self::route_edges(&mut root, Point::new(0.0, 0.0), &positions);
        root
    }

    /// Assigns relative positions bottom-up and returns the group's size.
    fn place_children(group: &mut LayoutGroup) -> (f64, f64) {
        let mut node_x = GROUP_PADDING;
        let mut group_y = GROUP_PADDING;
        let mut width: f64 = 0.0;
        let mut height: f64 = 0.0;

        for child in &mut group.children {
            match child {
                LayoutChild::Node(node) => {
                    node.x = node_x;
                    node.y = GROUP_PADDING;
                    node_x += node.width + NODE_GAP;
                    width = width.max(node.x + node.width);
                    height = height.max(node.y + node.height);
                }
                LayoutChild::Group(inner) => {
                    let (w, h) = Self::place_children(inner);
                    inner.x = GROUP_PADDING;
                    inner.y = group_y;
                    group_y += h + GROUP_GAP;
                    width = width.max(inner.x + w);
                    height = height.max(inner.y + h);
                }
            }
        }

        (width + GROUP_PADDING, height + GROUP_PADDING)
    }

    fn collect_positions(group: &LayoutGroup, origin: Point, out: &mut HashMap<String, Rect>) {
        let origin = Point::new(origin.x + group.x, origin.y + group.y);
        for child in &group.children {
            match child {
                LayoutChild::Node(node) => {
                    out.insert(
                        node.id.clone(),
                        Rect {
                            x: origin.x + node.x,
                            y: origin.y + node.y,
                            width: node.width,
                            height: node.height,
                        },
                    );
                }
                LayoutChild::Group(inner) => Self::collect_positions(inner, origin, out),
            }
        }
    }

    fn route_edges(group: &mut LayoutGroup, origin: Point, positions: &HashMap<String, Rect>) {
        let origin = Point::new(origin.x + group.x, origin.y + group.y);
        for edge in &mut group.edges {
            let (Some(source), Some(target)) =
                (positions.get(&edge.source), positions.get(&edge.target))
            else {
                continue;
            };
            // Points are stored relative to the owning group.
            edge.points = vec![
                Point::new(
                    source.x + source.width - origin.x,
                    source.y + source.height / 2.0 - origin.y,
                ),
                Point::new(target.x - origin.x, target.y + target.height / 2.0 - origin.y),
            ];
        }
        for child in &mut group.children {
            if let LayoutChild::Group(inner) = child {
                Self::route_edges(inner, origin, positions);
            }
        }
    }
}

impl LayoutEngine for StackedEngine {
    fn layout(&self, root: LayoutGroup) -> BoxFuture<'static, std::result::Result<LayoutGroup, String>> {
        Box::pin(async move { Ok(Self::layout_sync(root)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, width: f64, height: f64) -> LayoutChild {
        LayoutChild::Node(LayoutNode {
            id: id.to_string(),
            x: 0.0,
            y: 0.0,
            width,
            height,
        })
    }

    #[test]
    fn groups_stack_without_overlap() {
        let root = LayoutGroup {
            id: "root".to_string(),
            children: vec![
                LayoutChild::Group(LayoutGroup {
                    id: "group_a".to_string(),
                    children: vec![node("a", 150.0, 190.0)],
                    ..LayoutGroup::default()
                }),
                LayoutChild::Group(LayoutGroup {
                    id: "group_b".to_string(),
                    children: vec![node("b", 150.0, 190.0)],
                    ..LayoutGroup::default()
                }),
            ],
            ..LayoutGroup::default()
        };

        let laid_out = StackedEngine::layout_sync(root);
        let groups: Vec<&LayoutGroup> = laid_out
            .children
            .iter()
            .filter_map(|child| match child {
                LayoutChild::Group(group) => Some(group),
                _ => None,
            })
            .collect();
        assert_eq!(groups.len(), 2);
        // Second group starts below the first one's extent.
        assert!(groups[1].y >= groups[0].y + 190.0);
    }

    #[test]
    fn edges_route_between_node_boundaries() {
        let root = LayoutGroup {
            id: "root".to_string(),
            children: vec![node("a", 100.0, 100.0), node("b", 100.0, 100.0)],
            edges: vec![LayoutEdge {
                id: "edge_0".to_string(),
                source: "a".to_string(),
                target: "b".to_string(),
                points: Vec::new(),
            }],
            ..LayoutGroup::default()
        };

        let laid_out = StackedEngine::layout_sync(root);
        let edge = &laid_out.edges[0];
        assert_eq!(edge.points.len(), 2);
        // Leaves the right edge of a, enters the left edge of b.
        assert_eq!(edge.points[0].x, GROUP_PADDING + 100.0);
        assert_eq!(edge.points[1].x, GROUP_PADDING + 100.0 + NODE_GAP);
        assert_eq!(edge.points[0].y, edge.points[1].y);
    }

    #[test]
    fn nested_points_are_group_relative() {
        let root = LayoutGroup {
            id: "root".to_string(),
            children: vec![LayoutChild::Group(LayoutGroup {
                id: "group_a".to_string(),
                children: vec![node("a", 100.0, 100.0), node("i", 50.0, 50.0)],
                edges: vec![LayoutEdge {
                    id: "edge_0".to_string(),
                    source: "a".to_string(),
                    target: "i".to_string(),
                    points: Vec::new(),
                }],
                ..LayoutGroup::default()
            })],
            ..LayoutGroup::default()
        };

        let laid_out = StackedEngine::layout_sync(root);
        let LayoutChild::Group(group) = &laid_out.children[0] else {
            panic!("expected a group");
        };
        let edge = &group.edges[0];
        // Relative to the inner group, not to the root.
        assert_eq!(edge.points[0].x, GROUP_PADDING + 100.0);
    }
}
