use std::collections::VecDeque;

use indexmap::IndexMap;

use crate::ir::{ConnectionStyle, Entity, Point};

/// Resolved visual styling of a shape. Derived from the owning entity's type
/// descriptor at creation time and mutated in place by the theme switch.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub stroke_dasharray: String,
    pub radius: f64,
    pub white_text: bool,
}

#[derive(Debug, Clone)]
pub struct Shape {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub style: VisualStyle,
    pub label: Option<String>,
    /// SVG path rendered inside the shape, already scaled to its bounds
    /// (issue folders only).
    pub icon: Option<String>,
    /// Transient placeholder used for interactive drag-to-create. Frames are
    /// removed by the event bridge before they become domain entities.
    pub frame: bool,
    pub hidden: bool,
    pub entity: Option<Entity>,
    /// Shape id of the attached version badge (components only).
    pub version_badge: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Connection {
    pub id: String,
    /// Shape id of the source element.
    pub source: String,
    /// Shape id of the target element.
    pub target: String,
    pub waypoints: Vec<Point>,
    pub style: ConnectionStyle,
    /// Set on every connection built through the connection manager. A raw
    /// connection drawn on the canvas lacks the flag and is replaced by the
    /// event bridge instead of being kept as-is.
    pub materialized: bool,
    pub hidden: bool,
    pub entity: Option<Entity>,
}

#[derive(Debug, Clone)]
pub enum Element {
    Shape(Shape),
    Connection(Connection),
}

impl Element {
    pub fn id(&self) -> &str {
        match self {
            Element::Shape(shape) => &shape.id,
            Element::Connection(conn) => &conn.id,
        }
    }

    pub fn entity(&self) -> Option<&Entity> {
        match self {
            Element::Shape(shape) => shape.entity.as_ref(),
            Element::Connection(conn) => conn.entity.as_ref(),
        }
    }

    pub fn entity_mut(&mut self) -> Option<&mut Entity> {
        match self {
            Element::Shape(shape) => shape.entity.as_mut(),
            Element::Connection(conn) => conn.entity.as_mut(),
        }
    }

    pub fn as_shape(&self) -> Option<&Shape> {
        match self {
            Element::Shape(shape) => Some(shape),
            Element::Connection(_) => None,
        }
    }

    pub fn as_shape_mut(&mut self) -> Option<&mut Shape> {
        match self {
            Element::Shape(shape) => Some(shape),
            Element::Connection(_) => None,
        }
    }

    pub fn as_connection(&self) -> Option<&Connection> {
        match self {
            Element::Shape(_) => None,
            Element::Connection(conn) => Some(conn),
        }
    }

    pub fn as_connection_mut(&mut self) -> Option<&mut Connection> {
        match self {
            Element::Shape(_) => None,
            Element::Connection(conn) => Some(conn),
        }
    }
}

/// Canvas-level events, dispatched synchronously by `Editor::pump_events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasEvent {
    ShapePlaced { shape_id: String },
    ConnectionDrawn { connection_id: String },
    DeleteRequested { shape_id: String },
    InterfaceRequested { shape_id: String },
    IssueRequested { shape_id: String },
}

/// In-memory element registry plus the event and repaint queues of the
/// canvas framework. Insertion order is preserved so traversal (export,
/// theming) is deterministic. The store is an explicit object handed to each
/// subsystem rather than ambient global state.
#[derive(Debug, Default)]
pub struct Canvas {
    elements: IndexMap<String, Element>,
    next_shape: u64,
    next_connection: u64,
    events: VecDeque<CanvasEvent>,
    repaints: Vec<String>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shape, assigns it a fresh id and fires `ShapePlaced`.
    pub fn add_shape(&mut self, mut shape: Shape) -> String {
        let id = format!("shape_{}", self.next_shape);
        self.next_shape += 1;
        shape.id = id.clone();
        self.elements.insert(id.clone(), Element::Shape(shape));
        self.events
            .push_back(CanvasEvent::ShapePlaced { shape_id: id.clone() });
        id
    }

    /// Adds a connection, assigns it a fresh id and fires `ConnectionDrawn`.
    pub fn add_connection(&mut self, mut conn: Connection) -> String {
        let id = format!("connection_{}", self.next_connection);
        self.next_connection += 1;
        conn.id = id.clone();
        self.elements.insert(id.clone(), Element::Connection(conn));
        self.events.push_back(CanvasEvent::ConnectionDrawn {
            connection_id: id.clone(),
        });
        id
    }

    /// Removes an element. Removing a shape also removes every connection
    /// attached to it, mirroring canvas-framework cascade semantics.
    pub fn remove_element(&mut self, id: &str) -> Option<Element> {
        let removed = self.elements.shift_remove(id)?;
        if matches!(removed, Element::Shape(_)) {
            let attached: Vec<String> = self
                .elements
                .values()
                .filter_map(|element| match element {
                    Element::Connection(conn) if conn.source == id || conn.target == id => {
                        Some(conn.id.clone())
                    }
                    _ => None,
                })
                .collect();
            for conn_id in attached {
                self.elements.shift_remove(&conn_id);
            }
        }
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.elements.values_mut()
    }

    /// Materialized id list, for traversals that mutate while iterating.
    pub fn snapshot_ids(&self) -> Vec<String> {
        self.elements.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.events.clear();
        self.repaints.clear();
    }

    /// Context-pad style interaction events, raised by the host UI layer.
    pub fn request_delete(&mut self, shape_id: &str) {
        self.events.push_back(CanvasEvent::DeleteRequested {
            shape_id: shape_id.to_string(),
        });
    }

    pub fn request_interface(&mut self, shape_id: &str) {
        self.events.push_back(CanvasEvent::InterfaceRequested {
            shape_id: shape_id.to_string(),
        });
    }

    pub fn request_issue(&mut self, shape_id: &str) {
        self.events.push_back(CanvasEvent::IssueRequested {
            shape_id: shape_id.to_string(),
        });
    }

    pub fn drain_events(&mut self) -> Vec<CanvasEvent> {
        self.events.drain(..).collect()
    }

    /// Repaint notification for a mutated element.
    pub fn fire_changed(&mut self, id: &str) {
        self.repaints.push(id.to_string());
    }

    pub fn take_repaints(&mut self) -> Vec<String> {
        std::mem::take(&mut self.repaints)
    }
}
