//! Event bridge between the canvas and the host application. Canvas events
//! are handled synchronously, one at a time; a malformed event is logged,
//! reported through `on_error` and dropped without affecting the rest.

use crate::canvas::{CanvasEvent, Element};
use crate::editor::Editor;
use crate::error::Error;
use crate::ir::{Entity, Point};

/// Callbacks the host application implements to turn canvas interactions
/// into real domain-entity operations. All methods default to no-ops.
pub trait EditorHooks {
    /// An interactive placeholder was dropped on the canvas. The host is
    /// expected to follow up with `create_component`.
    fn on_add_shape(&mut self, _coordinates: Point) {}
    /// Interface creation was requested on the component with this id.
    fn on_add_interface(&mut self, _owner: &str) {}
    /// Issue-folder creation was requested on the component with this id.
    fn on_add_issue(&mut self, _owner: &str) {}
    fn on_delete(&mut self, _domain_id: &str) {}
    /// A raw connection was drawn between two entities; the host decides
    /// whether to materialize it via `create_connection`.
    fn on_add_connection(&mut self, _source: &str, _target: &str, _waypoints: &[Point]) {}
    /// Structured error surface for per-event failures.
    fn on_error(&mut self, _error: &Error) {}
}

impl Editor {
    /// Drains the canvas event queue, handling each event synchronously.
    pub fn pump_events(&mut self, hooks: &mut dyn EditorHooks) {
        for event in self.canvas.drain_events() {
            self.handle_event(event, hooks);
        }
    }

    fn handle_event(&mut self, event: CanvasEvent, hooks: &mut dyn EditorHooks) {
        match event {
            CanvasEvent::ShapePlaced { shape_id } => self.on_shape_placed(&shape_id, hooks),
            CanvasEvent::ConnectionDrawn { connection_id } => {
                self.on_connection_drawn(&connection_id, hooks)
            }
            CanvasEvent::DeleteRequested { shape_id } => self.on_delete_requested(&shape_id, hooks),
            CanvasEvent::InterfaceRequested { shape_id } => {
                self.on_child_requested(&shape_id, hooks, true)
            }
            CanvasEvent::IssueRequested { shape_id } => {
                self.on_child_requested(&shape_id, hooks, false)
            }
        }
    }

    fn on_shape_placed(&mut self, shape_id: &str, hooks: &mut dyn EditorHooks) {
        let Some(Element::Shape(shape)) = self.canvas.get(shape_id) else {
            return;
        };
        // Only transient placeholder frames become domain events; shapes
        // created by the factory pass through untouched.
        if !shape.frame {
            return;
        }
        let coordinates = Point::new(shape.x, shape.y);
        self.canvas.remove_element(shape_id);
        hooks.on_add_shape(coordinates);
    }

    fn on_connection_drawn(&mut self, connection_id: &str, hooks: &mut dyn EditorHooks) {
        let Some(Element::Connection(conn)) = self.canvas.get(connection_id) else {
            return;
        };
        // Connections built through the connection manager carry the flag;
        // reacting to them again would recurse forever.
        if conn.materialized {
            return;
        }
        let source_shape = conn.source.clone();
        let target_shape = conn.target.clone();
        let waypoints = conn.waypoints.clone();
        self.canvas.remove_element(connection_id);

        let source = self.domain_id_of_shape(&source_shape);
        let target = self.domain_id_of_shape(&target_shape);
        match (source, target) {
            (Some(source), Some(target)) => {
                hooks.on_add_connection(&source, &target, &waypoints);
            }
            _ => {
                let error = Error::InconsistentState(format!(
                    "drawn connection {connection_id} has endpoints without business data"
                ));
                log::error!("{error}");
                hooks.on_error(&error);
            }
        }
    }

    fn on_delete_requested(&mut self, shape_id: &str, hooks: &mut dyn EditorHooks) {
        let Some(element) = self.canvas.get(shape_id) else {
            return;
        };
        match element.entity() {
            None => {
                let error = Error::InconsistentState(format!(
                    "delete requested for element {shape_id} without business data"
                ));
                log::error!("{error}");
                hooks.on_error(&error);
            }
            // Sub-connections are implied by membership and not deletable on
            // their own.
            Some(Entity::SubConnection(_)) => {}
            Some(entity) => {
                if let Some(domain_id) = entity.domain_id() {
                    let domain_id = domain_id.to_string();
                    hooks.on_delete(&domain_id);
                }
            }
        }
    }

    fn on_child_requested(&mut self, shape_id: &str, hooks: &mut dyn EditorHooks, interface: bool) {
        let Some(element) = self.canvas.get(shape_id) else {
            return;
        };
        match element.entity() {
            Some(Entity::Component(data)) => {
                let owner = data.id.clone();
                if interface {
                    hooks.on_add_interface(&owner);
                } else {
                    hooks.on_add_issue(&owner);
                }
            }
            _ => {
                let error = Error::InconsistentState(format!(
                    "child creation requested on element {shape_id} that is not a component"
                ));
                log::error!("{error}");
                hooks.on_error(&error);
            }
        }
    }

    fn domain_id_of_shape(&self, shape_id: &str) -> Option<String> {
        self.canvas
            .get(shape_id)?
            .entity()?
            .domain_id()
            .map(str::to_string)
    }
}
