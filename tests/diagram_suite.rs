use futures::executor::block_on;
use futures::future::BoxFuture;

use archboard::canvas::{Connection, Shape, VisualStyle};
use archboard::default_types::default_type;
use archboard::error::Error;
use archboard::ir::{ConnectionStyle, Point, ShapeKind};
use archboard::layout::{LayoutEngine, LayoutGroup, StackedEngine};
use archboard::registry;
use archboard::{Editor, EditorHooks};

fn component_type() -> archboard::ir::ComponentType {
    default_type("Component").expect("built-in type")
}

fn editor_with_component(id: &str, name: &str, x: f64, y: f64) -> Editor {
    let mut editor = Editor::new();
    editor
        .create_component(id, name, "1.0", component_type(), Point::new(x, y))
        .expect("create component");
    editor
}

#[derive(Default)]
struct RecordingHooks {
    added_shapes: Vec<Point>,
    added_interfaces: Vec<String>,
    added_issues: Vec<String>,
    deleted: Vec<String>,
    added_connections: Vec<(String, String, usize)>,
    errors: Vec<String>,
}

impl EditorHooks for RecordingHooks {
    fn on_add_shape(&mut self, coordinates: Point) {
        self.added_shapes.push(coordinates);
    }
    fn on_add_interface(&mut self, owner: &str) {
        self.added_interfaces.push(owner.to_string());
    }
    fn on_add_issue(&mut self, owner: &str) {
        self.added_issues.push(owner.to_string());
    }
    fn on_delete(&mut self, domain_id: &str) {
        self.deleted.push(domain_id.to_string());
    }
    fn on_add_connection(&mut self, source: &str, target: &str, waypoints: &[Point]) {
        self.added_connections
            .push((source.to_string(), target.to_string(), waypoints.len()));
    }
    fn on_error(&mut self, error: &Error) {
        self.errors.push(error.to_string());
    }
}

struct FailingEngine;

impl LayoutEngine for FailingEngine {
    fn layout(&self, _root: LayoutGroup) -> BoxFuture<'static, Result<LayoutGroup, String>> {
        Box::pin(async { Err("engine unavailable".to_string()) })
    }
}

fn build_sample_diagram() -> Editor {
    let mut editor = Editor::new();
    editor
        .create_component("order", "Order Service", "2.1", component_type(), Point::new(100.0, 100.0))
        .unwrap();
    editor
        .create_interface(
            "order",
            "order-api",
            "OrderAPI",
            ShapeKind::InterfaceProvide,
            "2.1",
            true,
            None,
            None,
        )
        .unwrap();
    editor
        .create_issue_folder("order", "order-bugs", "M 0 0 L 10 10", "#ff0000", None)
        .unwrap();
    editor
        .create_component("billing", "Billing", "1.0", component_type(), Point::new(600.0, 100.0))
        .unwrap();
    editor
        .create_connection(Some("order-billing"), "order", "billing", ConnectionStyle::default(), None)
        .unwrap();
    editor
}

#[test]
fn document_round_trips_through_json() {
    let editor = build_sample_diagram();
    let json = editor.export_json().unwrap();

    let mut imported = Editor::new();
    imported.import_json(&json).unwrap();

    assert_eq!(imported.export_json().unwrap(), json);
    assert_eq!(imported.canvas.len(), editor.canvas.len());
}

#[test]
fn export_skips_sub_connections_and_badges() {
    let editor = build_sample_diagram();
    let document = editor.export_document();

    assert_eq!(document.shapes.len(), 2);
    assert_eq!(document.connections.len(), 1);
    assert_eq!(document.connections[0].id, "order-billing");

    let order = &document.shapes[0];
    assert_eq!(order.interfaces.len(), 1);
    assert_eq!(order.issue_folders.len(), 1);
}

#[test]
fn order_service_fits_minimum_size() {
    let editor = editor_with_component("order", "Order Service", 0.0, 0.0);
    let shape = registry::find_entity(&editor.canvas, "order")
        .and_then(|element| element.as_shape())
        .unwrap();
    assert_eq!(shape.width, 150.0);
    assert_eq!(shape.height, 150.0);
}

#[test]
fn deleting_a_component_cascades() {
    let mut editor = build_sample_diagram();
    editor.delete("order").unwrap();

    assert!(registry::find_entity(&editor.canvas, "order").is_none());
    assert!(registry::find_entity(&editor.canvas, "order-api").is_none());
    assert!(registry::find_entity(&editor.canvas, "order-bugs").is_none());
    // The connection touched a removed shape and went with it.
    assert!(registry::find_entity(&editor.canvas, "order-billing").is_none());

    editor.delete("billing").unwrap();
    assert!(editor.canvas.is_empty());
}

#[test]
fn deleting_an_interface_detaches_it_from_its_owner() {
    let mut editor = build_sample_diagram();
    let tether_count_before = editor
        .canvas
        .iter()
        .filter(|element| element.as_connection().is_some())
        .count();

    editor.delete("order-api").unwrap();

    assert!(registry::find_entity(&editor.canvas, "order-api").is_none());
    let order = registry::component_data(&editor.canvas, "order").unwrap();
    assert!(order.interfaces.is_empty());

    let tether_count_after = editor
        .canvas
        .iter()
        .filter(|element| element.as_connection().is_some())
        .count();
    assert_eq!(tether_count_after, tether_count_before - 1);
}

#[test]
fn deleting_a_sub_connection_is_ignored() {
    let mut editor = build_sample_diagram();
    let len_before = editor.canvas.len();

    // The tether's derived id resolves to a sub-connection.
    editor.delete("order-order-api").unwrap();
    assert_eq!(editor.canvas.len(), len_before);
}

#[test]
fn unknown_domain_ids_are_not_found() {
    let mut editor = Editor::new();
    assert!(matches!(editor.delete("ghost"), Err(Error::NotFound { .. })));

    let result = editor.create_interface(
        "ghost",
        "api",
        "API",
        ShapeKind::InterfaceProvide,
        "1.0",
        true,
        None,
        None,
    );
    assert!(matches!(result, Err(Error::NotFound { .. })));
    // No partial shape was left behind.
    assert!(editor.canvas.is_empty());
}

#[test]
fn interface_defaults_to_attach_offset_right_of_owner() {
    let mut editor = editor_with_component("order", "Order Service", 100.0, 100.0);
    editor
        .create_interface(
            "order",
            "order-api",
            "API",
            ShapeKind::InterfaceProvide,
            "1.0",
            true,
            None,
            None,
        )
        .unwrap();

    let owner = registry::find_entity(&editor.canvas, "order")
        .and_then(|element| element.as_shape())
        .map(|shape| (shape.x, shape.width))
        .unwrap();
    let interface = registry::find_entity(&editor.canvas, "order-api")
        .and_then(|element| element.as_shape())
        .unwrap();
    assert_eq!(interface.x, owner.0 + owner.1 + 40.0);
}

#[test]
fn dark_mode_round_trip_restores_default_colors() {
    let mut editor = build_sample_diagram();
    let initial: Vec<VisualStyle> = editor
        .canvas
        .iter()
        .filter_map(|element| element.as_shape())
        .map(|shape| shape.style.clone())
        .collect();

    editor.set_dark_mode(true);

    let order = registry::find_entity(&editor.canvas, "order")
        .and_then(|element| element.as_shape())
        .unwrap();
    assert_eq!(order.style.fill, "#486581");
    assert_eq!(order.style.stroke, "#ffffff");
    assert!(order.style.white_text);

    editor.set_dark_mode(false);
    let restored: Vec<VisualStyle> = editor
        .canvas
        .iter()
        .filter_map(|element| element.as_shape())
        .map(|shape| shape.style.clone())
        .collect();
    assert_eq!(restored, initial);
}

#[test]
fn dark_mode_is_idempotent() {
    let mut editor = build_sample_diagram();
    editor.set_dark_mode(true);
    let once: Vec<VisualStyle> = editor
        .canvas
        .iter()
        .filter_map(|element| element.as_shape())
        .map(|shape| shape.style.clone())
        .collect();

    editor.set_dark_mode(true);
    let twice: Vec<VisualStyle> = editor
        .canvas
        .iter()
        .filter_map(|element| element.as_shape())
        .map(|shape| shape.style.clone())
        .collect();
    assert_eq!(twice, once);
}

#[test]
fn dark_mode_keeps_custom_colors() {
    let mut custom = component_type();
    custom.style.color = "#ffcc00".to_string();
    let mut editor = Editor::new();
    editor
        .create_component("gateway", "Gateway", "1.0", custom, Point::new(0.0, 0.0))
        .unwrap();

    editor.set_dark_mode(true);
    let shape = registry::find_entity(&editor.canvas, "gateway")
        .and_then(|element| element.as_shape())
        .unwrap();
    assert_eq!(shape.style.fill, "#ffcc00");
    assert!(!shape.style.white_text);
}

#[test]
fn required_interface_keeps_transparent_fill_in_dark_mode() {
    let mut editor = editor_with_component("order", "Order Service", 0.0, 0.0);
    editor
        .create_interface(
            "order",
            "order-dep",
            "Dep",
            ShapeKind::InterfaceRequire,
            "1.0",
            false,
            None,
            None,
        )
        .unwrap();

    editor.set_dark_mode(true);
    let interface = registry::find_entity(&editor.canvas, "order-dep")
        .and_then(|element| element.as_shape())
        .unwrap();
    assert_eq!(interface.style.fill, "#00000000");
    assert_eq!(interface.style.stroke, "#ffffff");
}

#[test]
fn autolayout_separates_components() {
    let mut editor = build_sample_diagram();
    block_on(editor.autolayout(&StackedEngine)).unwrap();

    let order = registry::find_entity(&editor.canvas, "order")
        .and_then(|element| element.as_shape())
        .map(|shape| (shape.x, shape.y, shape.width, shape.height))
        .unwrap();
    let billing = registry::find_entity(&editor.canvas, "billing")
        .and_then(|element| element.as_shape())
        .map(|shape| (shape.x, shape.y, shape.width, shape.height))
        .unwrap();

    // Both inside the configured origin, stacked without vertical overlap.
    assert!(order.0 >= 150.0 && order.1 >= 100.0);
    assert!(billing.1 >= order.1 + order.3 || order.1 >= billing.1 + billing.3);

    let connection = registry::find_entity(&editor.canvas, "order-billing")
        .and_then(|element| element.as_connection())
        .unwrap();
    assert_eq!(connection.waypoints.len(), 2);
}

#[test]
fn autolayout_moves_the_version_badge_with_its_component() {
    let mut editor = editor_with_component("order", "Order Service", 0.0, 0.0);
    block_on(editor.autolayout(&StackedEngine)).unwrap();

    let shape = registry::find_entity(&editor.canvas, "order")
        .and_then(|element| element.as_shape())
        .unwrap();
    let badge_id = shape.version_badge.clone().unwrap();
    let (sx, sy, width, height) = (shape.x, shape.y, shape.width, shape.height);
    let badge = registry::shape(&editor.canvas, &badge_id).unwrap();
    assert_eq!(badge.x, sx + width / 2.0 - badge.width / 2.0);
    assert_eq!(badge.y, sy + height - badge.height / 2.0);
}

#[test]
fn failed_layout_leaves_positions_untouched() {
    let mut editor = build_sample_diagram();
    let before: Vec<(f64, f64)> = editor
        .canvas
        .iter()
        .filter_map(|element| element.as_shape())
        .map(|shape| (shape.x, shape.y))
        .collect();

    let result = block_on(editor.autolayout(&FailingEngine));
    assert!(matches!(result, Err(Error::EngineFailure(_))));

    let after: Vec<(f64, f64)> = editor
        .canvas
        .iter()
        .filter_map(|element| element.as_shape())
        .map(|shape| (shape.x, shape.y))
        .collect();
    assert_eq!(after, before);
}

#[test]
fn placed_frame_becomes_an_add_shape_callback() {
    let mut editor = build_sample_diagram();
    editor.canvas.drain_events();

    editor.canvas.add_shape(Shape {
        id: String::new(),
        x: 320.0,
        y: 240.0,
        width: 100.0,
        height: 100.0,
        style: VisualStyle {
            fill: String::new(),
            stroke: String::new(),
            stroke_width: 0.0,
            stroke_dasharray: String::new(),
            radius: 0.0,
            white_text: false,
        },
        label: None,
        icon: None,
        frame: true,
        hidden: false,
        entity: None,
        version_badge: None,
    });

    let len_before = editor.canvas.len();
    let mut hooks = RecordingHooks::default();
    editor.pump_events(&mut hooks);

    assert_eq!(hooks.added_shapes, vec![Point::new(320.0, 240.0)]);
    // The placeholder itself was removed.
    assert_eq!(editor.canvas.len(), len_before - 1);
}

#[test]
fn drawn_connection_is_replaced_by_a_callback() {
    let mut editor = build_sample_diagram();
    editor.canvas.drain_events();

    let source = registry::find_entity_id(&editor.canvas, "order").unwrap();
    let target = registry::find_entity_id(&editor.canvas, "billing").unwrap();
    let raw_id = editor.canvas.add_connection(Connection {
        id: String::new(),
        source,
        target,
        waypoints: vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)],
        style: ConnectionStyle::default(),
        materialized: false,
        hidden: false,
        entity: None,
    });

    let mut hooks = RecordingHooks::default();
    editor.pump_events(&mut hooks);

    assert_eq!(
        hooks.added_connections,
        vec![("order".to_string(), "billing".to_string(), 2)]
    );
    assert!(editor.canvas.get(&raw_id).is_none());
}

#[test]
fn materialized_connections_do_not_recurse_through_the_bridge() {
    let mut editor = build_sample_diagram();

    // Factory output is still queued; none of it may produce callbacks.
    let mut hooks = RecordingHooks::default();
    editor.pump_events(&mut hooks);

    assert!(hooks.added_shapes.is_empty());
    assert!(hooks.added_connections.is_empty());
    assert!(hooks.errors.is_empty());
}

#[test]
fn context_pad_requests_reach_the_hooks() {
    let mut editor = build_sample_diagram();
    editor.canvas.drain_events();

    let order_shape = registry::find_entity_id(&editor.canvas, "order").unwrap();
    editor.canvas.request_interface(&order_shape);
    editor.canvas.request_issue(&order_shape);
    editor.canvas.request_delete(&order_shape);

    let mut hooks = RecordingHooks::default();
    editor.pump_events(&mut hooks);

    assert_eq!(hooks.added_interfaces, vec!["order".to_string()]);
    assert_eq!(hooks.added_issues, vec!["order".to_string()]);
    assert_eq!(hooks.deleted, vec!["order".to_string()]);
}

#[test]
fn hiding_components_extends_to_children_and_connections() {
    let mut editor = build_sample_diagram();
    editor.set_entity_visibility(archboard::ir::EntityKind::Component, true);

    for element in editor.canvas.iter() {
        match element {
            archboard::canvas::Element::Shape(shape) => assert!(shape.hidden),
            archboard::canvas::Element::Connection(conn) => assert!(conn.hidden),
        }
    }

    editor.set_entity_visibility(archboard::ir::EntityKind::Component, false);
    let any_hidden = editor.canvas.iter().any(|element| match element {
        archboard::canvas::Element::Shape(shape) => shape.hidden,
        archboard::canvas::Element::Connection(conn) => conn.hidden,
    });
    assert!(!any_hidden);
}
