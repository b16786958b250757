//! Lookup facade over the canvas element registry, resolving domain ids to
//! visual elements and back.

use crate::canvas::{Canvas, Connection, Element, Shape};
use crate::ir::{ComponentData, Entity};

/// Resolves a domain-entity id to its visual element.
pub fn find_entity<'a>(canvas: &'a Canvas, domain_id: &str) -> Option<&'a Element> {
    canvas
        .iter()
        .find(|element| element.entity().and_then(Entity::domain_id) == Some(domain_id))
}

pub fn find_entity_mut<'a>(canvas: &'a mut Canvas, domain_id: &str) -> Option<&'a mut Element> {
    canvas
        .iter_mut()
        .find(|element| element.entity().and_then(Entity::domain_id) == Some(domain_id))
}

pub fn find_entity_id(canvas: &Canvas, domain_id: &str) -> Option<String> {
    find_entity(canvas, domain_id).map(|element| element.id().to_string())
}

pub fn shape<'a>(canvas: &'a Canvas, shape_id: &str) -> Option<&'a Shape> {
    canvas.get(shape_id).and_then(Element::as_shape)
}

pub fn shape_mut<'a>(canvas: &'a mut Canvas, shape_id: &str) -> Option<&'a mut Shape> {
    canvas.get_mut(shape_id).and_then(Element::as_shape_mut)
}

pub fn connection<'a>(canvas: &'a Canvas, conn_id: &str) -> Option<&'a Connection> {
    canvas.get(conn_id).and_then(Element::as_connection)
}

pub fn connection_mut<'a>(canvas: &'a mut Canvas, conn_id: &str) -> Option<&'a mut Connection> {
    canvas.get_mut(conn_id).and_then(Element::as_connection_mut)
}

/// Component record for a component domain id, if the id resolves to a
/// component shape.
pub fn component_data<'a>(canvas: &'a Canvas, domain_id: &str) -> Option<&'a ComponentData> {
    match find_entity(canvas, domain_id)?.entity()? {
        Entity::Component(data) => Some(data),
        _ => None,
    }
}

pub fn component_data_mut<'a>(
    canvas: &'a mut Canvas,
    domain_id: &str,
) -> Option<&'a mut ComponentData> {
    match find_entity_mut(canvas, domain_id)?.entity_mut()? {
        Entity::Component(data) => Some(data),
        _ => None,
    }
}
