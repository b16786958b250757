//! Connection and sub-connection manager. Connections are the user-visible
//! edges between top-level entities; sub-connections tether an interface or
//! issue folder to its owning component and are distinguished from regular
//! connections only by their entity discriminant.

use crate::canvas::Connection;
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::ir::{ConnectionData, ConnectionStyle, Entity, Point};
use crate::registry;

impl Editor {
    /// Creates a styled, business-tagged connection between two domain
    /// entities. Without explicit waypoints the edge runs from the
    /// right-center of the source's bounding box to the left-center of the
    /// target's. Without an explicit id one is derived from the endpoint ids.
    pub fn create_connection(
        &mut self,
        id: Option<&str>,
        source: &str,
        target: &str,
        style: ConnectionStyle,
        waypoints: Option<Vec<Point>>,
    ) -> Result<String> {
        self.materialize_connection(id, source, target, style, waypoints, false)
    }

    pub(crate) fn create_sub_connection(
        &mut self,
        source: &str,
        target: &str,
        style: ConnectionStyle,
        waypoints: Option<Vec<Point>>,
    ) -> Result<String> {
        self.materialize_connection(None, source, target, style, waypoints, true)
    }

    fn materialize_connection(
        &mut self,
        id: Option<&str>,
        source: &str,
        target: &str,
        style: ConnectionStyle,
        waypoints: Option<Vec<Point>>,
        sub_connection: bool,
    ) -> Result<String> {
        let source_element =
            registry::find_entity(&self.canvas, source).ok_or_else(|| Error::not_found(source))?;
        let source_shape = source_element.as_shape().ok_or_else(|| {
            Error::InconsistentState(format!("connection source {source} is not a shape"))
        })?;
        let (source_shape_id, source_anchor) = (
            source_shape.id.clone(),
            Point::new(
                source_shape.x + source_shape.width,
                source_shape.y + source_shape.height / 2.0,
            ),
        );

        let target_element =
            registry::find_entity(&self.canvas, target).ok_or_else(|| Error::not_found(target))?;
        let target_shape = target_element.as_shape().ok_or_else(|| {
            Error::InconsistentState(format!("connection target {target} is not a shape"))
        })?;
        let (target_shape_id, target_anchor) = (
            target_shape.id.clone(),
            Point::new(target_shape.x, target_shape.y + target_shape.height / 2.0),
        );

        let waypoints = waypoints.unwrap_or_else(|| vec![source_anchor, target_anchor]);
        let domain_id = id
            .map(str::to_string)
            .unwrap_or_else(|| format!("{source}-{target}"));
        let data = ConnectionData {
            id: domain_id,
            source: source.to_string(),
            target: target.to_string(),
        };
        let entity = if sub_connection {
            Entity::SubConnection(data)
        } else {
            Entity::Connection(data)
        };

        Ok(self.canvas.add_connection(Connection {
            id: String::new(),
            source: source_shape_id,
            target: target_shape_id,
            waypoints,
            style,
            materialized: true,
            hidden: false,
            entity: Some(entity),
        }))
    }
}
