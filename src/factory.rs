//! Shape/entity factory: builds the visual shape(s) for each domain-entity
//! kind and records the cross-references between them.

use crate::canvas::{Shape, VisualStyle};
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::ir::{
    ComponentData, ComponentType, ConnectionMarker, ConnectionStyle, Entity, InterfaceData,
    IssueFolderData, Point, ShapeKind,
};
use crate::registry;
use crate::text_fit;
use crate::theme::TRANSPARENT;
use crate::util;

const INTERFACE_MIN_SIZE: f64 = 50.0;
const INTERFACE_MAX_SCALE: f64 = 2.0;
const ISSUE_FOLDER_SIZE: f64 = 40.0;
// Fits a source icon path onto the folder's 40x40 bounds.
const ISSUE_ICON_SCALE: f64 = 1.8;
const ISSUE_ICON_OFFSET: f64 = -9.0;

/// Badge offset relative to the parent shape's origin. Every currently
/// supported shape kind anchors the badge centered on the bottom edge.
fn badge_offset(kind: ShapeKind, width: f64, height: f64, badge_width: f64, badge_height: f64) -> Point {
    match kind {
        ShapeKind::Rectangle
        | ShapeKind::RectangleRounded
        | ShapeKind::Triangle
        | ShapeKind::Circle
        | ShapeKind::Diamond
        | ShapeKind::Hexagon
        | ShapeKind::Octagon
        | ShapeKind::Ellipse
        | ShapeKind::Parallelogram
        | ShapeKind::Trapeze
        | ShapeKind::InterfaceProvide
        | ShapeKind::InterfaceRequire => {
            Point::new(width / 2.0 - badge_width / 2.0, height - badge_height / 2.0)
        }
    }
}

impl Editor {
    /// Creates a component shape plus its version badge and stamps the shape
    /// id back onto the domain record.
    pub fn create_component(
        &mut self,
        id: &str,
        name: &str,
        version: &str,
        component_type: ComponentType,
        position: Point,
    ) -> Result<String> {
        let data = ComponentData {
            id: id.to_string(),
            shape_id: String::new(),
            name: name.to_string(),
            version: version.to_string(),
            component_type,
            interfaces: Vec::new(),
            issues: Vec::new(),
        };
        self.draw_component(data, position)
    }

    /// Shared by `create_component` and document import, which replays an
    /// already populated record at its stored coordinates.
    pub(crate) fn draw_component(&mut self, data: ComponentData, position: Point) -> Result<String> {
        let style = &data.component_type.style;
        let dims = text_fit::fit_dimensions(
            style.min_width,
            style.min_height,
            style.max_scale,
            &data.name,
            data.component_type.shape,
            &self.config.text_fit,
        );

        let label = data.name.clone();
        let version = data.version.clone();
        let kind = data.component_type.shape;
        let visual = VisualStyle {
            fill: style.color.clone(),
            stroke: style.stroke.clone(),
            stroke_width: style.stroke_width,
            stroke_dasharray: style.stroke_dasharray.clone(),
            radius: style.radius,
            white_text: false,
        };

        let shape_id = self.canvas.add_shape(Shape {
            id: String::new(),
            x: position.x,
            y: position.y,
            width: dims.width,
            height: dims.height,
            style: visual,
            label: Some(label),
            icon: None,
            frame: false,
            hidden: false,
            entity: Some(Entity::Component(data)),
            version_badge: None,
        });

        let badge_id = self.draw_version_badge(&shape_id, kind, dims.width, dims.height, &version);
        if let Some(shape) = registry::shape_mut(&mut self.canvas, &shape_id) {
            shape.version_badge = Some(badge_id);
            if let Some(Entity::Component(data)) = shape.entity.as_mut() {
                data.shape_id = shape_id.clone();
            }
        }
        Ok(shape_id)
    }

    fn draw_version_badge(
        &mut self,
        parent_id: &str,
        parent_kind: ShapeKind,
        parent_width: f64,
        parent_height: f64,
        version: &str,
    ) -> String {
        let badge = &self.config.badge;
        let palette = crate::theme::Palette::default();
        let offset = badge_offset(parent_kind, parent_width, parent_height, badge.width, badge.height);
        let (px, py) = registry::shape(&self.canvas, parent_id)
            .map(|shape| (shape.x, shape.y))
            .unwrap_or_default();

        self.canvas.add_shape(Shape {
            id: String::new(),
            x: px + offset.x,
            y: py + offset.y,
            width: badge.width,
            height: badge.height,
            style: VisualStyle {
                fill: palette.badge_light_fill,
                stroke: palette.badge_light_stroke,
                stroke_width: badge.stroke_width,
                stroke_dasharray: String::new(),
                radius: 0.0,
                white_text: false,
            },
            label: Some(version.to_string()),
            icon: None,
            frame: false,
            hidden: false,
            entity: Some(Entity::VersionBadge),
            version_badge: None,
        })
    }

    /// Creates an interface shape attached to `owner`, tethers it with a
    /// sub-connection and appends it to the owner's interface list. Without
    /// explicit coordinates the shape lands middle-right of the owner.
    #[allow(clippy::too_many_arguments)]
    pub fn create_interface(
        &mut self,
        owner: &str,
        id: &str,
        name: &str,
        shape: ShapeKind,
        version: &str,
        open: bool,
        coordinates: Option<Point>,
        waypoints: Option<Vec<Point>>,
    ) -> Result<String> {
        let parent = registry::find_entity(&self.canvas, owner)
            .ok_or_else(|| Error::not_found(owner))?;
        let parent_shape = parent.as_shape().ok_or_else(|| {
            Error::InconsistentState(format!("owner {owner} is not a shape"))
        })?;
        let Some(Entity::Component(parent_data)) = &parent_shape.entity else {
            return Err(Error::InconsistentState(format!(
                "owner {owner} is not a component"
            )));
        };

        let parent_style = parent_data.component_type.style.clone();
        let label = format!("{name}\n{version}");
        let dims = text_fit::fit_dimensions(
            INTERFACE_MIN_SIZE,
            INTERFACE_MIN_SIZE,
            INTERFACE_MAX_SCALE,
            name,
            shape,
            &self.config.text_fit,
        );
        let coordinates = coordinates.unwrap_or_else(|| {
            Point::new(
                parent_shape.x + parent_shape.width + self.config.attach_offset,
                parent_shape.y + parent_shape.height / 2.0 - dims.height / 2.0,
            )
        });

        let data = InterfaceData {
            id: id.to_string(),
            shape_id: String::new(),
            connection_id: String::new(),
            owner: owner.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            shape,
            open,
        };

        let fill = if open {
            parent_style.color.clone()
        } else {
            TRANSPARENT.to_string()
        };
        let shape_id = self.canvas.add_shape(Shape {
            id: String::new(),
            x: coordinates.x,
            y: coordinates.y,
            width: dims.width,
            height: dims.height,
            style: VisualStyle {
                fill,
                stroke: parent_style.stroke.clone(),
                stroke_width: parent_style.stroke_width,
                stroke_dasharray: parent_style.stroke_dasharray.clone(),
                radius: parent_style.radius,
                white_text: false,
            },
            label: Some(label),
            icon: None,
            frame: false,
            hidden: false,
            entity: Some(Entity::Interface(data)),
            version_badge: None,
        });

        let tether_style = ConnectionStyle {
            color: parent_style.stroke.clone(),
            stroke_width: 2.0,
            stroke_dasharray: String::new(),
            source_marker: ConnectionMarker::None,
            target_marker: ConnectionMarker::OpenArrow,
        };
        let connection_id = self.create_sub_connection(owner, id, tether_style, waypoints)?;

        self.stamp_interface(&shape_id, &connection_id);
        Ok(shape_id)
    }

    fn stamp_interface(&mut self, shape_id: &str, connection_id: &str) {
        let mut record = None;
        if let Some(shape) = registry::shape_mut(&mut self.canvas, shape_id)
            && let Some(Entity::Interface(data)) = shape.entity.as_mut()
        {
            data.shape_id = shape_id.to_string();
            data.connection_id = connection_id.to_string();
            record = Some(data.clone());
        }
        if let Some(record) = record {
            let owner = record.owner.clone();
            if let Some(owner_data) = registry::component_data_mut(&mut self.canvas, &owner) {
                owner_data.interfaces.push(record);
            }
        }
    }

    /// Creates an issue folder attached to `owner`, tethered like an
    /// interface.
    pub fn create_issue_folder(
        &mut self,
        owner: &str,
        id: &str,
        icon_path: &str,
        color: &str,
        coordinates: Option<Point>,
    ) -> Result<String> {
        let parent = registry::find_entity(&self.canvas, owner)
            .ok_or_else(|| Error::not_found(owner))?;
        let parent_shape = parent.as_shape().ok_or_else(|| {
            Error::InconsistentState(format!("owner {owner} is not a shape"))
        })?;
        let Some(Entity::Component(parent_data)) = &parent_shape.entity else {
            return Err(Error::InconsistentState(format!(
                "owner {owner} is not a component"
            )));
        };
        let parent_style = parent_data.component_type.style.clone();

        let coordinates = coordinates.unwrap_or_else(|| {
            Point::new(
                parent_shape.x + parent_shape.width + self.config.attach_offset,
                parent_shape.y + parent_shape.height / 2.0 - ISSUE_FOLDER_SIZE / 2.0,
            )
        });

        let data = IssueFolderData {
            id: id.to_string(),
            shape_id: String::new(),
            connection_id: String::new(),
            owner: owner.to_string(),
            icon_path: icon_path.to_string(),
            color: color.to_string(),
        };

        let shape_id = self.canvas.add_shape(Shape {
            id: String::new(),
            x: coordinates.x,
            y: coordinates.y,
            width: ISSUE_FOLDER_SIZE,
            height: ISSUE_FOLDER_SIZE,
            style: VisualStyle {
                fill: color.to_string(),
                stroke: TRANSPARENT.to_string(),
                stroke_width: parent_style.stroke_width,
                stroke_dasharray: String::new(),
                radius: 0.0,
                white_text: false,
            },
            label: None,
            icon: Some(util::scale_svg_path(
                icon_path,
                ISSUE_ICON_SCALE,
                ISSUE_ICON_OFFSET,
                ISSUE_ICON_OFFSET,
            )),
            frame: false,
            hidden: false,
            entity: Some(Entity::IssueFolder(data)),
            version_badge: None,
        });

        let tether_style = ConnectionStyle {
            color: parent_style.stroke.clone(),
            stroke_width: 2.0,
            stroke_dasharray: String::new(),
            source_marker: ConnectionMarker::None,
            target_marker: ConnectionMarker::OpenArrow,
        };
        let connection_id = self.create_sub_connection(owner, id, tether_style, None)?;

        let mut record = None;
        if let Some(shape) = registry::shape_mut(&mut self.canvas, &shape_id)
            && let Some(Entity::IssueFolder(data)) = shape.entity.as_mut()
        {
            data.shape_id = shape_id.clone();
            data.connection_id = connection_id.clone();
            record = Some(data.clone());
        }
        if let Some(record) = record {
            let owner_id = record.owner.clone();
            if let Some(owner_data) = registry::component_data_mut(&mut self.canvas, &owner_id) {
                owner_data.issues.push(record);
            }
        }
        Ok(shape_id)
    }
}
