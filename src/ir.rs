use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    RectangleRounded,
    Triangle,
    Circle,
    Diamond,
    Hexagon,
    Octagon,
    Ellipse,
    Parallelogram,
    Trapeze,
    InterfaceProvide,
    InterfaceRequire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionMarker {
    None,
    Default,
    Round,
    OpenArrow,
    Composition,
    Slash,
}

/// Style block of a component type descriptor. Minimum size and `max_scale`
/// bound the text-fitting heuristic; the rest is plain visual styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub min_width: f64,
    pub min_height: f64,
    pub max_scale: f64,
    pub color: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub stroke_dasharray: String,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentType {
    pub name: String,
    pub shape: ShapeKind,
    pub style: ShapeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStyle {
    pub color: String,
    pub stroke_width: f64,
    pub stroke_dasharray: String,
    pub source_marker: ConnectionMarker,
    pub target_marker: ConnectionMarker,
}

impl Default for ConnectionStyle {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            stroke_width: 2.0,
            stroke_dasharray: String::new(),
            source_marker: ConnectionMarker::None,
            target_marker: ConnectionMarker::OpenArrow,
        }
    }
}

/// Domain record of a top-level component. The `interfaces` and `issues`
/// lists index the children attached to this component; they and `shape_id`
/// are runtime cross-references and never serialized (children are emitted
/// as their own document records).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentData {
    pub id: String,
    #[serde(skip)]
    pub shape_id: String,
    pub name: String,
    pub version: String,
    pub component_type: ComponentType,
    #[serde(skip)]
    pub interfaces: Vec<InterfaceData>,
    #[serde(skip)]
    pub issues: Vec<IssueFolderData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceData {
    pub id: String,
    #[serde(skip)]
    pub shape_id: String,
    #[serde(skip)]
    pub connection_id: String,
    pub owner: String,
    pub name: String,
    pub version: String,
    pub shape: ShapeKind,
    /// Provided (`true`) vs required (`false`); a required interface keeps a
    /// transparent fill in every theme.
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFolderData {
    pub id: String,
    #[serde(skip)]
    pub shape_id: String,
    #[serde(skip)]
    pub connection_id: String,
    pub owner: String,
    pub icon_path: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionData {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Component,
    VersionBadge,
    Interface,
    IssueFolder,
    Connection,
    SubConnection,
}

/// Business data attached to a visual element, one variant per element kind.
/// `Connection` and `SubConnection` carry the same payload; the discriminant
/// alone tells them apart (ids are opaque and must not be inspected).
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Component(ComponentData),
    VersionBadge,
    Interface(InterfaceData),
    IssueFolder(IssueFolderData),
    Connection(ConnectionData),
    SubConnection(ConnectionData),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Component(_) => EntityKind::Component,
            Entity::VersionBadge => EntityKind::VersionBadge,
            Entity::Interface(_) => EntityKind::Interface,
            Entity::IssueFolder(_) => EntityKind::IssueFolder,
            Entity::Connection(_) => EntityKind::Connection,
            Entity::SubConnection(_) => EntityKind::SubConnection,
        }
    }

    /// Domain id of the entity. Version badges are addressed only through
    /// their owning component and expose no id of their own.
    pub fn domain_id(&self) -> Option<&str> {
        match self {
            Entity::Component(data) => Some(&data.id),
            Entity::VersionBadge => None,
            Entity::Interface(data) => Some(&data.id),
            Entity::IssueFolder(data) => Some(&data.id),
            Entity::Connection(data) | Entity::SubConnection(data) => Some(&data.id),
        }
    }
}
