//! Portable diagram document format and the export/import walk.
//!
//! Only components and top-level connections are emitted; version badges,
//! interfaces and issue folders travel inside their owning component's
//! record, and sub-connections are reconstructed implicitly on import.

use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Element};
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::ir::{
    ComponentData, ConnectionStyle, Entity, InterfaceData, IssueFolderData, Point,
};
use crate::registry;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub shapes: Vec<ComponentRecord>,
    pub connections: Vec<ConnectionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    pub domain_entity: ComponentData,
    pub x: f64,
    pub y: f64,
    pub interfaces: Vec<InterfaceRecord>,
    pub issue_folders: Vec<IssueFolderRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceRecord {
    pub domain_entity: InterfaceData,
    pub coordinates: Point,
    pub waypoints: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFolderRecord {
    pub domain_entity: IssueFolderData,
    pub coordinates: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub waypoints: Vec<Point>,
    pub style: ConnectionStyle,
}

/// Walks the registry and serializes every component (with its attached
/// children) and every top-level connection. A child whose shape or
/// tethering sub-connection cannot be resolved is logged and skipped;
/// export of everything else continues.
pub fn export_document(canvas: &Canvas) -> Document {
    let mut document = Document::default();

    for element in canvas.iter() {
        match element {
            Element::Shape(shape) => {
                let Some(Entity::Component(data)) = &shape.entity else {
                    continue;
                };
                document.shapes.push(ComponentRecord {
                    domain_entity: data.clone(),
                    x: shape.x,
                    y: shape.y,
                    interfaces: serialize_interfaces(canvas, data),
                    issue_folders: serialize_issue_folders(canvas, data),
                });
            }
            Element::Connection(conn) => {
                let Some(Entity::Connection(data)) = &conn.entity else {
                    continue;
                };
                document.connections.push(ConnectionRecord {
                    id: data.id.clone(),
                    source_id: data.source.clone(),
                    target_id: data.target.clone(),
                    waypoints: conn.waypoints.clone(),
                    style: conn.style.clone(),
                });
            }
        }
    }

    document
}

fn serialize_interfaces(canvas: &Canvas, owner: &ComponentData) -> Vec<InterfaceRecord> {
    let mut records = Vec::new();
    for interface in &owner.interfaces {
        let Some(shape) = registry::shape(canvas, &interface.shape_id) else {
            log::error!(
                "skipping interface {} of component {}: shape not in registry",
                interface.id,
                owner.id
            );
            continue;
        };
        let Some(tether) = registry::connection(canvas, &interface.connection_id) else {
            log::error!(
                "skipping interface {} of component {}: sub-connection not in registry",
                interface.id,
                owner.id
            );
            continue;
        };
        records.push(InterfaceRecord {
            domain_entity: interface.clone(),
            coordinates: Point::new(shape.x, shape.y),
            waypoints: tether.waypoints.clone(),
        });
    }
    records
}

fn serialize_issue_folders(canvas: &Canvas, owner: &ComponentData) -> Vec<IssueFolderRecord> {
    let mut records = Vec::new();
    for issue in &owner.issues {
        let Some(shape) = registry::shape(canvas, &issue.shape_id) else {
            log::error!(
                "skipping issue folder {} of component {}: shape not in registry",
                issue.id,
                owner.id
            );
            continue;
        };
        records.push(IssueFolderRecord {
            domain_entity: issue.clone(),
            coordinates: Point::new(shape.x, shape.y),
        });
    }
    records
}

impl Editor {
    pub fn export_document(&self) -> Document {
        export_document(&self.canvas)
    }

    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.export_document())
            .map_err(|err| Error::InconsistentState(format!("document serialization: {err}")))
    }

    /// Rebuilds the live graph from a document: components at their stored
    /// coordinates first, then each serialized interface and issue folder at
    /// its explicit position and waypoints, then top-level connections.
    pub fn import_document(&mut self, document: &Document) -> Result<()> {
        for record in &document.shapes {
            let mut data = record.domain_entity.clone();
            data.shape_id.clear();
            data.interfaces.clear();
            data.issues.clear();
            self.draw_component(data, Point::new(record.x, record.y))?;

            for interface in &record.interfaces {
                let entity = &interface.domain_entity;
                self.create_interface(
                    &entity.owner,
                    &entity.id,
                    &entity.name,
                    entity.shape,
                    &entity.version,
                    entity.open,
                    Some(interface.coordinates),
                    Some(interface.waypoints.clone()),
                )?;
            }
            for issue in &record.issue_folders {
                let entity = &issue.domain_entity;
                self.create_issue_folder(
                    &entity.owner,
                    &entity.id,
                    &entity.icon_path,
                    &entity.color,
                    Some(issue.coordinates),
                )?;
            }
        }

        for conn in &document.connections {
            self.create_connection(
                Some(&conn.id),
                &conn.source_id,
                &conn.target_id,
                conn.style.clone(),
                Some(conn.waypoints.clone()),
            )?;
        }
        Ok(())
    }

    pub fn import_json(&mut self, text: &str) -> Result<()> {
        let document: Document = serde_json::from_str(text)
            .map_err(|err| Error::InconsistentState(format!("invalid document: {err}")))?;
        self.import_document(&document)
    }
}
