use crate::canvas::{Canvas, Element};
use crate::config::DiagramConfig;
use crate::error::{Error, Result};
use crate::ir::{Entity, EntityKind};
use crate::registry;

/// Facade over the synchronization layer: owns the canvas store and the
/// diagram configuration. Factory, connection, serialization, theme and
/// layout operations are implemented in their own modules as `impl Editor`
/// blocks or free functions over the canvas.
#[derive(Debug, Default)]
pub struct Editor {
    pub canvas: Canvas,
    pub config: DiagramConfig,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagramConfig) -> Self {
        Self {
            canvas: Canvas::new(),
            config,
        }
    }

    /// Deletes the entity with the given domain id.
    ///
    /// Components cascade: version badge, attached interfaces and issue
    /// folders, their sub-connections, and any connection touching a removed
    /// shape all go with them. Interfaces and issue folders are also removed
    /// from their owner's child list. Sub-connections are not independently
    /// deletable and the request is ignored.
    pub fn delete(&mut self, domain_id: &str) -> Result<()> {
        let element = registry::find_entity(&self.canvas, domain_id)
            .ok_or_else(|| Error::not_found(domain_id))?;
        let element_id = element.id().to_string();
        let entity = element.entity().cloned().ok_or_else(|| {
            Error::InconsistentState(format!("element {element_id} has no business data"))
        })?;

        match entity {
            Entity::SubConnection(_) => Ok(()),
            Entity::VersionBadge => Ok(()),
            Entity::Connection(_) => {
                self.canvas.remove_element(&element_id);
                Ok(())
            }
            Entity::Component(data) => {
                let mut doomed = Vec::new();
                if let Some(shape) = registry::shape(&self.canvas, &element_id)
                    && let Some(badge_id) = &shape.version_badge
                {
                    doomed.push(badge_id.clone());
                }
                for interface in &data.interfaces {
                    doomed.push(interface.shape_id.clone());
                }
                for issue in &data.issues {
                    doomed.push(issue.shape_id.clone());
                }
                doomed.push(element_id);
                for id in doomed {
                    self.canvas.remove_element(&id);
                }
                Ok(())
            }
            Entity::Interface(data) => {
                if let Some(owner) = registry::component_data_mut(&mut self.canvas, &data.owner) {
                    owner.interfaces.retain(|interface| interface.id != data.id);
                }
                self.canvas.remove_element(&element_id);
                Ok(())
            }
            Entity::IssueFolder(data) => {
                if let Some(owner) = registry::component_data_mut(&mut self.canvas, &data.owner) {
                    owner.issues.retain(|issue| issue.id != data.id);
                }
                self.canvas.remove_element(&element_id);
                Ok(())
            }
        }
    }

    /// Hides or shows every element of one entity kind. Hiding a component
    /// extends to its badge, children and every connection touching a hidden
    /// shape.
    pub fn set_entity_visibility(&mut self, kind: EntityKind, hidden: bool) {
        let mut affected_shapes: Vec<String> = Vec::new();

        for id in self.canvas.snapshot_ids() {
            let Some(element) = self.canvas.get(&id) else {
                continue;
            };
            let Some(entity) = element.entity() else {
                continue;
            };
            if entity.kind() != kind {
                continue;
            }
            match element {
                Element::Shape(shape) => {
                    affected_shapes.push(id.clone());
                    if let Some(badge_id) = &shape.version_badge {
                        affected_shapes.push(badge_id.clone());
                    }
                    if let Entity::Component(data) = entity {
                        for interface in &data.interfaces {
                            affected_shapes.push(interface.shape_id.clone());
                        }
                        for issue in &data.issues {
                            affected_shapes.push(issue.shape_id.clone());
                        }
                    }
                }
                Element::Connection(_) => {
                    if let Some(conn) = registry::connection_mut(&mut self.canvas, &id) {
                        conn.hidden = hidden;
                    }
                    self.canvas.fire_changed(&id);
                }
            }
        }

        for shape_id in &affected_shapes {
            if let Some(shape) = registry::shape_mut(&mut self.canvas, shape_id) {
                shape.hidden = hidden;
            }
            self.canvas.fire_changed(shape_id);
        }

        // Connections attached to a hidden shape follow it.
        for id in self.canvas.snapshot_ids() {
            let Some(Element::Connection(conn)) = self.canvas.get(&id) else {
                continue;
            };
            if affected_shapes.contains(&conn.source) || affected_shapes.contains(&conn.target) {
                if let Some(conn) = registry::connection_mut(&mut self.canvas, &id) {
                    conn.hidden = hidden;
                }
                self.canvas.fire_changed(&id);
            }
        }
    }

    /// Re-themes all visible elements for light or dark mode.
    pub fn set_dark_mode(&mut self, enabled: bool) {
        crate::theme::set_dark_mode(&mut self.canvas, enabled);
    }
}
