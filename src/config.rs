use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFitConfig {
    /// Estimated width of one character in canvas units.
    pub char_width: f64,
    /// Estimated height of one text line in canvas units.
    pub line_height: f64,
    /// Width increment per growth step; height grows proportionally.
    pub growth_step: f64,
}

impl Default for TextFitConfig {
    fn default() -> Self {
        Self {
            char_width: 10.0,
            line_height: 20.0,
            growth_step: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeConfig {
    pub width: f64,
    pub height: f64,
    pub stroke_width: f64,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            width: 90.0,
            height: 40.0,
            stroke_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSpacing {
    /// Offset of the layouted graph's origin on the canvas.
    pub root_x: f64,
    pub root_y: f64,
    /// Extra height reserved under component and interface nodes for their
    /// labels when the graph is compiled for the layout engine.
    pub label_headroom: f64,
}

impl Default for LayoutSpacing {
    fn default() -> Self {
        Self {
            root_x: 150.0,
            root_y: 100.0,
            label_headroom: 40.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub text_fit: TextFitConfig,
    pub badge: BadgeConfig,
    pub layout: LayoutSpacing,
    /// Horizontal gap between a component and an interactively attached
    /// interface or issue folder when no coordinates are supplied.
    pub attach_offset: f64,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            text_fit: TextFitConfig::default(),
            badge: BadgeConfig::default(),
            layout: LayoutSpacing::default(),
            attach_offset: 40.0,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<DiagramConfig> {
    let Some(path) = path else {
        return Ok(DiagramConfig::default());
    };

    let contents = std::fs::read_to_string(path)?;
    let config: DiagramConfig = serde_json::from_str(&contents)?;
    Ok(config)
}
