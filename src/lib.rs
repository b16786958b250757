pub mod canvas;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod connect;
pub mod default_types;
pub mod document;
pub mod editor;
pub mod error;
pub mod events;
pub mod factory;
pub mod ir;
pub mod layout;
pub mod registry;
pub mod text_fit;
pub mod theme;
pub mod util;

pub use canvas::{Canvas, CanvasEvent, Element};
pub use document::Document;
pub use editor::Editor;
pub use error::{Error, Result};
pub use events::EditorHooks;
pub use layout::{LayoutEngine, StackedEngine};

#[cfg(feature = "cli")]
pub use cli::run;
