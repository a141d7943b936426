//! Scaled overview of a node graph with drag-to-pan.

mod activity;
mod classify;
mod component;
mod config;
mod drag;
mod error;
mod host;
pub mod render;
pub mod scale;
mod scheduler;
mod state;
mod surface;
mod types;

pub use component::Minimap;
pub use config::{Corner, DEFAULT_BYPASS_MODE, MinimapConfig};
pub use host::{ExecutingNode, MinimapHost, NoPreview};
pub use scheduler::{Scheduler, WindowIntervals};
pub use surface::{CanvasSurface, Surface};
pub use types::{GraphGroup, GraphLink, GraphNode, GraphSnapshot, Rect, ViewState};
