//! Graphic module - feature graphic rendering

mod font;
mod renderer;

pub use renderer::{FeatureGraphicRenderer, RenderError};
