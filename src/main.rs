//! Feature Graphic - store listing asset generator
//!
//! Renders the fixed 1024x500 promotional graphic and writes it to
//! store-assets/feature-graphic.png in the working directory.

mod graphic;

use anyhow::Result;
use graphic::FeatureGraphicRenderer;

fn main() -> Result<()> {
    env_logger::init();

    let path = FeatureGraphicRenderer::render()?;
    println!("✅ Feature graphic created: {}", path.display());
    Ok(())
}
