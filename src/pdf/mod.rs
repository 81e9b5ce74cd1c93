mod asset;
mod encoder;
mod layout;

pub use asset::{load_asset, LogoAsset};
pub use encoder::encode;
pub use layout::{
    max_rows, render, Color, DrawInstruction, FontWeight, ImageRef, RenderSettings, TextStyle,
    PAGE_HEIGHT, PAGE_WIDTH,
};

use crate::error::RenderError;
use crate::quotation::Quotation;

/// Render `quotation` and encode it as PDF bytes.
///
/// The logo must already be loaded; see [`load_asset`].
pub fn generate_pdf(
    quotation: &Quotation,
    logo: &LogoAsset,
    settings: &RenderSettings,
) -> Result<Vec<u8>, RenderError> {
    let instructions = render(quotation, logo, settings)?;
    encode(&instructions, logo)
}
