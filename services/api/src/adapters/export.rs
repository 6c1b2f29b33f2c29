//! services/api/src/adapters/export.rs
//!
//! The export pipeline: rasterizes a rendered SVG surface to a PNG at a
//! fixed upscaling factor over a solid white background, and optionally
//! wraps the raster in a single-page PDF sized to the image's physical
//! dimensions. No partial artifacts are ever produced; any failure maps to
//! a port error for the web layer to report.

use std::io::Cursor;

use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::image_crate::ImageDecoder;
use printpdf::{Image, ImageTransform, Mm, PdfDocument};
use resvg::tiny_skia;
use resvg::usvg;

use membership_core::ports::{PortError, PortResult};

/// Matches the on-screen snapshot factor of the original surfaces.
const RASTER_SCALE: f32 = 2.0;

/// Millimetres per CSS pixel at 96 dpi.
const PX_TO_MM: f32 = 0.264583;

/// Pixel density the raster is embedded at, the inverse of `PX_TO_MM`.
const EMBED_DPI: f32 = 96.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// A finished downloadable artifact.
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

/// Renders an SVG surface into PNG bytes at `RASTER_SCALE`, over white.
pub fn rasterize(svg: &str) -> PortResult<Vec<u8>> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| PortError::Unexpected(format!("could not parse the rendered surface: {e}")))?;

    let width = (tree.size().width() * RASTER_SCALE).round() as u32;
    let height = (tree.size().height() * RASTER_SCALE).round() as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        PortError::Unexpected(format!("surface has a degenerate size {width}x{height}"))
    })?;

    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(RASTER_SCALE, RASTER_SCALE),
        &mut pixmap.as_mut(),
    );

    pixmap
        .encode_png()
        .map_err(|e| PortError::Unexpected(format!("could not encode the snapshot: {e}")))
}

/// Wraps PNG bytes in a one-page PDF whose page matches the image's
/// physical size at `EMBED_DPI`.
pub fn to_document(png: &[u8], title: &str) -> PortResult<Vec<u8>> {
    let decoder = PngDecoder::new(Cursor::new(png))
        .map_err(|e| PortError::Unexpected(format!("could not decode the snapshot: {e}")))?;
    let (width_px, height_px) = decoder.dimensions();

    let page_width = Mm(width_px as f32 * PX_TO_MM);
    let page_height = Mm(height_px as f32 * PX_TO_MM);
    let (doc, page, layer) = PdfDocument::new(title, page_width, page_height, "Layer 1");

    let image = Image::try_from(decoder)
        .map_err(|e| PortError::Unexpected(format!("could not embed the snapshot: {e}")))?;
    image.add_to_layer(
        doc.get_page(page).get_layer(layer),
        ImageTransform {
            dpi: Some(EMBED_DPI),
            ..Default::default()
        },
    );

    doc.save_to_bytes()
        .map_err(|e| PortError::Unexpected(format!("could not assemble the document: {e}")))
}

/// Produces the artifact for one surface in the requested format.
pub fn export(svg: &str, title: &str, filename_stem: &str, format: ExportFormat) -> PortResult<ExportArtifact> {
    let png = rasterize(svg)?;
    let bytes = match format {
        ExportFormat::Png => png,
        ExportFormat::Pdf => to_document(&png, title)?,
    };
    Ok(ExportArtifact {
        bytes,
        content_type: format.content_type(),
        filename: format!("{}.{}", filename_stem, format.extension()),
    })
}
