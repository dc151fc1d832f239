//! Embedding images in place of placeholders.

use super::stats::PostProcessStats;
use crate::detect::{is_supported_extension, probe_image, ImageInfo};
use crate::docx::wml::{inline_picture, new_run, RunFormat};
use crate::docx::{Element, Length, Media};
use crate::error::Result;
use crate::markdown::ImageRef;
use std::path::Path;

/// Widest an embedded image may be: 6 inches.
pub const MAX_IMAGE_WIDTH: Length = Length::emu(6 * crate::docx::units::EMU_PER_INCH);

/// Display size of an image, scaled down to [`MAX_IMAGE_WIDTH`] when wider.
pub fn fit_width(info: &ImageInfo) -> (Length, Length) {
    let width = info.width();
    let height = info.height();
    if width <= MAX_IMAGE_WIDTH || width.as_emu() == 0 {
        return (width, height);
    }
    let scaled = (MAX_IMAGE_WIDTH.as_emu() as i128 * height.as_emu() as i128
        / width.as_emu() as i128) as i64;
    (MAX_IMAGE_WIDTH, Length::emu(scaled))
}

/// Outcome of embedding one image reference.
#[derive(Debug)]
pub(crate) enum Embedded {
    /// A run holding the picture
    Picture(Element),
    /// A text run describing why the image is absent
    Fallback(Element),
}

fn load(path: &Path) -> Result<(Vec<u8>, ImageInfo)> {
    let data = std::fs::read(path)?;
    let info = probe_image(&data)?;
    Ok((data, info))
}

/// Build the run that replaces one placeholder.
pub(crate) fn embed_image(
    image: &ImageRef,
    image_dir: &Path,
    media: &mut Media,
    stats: &mut PostProcessStats,
) -> Embedded {
    let path = image_dir.join(&image.path);

    if !is_supported_extension(&path) {
        log::warn!(
            "Unsupported image format: {}",
            path.extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default()
        );
    }
    log::info!("Processing image: {}", path.display());

    if !path.exists() {
        log::warn!("Image not found: {}", path.display());
        stats.images_missing += 1;
        let text = format!("[Image not found: {}]", image.alt_text);
        return Embedded::Fallback(new_run(&text, &RunFormat::new()));
    }

    match load(&path) {
        Ok((data, info)) => {
            let (cx, cy) = fit_width(&info);
            let rel_id = media.add_image(data, info.format.extension());
            let id = media.next_drawing_id();
            stats.images_embedded += 1;
            log::info!("Added image: {}", image.path);
            Embedded::Picture(inline_picture(
                &rel_id,
                id,
                &image.alt_text,
                cx.as_emu(),
                cy.as_emu(),
            ))
        }
        Err(e) => {
            log::error!("Error adding image {}: {}", image.path, e);
            stats.images_failed += 1;
            let text = format!("[Image: {}]", image.alt_text);
            Embedded::Fallback(new_run(&text, &RunFormat::new()))
        }
    }
}
