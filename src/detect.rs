//! Image format detection and resolution probing.

use crate::docx::units::EMU_PER_INCH;
use crate::docx::Length;
use crate::error::{Error, Result};
use std::io::Cursor;
use std::path::Path;

/// Image file extensions accepted for embedding.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// Resolution assumed when the file does not record one.
pub const DEFAULT_DPI: f64 = 72.0;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Raster formats that can be embedded in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension().to_uppercase())
    }
}

/// Dimensions and resolution of an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    /// Width in pixels
    pub width_px: u32,
    /// Height in pixels
    pub height_px: u32,
    /// Horizontal resolution in dots per inch
    pub dpi_x: f64,
    /// Vertical resolution in dots per inch
    pub dpi_y: f64,
}

impl ImageInfo {
    /// Natural display width.
    pub fn width(&self) -> Length {
        Length::emu((self.width_px as f64 / self.dpi_x * EMU_PER_INCH as f64).round() as i64)
    }

    /// Natural display height.
    pub fn height(&self) -> Length {
        Length::emu((self.height_px as f64 / self.dpi_y * EMU_PER_INCH as f64).round() as i64)
    }
}

/// Whether the path has an extension from [`SUPPORTED_EXTENSIONS`].
pub fn is_supported_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Detect the image format from its leading bytes.
pub fn detect_format_from_bytes(data: &[u8]) -> Option<ImageFormat> {
    if data.starts_with(PNG_MAGIC) {
        Some(ImageFormat::Png)
    } else if data.starts_with(JPEG_MAGIC) {
        Some(ImageFormat::Jpeg)
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some(ImageFormat::Gif)
    } else if data.starts_with(b"BM") && data.len() >= 26 {
        Some(ImageFormat::Bmp)
    } else {
        None
    }
}

/// Read format, pixel size and resolution of an encoded image.
///
/// # Example
/// ```no_run
/// use mdocx::detect::probe_image;
///
/// let data = std::fs::read("img/chart.png").unwrap();
/// let info = probe_image(&data).unwrap();
/// println!("{}x{} px at {} dpi", info.width_px, info.height_px, info.dpi_x);
/// ```
pub fn probe_image(data: &[u8]) -> Result<ImageInfo> {
    let format = detect_format_from_bytes(data)
        .ok_or_else(|| Error::Image("unrecognized image format".to_string()))?;

    let (width_px, height_px) = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .into_dimensions()?;
    if width_px == 0 || height_px == 0 {
        return Err(Error::Image("image has zero size".to_string()));
    }

    let (dpi_x, dpi_y) = match format {
        ImageFormat::Png => png_dpi(data),
        ImageFormat::Jpeg => jfif_dpi(data),
        ImageFormat::Bmp => bmp_dpi(data),
        ImageFormat::Gif => None,
    }
    .unwrap_or((DEFAULT_DPI, DEFAULT_DPI));

    Ok(ImageInfo {
        format,
        width_px,
        height_px,
        dpi_x,
        dpi_y,
    })
}

fn usable_dpi(x: f64, y: f64) -> Option<(f64, f64)> {
    let fix = |v: f64| if v >= 1.0 { v.round() } else { DEFAULT_DPI };
    if x <= 0.0 && y <= 0.0 {
        None
    } else {
        Some((fix(x), fix(y)))
    }
}

fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Resolution from the PNG `pHYs` chunk.
fn png_dpi(data: &[u8]) -> Option<(f64, f64)> {
    let mut pos = PNG_MAGIC.len();
    while pos + 8 <= data.len() {
        let len = be_u32(&data[pos..]) as usize;
        let kind = &data[pos + 4..pos + 8];
        let body = pos + 8;
        match kind {
            b"pHYs" if len >= 9 && body + 9 <= data.len() => {
                // Unit 1 means pixels per metre; 0 is aspect ratio only
                if data[body + 8] != 1 {
                    return None;
                }
                let x = be_u32(&data[body..]) as f64 * 0.0254;
                let y = be_u32(&data[body + 4..]) as f64 * 0.0254;
                return usable_dpi(x, y);
            }
            b"IDAT" | b"IEND" => return None,
            _ => {}
        }
        pos = body.checked_add(len)?.checked_add(4)?;
    }
    None
}

/// Resolution from the JPEG JFIF APP0 segment.
fn jfif_dpi(data: &[u8]) -> Option<(f64, f64)> {
    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        // Start of scan: no more metadata segments
        if marker == 0xDA || marker == 0xD9 {
            return None;
        }
        let len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        let segment = pos + 4;
        if marker == 0xE0
            && len >= 14
            && segment + 12 <= data.len()
            && &data[segment..segment + 5] == b"JFIF\0"
        {
            let units = data[segment + 7];
            let x = u16::from_be_bytes([data[segment + 8], data[segment + 9]]) as f64;
            let y = u16::from_be_bytes([data[segment + 10], data[segment + 11]]) as f64;
            return match units {
                1 => usable_dpi(x, y),
                2 => usable_dpi(x * 2.54, y * 2.54),
                _ => None,
            };
        }
        pos = pos + 2 + len;
    }
    None
}

/// Resolution from the BMP info header (pixels per metre).
fn bmp_dpi(data: &[u8]) -> Option<(f64, f64)> {
    if data.len() < 46 {
        return None;
    }
    let x = i32::from_le_bytes([data[38], data[39], data[40], data[41]]) as f64 * 0.0254;
    let y = i32::from_le_bytes([data[42], data[43], data[44], data[45]]) as f64 * 0.0254;
    usable_dpi(x, y)
}
