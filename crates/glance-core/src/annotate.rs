//! Bounding-box annotation.
//!
//! Draws an outlined rectangle per face, plus the face's name above the box
//! when one is present, and writes the result to a new image file.

use crate::geometry::{pixel_rect, PixelRect};
use crate::loader::{self, LoadError};
use crate::types::FaceRecord;
use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_STROKE_WIDTH: u32 = 3;
const DEFAULT_FONT_SIZE: f32 = 20.0;
const DEFAULT_LABEL_OFFSET: i32 = 20;
const DEFAULT_FONT_PATH: &str = "Ubuntu-R.ttf";
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("source image: {0}")]
    Source(#[from] LoadError),
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("font not found: {}", .0.display())]
    FontNotFound(PathBuf),
    #[error("failed to read font {}: {source}", path.display())]
    FontRead {
        path: PathBuf,
        #[source]
        source: LoadError,
    },
    #[error("invalid font file: {}", .0.display())]
    FontInvalid(PathBuf),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Fixed drawing parameters for annotations.
#[derive(Debug, Clone)]
pub struct AnnotationStyle {
    /// Rectangle outline thickness in pixels, drawn inward from the edge.
    pub stroke_width: u32,
    pub outline: Rgba<u8>,
    pub label_color: Rgba<u8>,
    pub font_path: PathBuf,
    /// Label height in pixels.
    pub font_size: f32,
    /// Distance from the label's origin to the rectangle's top edge.
    pub label_offset: i32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            stroke_width: DEFAULT_STROKE_WIDTH,
            outline: RED,
            label_color: WHITE,
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
            font_size: DEFAULT_FONT_SIZE,
            label_offset: DEFAULT_LABEL_OFFSET,
        }
    }
}

/// Draws face boxes and names onto images.
#[derive(Debug, Clone, Default)]
pub struct BoxAnnotator {
    style: AnnotationStyle,
}

impl BoxAnnotator {
    pub fn new(style: AnnotationStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &AnnotationStyle {
        &self.style
    }

    /// Annotate `image_path` with `faces` and save the result to `output_path`.
    ///
    /// The output is overwritten if it exists; its format follows the
    /// extension. Every failure here is fatal for the call: a missing or
    /// undecodable source, a missing or invalid font, or an unwritable
    /// output.
    pub fn annotate(
        &self,
        image_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        faces: &[FaceRecord],
    ) -> Result<(), AnnotateError> {
        let image_path = image_path.as_ref();
        let output_path = output_path.as_ref();

        let bytes = loader::load(image_path)?;
        let source = image::load_from_memory(&bytes).map_err(|source| AnnotateError::Decode {
            path: image_path.to_path_buf(),
            source,
        })?;
        let keep_alpha = source.color().has_alpha();
        let mut canvas = source.into_rgba8();

        tracing::debug!(
            path = %image_path.display(),
            width = canvas.width(),
            height = canvas.height(),
            faces = faces.len(),
            "annotating image"
        );

        let font = load_font(&self.style.font_path)?;
        draw_faces(&mut canvas, faces, &self.style, Some(&font));

        save(canvas, output_path, keep_alpha)?;
        tracing::info!(path = %output_path.display(), faces = faces.len(), "annotated image saved");
        Ok(())
    }
}

/// Draw every face onto `image` in input order.
///
/// Names are rendered only when `font` is provided and the face has one.
/// Later faces overdraw earlier ones. Degenerate boxes draw nothing;
/// out-of-canvas portions are clipped.
pub fn draw_faces(
    image: &mut RgbaImage,
    faces: &[FaceRecord],
    style: &AnnotationStyle,
    font: Option<&FontVec>,
) {
    let (width, height) = image.dimensions();

    for face in faces {
        let rect = pixel_rect(&face.bounding_box, width, height);
        draw_box(image, rect, style.stroke_width, style.outline);

        if let (Some(name), Some(font)) = (face.name.as_deref(), font) {
            let scale = PxScale::from(style.font_size);
            let x = rect.left;
            let y = rect.top.saturating_sub(style.label_offset);
            if label_visible(x, y, text_size(scale, font, name), (width, height)) {
                draw_text_mut(image, style.label_color, x, y, scale, font, name);
            }
        }
    }
}

/// Outline `rect` with concentric one-pixel rings, outermost first.
///
/// `right` and `bottom` are exclusive, so the outer ring covers columns
/// `left..right` and rows `top..bottom`.
fn draw_box(image: &mut RgbaImage, rect: PixelRect, stroke_width: u32, color: Rgba<u8>) {
    if rect.is_empty() {
        tracing::debug!(?rect, "skipping zero-area box");
        return;
    }
    let (width, height) = image.dimensions();
    let rect = rect.clip(width, height, stroke_width as i32);

    for inset in 0..stroke_width as i32 {
        let w = rect.width() - 2 * inset;
        let h = rect.height() - 2 * inset;
        if w <= 0 || h <= 0 {
            break;
        }
        let ring = Rect::at(rect.left + inset, rect.top + inset).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(image, ring, color);
    }
}

/// Whether a label of `size` pixels at `(x, y)` touches the canvas at all.
fn label_visible(x: i32, y: i32, size: (u32, u32), canvas: (u32, u32)) -> bool {
    let (x, y) = (i64::from(x), i64::from(y));
    let (tw, th) = (i64::from(size.0), i64::from(size.1));
    let (cw, ch) = (i64::from(canvas.0), i64::from(canvas.1));
    x + tw > 0 && x < cw && y + th > 0 && y < ch
}

fn load_font(path: &Path) -> Result<FontVec, AnnotateError> {
    let bytes = loader::load(path).map_err(|e| match e {
        LoadError::NotFound(p) => AnnotateError::FontNotFound(p),
        other => AnnotateError::FontRead {
            path: path.to_path_buf(),
            source: other,
        },
    })?;
    FontVec::try_from_vec(bytes).map_err(|_| AnnotateError::FontInvalid(path.to_path_buf()))
}

fn save(canvas: RgbaImage, path: &Path, keep_alpha: bool) -> Result<(), AnnotateError> {
    let write_err = |source: image::ImageError| AnnotateError::Write {
        path: path.to_path_buf(),
        source,
    };

    // JPEG has no alpha channel.
    let is_jpeg = matches!(ImageFormat::from_path(path), Ok(ImageFormat::Jpeg));
    let image = if keep_alpha && !is_jpeg {
        DynamicImage::ImageRgba8(canvas)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).into_rgb8())
    };
    image.save(path).map_err(write_err)
}
