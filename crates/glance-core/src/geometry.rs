//! Fractional box → pixel box conversion.

use crate::types::BoundingBox;

/// Absolute pixel rectangle, origin top-left, Y down.
///
/// `right`/`bottom` are exclusive edges: a box with `left == right` or
/// `top == bottom` has zero area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    /// Saturates instead of overflowing for boxes scaled far off-canvas.
    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// True if `(x, y)` lies within `stroke` pixels of the inside of the
    /// rectangle's outer edge.
    pub fn stroke_contains(&self, x: i32, y: i32, stroke: i32) -> bool {
        let inside = x >= self.left && x < self.right && y >= self.top && y < self.bottom;
        inside
            && (x < self.left.saturating_add(stroke)
                || x >= self.right.saturating_sub(stroke)
                || y < self.top.saturating_add(stroke)
                || y >= self.bottom.saturating_sub(stroke))
    }

    /// Pull edges lying more than `margin` pixels outside a `width` × `height`
    /// canvas back to that margin.
    ///
    /// With `margin` at least the stroke width, outlining the clipped rect
    /// paints exactly the on-canvas pixels the full rect would.
    pub fn clip(&self, width: u32, height: u32, margin: i32) -> PixelRect {
        let max_x = i32::try_from(width).unwrap_or(i32::MAX).saturating_add(margin);
        let max_y = i32::try_from(height).unwrap_or(i32::MAX).saturating_add(margin);
        PixelRect {
            left: self.left.clamp(-margin, max_x),
            top: self.top.clamp(-margin, max_y),
            right: self.right.clamp(-margin, max_x),
            bottom: self.bottom.clamp(-margin, max_y),
        }
    }
}

/// Scale a fractional box to pixel coordinates of a `width` × `height` image.
///
/// Each edge is rounded independently. Boxes outside [0, 1] map to
/// coordinates outside the image; callers rely on drawing to clip them.
pub fn pixel_rect(bbox: &BoundingBox, width: u32, height: u32) -> PixelRect {
    let w = width as f32;
    let h = height as f32;
    PixelRect {
        left: (bbox.left * w).round() as i32,
        top: (bbox.top * h).round() as i32,
        right: ((bbox.left + bbox.width) * w).round() as i32,
        bottom: ((bbox.top + bbox.height) * h).round() as i32,
    }
}
