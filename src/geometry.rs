// ---------------------------------------------------------------------------
// Geometry: extents and the aspect-preserving fit computation
// ---------------------------------------------------------------------------

/// Integer width/height of an image or a window, in pixels.
///
/// Both dimensions must be non-zero before being handed to [`fit_inside`];
/// image decoding and the windowing system never produce degenerate sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn new(width: u32, height: u32) -> Self {
        Extent { width, height }
    }

    /// Whether this extent overflows `other` on either axis.
    pub fn exceeds(&self, other: Extent) -> bool {
        self.width > other.width || self.height > other.height
    }
}

/// A floating-point sub-rectangle produced by [`fit_inside`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl FitRect {
    /// Convert to integer pixel geometry, flooring so the result never
    /// overflows the container by a fractional pixel.
    pub fn to_pixels(self) -> (i32, i32, u32, u32) {
        (
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.width.floor() as u32,
            self.height.floor() as u32,
        )
    }
}

/// Largest rectangle with `src`'s aspect ratio that fits inside `dst`,
/// centered on whichever axis has slack.
///
/// With `r = src.width / src.height`, a full-height candidate is
/// `dst.height * r` wide; if that fits (`<=`, so an exact-width match takes
/// this branch) the result spans the container's height and is centered
/// horizontally. Otherwise the result spans the container's width at
/// `dst.width / r` tall, centered vertically.
pub fn fit_inside(src: Extent, dst: Extent) -> FitRect {
    let ratio = src.width as f32 / src.height as f32;

    let candidate_width = dst.height as f32 * ratio;
    let candidate_height = dst.width as f32 / ratio;

    if candidate_width <= dst.width as f32 {
        FitRect {
            x: (dst.width as f32 - candidate_width) / 2.0,
            y: 0.0,
            width: candidate_width,
            height: dst.height as f32,
        }
    } else {
        FitRect {
            x: 0.0,
            y: (dst.height as f32 - candidate_height) / 2.0,
            width: dst.width as f32,
            height: candidate_height,
        }
    }
}
