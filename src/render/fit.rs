//! Geometry fitter: shrinks and centres a drawing inside a padded viewport.

use tracing::debug;

use crate::geom::{Rect, Segment, Vec2};

pub const DEFAULT_PADDING: f64 = 25.0;

/// Target drawing area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Empty margin kept on every side.
    pub padding: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Length of one unscaled turtle step: the larger viewport dimension, so
    /// drawings come out at a comparable size whatever the viewport.
    pub fn base_unit(&self) -> f64 {
        self.width.max(self.height)
    }
}

/// Fit `segments` into `size` minus `padding` on each side.
///
/// Each axis whose extent overflows the padded area triggers its own uniform
/// shrink, applied one after the other; a drawing is never enlarged. The
/// result is then centred. Returns the final bounding box.
pub fn fit(segments: &mut [Segment], size: Vec2, padding: f64) -> Rect {
    let mut bounds = Rect::of_segments(segments);
    let effective = Vec2::new(
        (size.x - 2.0 * padding).max(0.0),
        (size.y - 2.0 * padding).max(0.0),
    );

    if bounds.size.x > effective.x {
        let factor = effective.x / bounds.size.x;
        shrink(segments, &mut bounds, factor);
    }

    if bounds.size.y > effective.y {
        let factor = effective.y / bounds.size.y;
        shrink(segments, &mut bounds, factor);
    }

    let delta = Vec2::new(
        padding - bounds.pos.x + 0.5 * (effective.x - bounds.size.x),
        padding - bounds.pos.y + 0.5 * (effective.y - bounds.size.y),
    );
    for segment in segments.iter_mut() {
        segment.translate(delta);
    }
    bounds.translate(delta);

    debug!(
        segments = segments.len(),
        x = bounds.pos.x,
        y = bounds.pos.y,
        width = bounds.size.x,
        height = bounds.size.y,
        "fitted drawing"
    );
    bounds
}

/// [`fit`] against a [`Viewport`].
pub fn fit_to_viewport(segments: &mut [Segment], viewport: &Viewport) -> Rect {
    fit(segments, viewport.size(), viewport.padding)
}

fn shrink(segments: &mut [Segment], bounds: &mut Rect, factor: f64) {
    for segment in segments.iter_mut() {
        segment.scale(factor);
    }
    bounds.scale(factor);
}
