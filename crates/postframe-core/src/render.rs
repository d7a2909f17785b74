//! Composition of the viewport and edit options into one renderable
//! transform.
//!
//! # Transform Order
//!
//! The composed transform is, in order:
//! 1. Scale (zoom, frame space)
//! 2. Translate (pan, frame pixels)
//! 3. Rotate (image space)
//! 4. Flip X, if set
//! 5. Flip Y, if set
//! 6. Filter (style only, no geometry)
//!
//! Pan and zoom act on the frame; rotation and flips act on the image
//! before it is placed in the frame. The filter never changes the matrix.

use serde::{Deserialize, Serialize};

use crate::edit::{EditOptions, FilterId};
use crate::gesture::Point;
use crate::viewport::ViewportTransform;

/// One step of a composed transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum TransformOp {
    Scale { factor: f64 },
    Translate { x: f64, y: f64 },
    Rotate { degrees: u16 },
    FlipX,
    FlipY,
}

/// Renderable description of the preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderTransform {
    /// Geometric steps in composition order.
    pub ops: Vec<TransformOp>,
    /// Style overlay applied last.
    pub filter: Option<FilterId>,
}

impl RenderTransform {
    /// Compose the viewport and the edit options.
    pub fn compose(viewport: &ViewportTransform, edits: &EditOptions) -> Self {
        let mut ops = vec![
            TransformOp::Scale {
                factor: viewport.scale,
            },
            TransformOp::Translate {
                x: viewport.x,
                y: viewport.y,
            },
            TransformOp::Rotate {
                degrees: edits.rotation_degrees,
            },
        ];
        if edits.flip_horizontal {
            ops.push(TransformOp::FlipX);
        }
        if edits.flip_vertical {
            ops.push(TransformOp::FlipY);
        }
        Self {
            ops,
            filter: edits.filter,
        }
    }

    /// Affine matrix `[a, b, c, d, e, f]` from centered image coordinates to
    /// centered frame coordinates.
    ///
    /// A point maps as `x' = a*x + c*y + e`, `y' = b*x + d*y + f`, the same
    /// layout as CSS `matrix()`.
    pub fn matrix(&self) -> [f64; 6] {
        let mut scale = 1.0;
        let (mut tx, mut ty) = (0.0, 0.0);
        let mut degrees = 0u16;
        let (mut fx, mut fy) = (1.0, 1.0);
        for op in &self.ops {
            match *op {
                TransformOp::Scale { factor } => scale = factor,
                TransformOp::Translate { x, y } => (tx, ty) = (x, y),
                TransformOp::Rotate { degrees: d } => degrees = d,
                TransformOp::FlipX => fx = -fx,
                TransformOp::FlipY => fy = -fy,
            }
        }
        let (sin, cos) = sin_cos(degrees);
        [
            scale * cos * fx,
            scale * sin * fx,
            -scale * sin * fy,
            scale * cos * fy,
            tx,
            ty,
        ]
    }

    /// Map a centered image-space point into centered frame space.
    pub fn map_point(&self, point: Point) -> Point {
        let [a, b, c, d, e, f] = self.matrix();
        Point::new(a * point.x + c * point.y + e, b * point.x + d * point.y + f)
    }

    /// CSS `transform` value with the same semantics as [`matrix`](Self::matrix).
    ///
    /// CSS applies the rightmost function first, so the pan is written
    /// before the zoom to keep it in frame pixels.
    pub fn css_transform(&self) -> String {
        let mut parts = Vec::with_capacity(self.ops.len());
        let mut scale = None;
        for op in &self.ops {
            match *op {
                TransformOp::Scale { factor } => scale = Some(factor),
                TransformOp::Translate { x, y } => {
                    parts.push(format!("translate({x}px, {y}px)"));
                    if let Some(factor) = scale.take() {
                        parts.push(format!("scale({factor})"));
                    }
                }
                TransformOp::Rotate { degrees } => parts.push(format!("rotate({degrees}deg)")),
                TransformOp::FlipX => parts.push("scaleX(-1)".to_string()),
                TransformOp::FlipY => parts.push("scaleY(-1)".to_string()),
            }
        }
        if let Some(factor) = scale {
            parts.insert(0, format!("scale({factor})"));
        }
        parts.join(" ")
    }

    /// CSS `filter` value, `"none"` without a filter.
    pub fn css_filter(&self) -> &'static str {
        self.filter.map_or("none", FilterId::css)
    }
}

/// Sine and cosine of a clockwise rotation, exact on quarter turns.
fn sin_cos(degrees: u16) -> (f64, f64) {
    match degrees % 360 {
        0 => (0.0, 1.0),
        90 => (1.0, 0.0),
        180 => (0.0, -1.0),
        270 => (-1.0, 0.0),
        d => f64::from(d).to_radians().sin_cos(),
    }
}
