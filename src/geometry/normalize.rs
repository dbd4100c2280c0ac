use crate::action::action_model::{BBox, DualPoint, Point, ReferenceFrame, Scroll};
use crate::screen::screen_model::ImageSize;

// ============================================================================
// Reference frame conversion
// ============================================================================
//
// AbsolutePixel    -> RelativeFraction : v / extent
// RelativeFraction -> AbsolutePixel    : trunc(v * extent)
// RelativeFraction -> RelativeScaled   : trunc(v * 1000)
// RelativeScaled   -> RelativeFraction : round(v / 1000, 3 places)
//
// Pixel <-> scaled conversions go through the fraction frame.

const SCALE: f64 = 1000.0;

/// Convert one axis value between frames. `extent` is the image width for
/// x-axis values and the height for y-axis values.
pub fn convert_value(value: f64, from: ReferenceFrame, to: ReferenceFrame, extent: f64) -> f64 {
    use ReferenceFrame::*;

    match (from, to) {
        (a, b) if a == b => value,
        (AbsolutePixel, RelativeFraction) => {
            if extent == 0.0 {
                0.0
            } else {
                value / extent
            }
        }
        (RelativeFraction, AbsolutePixel) => (value * extent).trunc(),
        (RelativeFraction, RelativeScaledInt) => (value * SCALE).trunc(),
        (RelativeScaledInt, RelativeFraction) => round3(value / SCALE),
        (AbsolutePixel, RelativeScaledInt) => {
            let fraction = convert_value(value, AbsolutePixel, RelativeFraction, extent);
            convert_value(fraction, RelativeFraction, RelativeScaledInt, extent)
        }
        (RelativeScaledInt, AbsolutePixel) => {
            let fraction = convert_value(value, RelativeScaledInt, RelativeFraction, extent);
            convert_value(fraction, RelativeFraction, AbsolutePixel, extent)
        }
        _ => value,
    }
}

/// Round to three decimal places, as the fraction literal form carries.
pub fn round3(value: f64) -> f64 {
    (value * SCALE).round() / SCALE
}

/// Geometric values that can be re-expressed in another reference frame.
pub trait ToFrame: Sized {
    fn to_frame(&self, target: ReferenceFrame, image: &ImageSize) -> Self;
}

impl ToFrame for Point {
    fn to_frame(&self, target: ReferenceFrame, image: &ImageSize) -> Self {
        Point::new(
            convert_value(self.x, self.frame, target, image.width),
            convert_value(self.y, self.frame, target, image.height),
            target,
        )
    }
}

impl ToFrame for BBox {
    fn to_frame(&self, target: ReferenceFrame, image: &ImageSize) -> Self {
        BBox::new(
            convert_value(self.x1, self.frame, target, image.width),
            convert_value(self.y1, self.frame, target, image.height),
            convert_value(self.x2, self.frame, target, image.width),
            convert_value(self.y2, self.frame, target, image.height),
            target,
        )
    }
}

impl ToFrame for Scroll {
    fn to_frame(&self, target: ReferenceFrame, image: &ImageSize) -> Self {
        Scroll {
            down: convert_value(self.down, self.frame, target, image.height),
            right: convert_value(self.right, self.frame, target, image.width),
            frame: target,
        }
    }
}

/// Endpoints keep their order; only coordinates change.
impl ToFrame for DualPoint {
    fn to_frame(&self, target: ReferenceFrame, image: &ImageSize) -> Self {
        DualPoint {
            from: self.from.to_frame(target, image),
            to: self.to.to_frame(target, image),
        }
    }
}

// ============================================================================
// Bounds check
// ============================================================================

fn within_extent(value: f64, frame: ReferenceFrame, extent: f64) -> bool {
    let upper = match frame {
        ReferenceFrame::AbsolutePixel => extent,
        ReferenceFrame::RelativeFraction => 1.0,
        ReferenceFrame::RelativeScaledInt => SCALE,
    };
    (0.0..=upper).contains(&value)
}

impl BBox {
    /// Whether every corner lies inside the image.
    pub fn within(&self, image: &ImageSize) -> bool {
        within_extent(self.x1, self.frame, image.width)
            && within_extent(self.x2, self.frame, image.width)
            && within_extent(self.y1, self.frame, image.height)
            && within_extent(self.y2, self.frame, image.height)
    }
}

impl Point {
    pub fn within(&self, image: &ImageSize) -> bool {
        within_extent(self.x, self.frame, image.width) && within_extent(self.y, self.frame, image.height)
    }
}
