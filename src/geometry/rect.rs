use serde::{Deserialize, Serialize};

use crate::action::action_model::{BBox, DualPoint, Point};
use crate::screen::screen_model::ElementRect;

/// Axis-aligned rectangle in `{x, y, width, height}` form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Anchor at `(x1, y1)`; width/height clamped to >= 0.
    pub fn from_bbox(b: &BBox) -> Self {
        Self::new(b.x1, b.y1, (b.x2 - b.x1).max(0.0), (b.y2 - b.y1).max(0.0))
    }

    /// Rectangle spanned by two points, corners reordered per axis.
    pub fn spanning(dual: &DualPoint) -> Self {
        let (from, to) = (&dual.from, &dual.to);
        let x = from.x.min(to.x);
        let y = from.y.min(to.y);
        Self::new(x, y, from.x.max(to.x) - x, from.y.max(to.y) - y)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Intersection over union. 0.0 for disjoint or zero-area pairs.
    pub fn iou(&self, other: &Rect) -> f64 {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);

        if right < left || bottom < top {
            return 0.0;
        }

        let intersection = (right - left) * (bottom - top);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }

    /// Distance from a point to this rectangle: 0 inside, perpendicular
    /// distance when the point projects onto a side, else the nearest corner.
    pub fn distance_to(&self, point: &Point) -> f64 {
        let (px, py) = (point.x, point.y);
        let within_x = self.x <= px && px <= self.x + self.width;
        let within_y = self.y <= py && py <= self.y + self.height;

        if within_x && within_y {
            return 0.0;
        }

        let to_x_side = (self.x - px).abs().min((self.x + self.width - px).abs());
        let to_y_side = (self.y - py).abs().min((self.y + self.height - py).abs());

        if within_x {
            return to_y_side;
        }
        if within_y {
            return to_x_side;
        }
        (to_x_side.powi(2) + to_y_side.powi(2)).sqrt()
    }
}

impl From<ElementRect> for Rect {
    fn from(r: ElementRect) -> Self {
        Self::new(r.x, r.y, r.width, r.height)
    }
}
