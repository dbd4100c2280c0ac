use serde::{Deserialize, Serialize};

/// Pixel dimensions of the screenshot an action refers to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

impl ImageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Ground-truth UI element supplied with each screenshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiElement {
    #[serde(alias = "uid")]
    pub id: i64,
    pub rect: ElementRect,
}

/// Element bounds in absolute pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl UiElement {
    pub fn new(id: i64, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id,
            rect: ElementRect {
                x,
                y,
                width,
                height,
            },
        }
    }
}
