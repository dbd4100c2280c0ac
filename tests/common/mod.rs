#![allow(dead_code)]

use gui_action_eval::action::action_model::{Action, BBox, Point, ReferenceFrame};
use gui_action_eval::screen::screen_model::{ImageSize, UiElement};
use serde_json::{Value, json};

pub fn px_box(x1: f64, y1: f64, x2: f64, y2: f64) -> BBox {
    BBox::new(x1, y1, x2, y2, ReferenceFrame::AbsolutePixel)
}

pub fn fraction_point(x: f64, y: f64) -> Point {
    Point::new(x, y, ReferenceFrame::RelativeFraction)
}

pub fn click(x1: f64, y1: f64, x2: f64, y2: f64, id: i64) -> Action {
    Action::Click {
        element: px_box(x1, y1, x2, y2),
        element_id: Some(id),
    }
}

pub fn screen() -> ImageSize {
    ImageSize::new(1000.0, 2000.0)
}

/// Three non-overlapping elements on a 1000x2000 screen.
pub fn elements() -> Vec<UiElement> {
    vec![
        UiElement::new(7, 0.0, 0.0, 100.0, 50.0),
        UiElement::new(8, 200.0, 200.0, 300.0, 100.0),
        UiElement::new(9, 600.0, 1500.0, 200.0, 200.0),
    ]
}

/// Structured click label targeting element 8.
pub fn click_label() -> Value {
    json!({
        "name": "click",
        "element": {
            "id": 8,
            "absolute": "<box>200, 200, 500, 300</box>",
            "related": "<box>0.200, 0.100, 0.500, 0.150</box>"
        }
    })
}

pub fn input_label(text: &str) -> Value {
    json!({ "name": "input", "text": text })
}
