use serde::{Deserialize, Serialize};

use crate::action::action_model::ReferenceFrame;
use crate::action::literal::{find_box_literals, parse_box};
use crate::geometry::normalize::ToFrame;
use crate::geometry::rect::Rect;
use crate::score::text_match::{exact_match, text_f1};
use crate::screen::screen_model::ImageSize;

// ============================================================================
// bbox2text: read the text inside a given box
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextScore {
    pub exact_match: f64,
    pub f1: f64,
}

pub fn score_bbox2text(predicted: &str, label: &str) -> TextScore {
    TextScore {
        exact_match: exact_match(predicted, label),
        f1: text_f1(predicted, label),
    }
}

// ============================================================================
// text2bbox: locate every box containing a given text
// ============================================================================

/// Pixel rects for every box literal in `text`, read in `frame`.
///
/// Literals that fail to parse are skipped with a warning.
pub fn extract_rects(text: &str, frame: ReferenceFrame, image: &ImageSize) -> Vec<Rect> {
    find_box_literals(text)
        .into_iter()
        .filter_map(|literal| match parse_box(literal, frame) {
            Ok(b) => Some(Rect::from_bbox(&b.to_frame(ReferenceFrame::AbsolutePixel, image))),
            Err(e) => {
                log::warn!("skipping box literal {:?}: {}", literal, e);
                None
            }
        })
        .collect()
}

/// Mean, over predicted rects, of the best IoU against any label rect.
/// Nothing predicted scores 0.
pub fn score_text2bbox(predicted: &[Rect], labels: &[Rect]) -> f64 {
    if predicted.is_empty() {
        return 0.0;
    }

    let total: f64 = predicted
        .iter()
        .map(|p| labels.iter().map(|l| p.iou(l)).fold(0.0, f64::max))
        .sum();

    total / predicted.len() as f64
}
