use crate::action::action_model::BBox;
use crate::geometry::rect::Rect;
use crate::screen::screen_model::UiElement;

/// Returned by [`match_element`] when there are no candidates.
pub const NO_MATCH: i64 = -1;

/// Overlap needed before IoU wins over center distance.
pub const DEFAULT_MATCH_IOU: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementMatch {
    pub id: i64,
    /// IoU between the predicted box and the chosen element
    pub iou: f64,
    /// Distance from the predicted box center to the chosen element
    pub distance: f64,
}

/// Resolve a pixel-space box to the element it most likely targets.
///
/// The element with the highest IoU wins if that IoU exceeds `min_iou`;
/// otherwise the element nearest to the box center wins. Ties keep the
/// earlier candidate.
pub fn best_match(predicted: &BBox, elements: &[UiElement], min_iou: f64) -> Option<ElementMatch> {
    let pred_rect = Rect::from_bbox(predicted);
    let center = predicted.center();

    let mut by_iou: Option<ElementMatch> = None;
    let mut by_distance: Option<ElementMatch> = None;

    for element in elements {
        let rect = Rect::from(element.rect);
        let candidate = ElementMatch {
            id: element.id,
            iou: pred_rect.iou(&rect),
            distance: rect.distance_to(&center),
        };

        if candidate.iou > by_iou.map_or(0.0, |m| m.iou) {
            by_iou = Some(candidate);
        }
        if by_distance.is_none_or(|m| candidate.distance < m.distance) {
            by_distance = Some(candidate);
        }
    }

    match by_iou {
        Some(m) if m.iou > min_iou => Some(m),
        _ => by_distance,
    }
}

/// Element id for `predicted`, or [`NO_MATCH`] when `elements` is empty.
pub fn match_element(predicted: &BBox, elements: &[UiElement]) -> i64 {
    best_match(predicted, elements, DEFAULT_MATCH_IOU).map_or(NO_MATCH, |m| m.id)
}

/// Look up an element by id.
pub fn find_element(id: i64, elements: &[UiElement]) -> Option<&UiElement> {
    elements.iter().find(|e| e.id == id)
}
