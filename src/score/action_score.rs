use serde::{Deserialize, Serialize};

use crate::action::action_model::{Action, BBox, DualPoint, Point, ReferenceFrame, Scroll};
use crate::geometry::rect::Rect;
use crate::score::error::EvalError;
use crate::score::text_match::text_f1;
use crate::score::thresholds::Thresholds;

/// Outcome of comparing one predicted action with one label action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepScore {
    pub finished: bool,
    /// Continuous score in [0, 1]
    pub score: f64,
}

impl StepScore {
    pub fn miss() -> Self {
        Self {
            finished: false,
            score: 0.0,
        }
    }

    fn new(finished: bool, score: f64) -> Self {
        Self { finished, score }
    }
}

// ============================================================================
// Direction classification
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Dominant axis of a `(right, down)` delta; ties go vertical.
    pub fn dominant(right: f64, down: f64) -> Self {
        if right.abs() > down.abs() {
            if right > 0.0 { Direction::Right } else { Direction::Left }
        } else if down > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    pub fn of_scroll(scroll: &Scroll) -> Self {
        Self::dominant(scroll.right, scroll.down)
    }

    pub fn of_swipe(dual: &DualPoint) -> Self {
        Self::dominant(dual.to.x - dual.from.x, dual.to.y - dual.from.y)
    }
}

// ============================================================================
// Per-action rubric
// ============================================================================

/// Score `pred` against `label` with the default thresholds.
pub fn score_action(pred: &Action, label: &Action) -> Result<StepScore, EvalError> {
    score_action_with(pred, label, &Thresholds::default())
}

/// Score `pred` against `label`.
///
/// A name mismatch is a plain miss. Errors are reserved for broken inputs:
/// an unknown label name is fatal (see [`EvalError::is_fatal`]); a
/// malformed action or a missing field costs the step.
pub fn score_action_with(
    pred: &Action,
    label: &Action,
    thresholds: &Thresholds,
) -> Result<StepScore, EvalError> {
    if let Action::Invalid(invalid) = label {
        if label.name().is_none() {
            return Err(EvalError::UnknownLabelAction(invalid.name.clone()));
        }
        return Err(EvalError::InvalidAction {
            action: invalid.name.clone(),
            reason: format!("label {}", invalid.reason),
        });
    }

    if pred.name_token() != label.name_token() {
        return Ok(StepScore::miss());
    }

    if let Action::Invalid(invalid) = pred {
        return Err(EvalError::InvalidAction {
            action: invalid.name.clone(),
            reason: invalid.reason.clone(),
        });
    }

    let action = label.name_token();

    match label {
        Action::Click {
            element,
            element_id,
        }
        | Action::Hover {
            element,
            element_id,
        } => {
            let (Action::Click {
                element: pred_element,
                element_id: pred_id,
            }
            | Action::Hover {
                element: pred_element,
                element_id: pred_id,
            }) = pred
            else {
                return Err(shape_mismatch(action));
            };

            let same = ids_equal(action, *pred_id, *element_id)?;
            Ok(StepScore::new(same, element_iou(action, pred_element, element)?))
        }

        Action::Select {
            element,
            element_id,
            text,
        } => {
            let Action::Select {
                element: pred_element,
                element_id: pred_id,
                text: pred_text,
            } = pred
            else {
                return Err(shape_mismatch(action));
            };

            let f1 = text_f1(pred_text, text);
            let iou = element_iou(action, pred_element, element)?;
            let same = ids_equal(action, *pred_id, *element_id)?;
            Ok(StepScore::new(f1 > thresholds.text_f1_pass && same, (f1 + iou) / 2.0))
        }

        Action::Tap { point } => {
            let Action::Tap { point: pred_point } = pred else {
                return Err(shape_mismatch(action));
            };
            score_tap(action, pred_point, point, thresholds)
        }

        Action::Input { text } | Action::Answer { text } => {
            let (Action::Input { text: pred_text } | Action::Answer { text: pred_text }) = pred else {
                return Err(shape_mismatch(action));
            };
            let f1 = text_f1(pred_text, text);
            Ok(StepScore::new(f1 > thresholds.text_f1_pass, f1))
        }

        Action::SelectText { dual_point } => {
            let Action::SelectText {
                dual_point: pred_dual,
            } = pred
            else {
                return Err(shape_mismatch(action));
            };
            same_frame(action, pred_dual.from.frame, dual_point.from.frame)?;
            let iou = Rect::spanning(pred_dual).iou(&Rect::spanning(dual_point));
            Ok(StepScore::new(iou > thresholds.region_iou_pass, iou))
        }

        Action::Scroll { scroll } => {
            let Action::Scroll { scroll: pred_scroll } = pred else {
                return Err(shape_mismatch(action));
            };
            Ok(direction_score(
                Direction::of_scroll(pred_scroll) == Direction::of_scroll(scroll),
            ))
        }

        Action::Swipe { dual_point } => {
            let Action::Swipe {
                dual_point: pred_dual,
            } = pred
            else {
                return Err(shape_mismatch(action));
            };
            Ok(direction_score(
                Direction::of_swipe(pred_dual) == Direction::of_swipe(dual_point),
            ))
        }

        Action::Enter
        | Action::Copy
        | Action::TaskComplete
        | Action::TaskImpossible
        | Action::GoBack
        | Action::GoHome => Ok(StepScore::new(true, 1.0)),

        Action::Invalid(_) => Err(shape_mismatch(action)),
    }
}

fn score_tap(
    action: &str,
    pred: &Point,
    label: &Point,
    thresholds: &Thresholds,
) -> Result<StepScore, EvalError> {
    same_frame(action, pred.frame, label.frame)?;
    let distance = pred.distance(label);
    if distance <= thresholds.tap_distance {
        Ok(StepScore::new(true, 1.0 - distance / thresholds.tap_distance))
    } else {
        Ok(StepScore::miss())
    }
}

fn element_iou(action: &str, pred: &BBox, label: &BBox) -> Result<f64, EvalError> {
    same_frame(action, pred.frame, label.frame)?;
    Ok(Rect::from_bbox(pred).iou(&Rect::from_bbox(label)))
}

fn ids_equal(action: &str, pred: Option<i64>, label: Option<i64>) -> Result<bool, EvalError> {
    match (pred, label) {
        (Some(p), Some(l)) => Ok(p == l),
        _ => Err(EvalError::MissingField {
            action: action.to_string(),
            field: "element_id",
        }),
    }
}

fn same_frame(
    action: &str,
    predicted: ReferenceFrame,
    label: ReferenceFrame,
) -> Result<(), EvalError> {
    if predicted == label {
        Ok(())
    } else {
        Err(EvalError::FrameMismatch {
            action: action.to_string(),
            predicted,
            label,
        })
    }
}

fn direction_score(matched: bool) -> StepScore {
    if matched {
        StepScore::new(true, 1.0)
    } else {
        StepScore::miss()
    }
}

fn shape_mismatch(action: &str) -> EvalError {
    EvalError::InvalidAction {
        action: action.to_string(),
        reason: "predicted fields do not match the action name".to_string(),
    }
}
