use std::collections::HashMap;

use rayon::prelude::*;
use serde_json::Value;

use crate::action::action_model::{ActionGroup, ReferenceFrame};
use crate::action::literal::parse_box;
use crate::decode::decoder::{Decoded, THOUGHT_DELIMITER};
use crate::decode::error::DecodeError;
use crate::geometry::rect::Rect;
use crate::report::report_model::{ActionAccumulator, GroundingAccumulator};
use crate::sample::prepare::{SampleContext, prepare_prediction, standardize_label};
use crate::sample::sample_model::{
    ActionLabel, ElementIndex, EvalRecord, GroundingLabel, GroundingTask, Prediction, SampleAnswer,
};
use crate::score::error::EvalError;
use crate::score::grounding::{TextScore, extract_rects, score_bbox2text, score_text2bbox};
use crate::score::group_score::{GroupScore, score_group_with};
use crate::score::thresholds::Thresholds;
use crate::screen::screen_model::UiElement;

// ============================================================================
// Action tasks
// ============================================================================

#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub record: EvalRecord,
    pub score: GroupScore,
    pub decode_error: Option<DecodeError>,
}

impl ActionOutcome {
    /// Samples worth a closer look: some label step left unfinished.
    pub fn is_error_sample(&self) -> bool {
        !self.score.finished_all
    }
}

#[derive(Debug, Clone)]
pub struct ActionRun {
    /// One outcome per label, in label order
    pub outcomes: Vec<ActionOutcome>,
    pub accumulator: ActionAccumulator,
}

/// Decode, normalize and score one sample. A missing prediction scores as
/// an empty group.
pub fn evaluate_action_sample(
    prediction: Option<&Prediction>,
    label: &ActionLabel,
    elements: &[UiElement],
    thresholds: &Thresholds,
) -> Result<ActionOutcome, EvalError> {
    let label_group = standardize_label(&label.actions_label);

    let (pred_text, decoded) = match prediction {
        Some(p) => {
            let ctx = SampleContext {
                format: p.position_format,
                image: &label.image_size,
                elements,
                thresholds,
            };
            let decoded = match p.parse_format {
                Some(dialect) => prepare_prediction(&p.pred, dialect, &ctx),
                None => Decoded {
                    group: ActionGroup::empty(),
                    error: Some(DecodeError::UnsupportedDialect("<missing>".to_string())),
                },
            };
            (p.pred.clone(), decoded)
        }
        None => {
            log::warn!("no prediction for sample {}", label.uid);
            (String::new(), Decoded::default())
        }
    };

    let score = score_group_with(&decoded.group, &label_group, thresholds).map_err(|e| {
        log::error!("sample {}: {}", label.uid, e);
        e
    })?;

    log::debug!(
        "sample {}: em={} finished={} score={:.3}",
        label.uid,
        score.name_exact_match,
        score.finished_all,
        score.mean_score
    );

    Ok(ActionOutcome {
        record: EvalRecord {
            uid: label.uid.clone(),
            pred: pred_text,
            answer: SampleAnswer::Actions(decoded.group),
            label: label.actions_label.clone(),
        },
        score,
        decode_error: decoded.error,
    })
}

/// Evaluate every labelled sample in parallel and merge the per-worker
/// accumulators.
pub fn evaluate_actions(
    predictions: &[Prediction],
    labels: &[ActionLabel],
    elements: &ElementIndex,
    thresholds: &Thresholds,
) -> Result<ActionRun, EvalError> {
    let by_uid = index_predictions(predictions);

    let outcomes = labels
        .par_iter()
        .map(|label| {
            let prediction = by_uid.get(label.uid.as_str()).copied();
            let image_id = label
                .image_id
                .as_ref()
                .or_else(|| prediction.and_then(|p| p.image_id.as_ref()));
            evaluate_action_sample(prediction, label, elements.elements_for(image_id), thresholds)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let accumulator = outcomes
        .par_iter()
        .fold(ActionAccumulator::default, |acc, o| acc.with(&o.score))
        .reduce(ActionAccumulator::default, ActionAccumulator::merge);

    Ok(ActionRun {
        outcomes,
        accumulator,
    })
}

// ============================================================================
// Grounding tasks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundingScore {
    Text(TextScore),
    Boxes(f64),
}

#[derive(Debug, Clone)]
pub struct GroundingOutcome {
    pub record: EvalRecord,
    pub score: GroundingScore,
}

impl GroundingOutcome {
    pub fn is_error_sample(&self, thresholds: &Thresholds) -> bool {
        match self.score {
            GroundingScore::Text(t) => t.f1 < thresholds.text_f1_pass,
            GroundingScore::Boxes(s) => s < thresholds.grounding_log_below,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GroundingRun {
    pub outcomes: Vec<GroundingOutcome>,
    pub accumulator: GroundingAccumulator,
}

/// Score one grounding sample.
pub fn evaluate_grounding_sample(
    prediction: Option<&Prediction>,
    label: &GroundingLabel,
) -> Result<GroundingOutcome, EvalError> {
    let pred_text = prediction.map(|p| p.pred.clone()).unwrap_or_default();

    let (answer, score) = match label.task_type {
        GroundingTask::Bbox2text => {
            let answer = pred_text
                .rsplit(THOUGHT_DELIMITER)
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            let gold = label.answer.as_str().ok_or_else(|| malformed(label, "answer must be text"))?;
            let score = score_bbox2text(&answer, gold);
            (SampleAnswer::Text(answer), GroundingScore::Text(score))
        }
        GroundingTask::Text2bbox => {
            let frame = prediction.map_or(ReferenceFrame::AbsolutePixel, |p| p.position_format.literal_frame());
            let rects = extract_rects(&pred_text, frame, &label.image_size);
            let gold = label_rects(label)?;
            let score = score_text2bbox(&rects, &gold);
            (SampleAnswer::Rects(rects), GroundingScore::Boxes(score))
        }
    };

    Ok(GroundingOutcome {
        record: EvalRecord {
            uid: label.uid.clone(),
            pred: pred_text,
            answer,
            label: label.answer.clone(),
        },
        score,
    })
}

/// Evaluate every grounding sample in parallel.
pub fn evaluate_grounding(
    predictions: &[Prediction],
    labels: &[GroundingLabel],
    thresholds: &Thresholds,
) -> Result<GroundingRun, EvalError> {
    let by_uid = index_predictions(predictions);

    let outcomes = labels
        .par_iter()
        .map(|label| evaluate_grounding_sample(by_uid.get(label.uid.as_str()).copied(), label))
        .collect::<Result<Vec<_>, _>>()?;

    let levels = &thresholds.grounding_iou_levels;
    let accumulator = outcomes
        .par_iter()
        .fold(
            || GroundingAccumulator::new(levels),
            |mut acc, o| {
                match o.score {
                    GroundingScore::Text(t) => acc.record_text(&t),
                    GroundingScore::Boxes(s) => acc.record_boxes(s),
                }
                acc
            },
        )
        .reduce(|| GroundingAccumulator::new(levels), GroundingAccumulator::merge);

    Ok(GroundingRun {
        outcomes,
        accumulator,
    })
}

/// Label boxes of a text2bbox sample, as clamped pixel rects.
fn label_rects(label: &GroundingLabel) -> Result<Vec<Rect>, EvalError> {
    let boxes = label
        .answer
        .get("absolute")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(label, "answer.absolute must be a list of boxes"))?;

    boxes
        .iter()
        .map(|b| {
            let literal = b.as_str().ok_or_else(|| malformed(label, "box must be a string"))?;
            parse_box(literal.trim(), ReferenceFrame::AbsolutePixel)
                .map(|b| Rect::from_bbox(&b))
                .map_err(|e| malformed(label, &e.to_string()))
        })
        .collect()
}

fn malformed(label: &GroundingLabel, reason: &str) -> EvalError {
    EvalError::MalformedLabel {
        uid: label.uid.clone(),
        reason: reason.to_string(),
    }
}

fn index_predictions(predictions: &[Prediction]) -> HashMap<&str, &Prediction> {
    let mut by_uid = HashMap::with_capacity(predictions.len());
    for p in predictions {
        if by_uid.insert(p.uid.as_str(), p).is_some() {
            log::warn!("duplicate prediction for sample {}; keeping the last one", p.uid);
        }
    }
    by_uid
}
