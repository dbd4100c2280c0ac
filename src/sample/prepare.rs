use serde_json::{Map, Value};

use crate::action::action_model::{Action, ActionGroup, BBox, ReferenceFrame};
use crate::decode::decoder::{Decoded, decode_adjusted, decode_with};
use crate::decode::dialect::Dialect;
use crate::decode::record::{ActionRecord, LiteralFrames};
use crate::geometry::normalize::{ToFrame, round3};
use crate::sample::sample_model::PositionFormat;
use crate::score::thresholds::Thresholds;
use crate::screen::matcher::{NO_MATCH, best_match, find_element};
use crate::screen::screen_model::{ImageSize, UiElement};

/// What a prediction needs besides its own text to reach the eval frame.
#[derive(Debug, Clone, Copy)]
pub struct SampleContext<'a> {
    pub format: PositionFormat,
    pub image: &'a ImageSize,
    pub elements: &'a [UiElement],
    pub thresholds: &'a Thresholds,
}

// ============================================================================
// Predictions
// ============================================================================

/// Decode a raw prediction and bring it into the frames labels are scored
/// in: element boxes in pixels with a resolved element id, tap points as
/// fractions, scroll and dual points in pixels.
pub fn prepare_prediction(raw: &str, dialect: Dialect, ctx: &SampleContext<'_>) -> Decoded {
    let frames = LiteralFrames::uniform(ctx.format.literal_frame());
    let decoded = if ctx.format == PositionFormat::ElementId {
        decode_adjusted(raw, dialect, &frames, |record| attach_element_box(record, ctx.elements))
    } else {
        decode_with(raw, dialect, &frames)
    };

    Decoded {
        group: to_eval_frame(decoded.group, ctx),
        error: decoded.error,
    }
}

/// Convert each decoded action to the evaluation frames.
pub fn to_eval_frame(group: ActionGroup, ctx: &SampleContext<'_>) -> ActionGroup {
    group
        .actions
        .into_iter()
        .map(|action| to_eval_action(action, ctx))
        .collect()
}

fn to_eval_action(action: Action, ctx: &SampleContext<'_>) -> Action {
    let image = ctx.image;

    match action {
        Action::Click {
            element,
            element_id,
        } => match resolve_element(&element, element_id, ctx) {
            Ok((element, id)) => Action::Click {
                element,
                element_id: Some(id),
            },
            Err(reason) => Action::invalid("click", reason),
        },
        Action::Hover {
            element,
            element_id,
        } => match resolve_element(&element, element_id, ctx) {
            Ok((element, id)) => Action::Hover {
                element,
                element_id: Some(id),
            },
            Err(reason) => Action::invalid("hover", reason),
        },
        Action::Select {
            element,
            element_id,
            text,
        } => match resolve_element(&element, element_id, ctx) {
            Ok((element, id)) => Action::Select {
                element,
                element_id: Some(id),
                text,
            },
            Err(reason) => Action::invalid("select", reason),
        },
        Action::Tap { point } => {
            let mut fraction = point.to_frame(ReferenceFrame::RelativeFraction, image);
            // Pixel taps land on the same 3-decimal grid fraction literals use.
            if point.frame == ReferenceFrame::AbsolutePixel {
                fraction.x = round3(fraction.x);
                fraction.y = round3(fraction.y);
            }
            Action::Tap { point: fraction }
        }
        Action::Scroll { scroll } => Action::Scroll {
            scroll: scroll.to_frame(ReferenceFrame::AbsolutePixel, image),
        },
        Action::SelectText { dual_point } => Action::SelectText {
            dual_point: dual_point.to_frame(ReferenceFrame::AbsolutePixel, image),
        },
        Action::Swipe { dual_point } => Action::Swipe {
            dual_point: dual_point.to_frame(ReferenceFrame::AbsolutePixel, image),
        },
        other => other,
    }
}

/// Pixel box plus element id for an element-targeting action.
fn resolve_element(
    element: &BBox,
    element_id: Option<i64>,
    ctx: &SampleContext<'_>,
) -> Result<(BBox, i64), String> {
    if ctx.format == PositionFormat::ElementId {
        let id = element_id.ok_or("missing element_id")?;
        let found = find_element(id, ctx.elements).ok_or_else(|| format!("no element with id {}", id))?;
        return Ok((element_box(found), id));
    }

    let element = element.to_frame(ReferenceFrame::AbsolutePixel, ctx.image);
    let id = best_match(&element, ctx.elements, ctx.thresholds.match_iou).map_or(NO_MATCH, |m| m.id);
    Ok((element, id))
}

/// Pixel corner box of an element's rect.
fn element_box(element: &UiElement) -> BBox {
    let r = element.rect;
    BBox::new(
        r.x.trunc(),
        r.y.trunc(),
        (r.x + r.width).trunc(),
        (r.y + r.height).trunc(),
        ReferenceFrame::AbsolutePixel,
    )
}

/// Targets named only by id get the element's box as their literal, so
/// they decode like box-carrying predictions.
fn attach_element_box(mut record: ActionRecord, elements: &[UiElement]) -> ActionRecord {
    if record.element.is_none() {
        if let Some(found) = record.numeric_element_id().and_then(|id| find_element(id, elements)) {
            record.element = Some(Value::String(element_box(found).to_string()));
        }
    }
    record
}

// ============================================================================
// Labels
// ============================================================================

/// Turn a structured label (one action object or a list) into a canonical
/// group in the evaluation frames.
///
/// Structured fields carry every frame at once (`element: {id, absolute,
/// related}`, `point: {related, …}`, …); the eval-frame variant is picked
/// and `element.id` becomes `element_id`. Flat fields pass through.
pub fn standardize_label(label: &Value) -> ActionGroup {
    let items: Vec<&Value> = match label {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    let frames = LiteralFrames::evaluation();
    items
        .into_iter()
        .map(|item| label_record(item).into_action(&frames))
        .collect()
}

fn label_record(item: &Value) -> ActionRecord {
    let Some(obj) = item.as_object() else {
        return ActionRecord::default();
    };

    let name = obj.get("name").and_then(Value::as_str).unwrap_or_default();
    let mut record = ActionRecord::named(name);

    match obj.get("element") {
        Some(Value::Object(element)) => {
            record.element_id = element.get("id").cloned();
            record.element = element.get("absolute").cloned();
        }
        other => {
            record.element = other.cloned();
            record.element_id = obj.get("element_id").cloned();
        }
    }

    record.point = pick(obj, "point", "related");
    record.dual_point = pick(obj, "dual_point", "absolute");
    record.scroll = pick(obj, "scroll", "absolute");
    record.text = obj.get("text").cloned();
    record
}

/// `obj[field][variant]` when the field is structured, else `obj[field]`.
fn pick(obj: &Map<String, Value>, field: &str, variant: &str) -> Option<Value> {
    let value = obj.get(field)?;
    match value.get(variant) {
        Some(inner) => Some(inner.clone()),
        None => Some(value.clone()),
    }
}
