use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::action::action_model::{Action, ActionName, BBox, DualPoint, Point, ReferenceFrame, Scroll};
use crate::action::literal::{LiteralError, format_value, parse_box, parse_point, parse_scalar};

// ============================================================================
// Wire form of one action
// ============================================================================

/// One action as it appears in a payload: a name plus loosely typed fields.
///
/// Geometry travels as literal strings (`<box>…</box>`, `<point>…</point>`),
/// dual points as `{from, to}` and scroll as `{down, right}`. Every dialect
/// decodes into this shape before the typed [`Action`] is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual_point: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Value>,
}

/// Frame each geometric field's literals are written in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralFrames {
    pub element: ReferenceFrame,
    pub point: ReferenceFrame,
    pub dual_point: ReferenceFrame,
    pub scroll: ReferenceFrame,
}

impl LiteralFrames {
    pub fn uniform(frame: ReferenceFrame) -> Self {
        Self {
            element: frame,
            point: frame,
            dual_point: frame,
            scroll: frame,
        }
    }

    /// Frames ground-truth labels are scored in.
    pub fn evaluation() -> Self {
        Self {
            element: ReferenceFrame::AbsolutePixel,
            point: ReferenceFrame::RelativeFraction,
            dual_point: ReferenceFrame::AbsolutePixel,
            scroll: ReferenceFrame::AbsolutePixel,
        }
    }
}

#[derive(Debug, Error)]
enum FieldError {
    #[error("unknown action name")]
    UnknownName,

    #[error("missing field '{0}'")]
    Missing(&'static str),

    #[error("field '{field}' should be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field '{field}' is not a number: {value}")]
    NotANumber { field: &'static str, value: String },

    #[error(transparent)]
    Literal(#[from] LiteralError),
}

impl ActionRecord {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Build the typed action. Never fails: items that cannot be built come
    /// back as [`Action::Invalid`] carrying the reason.
    pub fn into_action(self, frames: &LiteralFrames) -> Action {
        let name = self.name.trim().to_lowercase();
        match self.build(&name, frames) {
            Ok(action) => action,
            Err(e) => {
                log::debug!("action '{}' rejected: {}", name, e);
                Action::invalid(name, e)
            }
        }
    }

    fn build(&self, name: &str, frames: &LiteralFrames) -> Result<Action, FieldError> {
        let kind = ActionName::from_token(name).ok_or(FieldError::UnknownName)?;

        let action = match kind {
            ActionName::Click => Action::Click {
                element: self.element(frames.element)?,
                element_id: self.numeric_element_id(),
            },
            ActionName::Hover => Action::Hover {
                element: self.element(frames.element)?,
                element_id: self.numeric_element_id(),
            },
            ActionName::Select => Action::Select {
                element: self.element(frames.element)?,
                element_id: self.numeric_element_id(),
                text: self.text()?,
            },
            ActionName::Input => Action::Input { text: self.text()? },
            ActionName::Answer => Action::Answer { text: self.text()? },
            ActionName::Tap => Action::Tap {
                point: self.point(frames.point)?,
            },
            ActionName::SelectText => Action::SelectText {
                dual_point: self.dual_point(frames.dual_point)?,
            },
            ActionName::Swipe => Action::Swipe {
                dual_point: self.dual_point(frames.dual_point)?,
            },
            ActionName::Scroll => Action::Scroll {
                scroll: self.scroll(frames.scroll)?,
            },
            ActionName::Enter => Action::Enter,
            ActionName::Copy => Action::Copy,
            ActionName::GoBack => Action::GoBack,
            ActionName::GoHome => Action::GoHome,
            ActionName::TaskComplete => Action::TaskComplete,
            ActionName::TaskImpossible => Action::TaskImpossible,
        };
        Ok(action)
    }

    fn element(&self, frame: ReferenceFrame) -> Result<BBox, FieldError> {
        let literal = literal_str(self.element.as_ref(), "element")?;
        Ok(parse_box(literal, frame)?)
    }

    /// Numeric ids (or numeric strings) only; anything else reads as absent.
    pub fn numeric_element_id(&self) -> Option<i64> {
        match self.element_id.as_ref()? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            }
            _ => None,
        }
    }

    fn text(&self) -> Result<String, FieldError> {
        match self.text.as_ref() {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Null) | None => Err(FieldError::Missing("text")),
            Some(other) => Ok(other.to_string()),
        }
    }

    fn point(&self, frame: ReferenceFrame) -> Result<Point, FieldError> {
        let literal = literal_str(self.point.as_ref(), "point")?;
        Ok(parse_point(literal, frame)?)
    }

    fn dual_point(&self, frame: ReferenceFrame) -> Result<DualPoint, FieldError> {
        let map = object(self.dual_point.as_ref(), "dual_point")?;
        let from = literal_str(map.get("from"), "dual_point.from")?;
        let to = literal_str(map.get("to"), "dual_point.to")?;
        Ok(DualPoint {
            from: parse_point(from, frame)?,
            to: parse_point(to, frame)?,
        })
    }

    fn scroll(&self, frame: ReferenceFrame) -> Result<Scroll, FieldError> {
        let map = object(self.scroll.as_ref(), "scroll")?;
        let down = scalar_text(map.get("down"), "scroll.down")?;
        let right = scalar_text(map.get("right"), "scroll.right")?;

        // Scaled payloads sometimes carry fraction deltas already.
        let frame = if frame == ReferenceFrame::RelativeScaledInt && down.contains('.') {
            ReferenceFrame::RelativeFraction
        } else {
            frame
        };

        let number = |field: &'static str, text: &str| {
            parse_scalar(text).ok_or_else(|| FieldError::NotANumber {
                field,
                value: text.to_string(),
            })
        };

        Ok(Scroll {
            down: number("scroll.down", &down)?,
            right: number("scroll.right", &right)?,
            frame,
        })
    }
}

fn literal_str<'a>(value: Option<&'a Value>, field: &'static str) -> Result<&'a str, FieldError> {
    match value {
        Some(Value::String(s)) => Ok(s),
        Some(Value::Null) | None => Err(FieldError::Missing(field)),
        Some(_) => Err(FieldError::WrongType {
            field,
            expected: "a literal string",
        }),
    }
}

fn object<'a>(value: Option<&'a Value>, field: &'static str) -> Result<&'a Map<String, Value>, FieldError> {
    match value {
        Some(Value::Object(map)) => Ok(map),
        Some(Value::Null) | None => Err(FieldError::Missing(field)),
        Some(_) => Err(FieldError::WrongType {
            field,
            expected: "a mapping",
        }),
    }
}

fn scalar_text(value: Option<&Value>, field: &'static str) -> Result<String, FieldError> {
    match value {
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Null) | None => Err(FieldError::Missing(field)),
        Some(_) => Err(FieldError::WrongType {
            field,
            expected: "a number",
        }),
    }
}

// ============================================================================
// Typed action -> wire form
// ============================================================================

fn dual_point_value(dual: &DualPoint) -> Value {
    serde_json::json!({
        "from": dual.from.to_string(),
        "to": dual.to.to_string(),
    })
}

impl From<&Action> for ActionRecord {
    fn from(action: &Action) -> Self {
        let mut record = ActionRecord::named(action.name_token());

        match action {
            Action::Click { element, element_id } | Action::Hover { element, element_id } => {
                record.element = Some(Value::String(element.to_string()));
                record.element_id = element_id.map(Value::from);
            }
            Action::Select {
                element,
                element_id,
                text,
            } => {
                record.element = Some(Value::String(element.to_string()));
                record.element_id = element_id.map(Value::from);
                record.text = Some(Value::String(text.clone()));
            }
            Action::Input { text } | Action::Answer { text } => {
                record.text = Some(Value::String(text.clone()));
            }
            Action::Tap { point } => {
                record.point = Some(Value::String(point.to_string()));
            }
            Action::SelectText { dual_point } | Action::Swipe { dual_point } => {
                record.dual_point = Some(dual_point_value(dual_point));
            }
            Action::Scroll { scroll } => {
                record.scroll = Some(serde_json::json!({
                    "down": format_value(scroll.down, scroll.frame),
                    "right": format_value(scroll.right, scroll.frame),
                }));
            }
            Action::Enter
            | Action::Copy
            | Action::GoBack
            | Action::GoHome
            | Action::TaskComplete
            | Action::TaskImpossible
            | Action::Invalid(_) => {}
        }

        record
    }
}

impl From<Action> for ActionRecord {
    fn from(action: Action) -> Self {
        ActionRecord::from(&action)
    }
}
