use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::action::action_model::{BBox, Point, ReferenceFrame};

// ============================================================================
// `<box>…</box>` / `<point>…</point>` literal grammar
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LiteralError {
    #[error("missing <{tag}> or </{tag}> in '{literal}'")]
    MissingTag { tag: &'static str, literal: String },

    #[error("expected {expected} fields in <{tag}>, found {found}")]
    FieldCount {
        tag: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("non-numeric field '{field}' in <{tag}>")]
    NotANumber { tag: &'static str, field: String },
}

static BOX_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<box>.*?</box>").expect("box literal pattern"));

/// Parse `<box>x1, y1, x2, y2</box>` using the delimiter of `frame`.
///
/// Pixel values are truncated to integers.
pub fn parse_box(literal: &str, frame: ReferenceFrame) -> Result<BBox, LiteralError> {
    let values = parse_fields(literal, "box", 4, frame)?;
    Ok(BBox::new(values[0], values[1], values[2], values[3], frame))
}

/// Parse `<point>x, y</point>` using the delimiter of `frame`.
pub fn parse_point(literal: &str, frame: ReferenceFrame) -> Result<Point, LiteralError> {
    let values = parse_fields(literal, "point", 2, frame)?;
    Ok(Point::new(values[0], values[1], frame))
}

/// Every `<box>…</box>` substring of `text`, in order of appearance.
pub fn find_box_literals(text: &str) -> Vec<&str> {
    BOX_LITERAL.find_iter(text).map(|m| m.as_str()).collect()
}

/// Parse a bare scalar (scroll deltas) at full precision; the sign and
/// relative size of both deltas decide the scroll direction.
pub fn parse_scalar(text: &str) -> Option<f64> {
    text.trim().parse().ok()
}

fn parse_fields(
    literal: &str,
    tag: &'static str,
    expected: usize,
    frame: ReferenceFrame,
) -> Result<Vec<f64>, LiteralError> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);

    let start = literal.rfind(&open).map(|i| i + open.len());
    let inner = start.and_then(|s| literal[s..].find(&close).map(|e| &literal[s..s + e]));
    let inner = match inner {
        Some(inner) => inner.trim(),
        None => {
            return Err(LiteralError::MissingTag {
                tag,
                literal: literal.to_string(),
            });
        }
    };

    let fields: Vec<&str> = match frame.delimiter() {
        ' ' => inner.split_whitespace().collect(),
        delim => inner.split(delim).map(str::trim).collect(),
    };

    if fields.len() != expected {
        return Err(LiteralError::FieldCount {
            tag,
            expected,
            found: fields.len(),
        });
    }

    fields
        .into_iter()
        .map(|field| {
            field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| quantize(v, frame))
                .ok_or_else(|| LiteralError::NotANumber {
                    tag,
                    field: field.to_string(),
                })
        })
        .collect()
}

fn quantize(value: f64, frame: ReferenceFrame) -> f64 {
    match frame {
        ReferenceFrame::AbsolutePixel => value.trunc(),
        _ => value,
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render one coordinate the way literals of `frame` carry it.
pub fn format_value(value: f64, frame: ReferenceFrame) -> String {
    match frame {
        ReferenceFrame::RelativeFraction => format!("{:.3}", value),
        _ => format!("{}", value.trunc() as i64),
    }
}

fn join_values(values: &[f64], frame: ReferenceFrame) -> String {
    let sep = match frame {
        ReferenceFrame::RelativeScaledInt => " ",
        _ => ", ",
    };
    values
        .iter()
        .map(|v| format_value(*v, frame))
        .collect::<Vec<_>>()
        .join(sep)
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<box>{}</box>",
            join_values(&[self.x1, self.y1, self.x2, self.y2], self.frame)
        )
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<point>{}</point>", join_values(&[self.x, self.y], self.frame))
    }
}
