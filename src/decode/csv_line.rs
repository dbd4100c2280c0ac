use serde_json::Value;

use crate::decode::error::DecodeError;
use crate::decode::record::ActionRecord;

// ============================================================================
// CSV-line dialect
// ============================================================================
//
//   click, <box>…</box>            hover, <box>…</box>
//   input, text                    answer, text
//   enter                          copy
//   scroll, down <v> right <v>     tap, <point>…</point>
//   select_text, from <p> to <p>   swipe, from <p> to <p>
//   select, <box>…</box>, text
//
// Any other line becomes `answer` with the whole line as text.

/// Split a CSV-line payload into wire records, one per line.
pub fn parse_csv(payload: &str) -> Result<Vec<ActionRecord>, DecodeError> {
    payload
        .trim()
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            parse_line(line).map_err(|reason| DecodeError::MalformedLine { line: i + 1, reason })
        })
        .collect()
}

fn parse_line(line: &str) -> Result<ActionRecord, String> {
    if let Some(rest) = field(line, "click,") {
        return Ok(with_element("click", rest));
    }
    if let Some(rest) = field(line, "hover,") {
        return Ok(with_element("hover", rest));
    }
    if let Some(rest) = field(line, "input,") {
        return Ok(with_text("input", rest));
    }
    if line.starts_with("enter") {
        return Ok(ActionRecord::named("enter"));
    }
    if let Some(rest) = field(line, "scroll,") {
        let (down, right) = split_pair(rest, "down", "right")?;
        let mut record = ActionRecord::named("scroll");
        record.scroll = Some(serde_json::json!({ "down": down, "right": right }));
        return Ok(record);
    }
    if let Some(rest) = field(line, "select_text,") {
        return with_dual_point("select_text", rest);
    }
    if line.starts_with("copy") {
        return Ok(ActionRecord::named("copy"));
    }
    if let Some(rest) = field(line, "answer,") {
        return Ok(with_text("answer", rest));
    }
    if let Some(rest) = field(line, "select,") {
        let (element, text) = split_select(rest)?;
        let mut record = with_element("select", element);
        record.text = Some(Value::String(text.trim().to_string()));
        return Ok(record);
    }
    if let Some(rest) = field(line, "tap,") {
        let mut record = ActionRecord::named("tap");
        record.point = Some(Value::String(rest.trim().to_string()));
        return Ok(record);
    }
    if let Some(rest) = field(line, "swipe,") {
        return with_dual_point("swipe", rest);
    }

    Ok(with_text("answer", line))
}

/// For a line starting with `prefix`, the text after the prefix's last
/// occurrence. A repeated prefix inside the payload restarts the field.
fn field<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    if !line.starts_with(prefix) {
        return None;
    }
    line.rsplit(prefix).next()
}

fn with_element(name: &str, rest: &str) -> ActionRecord {
    let mut record = ActionRecord::named(name);
    record.element = Some(Value::String(rest.trim().to_string()));
    record
}

fn with_text(name: &str, rest: &str) -> ActionRecord {
    let mut record = ActionRecord::named(name);
    record.text = Some(Value::String(rest.trim().to_string()));
    record
}

fn with_dual_point(name: &str, rest: &str) -> Result<ActionRecord, String> {
    let (from, to) = split_pair(rest, "from", "to")?;
    let mut record = ActionRecord::named(name);
    record.dual_point = Some(serde_json::json!({ "from": from, "to": to }));
    Ok(record)
}

/// `"... <lead> A <sep> B"` -> `(A, B)`. Text after the last `lead` must
/// contain `sep` exactly once.
fn split_pair(rest: &str, lead: &str, sep: &str) -> Result<(String, String), String> {
    let tail = rest.trim().rsplit(lead).next().unwrap_or_default();
    let parts: Vec<&str> = tail.split(sep).collect();
    match parts.as_slice() {
        [a, b] => Ok((a.trim().to_string(), b.trim().to_string())),
        _ => Err(format!(
            "expected '{} <v> {} <v>', got '{}'",
            lead,
            sep,
            rest.trim()
        )),
    }
}

/// Element literal, then the remainder after the next comma as text.
fn split_select(rest: &str) -> Result<(&str, &str), String> {
    let rest = rest.trim();
    let element_end = match rest.find("</box>") {
        Some(i) if rest.starts_with("<box>") => i + "</box>".len(),
        _ => 0,
    };
    let (element, tail) = rest.split_at(element_end);
    let comma = tail
        .find(',')
        .ok_or_else(|| format!("expected '<element>, <text>', got '{}'", rest))?;

    let element = if element.is_empty() { &tail[..comma] } else { element };
    Ok((element, &tail[comma + 1..]))
}

// ============================================================================
// Rendering
// ============================================================================

/// Render wire records as CSV lines: `name, field, ...`.
pub fn render_csv(records: &[ActionRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let mut fields = vec![record.name.clone()];

        if let Some(element) = &record.element {
            fields.push(plain(element));
        }
        if let Some(point) = &record.point {
            fields.push(plain(point));
        }
        if let Some(dual) = &record.dual_point {
            fields.push(format!("from {} to {}", plain(&dual["from"]), plain(&dual["to"])));
        }
        if let Some(scroll) = &record.scroll {
            fields.push(format!("down {} right {}", plain(&scroll["down"]), plain(&scroll["right"])));
        }
        if let Some(text) = &record.text {
            fields.push(plain(text));
        }

        out.push_str(&fields.join(", "));
        out.push('\n');
    }
    out
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
