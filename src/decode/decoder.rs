use crate::action::action_model::{ActionGroup, ReferenceFrame};
use crate::decode::csv_line::parse_csv;
use crate::decode::dialect::Dialect;
use crate::decode::error::DecodeError;
use crate::decode::record::{ActionRecord, LiteralFrames};
use crate::decode::structured::{parse_json, parse_yaml};

/// Separates a free-text "thoughts" prefix from the action payload.
pub const THOUGHT_DELIMITER: char = '\u{4}';

const PAYLOAD_MARKERS: [&str; 2] = ["actions:", "## Next Actions"];

/// Result of decoding one prediction. `error` is set when the payload could
/// not be decoded at all; `group` is then empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded {
    pub group: ActionGroup,
    pub error: Option<DecodeError>,
}

impl Decoded {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Drop everything before the action payload: the suffix after the last
/// 0x04 byte, then the text after the last `actions:` (or, failing that,
/// `## Next Actions`) marker.
pub fn strip_preamble(raw: &str) -> &str {
    let mut payload = raw;

    if let Some(i) = payload.rfind(THOUGHT_DELIMITER) {
        payload = payload[i + THOUGHT_DELIMITER.len_utf8()..].trim();
    }

    for marker in PAYLOAD_MARKERS {
        if let Some(i) = payload.rfind(marker) {
            return payload[i + marker.len()..].trim();
        }
    }

    payload
}

/// Decode a prediction whose literals are absolute pixels.
pub fn decode(raw: &str, dialect: Dialect) -> Decoded {
    decode_in_frame(raw, dialect, ReferenceFrame::AbsolutePixel)
}

/// Decode a prediction whose literals are all written in `frame`.
pub fn decode_in_frame(raw: &str, dialect: Dialect, frame: ReferenceFrame) -> Decoded {
    decode_with(raw, dialect, &LiteralFrames::uniform(frame))
}

/// Decode a prediction. Never fails hard: a payload that does not parse
/// yields an empty group plus the error, which is also logged.
pub fn decode_with(raw: &str, dialect: Dialect, frames: &LiteralFrames) -> Decoded {
    decode_adjusted(raw, dialect, frames, |record| record)
}

/// [`decode_with`], passing every wire record through `adjust` before the
/// typed action is built.
pub fn decode_adjusted(
    raw: &str,
    dialect: Dialect,
    frames: &LiteralFrames,
    adjust: impl Fn(ActionRecord) -> ActionRecord,
) -> Decoded {
    let payload = strip_preamble(raw);

    match decode_records(payload, dialect) {
        Ok(records) => Decoded {
            group: records
                .into_iter()
                .map(|r| adjust(r).into_action(frames))
                .collect(),
            error: None,
        },
        Err(e) => {
            log::warn!("decode error ({}): {} -- payload: {:?}", dialect, e, payload);
            Decoded {
                group: ActionGroup::empty(),
                error: Some(e),
            }
        }
    }
}

/// Payload -> wire records, per dialect grammar.
pub fn decode_records(payload: &str, dialect: Dialect) -> Result<Vec<ActionRecord>, DecodeError> {
    match dialect {
        Dialect::Json | Dialect::Jsonl => parse_json(payload),
        Dialect::Yaml => parse_yaml(payload),
        Dialect::Csv => parse_csv(payload),
    }
}
