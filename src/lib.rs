//! Offline evaluation of GUI-agent action predictions.
//!
//! A raw model output is decoded from one of several dialects into a
//! canonical [`ActionGroup`](action::action_model::ActionGroup), brought into
//! the label's coordinate frames, scored action by action and aggregated over
//! a dataset.

pub mod action;
pub mod cli;
pub mod decode;
pub mod geometry;
pub mod report;
pub mod sample;
pub mod score;
pub mod screen;
pub mod trace;

use crate::decode::decoder::decode;
use crate::decode::dialect::Dialect;
use crate::score::error::EvalError;
use crate::score::group_score::{GroupScore, score_group};

/// Decode a pixel-frame prediction and score it against an already canonical
/// label group. Decode failures score as an empty prediction.
pub fn evaluate_raw(
    raw: &str,
    dialect: Dialect,
    label: &action::action_model::ActionGroup,
) -> Result<GroupScore, EvalError> {
    let decoded = decode(raw, dialect);
    score_group(&decoded.group, label)
}
