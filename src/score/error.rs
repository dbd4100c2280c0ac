use thiserror::Error;

use crate::action::action_model::ReferenceFrame;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Label uses a name outside the vocabulary. Labels are trusted, so this
    /// aborts the evaluation.
    #[error("unknown action name '{0}' in label")]
    UnknownLabelAction(String),

    /// Label group has no actions to score against.
    #[error("label action group is empty")]
    EmptyLabelGroup,

    #[error("label for sample {uid} is malformed: {reason}")]
    MalformedLabel { uid: String, reason: String },

    #[error("{action}: missing field '{field}'")]
    MissingField { action: String, field: &'static str },

    #[error("{action}: {reason}")]
    InvalidAction { action: String, reason: String },

    #[error("{action}: predicted {predicted:?} but label is {label:?}")]
    FrameMismatch {
        action: String,
        predicted: ReferenceFrame,
        label: ReferenceFrame,
    },
}

impl EvalError {
    /// Fatal errors abort the evaluation; the rest cost one step its score.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EvalError::UnknownLabelAction(_)
                | EvalError::EmptyLabelGroup
                | EvalError::MalformedLabel { .. }
        )
    }
}
