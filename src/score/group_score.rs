use serde::{Deserialize, Serialize};

use crate::action::action_model::{ActionGroup, ActionName};
use crate::score::action_score::score_action_with;
use crate::score::error::EvalError;
use crate::score::thresholds::Thresholds;

/// Comparison of a predicted action group against its label group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupScore {
    /// Ordered label action names; the aggregation key
    pub label_names: Vec<ActionName>,
    /// Predicted and label name sequences are identical
    pub name_exact_match: bool,
    /// Every label step was finished
    pub finished_all: bool,
    /// Sum of step scores divided by the label length
    pub mean_score: f64,
}

/// Score a predicted group against a label group with default thresholds.
pub fn score_group(pred: &ActionGroup, label: &ActionGroup) -> Result<GroupScore, EvalError> {
    score_group_with(pred, label, &Thresholds::default())
}

/// Score a predicted group against a label group.
///
/// Steps are walked in label order. A step with no predicted counterpart,
/// or whose comparison fails recoverably, scores 0 and clears
/// `finished_all`. Only fatal label errors are returned.
pub fn score_group_with(
    pred: &ActionGroup,
    label: &ActionGroup,
    thresholds: &Thresholds,
) -> Result<GroupScore, EvalError> {
    if label.is_empty() {
        return Err(EvalError::EmptyLabelGroup);
    }

    let label_names = label
        .iter()
        .map(|a| {
            a.name()
                .ok_or_else(|| EvalError::UnknownLabelAction(a.name_token().to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let name_exact_match = pred.name_tokens() == label.name_tokens();

    let mut finished_all = true;
    let mut total = 0.0;

    for (i, label_action) in label.iter().enumerate() {
        let Some(pred_action) = pred.get(i) else {
            log::debug!("step {}: no predicted action for '{}'", i, label_action.name_token());
            finished_all = false;
            continue;
        };

        match score_action_with(pred_action, label_action, thresholds) {
            Ok(step) => {
                total += step.score;
                if !step.finished {
                    finished_all = false;
                }
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                log::warn!("step {} scored 0: {}", i, e);
                finished_all = false;
            }
        }
    }

    Ok(GroupScore {
        label_names,
        name_exact_match,
        finished_all,
        mean_score: total / label.len() as f64,
    })
}
