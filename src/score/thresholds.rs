use serde::{Deserialize, Serialize};

use crate::screen::matcher::DEFAULT_MATCH_IOU;

/// Cut-offs used by the scoring rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Maximum tap distance (fraction units) that still counts as a hit
    #[serde(default = "default_tap_distance")]
    pub tap_distance: f64,

    /// IoU above which the matcher trusts overlap over proximity
    #[serde(default = "default_match_iou")]
    pub match_iou: f64,

    /// Text F1 above which input/answer/select text counts as finished
    #[serde(default = "default_half")]
    pub text_f1_pass: f64,

    /// Region IoU above which select_text counts as finished
    #[serde(default = "default_half")]
    pub region_iou_pass: f64,

    /// text2bbox samples scoring below this are logged as errors
    #[serde(default = "default_grounding_log_below")]
    pub grounding_log_below: f64,

    /// IoU levels text2bbox hit rates are reported at
    #[serde(default = "default_grounding_iou_levels")]
    pub grounding_iou_levels: Vec<f64>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            tap_distance: default_tap_distance(),
            match_iou: default_match_iou(),
            text_f1_pass: default_half(),
            region_iou_pass: default_half(),
            grounding_log_below: default_grounding_log_below(),
            grounding_iou_levels: default_grounding_iou_levels(),
        }
    }
}

fn default_tap_distance() -> f64 { 0.14 }
fn default_match_iou() -> f64 { DEFAULT_MATCH_IOU }
fn default_half() -> f64 { 0.5 }
fn default_grounding_log_below() -> f64 { 0.7 }
fn default_grounding_iou_levels() -> Vec<f64> { vec![0.2, 0.5, 0.7, 0.9] }
