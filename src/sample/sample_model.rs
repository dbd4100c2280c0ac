use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::action_model::{ActionGroup, ReferenceFrame};
use crate::decode::dialect::Dialect;
use crate::geometry::rect::Rect;
use crate::screen::screen_model::{ImageSize, UiElement};

// ============================================================================
// Inputs
// ============================================================================

/// How a prediction writes its geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionFormat {
    /// Pixel literals, comma-delimited
    #[default]
    Absolute,
    /// Fraction literals, comma-delimited
    Related,
    /// Fraction x1000 integer literals, space-delimited
    #[serde(rename = "related_version1")]
    RelatedVersion1,
    /// Fraction literals, comma-delimited
    #[serde(rename = "related_version2")]
    RelatedVersion2,
    /// Targets named by `element_id` instead of a box
    ElementId,
}

impl PositionFormat {
    /// Frame the prediction's literals are written in.
    pub fn literal_frame(self) -> ReferenceFrame {
        match self {
            PositionFormat::Absolute | PositionFormat::ElementId => ReferenceFrame::AbsolutePixel,
            PositionFormat::Related | PositionFormat::RelatedVersion2 => ReferenceFrame::RelativeFraction,
            PositionFormat::RelatedVersion1 => ReferenceFrame::RelativeScaledInt,
        }
    }
}

/// One raw model output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub uid: String,
    pub pred: String,
    /// Payload dialect; only action tasks need it
    #[serde(default, alias = "string_format")]
    pub parse_format: Option<Dialect>,
    #[serde(default)]
    pub position_format: PositionFormat,
    #[serde(default)]
    pub image_id: Option<Value>,
}

/// Ground truth for one action-prediction sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLabel {
    pub uid: String,
    #[serde(default)]
    pub image_id: Option<Value>,
    pub image_size: ImageSize,
    #[serde(default)]
    pub question: Option<Value>,
    /// One action object or a list of them, in the structured label form
    pub actions_label: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroundingTask {
    /// Read the text inside a box
    Bbox2text,
    /// Locate the boxes containing a text
    Text2bbox,
}

/// Ground truth for one grounding sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundingLabel {
    pub uid: String,
    #[serde(default)]
    pub image_id: Option<Value>,
    pub image_size: ImageSize,
    pub task_type: GroundingTask,
    #[serde(default)]
    pub question: Option<Value>,
    /// Text for bbox2text; `{"absolute": [<box>…]}` for text2bbox
    pub answer: Value,
}

/// Candidate elements per screenshot, keyed by image id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementIndex(pub HashMap<String, Vec<UiElement>>);

impl ElementIndex {
    pub fn elements_for(&self, image_id: Option<&Value>) -> &[UiElement] {
        image_id
            .map(image_key)
            .and_then(|key| self.0.get(&key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Image ids arrive as numbers or strings; both key the same way.
pub fn image_key(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// Output record
// ============================================================================

/// What the evaluator made of a prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SampleAnswer {
    Actions(ActionGroup),
    Rects(Vec<Rect>),
    Text(String),
}

/// Per-sample output consumed by reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalRecord {
    pub uid: String,
    pub pred: String,
    pub answer: SampleAnswer,
    pub label: Value,
}
