use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::decode::record::ActionRecord;

// ============================================================================
// Reference frames and geometric values
// ============================================================================

/// Coordinate system a geometric value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceFrame {
    /// Integer pixels of the source image
    AbsolutePixel,
    /// Fraction of the image width/height, in [0, 1]
    RelativeFraction,
    /// Fraction scaled by 1000 and truncated to an integer
    RelativeScaledInt,
}

impl ReferenceFrame {
    /// Field delimiter used inside `<box>`/`<point>` literals.
    pub fn delimiter(self) -> char {
        match self {
            ReferenceFrame::RelativeScaledInt => ' ',
            _ => ',',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub frame: ReferenceFrame,
}

impl Point {
    pub fn new(x: f64, y: f64, frame: ReferenceFrame) -> Self {
        Self { x, y, frame }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Corner-form box. Corner order is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub frame: ReferenceFrame,
}

impl BBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, frame: ReferenceFrame) -> Self {
        Self { x1, y1, x2, y2, frame }
    }

    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0, self.frame)
    }
}

/// Scroll deltas. Pixel or fraction units depending on `frame`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scroll {
    pub down: f64,
    pub right: f64,
    pub frame: ReferenceFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DualPoint {
    pub from: Point,
    pub to: Point,
}

// ============================================================================
// Action vocabulary
// ============================================================================

/// Closed vocabulary of action names, keyed by their lower-case token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionName {
    Click,
    Hover,
    Input,
    Enter,
    Scroll,
    SelectText,
    Copy,
    Answer,
    Select,
    Tap,
    Swipe,
    GoBack,
    GoHome,
    TaskComplete,
    TaskImpossible,
}

impl ActionName {
    pub const ALL: [ActionName; 15] = [
        ActionName::Click,
        ActionName::Hover,
        ActionName::Input,
        ActionName::Enter,
        ActionName::Scroll,
        ActionName::SelectText,
        ActionName::Copy,
        ActionName::Answer,
        ActionName::Select,
        ActionName::Tap,
        ActionName::Swipe,
        ActionName::GoBack,
        ActionName::GoHome,
        ActionName::TaskComplete,
        ActionName::TaskImpossible,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionName::Click => "click",
            ActionName::Hover => "hover",
            ActionName::Input => "input",
            ActionName::Enter => "enter",
            ActionName::Scroll => "scroll",
            ActionName::SelectText => "select_text",
            ActionName::Copy => "copy",
            ActionName::Answer => "answer",
            ActionName::Select => "select",
            ActionName::Tap => "tap",
            ActionName::Swipe => "swipe",
            ActionName::GoBack => "go_back",
            ActionName::GoHome => "go_home",
            ActionName::TaskComplete => "task_complete",
            ActionName::TaskImpossible => "task_impossible",
        }
    }

    /// Look up a name token. The token must already be lower-case.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == token)
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(&s.trim().to_lowercase()).ok_or_else(|| format!("unknown action name '{}'", s))
    }
}

/// One canonical UI action.
///
/// `Invalid` holds an item the decoder could not turn into a known variant:
/// either its name is outside the vocabulary, or a required field was
/// missing or malformed. It keeps the raw name so sequence comparison still
/// sees it, and scoring treats it as a failed step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "ActionRecord")]
pub enum Action {
    Click { element: BBox, element_id: Option<i64> },
    Hover { element: BBox, element_id: Option<i64> },
    Input { text: String },
    Enter,
    Scroll { scroll: Scroll },
    SelectText { dual_point: DualPoint },
    Copy,
    Answer { text: String },
    Select { element: BBox, element_id: Option<i64>, text: String },
    Tap { point: Point },
    Swipe { dual_point: DualPoint },
    GoBack,
    GoHome,
    TaskComplete,
    TaskImpossible,
    Invalid(InvalidAction),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidAction {
    /// Raw (lower-cased) name token as it appeared in the payload
    pub name: String,
    pub reason: String,
}

impl Action {
    /// Known name, or `None` for an item whose name is outside the vocabulary.
    pub fn name(&self) -> Option<ActionName> {
        let name = match self {
            Action::Click { .. } => ActionName::Click,
            Action::Hover { .. } => ActionName::Hover,
            Action::Input { .. } => ActionName::Input,
            Action::Enter => ActionName::Enter,
            Action::Scroll { .. } => ActionName::Scroll,
            Action::SelectText { .. } => ActionName::SelectText,
            Action::Copy => ActionName::Copy,
            Action::Answer { .. } => ActionName::Answer,
            Action::Select { .. } => ActionName::Select,
            Action::Tap { .. } => ActionName::Tap,
            Action::Swipe { .. } => ActionName::Swipe,
            Action::GoBack => ActionName::GoBack,
            Action::GoHome => ActionName::GoHome,
            Action::TaskComplete => ActionName::TaskComplete,
            Action::TaskImpossible => ActionName::TaskImpossible,
            Action::Invalid(invalid) => return ActionName::from_token(&invalid.name),
        };
        Some(name)
    }

    /// Name token used for sequence identity.
    pub fn name_token(&self) -> &str {
        match self {
            Action::Invalid(invalid) => &invalid.name,
            other => other.name().map(ActionName::as_str).unwrap_or_default(),
        }
    }

    pub fn invalid(name: impl Into<String>, reason: impl ToString) -> Self {
        Action::Invalid(InvalidAction {
            name: name.into(),
            reason: reason.to_string(),
        })
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Action::Invalid(_))
    }
}

// ============================================================================
// Action group
// ============================================================================

/// Ordered sequence of actions forming one multi-step response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ActionGroup {
    pub actions: Vec<Action>,
}

impl ActionGroup {
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    pub fn name_tokens(&self) -> Vec<&str> {
        self.actions.iter().map(Action::name_token).collect()
    }
}

impl From<Vec<Action>> for ActionGroup {
    fn from(actions: Vec<Action>) -> Self {
        Self { actions }
    }
}

impl FromIterator<Action> for ActionGroup {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ActionGroup {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}
