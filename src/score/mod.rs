pub mod action_score;
pub mod error;
pub mod grounding;
pub mod group_score;
pub mod text_match;
pub mod thresholds;
