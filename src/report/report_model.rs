use std::collections::BTreeMap;
use std::fmt;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::action::action_model::ActionName;
use crate::score::grounding::TextScore;
use crate::score::group_score::GroupScore;

// ============================================================================
// Action task accumulation
// ============================================================================

/// Running sums for one slice of the dataset. Means are taken only when a
/// report is built, so tallies merge by plain addition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub name_exact_match: f64,
    pub finished_all: f64,
    pub score: f64,
    pub count: usize,
}

impl Tally {
    pub fn record(&mut self, score: &GroupScore) {
        self.name_exact_match += indicator(score.name_exact_match);
        self.finished_all += indicator(score.finished_all);
        self.score += score.mean_score;
        self.count += 1;
    }

    pub fn means(&self) -> Means {
        Means {
            name_exact_match: mean(self.name_exact_match, self.count),
            finished_all: mean(self.finished_all, self.count),
            mean_score: mean(self.score, self.count),
        }
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, other: Tally) {
        self.name_exact_match += other.name_exact_match;
        self.finished_all += other.finished_all;
        self.score += other.score;
        self.count += other.count;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Means {
    pub name_exact_match: f64,
    pub finished_all: f64,
    pub mean_score: f64,
}

/// Ordered label action names a sample is grouped under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey(pub Vec<ActionName>);

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|n| n.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Dataset-level accumulator for action tasks: a global tally plus one
/// tally per label name sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionAccumulator {
    pub total: Tally,
    pub groups: BTreeMap<GroupKey, Tally>,
}

impl ActionAccumulator {
    pub fn record(&mut self, score: &GroupScore) {
        self.total.record(score);
        self.groups
            .entry(GroupKey(score.label_names.clone()))
            .or_default()
            .record(score);
    }

    /// Fold-friendly form of [`record`](Self::record).
    pub fn with(mut self, score: &GroupScore) -> Self {
        self.record(score);
        self
    }

    /// Combine two accumulators. Associative and commutative.
    pub fn merge(mut self, other: ActionAccumulator) -> Self {
        self.total += other.total;
        for (key, tally) in other.groups {
            *self.groups.entry(key).or_default() += tally;
        }
        self
    }

    pub fn report(&self) -> ActionReport {
        ActionReport {
            sample_count: self.total.count,
            overall: self.total.means(),
            groups: self
                .groups
                .iter()
                .map(|(key, tally)| GroupSummary {
                    names: key.0.clone(),
                    count: tally.count,
                    means: tally.means(),
                })
                .collect(),
            duration_ms: None,
        }
    }
}

/// Finished action-task statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionReport {
    pub sample_count: usize,
    pub overall: Means,
    /// Per label name sequence, in key order
    pub groups: Vec<GroupSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub names: Vec<ActionName>,
    pub count: usize,
    pub means: Means,
}

impl ActionReport {
    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn group(&self, names: &[ActionName]) -> Option<&GroupSummary> {
        self.groups.iter().find(|g| g.names == names)
    }
}

// ============================================================================
// Grounding task accumulation
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct GroundingAccumulator {
    pub exact_match: f64,
    pub f1: f64,
    pub text_count: usize,

    /// IoU levels, parallel to `hits`
    pub levels: Vec<f64>,
    pub hits: Vec<usize>,
    pub box_count: usize,
}

impl GroundingAccumulator {
    pub fn new(levels: &[f64]) -> Self {
        Self {
            exact_match: 0.0,
            f1: 0.0,
            text_count: 0,
            levels: levels.to_vec(),
            hits: vec![0; levels.len()],
            box_count: 0,
        }
    }

    pub fn record_text(&mut self, score: &TextScore) {
        self.exact_match += score.exact_match;
        self.f1 += score.f1;
        self.text_count += 1;
    }

    /// Count a text2bbox score against every level it clears.
    pub fn record_boxes(&mut self, score: f64) {
        for (level, hits) in self.levels.iter().zip(self.hits.iter_mut()) {
            if score > *level {
                *hits += 1;
            }
        }
        self.box_count += 1;
    }

    /// Accumulators must have been built with the same levels.
    pub fn merge(mut self, other: GroundingAccumulator) -> Self {
        debug_assert_eq!(self.levels, other.levels, "merging accumulators with different IoU levels");
        self.exact_match += other.exact_match;
        self.f1 += other.f1;
        self.text_count += other.text_count;
        for (hits, more) in self.hits.iter_mut().zip(other.hits) {
            *hits += more;
        }
        self.box_count += other.box_count;
        self
    }

    pub fn report(&self) -> GroundingReport {
        GroundingReport {
            bbox2text_count: self.text_count,
            bbox2text_exact_match: mean(self.exact_match, self.text_count),
            bbox2text_f1: mean(self.f1, self.text_count),
            text2bbox_count: self.box_count,
            text2bbox_hit_rates: self
                .levels
                .iter()
                .zip(&self.hits)
                .map(|(level, hits)| HitRate {
                    iou: *level,
                    rate: mean(*hits as f64, self.box_count),
                })
                .collect(),
            duration_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingReport {
    pub bbox2text_count: usize,
    pub bbox2text_exact_match: f64,
    pub bbox2text_f1: f64,
    pub text2bbox_count: usize,
    pub text2bbox_hit_rates: Vec<HitRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
}

impl GroundingReport {
    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitRate {
    pub iou: f64,
    pub rate: f64,
}

fn indicator(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}
