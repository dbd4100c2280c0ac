use gui_action_eval::action::action_model::ActionName;
use gui_action_eval::report::console::{format_action_report, format_grounding_report};
use gui_action_eval::report::report_model::{ActionAccumulator, GroundingAccumulator, GroupKey};
use gui_action_eval::score::grounding::TextScore;
use gui_action_eval::score::group_score::GroupScore;

// ============================================================================
// Helper builders
// ============================================================================

fn group_score(names: &[ActionName], exact: bool, finished: bool, score: f64) -> GroupScore {
    GroupScore {
        label_names: names.to_vec(),
        name_exact_match: exact,
        finished_all: finished,
        mean_score: score,
    }
}

fn mixed_scores() -> Vec<GroupScore> {
    use ActionName::{Click, Input, Scroll};
    vec![
        group_score(&[Click], true, true, 1.0),
        group_score(&[Click], true, false, 0.5),
        group_score(&[Click, Input], false, false, 0.25),
        group_score(&[Scroll], true, true, 1.0),
    ]
}

// ============================================================================
// Action accumulation
// ============================================================================

#[test]
fn accumulator_tracks_overall_and_per_group_means() {
    let acc = mixed_scores().iter().fold(ActionAccumulator::default(), |acc, s| acc.with(s));
    let report = acc.report();

    assert_eq!(report.sample_count, 4);
    assert_eq!(report.overall.name_exact_match, 0.75);
    assert_eq!(report.overall.finished_all, 0.5);
    assert_eq!(report.overall.mean_score, 0.6875);

    let clicks = report.group(&[ActionName::Click]).unwrap();
    assert_eq!(clicks.count, 2);
    assert_eq!(clicks.means.finished_all, 0.5);
    assert_eq!(clicks.means.mean_score, 0.75);

    assert_eq!(report.groups.len(), 3);
    assert!(report.group(&[ActionName::Enter]).is_none());
}

#[test]
fn split_accumulators_merge_to_the_same_result() {
    let scores = mixed_scores();
    let whole = scores.iter().fold(ActionAccumulator::default(), |acc, s| acc.with(s));

    let (left, right) = scores.split_at(1);
    let a = left.iter().fold(ActionAccumulator::default(), |acc, s| acc.with(s));
    let b = right.iter().fold(ActionAccumulator::default(), |acc, s| acc.with(s));

    assert_eq!(a.clone().merge(b.clone()), whole);
    assert_eq!(b.merge(a), whole);
}

#[test]
fn empty_accumulator_reports_zero_means() {
    let report = ActionAccumulator::default().report();
    assert_eq!(report.sample_count, 0);
    assert_eq!(report.overall.mean_score, 0.0);
    assert!(report.groups.is_empty());
}

#[test]
fn group_key_displays_names_in_order() {
    let key = GroupKey(vec![ActionName::Click, ActionName::SelectText]);
    assert_eq!(key.to_string(), "[click, select_text]");
}

#[test]
fn action_report_serializes_to_json() {
    let acc = mixed_scores().iter().fold(ActionAccumulator::default(), |acc, s| acc.with(s));
    let json = serde_json::to_value(acc.report().with_duration(1500)).unwrap();

    assert_eq!(json["sample_count"], 4);
    assert_eq!(json["duration_ms"], 1500);
    assert_eq!(json["groups"][0]["names"][0], "click");
}

// ============================================================================
// Grounding accumulation
// ============================================================================

#[test]
fn grounding_accumulator_counts_hits_per_level() {
    let mut acc = GroundingAccumulator::new(&[0.2, 0.5, 0.7, 0.9]);
    acc.record_boxes(0.6);
    acc.record_boxes(0.95);
    acc.record_boxes(0.1);
    acc.record_boxes(0.5);
    acc.record_text(&TextScore {
        exact_match: 1.0,
        f1: 1.0,
    });
    acc.record_text(&TextScore {
        exact_match: 0.0,
        f1: 0.5,
    });

    let report = acc.report();
    let rates: Vec<f64> = report.text2bbox_hit_rates.iter().map(|h| h.rate).collect();
    assert_eq!(rates, vec![0.75, 0.5, 0.25, 0.25], "a score equal to a level does not clear it");
    assert_eq!(report.text2bbox_count, 4);
    assert_eq!(report.bbox2text_exact_match, 0.5);
    assert_eq!(report.bbox2text_f1, 0.75);
}

#[test]
fn grounding_accumulators_merge_by_addition() {
    let levels = [0.5];
    let mut a = GroundingAccumulator::new(&levels);
    a.record_boxes(0.9);
    let mut b = GroundingAccumulator::new(&levels);
    b.record_boxes(0.1);

    let merged = a.merge(b).report();
    assert_eq!(merged.text2bbox_count, 2);
    assert_eq!(merged.text2bbox_hit_rates[0].rate, 0.5);
}

// ============================================================================
// Console formatting
// ============================================================================

#[test]
fn console_action_report_lists_groups() {
    let acc = mixed_scores().iter().fold(ActionAccumulator::default(), |acc, s| acc.with(s));
    let out = format_action_report(&acc.report().with_duration(2500));

    assert!(out.starts_with("=== Action evaluation: 4 samples in 2.5s ==="), "got:\n{}", out);
    assert!(out.contains("name exact match : 0.750"));
    assert!(out.contains("finished all     : 0.500"));
    assert!(out.contains("[click, input]"));
    assert!(out.contains("n=2"));
}

#[test]
fn console_grounding_report_lists_levels() {
    let mut acc = GroundingAccumulator::new(&[0.5, 0.9]);
    acc.record_boxes(0.7);
    let out = format_grounding_report(&acc.report());

    assert!(out.starts_with("=== Grounding evaluation ==="));
    assert!(out.contains("text2bbox samples      : 1"));
    assert!(out.contains("iou@0.5"));
    assert!(out.contains(": 1.000"));
    assert!(out.contains(": 0.000"));
}
