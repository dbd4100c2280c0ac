use gui_action_eval::screen::matcher::{DEFAULT_MATCH_IOU, NO_MATCH, best_match, find_element, match_element};
use gui_action_eval::screen::screen_model::UiElement;

mod common;
use common::{elements, px_box};

// ============================================================================
// Element matching
// ============================================================================

#[test]
fn exact_box_matches_with_full_overlap() {
    let m = best_match(&px_box(200.0, 200.0, 500.0, 300.0), &elements(), DEFAULT_MATCH_IOU).unwrap();
    assert_eq!(m.id, 8);
    assert_eq!(m.iou, 1.0);
    assert_eq!(m.distance, 0.0);
}

#[test]
fn overlap_wins_over_proximity() {
    // Overlaps both; the first overlaps far more.
    let candidates = vec![
        UiElement::new(1, 0.0, 0.0, 40.0, 40.0),
        UiElement::new(2, 30.0, 0.0, 100.0, 100.0),
    ];
    let m = best_match(&px_box(0.0, 0.0, 60.0, 60.0), &candidates, 0.1).unwrap();
    assert_eq!(m.id, 1);

    // Raise the bar so neither overlap counts: nearest center wins instead.
    let m = best_match(&px_box(0.0, 0.0, 60.0, 60.0), &candidates, 0.9).unwrap();
    assert_eq!(m.id, 1, "center (30, 30) lies inside both, earlier candidate kept");
}

#[test]
fn falls_back_to_nearest_element_without_overlap() {
    let m = best_match(&px_box(590.0, 1400.0, 600.0, 1410.0), &elements(), DEFAULT_MATCH_IOU).unwrap();
    assert_eq!(m.id, 9);
    assert_eq!(m.iou, 0.0);
    assert!(m.distance > 0.0);
}

#[test]
fn small_overlap_below_threshold_uses_distance() {
    let candidates = vec![
        UiElement::new(1, 0.0, 0.0, 100.0, 100.0),
        UiElement::new(2, 150.0, 25.0, 10.0, 10.0),
    ];
    // Box barely overlaps element 1; element 2 sits just below its center.
    let predicted = px_box(95.0, 0.0, 205.0, 20.0);
    let m = best_match(&predicted, &candidates, DEFAULT_MATCH_IOU).unwrap();
    assert_eq!(m.id, 2);
}

#[test]
fn no_candidates_is_no_match() {
    assert!(best_match(&px_box(0.0, 0.0, 1.0, 1.0), &[], DEFAULT_MATCH_IOU).is_none());
    assert_eq!(match_element(&px_box(0.0, 0.0, 1.0, 1.0), &[]), NO_MATCH);
}

#[test]
fn match_element_returns_id() {
    assert_eq!(match_element(&px_box(0.0, 0.0, 100.0, 50.0), &elements()), 7);
}

#[test]
fn find_element_by_id() {
    let all = elements();
    assert_eq!(find_element(9, &all).map(|e| e.rect.width), Some(200.0));
    assert!(find_element(42, &all).is_none());
}

#[test]
fn element_deserializes_with_uid_alias() {
    let e: UiElement =
        serde_json::from_str(r#"{"uid": 5, "rect": {"x": 1, "y": 2, "width": 3, "height": 4}}"#).unwrap();
    assert_eq!(e, UiElement::new(5, 1.0, 2.0, 3.0, 4.0));
}
