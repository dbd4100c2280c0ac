use gui_action_eval::action::action_model::{
    Action, ActionGroup, ActionName, BBox, DualPoint, Point, ReferenceFrame, Scroll,
};
use gui_action_eval::decode::dialect::Dialect;
use gui_action_eval::evaluate_raw;
use gui_action_eval::geometry::rect::Rect;
use gui_action_eval::score::action_score::{Direction, StepScore, score_action, score_action_with};
use gui_action_eval::score::error::EvalError;
use gui_action_eval::score::grounding::{extract_rects, score_bbox2text, score_text2bbox};
use gui_action_eval::score::group_score::score_group;
use gui_action_eval::score::text_match::{exact_match, normalize_answer, text_f1};
use gui_action_eval::score::thresholds::Thresholds;

mod common;
use common::{click, fraction_point, px_box, screen};

fn tap(x: f64, y: f64) -> Action {
    Action::Tap {
        point: fraction_point(x, y),
    }
}

fn px_scroll(down: f64, right: f64) -> Action {
    Action::Scroll {
        scroll: Scroll {
            down,
            right,
            frame: ReferenceFrame::AbsolutePixel,
        },
    }
}

fn px_dual(from: (f64, f64), to: (f64, f64)) -> DualPoint {
    DualPoint {
        from: Point::new(from.0, from.1, ReferenceFrame::AbsolutePixel),
        to: Point::new(to.0, to.1, ReferenceFrame::AbsolutePixel),
    }
}

// ============================================================================
// Text matching
// ============================================================================

#[test]
fn normalize_strips_case_punctuation_and_articles() {
    assert_eq!(normalize_answer("The  Quick, brown fox!"), "quick brown fox");
    assert_eq!(normalize_answer("an apple a day"), "apple day");
}

#[test]
fn text_f1_counts_token_overlap() {
    assert_eq!(text_f1("open the settings", "Open settings."), 1.0);
    // p = 1/2, r = 1/1
    assert!((text_f1("settings page", "settings") - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(text_f1("foo", "bar"), 0.0);
}

#[test]
fn text_f1_of_empty_sides() {
    assert_eq!(text_f1("", "the"), 1.0, "both normalize to nothing");
    assert_eq!(text_f1("", "word"), 0.0);
}

#[test]
fn exact_match_ignores_only_surrounding_whitespace() {
    assert_eq!(exact_match(" Settings ", "Settings"), 1.0);
    assert_eq!(exact_match("settings", "Settings"), 0.0);
}

// ============================================================================
// Per-action scoring
// ============================================================================

#[test]
fn name_mismatch_is_a_miss() {
    let score = score_action(&Action::Enter, &Action::Copy).unwrap();
    assert_eq!(score, StepScore::miss());
}

#[test]
fn click_finished_on_matching_id() {
    let score = score_action(&click(0.0, 0.0, 10.0, 10.0, 3), &click(0.0, 0.0, 10.0, 10.0, 3)).unwrap();
    assert!(score.finished);
    assert_eq!(score.score, 1.0);
}

#[test]
fn click_score_is_iou_even_when_id_differs() {
    let score = score_action(&click(5.0, 0.0, 15.0, 10.0, 4), &click(0.0, 0.0, 10.0, 10.0, 3)).unwrap();
    assert!(!score.finished);
    assert!((score.score - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn hover_scores_like_click() {
    let pred = Action::Hover {
        element: px_box(0.0, 0.0, 10.0, 10.0),
        element_id: Some(1),
    };
    let score = score_action(&pred, &pred).unwrap();
    assert!(score.finished);
}

#[test]
fn click_without_ids_is_missing_field() {
    let pred = Action::Click {
        element: px_box(0.0, 0.0, 10.0, 10.0),
        element_id: None,
    };
    let err = score_action(&pred, &click(0.0, 0.0, 10.0, 10.0, 3)).unwrap_err();
    assert_eq!(
        err,
        EvalError::MissingField {
            action: "click".into(),
            field: "element_id"
        }
    );
    assert!(!err.is_fatal());
}

#[test]
fn click_in_different_frames_is_frame_mismatch() {
    let pred = Action::Click {
        element: BBox::new(0.0, 0.0, 0.1, 0.1, ReferenceFrame::RelativeFraction),
        element_id: Some(3),
    };
    let err = score_action(&pred, &click(0.0, 0.0, 10.0, 10.0, 3)).unwrap_err();
    assert!(matches!(err, EvalError::FrameMismatch { .. }), "got {:?}", err);
}

#[test]
fn tap_at_label_scores_one() {
    let score = score_action(&tap(0.5, 0.5), &tap(0.5, 0.5)).unwrap();
    assert_eq!(score, StepScore { finished: true, score: 1.0 });
}

#[test]
fn tap_score_is_non_increasing_in_distance() {
    let label = tap(0.5, 0.5);
    let mut previous = f64::INFINITY;
    for step in 0..30 {
        let offset = step as f64 * 0.01;
        let score = score_action(&tap(0.5 + offset, 0.5), &label).unwrap().score;
        assert!(score <= previous, "score rose at offset {}: {} > {}", offset, score, previous);
        previous = score;
    }
}

#[test]
fn tap_beyond_threshold_scores_zero() {
    let score = score_action(&tap(0.5, 0.5), &tap(0.5, 0.65)).unwrap();
    assert_eq!(score, StepScore::miss());

    let score = score_action(&tap(0.5, 0.5), &tap(0.5, 0.57)).unwrap();
    assert!(score.finished);
    assert!((score.score - 0.5).abs() < 1e-9);
}

#[test]
fn tap_threshold_is_configurable() {
    let thresholds = Thresholds {
        tap_distance: 0.3,
        ..Thresholds::default()
    };
    let score = score_action_with(&tap(0.5, 0.5), &tap(0.5, 0.7), &thresholds).unwrap();
    assert!(score.finished);
}

#[test]
fn scroll_direction_classification() {
    assert_eq!(Direction::dominant(-50.0, 100.0), Direction::Down);
    assert_eq!(Direction::dominant(0.0, -3.0), Direction::Up);
    assert_eq!(Direction::dominant(10.0, 2.0), Direction::Right);
    assert_eq!(Direction::dominant(-10.0, 2.0), Direction::Left);
    assert_eq!(Direction::dominant(5.0, 5.0), Direction::Down, "ties go vertical");
}

#[test]
fn scroll_scores_on_direction_only() {
    let score = score_action(&px_scroll(300.0, 0.0), &px_scroll(100.0, -50.0)).unwrap();
    assert_eq!(score, StepScore { finished: true, score: 1.0 });

    let score = score_action(&px_scroll(-300.0, 0.0), &px_scroll(100.0, -50.0)).unwrap();
    assert_eq!(score, StepScore::miss());
}

#[test]
fn swipe_scores_on_direction() {
    let left = Action::Swipe {
        dual_point: px_dual((800.0, 500.0), (100.0, 520.0)),
    };
    let also_left = Action::Swipe {
        dual_point: px_dual((600.0, 100.0), (200.0, 90.0)),
    };
    let up = Action::Swipe {
        dual_point: px_dual((500.0, 900.0), (500.0, 100.0)),
    };
    assert!(score_action(&also_left, &left).unwrap().finished);
    assert_eq!(score_action(&up, &left).unwrap(), StepScore::miss());
}

#[test]
fn select_text_scores_region_iou() {
    let label = Action::SelectText {
        dual_point: px_dual((0.0, 0.0), (10.0, 10.0)),
    };
    let reversed = Action::SelectText {
        dual_point: px_dual((10.0, 10.0), (0.0, 0.0)),
    };
    assert_eq!(score_action(&reversed, &label).unwrap(), StepScore { finished: true, score: 1.0 });

    let shifted = Action::SelectText {
        dual_point: px_dual((5.0, 0.0), (15.0, 10.0)),
    };
    let score = score_action(&shifted, &label).unwrap();
    assert!(!score.finished, "1/3 IoU is below the pass mark");
    assert!((score.score - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn input_and_answer_score_text_f1() {
    let label = Action::Input {
        text: "rust programming book".into(),
    };
    let score = score_action(&Action::Input { text: "rust book".into() }, &label).unwrap();
    // p = 1, r = 2/3
    assert!((score.score - 0.8).abs() < 1e-12);
    assert!(score.finished);

    let score = score_action(
        &Action::Answer { text: "no".into() },
        &Action::Answer { text: "yes".into() },
    )
    .unwrap();
    assert_eq!(score, StepScore::miss());
}

#[test]
fn select_averages_text_and_box() {
    let label = Action::Select {
        element: px_box(0.0, 0.0, 10.0, 10.0),
        element_id: Some(2),
        text: "Large".into(),
    };
    let pred = Action::Select {
        element: px_box(5.0, 0.0, 15.0, 10.0),
        element_id: Some(2),
        text: "large".into(),
    };
    let score = score_action(&pred, &label).unwrap();
    assert!(score.finished);
    assert!((score.score - (1.0 + 1.0 / 3.0) / 2.0).abs() < 1e-12);
}

#[test]
fn parameterless_actions_score_one_on_name_match() {
    for action in [
        Action::Enter,
        Action::Copy,
        Action::GoBack,
        Action::GoHome,
        Action::TaskComplete,
        Action::TaskImpossible,
    ] {
        assert_eq!(score_action(&action, &action).unwrap(), StepScore { finished: true, score: 1.0 });
    }
}

#[test]
fn invalid_prediction_with_matching_name_is_recoverable() {
    let err = score_action(&Action::invalid("input", "missing field 'text'"), &Action::Input { text: "x".into() })
        .unwrap_err();
    assert!(matches!(err, EvalError::InvalidAction { .. }));
    assert!(!err.is_fatal());
}

#[test]
fn unknown_label_name_is_fatal() {
    let err = score_action(&Action::Enter, &Action::invalid("drag", "unknown action name")).unwrap_err();
    assert_eq!(err, EvalError::UnknownLabelAction("drag".into()));
    assert!(err.is_fatal());
}

// ============================================================================
// Group scoring
// ============================================================================

fn click_input_label() -> ActionGroup {
    ActionGroup::new(vec![
        click(0.0, 0.0, 10.0, 10.0, 1),
        Action::Input {
            text: "hello".into(),
        },
    ])
}

#[test]
fn matching_group_is_exact_and_finished() {
    let label = click_input_label();
    let score = score_group(&label, &label).unwrap();
    assert!(score.name_exact_match);
    assert!(score.finished_all);
    assert_eq!(score.mean_score, 1.0);
    assert_eq!(score.label_names, vec![ActionName::Click, ActionName::Input]);
}

#[test]
fn short_prediction_scores_missing_step_zero() {
    let pred = ActionGroup::new(vec![click(0.0, 0.0, 10.0, 10.0, 1)]);
    let score = score_group(&pred, &click_input_label()).unwrap();
    assert!(!score.name_exact_match);
    assert!(!score.finished_all);
    assert_eq!(score.mean_score, 0.5);
}

#[test]
fn extra_predicted_steps_break_exact_match_only() {
    let mut pred = click_input_label();
    pred.actions.push(Action::Enter);
    let score = score_group(&pred, &click_input_label()).unwrap();
    assert!(!score.name_exact_match);
    assert!(score.finished_all);
    assert_eq!(score.mean_score, 1.0);
}

#[test]
fn empty_prediction_scores_zero() {
    let score = score_group(&ActionGroup::empty(), &click_input_label()).unwrap();
    assert!(!score.name_exact_match);
    assert!(!score.finished_all);
    assert_eq!(score.mean_score, 0.0);
}

#[test]
fn recoverable_step_error_costs_that_step() {
    let pred = ActionGroup::new(vec![
        Action::Click {
            element: px_box(0.0, 0.0, 10.0, 10.0),
            element_id: None,
        },
        Action::Input {
            text: "hello".into(),
        },
    ]);
    let score = score_group(&pred, &click_input_label()).unwrap();
    assert!(score.name_exact_match);
    assert!(!score.finished_all);
    assert_eq!(score.mean_score, 0.5);
}

#[test]
fn empty_label_group_is_an_error() {
    let err = score_group(&click_input_label(), &ActionGroup::empty()).unwrap_err();
    assert_eq!(err, EvalError::EmptyLabelGroup);
}

#[test]
fn unknown_label_name_aborts_group() {
    let label = ActionGroup::new(vec![Action::invalid("drag", "unknown action name")]);
    let err = score_group(&ActionGroup::empty(), &label).unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn raw_prediction_is_decoded_then_scored() {
    let label = ActionGroup::new(vec![
        Action::Enter,
        Action::Input {
            text: "hello".into(),
        },
    ]);
    let score = evaluate_raw("thinking...\u{4}enter\ninput, hello", Dialect::Csv, &label).unwrap();
    assert!(score.name_exact_match);
    assert!(score.finished_all);
    assert_eq!(score.mean_score, 1.0);

    let broken = evaluate_raw("```json\n[{\"name\": ", Dialect::Json, &label).unwrap();
    assert!(!broken.finished_all);
    assert_eq!(broken.mean_score, 0.0, "undecodable payload scores as an empty prediction");
}

// ============================================================================
// Grounding
// ============================================================================

#[test]
fn bbox2text_scores_em_and_f1() {
    let score = score_bbox2text("Sign in", "Sign in");
    assert_eq!((score.exact_match, score.f1), (1.0, 1.0));

    let score = score_bbox2text("sign in now", "Sign in");
    assert_eq!(score.exact_match, 0.0);
    assert!((score.f1 - 0.8).abs() < 1e-12);
}

#[test]
fn extract_rects_converts_to_pixels_and_skips_bad_literals() {
    let text = "<box>0.1, 0.1, 0.2, 0.2</box> and <box>oops</box> and <box>0.5, 0.5, 0.6, 0.6</box>";
    let rects = extract_rects(text, ReferenceFrame::RelativeFraction, &screen());
    assert_eq!(
        rects,
        vec![
            Rect::new(100.0, 200.0, 100.0, 200.0),
            Rect::new(500.0, 1000.0, 100.0, 200.0),
        ]
    );
}

#[test]
fn text2bbox_averages_best_iou_per_prediction() {
    let labels = vec![Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(100.0, 100.0, 10.0, 10.0)];
    let predicted = vec![Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(105.0, 100.0, 10.0, 10.0)];
    let score = score_text2bbox(&predicted, &labels);
    assert!((score - (1.0 + 1.0 / 3.0) / 2.0).abs() < 1e-12);
}

#[test]
fn text2bbox_with_nothing_predicted_is_zero() {
    assert_eq!(score_text2bbox(&[], &[Rect::new(0.0, 0.0, 1.0, 1.0)]), 0.0);
}
