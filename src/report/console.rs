use crate::report::report_model::{ActionReport, GroundingReport};

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format action-task statistics for terminal output.
///
/// Produces output like:
/// ```text
/// === Action evaluation: 120 samples ===
///
/// name exact match : 0.842
/// finished all     : 0.617
/// mean score       : 0.731
///
/// [click]            n=80   em=0.950  finished=0.700  score=0.810
/// [click, input]     n=40   em=0.625  finished=0.450  score=0.573
/// ```
pub fn format_action_report(report: &ActionReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Action evaluation: {} samples", report.sample_count));
    push_duration(&mut out, report.duration_ms);
    out.push_str(" ===\n\n");

    out.push_str(&format!("name exact match : {:.3}\n", report.overall.name_exact_match));
    out.push_str(&format!("finished all     : {:.3}\n", report.overall.finished_all));
    out.push_str(&format!("mean score       : {:.3}\n", report.overall.mean_score));

    if !report.groups.is_empty() {
        out.push('\n');
    }

    let keys: Vec<String> = report
        .groups
        .iter()
        .map(|g| {
            let names: Vec<&str> = g.names.iter().map(|n| n.as_str()).collect();
            format!("[{}]", names.join(", "))
        })
        .collect();
    let width = keys.iter().map(String::len).max().unwrap_or(0);

    for (key, group) in keys.iter().zip(&report.groups) {
        out.push_str(&format!(
            "{:<width$}  n={:<5} em={:.3}  finished={:.3}  score={:.3}\n",
            key,
            group.count,
            group.means.name_exact_match,
            group.means.finished_all,
            group.means.mean_score,
            width = width,
        ));
    }

    out
}

/// Format grounding-task statistics for terminal output.
pub fn format_grounding_report(report: &GroundingReport) -> String {
    let mut out = String::new();

    out.push_str("=== Grounding evaluation");
    push_duration(&mut out, report.duration_ms);
    out.push_str(" ===\n\n");

    out.push_str(&format!("bbox2text samples      : {}\n", report.bbox2text_count));
    out.push_str(&format!("bbox2text exact match  : {:.3}\n", report.bbox2text_exact_match));
    out.push_str(&format!("bbox2text f1           : {:.3}\n\n", report.bbox2text_f1));

    out.push_str(&format!("text2bbox samples      : {}\n", report.text2bbox_count));
    for hit in &report.text2bbox_hit_rates {
        out.push_str(&format!("text2bbox iou@{:<8} : {:.3}\n", hit.iou, hit.rate));
    }

    out
}

fn push_duration(out: &mut String, duration_ms: Option<u128>) {
    if let Some(ms) = duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }
}
