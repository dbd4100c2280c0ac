use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::cli::config::{AppConfig, RunSettings};
use crate::decode::decoder::decode_in_frame;
use crate::decode::dialect::Dialect;
use crate::decode::encode::encode;
use crate::report::console::{format_action_report, format_grounding_report};
use crate::sample::runner::{evaluate_actions, evaluate_grounding};
use crate::sample::sample_model::{ActionLabel, ElementIndex, GroundingLabel, PositionFormat, Prediction};
use crate::trace::logger::ErrorSampleLog;

/// Failures reading or writing dataset files.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' is not valid JSON for this input: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown report format '{0}' (expected console or json)")]
    UnknownFormat(String),
}

// ============================================================================
// actions subcommand
// ============================================================================

/// Evaluate action predictions and emit the report.
pub fn cmd_actions(
    pred_path: &str,
    labels_path: &str,
    elements_path: Option<&str>,
    settings: &RunSettings,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let predictions: Vec<Prediction> = load_json(pred_path)?;
    let labels: Vec<ActionLabel> = load_json(labels_path)?;
    let elements: ElementIndex = match elements_path {
        Some(path) => load_json(path)?,
        None => ElementIndex::default(),
    };

    log::info!(
        "evaluating {} labelled samples against {} predictions",
        labels.len(),
        predictions.len()
    );

    let start = std::time::Instant::now();
    let run = evaluate_actions(&predictions, &labels, &elements, &config.thresholds)?;
    let duration = start.elapsed().as_millis();

    if let Some(path) = &settings.error_log {
        let error_log = ErrorSampleLog::new(path);
        let unfinished = run.outcomes.iter().filter(|o| o.is_error_sample());
        let logged = error_log.log_all(unfinished.map(|o| &o.record));
        log::info!("{} unfinished samples written to {}", logged, path);
    }

    let report = run.accumulator.report().with_duration(duration);
    let content = match settings.format.as_str() {
        "json" => serde_json::to_string_pretty(&report)? + "\n",
        "console" => format_action_report(&report),
        other => return Err(DatasetError::UnknownFormat(other.to_string()).into()),
    };

    emit(&content, settings.output.as_deref())
}

// ============================================================================
// grounding subcommand
// ============================================================================

/// Evaluate grounding predictions and emit the report.
pub fn cmd_grounding(
    pred_path: &str,
    labels_path: &str,
    settings: &RunSettings,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let predictions: Vec<Prediction> = load_json(pred_path)?;
    let labels: Vec<GroundingLabel> = load_json(labels_path)?;

    let start = std::time::Instant::now();
    let run = evaluate_grounding(&predictions, &labels, &config.thresholds)?;
    let duration = start.elapsed().as_millis();

    if let Some(path) = &settings.error_log {
        let error_log = ErrorSampleLog::new(path);
        let low = run.outcomes.iter().filter(|o| o.is_error_sample(&config.thresholds));
        let logged = error_log.log_all(low.map(|o| &o.record));
        log::info!("{} low-scoring samples written to {}", logged, path);
    }

    let report = run.accumulator.report().with_duration(duration);
    let content = match settings.format.as_str() {
        "json" => serde_json::to_string_pretty(&report)? + "\n",
        "console" => format_grounding_report(&report),
        other => return Err(DatasetError::UnknownFormat(other.to_string()).into()),
    };

    emit(&content, settings.output.as_deref())
}

// ============================================================================
// decode subcommand
// ============================================================================

/// Decode a single raw prediction and print the canonical group, as JSON or
/// re-encoded in another dialect.
///
/// Geometry stays in the literal frame of `position_format`; no image size or
/// element list is involved.
pub fn cmd_decode(
    input: &str,
    dialect: Dialect,
    position_format: PositionFormat,
    to: Option<Dialect>,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = read_input(input)?;

    let decoded = decode_in_frame(&raw, dialect, position_format.literal_frame());

    if let Some(e) = &decoded.error {
        eprintln!("decode error: {}", e);
    }

    match to {
        Some(target) => println!("{}", encode(&decoded.group, target)?),
        None => println!("{}", serde_json::to_string_pretty(&decoded.group)?),
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Read a JSON file into any deserializable type.
pub fn load_json<T: DeserializeOwned>(path: &str) -> Result<T, DatasetError> {
    let content = std::fs::read_to_string(Path::new(path)).map_err(|source| DatasetError::Read {
        path: path.to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DatasetError::Json {
        path: path.to_string(),
        source,
    })
}

fn read_input(input: &str) -> Result<String, DatasetError> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| DatasetError::Read {
                path: "<stdin>".to_string(),
                source,
            })?;
        return Ok(buf);
    }
    std::fs::read_to_string(input).map_err(|source| DatasetError::Read {
        path: input.to_string(),
        source,
    })
}

fn emit(content: &str, output: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => std::fs::write(path, content)?,
        None => print!("{}", content),
    }
    Ok(())
}
