use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::decode::dialect::Dialect;
use crate::sample::sample_model::PositionFormat;
use crate::score::thresholds::Thresholds;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "gui-action-eval",
    version,
    about = "Score GUI-agent action predictions against labelled ground truth"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: gui-action-eval.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate action predictions
    Actions {
        /// JSON file with a list of predictions
        #[arg(long)]
        pred: String,

        /// JSON file with a list of action labels
        #[arg(long)]
        labels: String,

        /// JSON file mapping image id to candidate UI elements
        #[arg(long)]
        elements: Option<String>,

        /// Output format: console, json (default from config, else console)
        #[arg(long)]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// JSONL file collecting unfinished samples
        #[arg(long)]
        error_log: Option<String>,
    },

    /// Evaluate bbox2text / text2bbox grounding predictions
    Grounding {
        /// JSON file with a list of predictions
        #[arg(long)]
        pred: String,

        /// JSON file with a list of grounding labels
        #[arg(long)]
        labels: String,

        /// Output format: console, json (default from config, else console)
        #[arg(long)]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// JSONL file collecting low-scoring samples
        #[arg(long)]
        error_log: Option<String>,
    },

    /// Decode one raw prediction and print the canonical action group
    Decode {
        /// File holding the raw prediction, or - for stdin
        #[arg(long, default_value = "-")]
        input: String,

        /// Payload dialect: csv, json, jsonl, yaml
        #[arg(long)]
        dialect: Dialect,

        /// How the prediction writes geometry
        #[arg(long, value_enum, default_value = "absolute")]
        position_format: PositionFormatArg,

        /// Re-encode the decoded group in this dialect instead of printing JSON
        #[arg(long)]
        to: Option<Dialect>,
    },
}

/// clap-facing mirror of [`PositionFormat`].
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionFormatArg {
    Absolute,
    Related,
    #[value(name = "related_version1")]
    RelatedVersion1,
    #[value(name = "related_version2")]
    RelatedVersion2,
    #[value(name = "element_id")]
    ElementId,
}

impl From<PositionFormatArg> for PositionFormat {
    fn from(arg: PositionFormatArg) -> Self {
        match arg {
            PositionFormatArg::Absolute => PositionFormat::Absolute,
            PositionFormatArg::Related => PositionFormat::Related,
            PositionFormatArg::RelatedVersion1 => PositionFormat::RelatedVersion1,
            PositionFormatArg::RelatedVersion2 => PositionFormat::RelatedVersion2,
            PositionFormatArg::ElementId => PositionFormat::ElementId,
        }
    }
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `gui-action-eval.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_console")]
    pub format: String,

    pub output: Option<String>,

    pub error_log: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            format: default_console(),
            output: None,
            error_log: None,
        }
    }
}

// Serde default helpers
fn default_console() -> String { "console".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

pub const DEFAULT_CONFIG_PATH: &str = "gui-action-eval.yaml";

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Resolved run settings (CLI > config > defaults)
// ============================================================================

/// Output settings after merging CLI flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub format: String,
    pub output: Option<String>,
    pub error_log: Option<String>,
}

impl RunSettings {
    pub fn resolve(
        config: &RunConfig,
        format: Option<String>,
        output: Option<String>,
        error_log: Option<String>,
    ) -> Self {
        Self {
            format: format.unwrap_or_else(|| config.format.clone()),
            output: output.or_else(|| config.output.clone()),
            error_log: error_log.or_else(|| config.error_log.clone()),
        }
    }
}

/// Default log filter for a `-v` count.
pub fn log_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}
