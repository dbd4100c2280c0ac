use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::decode::error::DecodeError;

/// Serialization grammar of an action payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Dialect {
    Csv,
    Json,
    Jsonl,
    Yaml,
}

impl Dialect {
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Csv => "CSV_String",
            Dialect::Json => "JSON",
            Dialect::Jsonl => "JSONL",
            Dialect::Yaml => "YAML",
        }
    }
}

impl FromStr for Dialect {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" | "csv_string" => Ok(Dialect::Csv),
            "json" => Ok(Dialect::Json),
            "jsonl" => Ok(Dialect::Jsonl),
            "yaml" | "yml" => Ok(Dialect::Yaml),
            _ => Err(DecodeError::UnsupportedDialect(s.to_string())),
        }
    }
}

impl TryFrom<String> for Dialect {
    type Error = DecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dialect> for String {
    fn from(d: Dialect) -> Self {
        d.as_str().to_string()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
