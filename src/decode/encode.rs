use crate::action::action_model::ActionGroup;
use crate::decode::csv_line::render_csv;
use crate::decode::dialect::Dialect;
use crate::decode::error::EncodeError;
use crate::decode::record::ActionRecord;

/// Render an action group in `dialect`, in the shape the decoder accepts.
pub fn encode(group: &ActionGroup, dialect: Dialect) -> Result<String, EncodeError> {
    let records: Vec<ActionRecord> = group.iter().map(ActionRecord::from).collect();

    let text = match dialect {
        Dialect::Json => format!("```json\n{}\n```", serde_json::to_string_pretty(&records)?),
        Dialect::Jsonl => serde_json::to_string(&records)?,
        Dialect::Yaml => serde_yaml::to_string(&records)?,
        Dialect::Csv => render_csv(&records),
    };
    Ok(text)
}
