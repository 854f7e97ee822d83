//! Chat-command event parsing
//!
//! The handler is subscribed to an SNS topic. Each record's message is the
//! raw interaction JSON forwarded by the chat bot front end:
//!
//! ```json
//! { "application_id": "...", "token": "...",
//!   "data": { "name": "chart", "options": [ { "name": "symbol", "value": "aapl" } ] } }
//! ```

use crate::error::{ChartError, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SnsEvent {
    #[serde(rename = "Records", default)]
    records: Vec<SnsRecord>,
}

#[derive(Debug, Deserialize)]
struct SnsRecord {
    #[serde(rename = "Sns")]
    sns: SnsMessage,
}

#[derive(Debug, Deserialize)]
struct SnsMessage {
    #[serde(rename = "Message")]
    message: String,
}

#[derive(Debug, Deserialize)]
struct Interaction {
    application_id: String,
    token: String,
    data: InteractionData,
}

#[derive(Debug, Deserialize)]
struct InteractionData {
    name: String,
    #[serde(default)]
    options: Vec<CommandOption>,
}

#[derive(Debug, Deserialize)]
struct CommandOption {
    name: String,
    #[serde(default)]
    value: Option<serde_json::Value>,
}

/// A parsed chart command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartCommand {
    pub command_name: String,
    pub application_id: String,
    pub token: String,
    /// Upper-cased ticker; `None` when the command carried no `symbol` option
    pub symbol: Option<String>,
}

impl ChartCommand {
    /// Parse an SNS notification and decode the interaction in its first record
    pub fn from_sns_event(event_json: &str) -> Result<Self> {
        let event: SnsEvent = serde_json::from_str(event_json)?;
        let record = event
            .records
            .into_iter()
            .next()
            .ok_or_else(|| ChartError::MissingField("Records[0]".to_string()))?;
        Self::from_interaction(&record.sns.message)
    }

    /// Parse a bare interaction payload
    pub fn from_interaction(payload: &str) -> Result<Self> {
        let interaction: Interaction = serde_json::from_str(payload)?;

        let symbol = interaction
            .data
            .options
            .iter()
            .find(|option| option.name == "symbol")
            .and_then(|option| option.value.as_ref())
            .and_then(|value| value.as_str())
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty());

        Ok(Self {
            command_name: interaction.data.name,
            application_id: interaction.application_id,
            token: interaction.token,
            symbol,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sns_wrap(message: &str) -> String {
        serde_json::json!({
            "Records": [ { "Sns": { "Message": message } } ]
        })
        .to_string()
    }

    #[test]
    fn test_symbol_among_other_options() {
        let message = r#"{
            "application_id": "123", "token": "tok",
            "data": { "name": "chart", "options": [
                {"name": "timeframe", "value": "daily"},
                {"name": "symbol", "value": " nvda "}
            ] }
        }"#;

        let command = ChartCommand::from_sns_event(&sns_wrap(message)).unwrap();
        assert_eq!(command.command_name, "chart");
        assert_eq!(command.application_id, "123");
        assert_eq!(command.token, "tok");
        assert_eq!(command.symbol.as_deref(), Some("NVDA"));
    }

    #[test]
    fn test_missing_symbol_is_none() {
        let message = r#"{"application_id": "1", "token": "t", "data": {"name": "chart"}}"#;
        let command = ChartCommand::from_interaction(message).unwrap();
        assert_eq!(command.symbol, None);
    }

    #[test]
    fn test_no_records() {
        let result = ChartCommand::from_sns_event(r#"{"Records": []}"#);
        assert!(matches!(result, Err(ChartError::MissingField(_))));
    }

    #[test]
    fn test_message_not_json() {
        let result = ChartCommand::from_sns_event(&sns_wrap("hello"));
        assert!(matches!(result, Err(ChartError::SerdeError(_))));
    }
}
