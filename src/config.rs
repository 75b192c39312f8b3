use std::env;

use crate::error::SendError;

#[derive(Debug, Clone)]
pub struct MessageConfig {
    pub queue_url: String,
    pub message_body: String,
    pub message_attributes: Option<String>,
    pub delay_seconds: Option<i32>,
    pub message_group_id: Option<String>,
    pub message_deduplication_id: Option<String>,
    pub system_attributes: Option<String>,
}

impl MessageConfig {
    pub fn from_env() -> Result<Self, SendError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let queue_url = require_input("queue-url")?;
        let message_body = require_input("message-body")?;

        let delay_seconds = input("delay-seconds")
            .map(|raw| parse_delay(&raw))
            .transpose()?;

        Ok(MessageConfig {
            queue_url,
            message_body,
            message_attributes: input("message-attributes"),
            delay_seconds,
            message_group_id: input("message-group-id"),
            message_deduplication_id: input("message-deduplication-id"),
            system_attributes: input("system-attributes"),
        })
    }
}

fn input_var(name: &str) -> String {
    format!("INPUT_{}", name.to_uppercase().replace('-', "_"))
}

// The runner passes unset optional inputs as empty strings; treat those
// the same as absent.
fn input(name: &str) -> Option<String> {
    env::var(input_var(name)).ok().filter(|v| !v.is_empty())
}

fn require_input(name: &str) -> Result<String, SendError> {
    input(name)
        .ok_or_else(|| SendError::MissingRequiredField(format!("input '{}' is required", name)))
}

fn parse_delay(raw: &str) -> Result<i32, SendError> {
    raw.trim().parse::<i32>().map_err(|_| {
        SendError::Format(format!(
            "delay-seconds must be an integer, got '{}'",
            raw
        ))
    })
}
