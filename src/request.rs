use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;
use serde_json::{Map, Value};

use crate::config::MessageConfig;
use crate::error::SendError;

// SQS caps the message body at 256 KiB, measured in UTF-8 bytes.
pub const MAX_BODY_BYTES: usize = 262_144;
// At most 10 attributes per message, per namespace (message and system).
pub const MAX_ATTRIBUTES: usize = 10;
pub const MAX_DELAY_SECONDS: i32 = 900;

lazy_static! {
    static ref QUEUE_URL_REGEX: Regex =
        Regex::new(r"^https://sqs\.[a-z0-9-]+\.amazonaws\.com(\.cn)?/[0-9]+/[^/]+$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    String(String),
    Number(String),
    Binary(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub queue_url: String,
    pub message_body: String,
    pub delay_seconds: Option<i32>,
    pub message_attributes: Option<HashMap<String, AttributeValue>>,
    pub message_system_attributes: Option<HashMap<String, AttributeValue>>,
    pub message_group_id: Option<String>,
    pub message_deduplication_id: Option<String>,
}

pub fn validate_queue_url(url: &str) -> Result<(), SendError> {
    if !QUEUE_URL_REGEX.is_match(url) {
        return Err(SendError::Format(format!(
            "'{}' is not a valid SQS queue URL",
            url
        )));
    }
    Ok(())
}

pub fn validate_message_body(body: &str) -> Result<(), SendError> {
    let size = body.len();
    if size > MAX_BODY_BYTES {
        return Err(SendError::SizeLimit(format!(
            "message body is {} bytes, SQS allows at most {}",
            size, MAX_BODY_BYTES
        )));
    }
    Ok(())
}

pub fn validate_delay_seconds(delay: Option<i32>) -> Result<(), SendError> {
    if let Some(delay) = delay {
        if !(0..=MAX_DELAY_SECONDS).contains(&delay) {
            return Err(SendError::Range(format!(
                "delay-seconds must be between 0 and {}, got {}",
                MAX_DELAY_SECONDS, delay
            )));
        }
    }
    Ok(())
}

pub fn validate_fifo(url: &str, group_id: Option<&str>) -> Result<(), SendError> {
    let is_fifo = url.ends_with(".fifo");
    if is_fifo && group_id.is_none() {
        return Err(SendError::MissingRequiredField(
            "message-group-id is required for FIFO queues".to_string(),
        ));
    }
    if !is_fifo && group_id.is_some() {
        // Forwarded anyway; SQS decides whether to honor or reject it.
        warn!("message-group-id is set but the queue URL does not end in .fifo");
    }
    Ok(())
}

pub fn parse_attributes(
    json: &str,
    field: &str,
) -> Result<HashMap<String, AttributeValue>, SendError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| SendError::Schema(format!("{} is not valid JSON: {}", field, e)))?;
    let object = value
        .as_object()
        .ok_or_else(|| SendError::Schema(format!("{} must be a JSON object", field)))?;

    if object.len() > MAX_ATTRIBUTES {
        return Err(SendError::Schema(format!(
            "{} has {} entries, SQS allows at most {}",
            field,
            object.len(),
            MAX_ATTRIBUTES
        )));
    }

    let mut attributes = HashMap::with_capacity(object.len());
    for (name, entry) in object {
        attributes.insert(name.clone(), parse_attribute(field, name, entry)?);
    }
    Ok(attributes)
}

fn parse_attribute(field: &str, name: &str, entry: &Value) -> Result<AttributeValue, SendError> {
    let entry = entry
        .as_object()
        .ok_or_else(|| SendError::Schema(format!("{}: '{}' must be an object", field, name)))?;

    let data_type = entry.get("DataType").and_then(Value::as_str).ok_or_else(|| {
        SendError::Schema(format!(
            "{}: '{}' must carry a DataType of String, Number, or Binary",
            field, name
        ))
    })?;

    match data_type {
        "String" => Ok(AttributeValue::String(require_string_value(
            field, name, entry,
        )?)),
        // Number payloads are carried as text; SQS enforces numeric syntax.
        "Number" => Ok(AttributeValue::Number(require_string_value(
            field, name, entry,
        )?)),
        "Binary" => {
            let encoded = match entry.get("BinaryValue") {
                Some(Value::String(s)) => s,
                Some(_) => {
                    return Err(SendError::Schema(format!(
                        "{}: '{}' BinaryValue must be base64 text",
                        field, name
                    )))
                }
                None => {
                    return Err(SendError::MissingRequiredField(format!(
                        "{}: '{}' with DataType Binary requires a BinaryValue",
                        field, name
                    )))
                }
            };
            let bytes = BASE64.decode(encoded).map_err(|e| {
                SendError::Decode(format!(
                    "{}: '{}' BinaryValue is not valid base64: {}",
                    field, name, e
                ))
            })?;
            Ok(AttributeValue::Binary(bytes))
        }
        other => Err(SendError::Schema(format!(
            "{}: '{}' has unsupported DataType '{}'",
            field, name, other
        ))),
    }
}

fn require_string_value(
    field: &str,
    name: &str,
    entry: &Map<String, Value>,
) -> Result<String, SendError> {
    match entry.get("StringValue") {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(SendError::Schema(format!(
            "{}: '{}' StringValue must be a string, number, or boolean",
            field, name
        ))),
        None => Err(SendError::MissingRequiredField(format!(
            "{}: '{}' requires a StringValue",
            field, name
        ))),
    }
}

pub fn build_request(config: &MessageConfig) -> Result<SendRequest, SendError> {
    validate_queue_url(&config.queue_url)?;
    validate_message_body(&config.message_body)?;
    validate_delay_seconds(config.delay_seconds)?;
    validate_fifo(&config.queue_url, config.message_group_id.as_deref())?;

    let message_attributes = config
        .message_attributes
        .as_deref()
        .map(|json| parse_attributes(json, "message-attributes"))
        .transpose()?;
    let message_system_attributes = config
        .system_attributes
        .as_deref()
        .map(|json| parse_attributes(json, "system-attributes"))
        .transpose()?;

    info!("Queue URL: {}", config.queue_url);
    info!("Message body: {} bytes", config.message_body.len());
    if let Some(delay) = config.delay_seconds {
        info!("Delay: {} seconds", delay);
    }
    if let Some(attrs) = &message_attributes {
        info!("Message attributes: {} entries", attrs.len());
        debug!("Message attributes: {}", attributes_to_json(attrs));
    }
    if let Some(attrs) = &message_system_attributes {
        info!("System attributes: {} entries", attrs.len());
        debug!("System attributes: {}", attributes_to_json(attrs));
    }
    if config.message_group_id.is_some() {
        info!("Message group ID enabled");
    }
    if config.message_deduplication_id.is_some() {
        info!("Message deduplication ID enabled");
    }

    Ok(SendRequest {
        queue_url: config.queue_url.clone(),
        message_body: config.message_body.clone(),
        delay_seconds: config.delay_seconds,
        message_attributes,
        message_system_attributes,
        message_group_id: config.message_group_id.clone(),
        message_deduplication_id: config.message_deduplication_id.clone(),
    })
}

pub fn attributes_to_json(attributes: &HashMap<String, AttributeValue>) -> Value {
    let mut object = Map::new();
    for (name, value) in attributes {
        let entry = match value {
            AttributeValue::String(text) => serde_json::json!({
                "DataType": "String",
                "StringValue": text,
            }),
            AttributeValue::Number(text) => serde_json::json!({
                "DataType": "Number",
                "StringValue": text,
            }),
            AttributeValue::Binary(bytes) => serde_json::json!({
                "DataType": "Binary",
                "BinaryValue": BASE64.encode(bytes),
            }),
        };
        object.insert(name.clone(), entry);
    }
    Value::Object(object)
}
