use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sqs::primitives::Blob;
use aws_sdk_sqs::types::{
    MessageAttributeValue, MessageSystemAttributeNameForSends, MessageSystemAttributeValue,
};
use aws_sdk_sqs::Client;
use log::{debug, info};

use crate::error::SendError;
use crate::request::{AttributeValue, SendRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub message_id: String,
    pub sequence_number: Option<String>,
    pub md5_of_body: Option<String>,
    pub md5_of_attributes: Option<String>,
}

// Seam for tests: the run path only needs "submit one request".
#[async_trait]
pub trait QueueClient {
    async fn submit(&self, request: &SendRequest) -> Result<SendOutcome, SendError>;
}

pub struct SqsClient {
    client: Client,
}

impl SqsClient {
    pub async fn new() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        let client = Client::new(&config);

        info!("SQS client initialized");

        Self { client }
    }
}

#[async_trait]
impl QueueClient for SqsClient {
    async fn submit(&self, request: &SendRequest) -> Result<SendOutcome, SendError> {
        debug!("Submitting message to {}", request.queue_url);

        let message_attributes = request
            .message_attributes
            .as_ref()
            .map(build_message_attributes)
            .transpose()?;
        let system_attributes = request
            .message_system_attributes
            .as_ref()
            .map(build_system_attributes)
            .transpose()?;

        let output = self
            .client
            .send_message()
            .queue_url(&request.queue_url)
            .message_body(&request.message_body)
            .set_delay_seconds(request.delay_seconds)
            .set_message_group_id(request.message_group_id.clone())
            .set_message_deduplication_id(request.message_deduplication_id.clone())
            .set_message_attributes(message_attributes)
            .set_message_system_attributes(system_attributes)
            .send()
            .await
            .map_err(|e| {
                SendError::Transport(format!("failed to send message to SQS: {}", e))
            })?;

        let message_id = output
            .message_id()
            .ok_or_else(|| {
                SendError::Transport("SQS response did not include a message ID".to_string())
            })?
            .to_string();

        info!("Message sent (MessageId: {})", message_id);

        Ok(SendOutcome {
            message_id,
            sequence_number: output.sequence_number().map(str::to_string),
            md5_of_body: output.md5_of_message_body().map(str::to_string),
            md5_of_attributes: output.md5_of_message_attributes().map(str::to_string),
        })
    }
}

fn build_message_attributes(
    attributes: &HashMap<String, AttributeValue>,
) -> Result<HashMap<String, MessageAttributeValue>, SendError> {
    let mut map = HashMap::with_capacity(attributes.len());
    for (name, value) in attributes {
        let builder = match value {
            AttributeValue::String(text) => MessageAttributeValue::builder()
                .data_type("String")
                .string_value(text),
            AttributeValue::Number(text) => MessageAttributeValue::builder()
                .data_type("Number")
                .string_value(text),
            AttributeValue::Binary(bytes) => MessageAttributeValue::builder()
                .data_type("Binary")
                .binary_value(Blob::new(bytes.clone())),
        };
        let attribute = builder.build().map_err(|e| {
            SendError::Schema(format!("failed to build message attribute '{}': {}", name, e))
        })?;
        map.insert(name.clone(), attribute);
    }
    Ok(map)
}

fn build_system_attributes(
    attributes: &HashMap<String, AttributeValue>,
) -> Result<HashMap<MessageSystemAttributeNameForSends, MessageSystemAttributeValue>, SendError> {
    let mut map = HashMap::with_capacity(attributes.len());
    for (name, value) in attributes {
        let builder = match value {
            AttributeValue::String(text) => MessageSystemAttributeValue::builder()
                .data_type("String")
                .string_value(text),
            AttributeValue::Number(text) => MessageSystemAttributeValue::builder()
                .data_type("Number")
                .string_value(text),
            AttributeValue::Binary(bytes) => MessageSystemAttributeValue::builder()
                .data_type("Binary")
                .binary_value(Blob::new(bytes.clone())),
        };
        let attribute = builder.build().map_err(|e| {
            SendError::Schema(format!("failed to build system attribute '{}': {}", name, e))
        })?;
        map.insert(MessageSystemAttributeNameForSends::from(name.as_str()), attribute);
    }
    Ok(map)
}
