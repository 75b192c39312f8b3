use anyhow::Result;
use log::info;

mod config;
mod error;
mod outputs;
mod request;
mod sqs_client;

use config::MessageConfig;
use sqs_client::{QueueClient, SqsClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    info!("Starting SQS send-message run");

    let config = MessageConfig::from_env()?;
    let request = request::build_request(&config)?;

    let client = SqsClient::new().await;
    let outcome = client.submit(&request).await?;

    outputs::report(&outcome)?;

    info!("SQS send-message run completed");
    Ok(())
}
