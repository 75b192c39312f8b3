use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::sqs_client::SendOutcome;

// Outputs land in the file named by GITHUB_OUTPUT when the runner
// provides one, otherwise on stdout as name=value lines.
pub fn report(outcome: &SendOutcome) -> Result<()> {
    let outputs = named_outputs(outcome);

    match env::var("GITHUB_OUTPUT") {
        Ok(path) if !path.is_empty() => write_output_file(Path::new(&path), &outputs)?,
        _ => {
            for (name, value) in &outputs {
                println!("{}={}", name, value);
            }
        }
    }

    info!(
        "Send succeeded (message-id: {}, sequence-number: {})",
        outcome.message_id,
        outcome.sequence_number.as_deref().unwrap_or("-")
    );

    Ok(())
}

// Sequence numbers only exist for FIFO queues; absent fields are
// skipped rather than emitted empty.
fn named_outputs(outcome: &SendOutcome) -> Vec<(&'static str, String)> {
    let mut outputs = vec![("message-id", outcome.message_id.clone())];
    if let Some(sequence) = &outcome.sequence_number {
        outputs.push(("sequence-number", sequence.clone()));
    }
    if let Some(md5) = &outcome.md5_of_body {
        outputs.push(("md5-of-body", md5.clone()));
    }
    if let Some(md5) = &outcome.md5_of_attributes {
        outputs.push(("md5-of-attributes", md5.clone()));
    }
    outputs
}

fn write_output_file(path: &Path, outputs: &[(&'static str, String)]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open output file {}", path.display()))?;
    for (name, value) in outputs {
        writeln!(file, "{}={}", name, value)?;
    }
    Ok(())
}
