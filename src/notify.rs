//! Chat webhook notifications (Google Chat style `{"text": ...}` payloads).

use crate::Result;
use crate::diagnostics;

use anyhow::Context;
use serde::Serialize;
use std::time::Duration;

const SEND_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
struct Payload<'a> {
    text: &'a str,
}

pub struct Webhook {
    url: String,
    client: reqwest::blocking::Client,
}

impl Webhook {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .context("build webhook HTTP client")?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// POST `text` to the webhook. Non-2xx responses are errors.
    pub fn send(&self, text: &str) -> Result<()> {
        self.client
            .post(&self.url)
            .json(&Payload { text })
            .send()
            .with_context(|| diagnostics::error_message(format!("send webhook to {}", self.url)))?
            .error_for_status()
            .with_context(|| diagnostics::error_message(format!("webhook {} rejected the message", self.url)))?;
        Ok(())
    }
}

/// Message carrying a rendered report table.
pub fn report_message(last_minutes: Option<u64>, threshold: u64, table: &str) -> String {
    let window = match last_minutes {
        Some(minutes) => format!("last {} minutes", minutes),
        None => "entire log".to_string(),
    };
    format!(
        "Recent slow MongoDB queries found ({}, threshold: {}):\n```\n{}\n```",
        window, threshold, table
    )
}

/// Message for a run that could not complete. Without any source the error
/// text stands alone (nothing was configured to analyse).
pub fn failure_message(sources: &[String], err: &anyhow::Error) -> String {
    if sources.is_empty() {
        return format!("Error: {:#}", err);
    }
    format!(
        "Error: log analysis failed for {}: {:#}",
        sources.join(", "),
        err
    )
}
