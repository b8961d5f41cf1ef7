use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::{debug, warn};

use crate::tracking::weekly::WeeklySummary;

const SINK_TIMEOUT: Duration = Duration::from_secs(10);
const SINK_PERIOD: &str = "last7";

/// Receiver of freshly computed summaries. Submitting must never block the caller or report
/// failures back.
pub trait SummarySink: Send + Sync + 'static {
    fn submit(&self, summary: &WeeklySummary);
}

#[derive(Serialize)]
struct SinkPayload<'a> {
    summary: &'a WeeklySummary,
    period: &'static str,
}

/// Posts summaries to a remote endpoint. Each submission runs on its own task, errors are only
/// logged.
pub struct HttpSink {
    client: Client,
    endpoint: Url,
}

impl HttpSink {
    pub fn new(endpoint: Url) -> Result<Self> {
        let client = Client::builder().timeout(SINK_TIMEOUT).build()?;
        Ok(Self { client, endpoint })
    }
}

impl SummarySink for HttpSink {
    fn submit(&self, summary: &WeeklySummary) {
        let request = self.client.post(self.endpoint.clone()).json(&SinkPayload {
            summary,
            period: SINK_PERIOD,
        });
        let endpoint = self.endpoint.clone();
        tokio::spawn(async move {
            match request.send().await {
                Ok(response) => debug!("Sink {endpoint} answered {}", response.status()),
                Err(e) => warn!("Failed to submit summary to {endpoint}: {e}"),
            }
        });
    }
}
