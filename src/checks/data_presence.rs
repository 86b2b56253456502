//! Remote-data-presence checker
//!
//! Asks the data service whether at least one row exists for a given
//! project, device and the current date. No rows — or the service reporting
//! failure — is the alertable condition: a field device that stopped
//! uploading looks exactly like this.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::SignalChecker;
use crate::alerts::AlertEvent;

/// Envelope returned by the data service.
#[derive(Debug, Deserialize)]
struct ServiceResponse {
    status: String,
    #[serde(default)]
    data: Option<ResponseData>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "tableData", default)]
    table_data: Vec<serde_json::Value>,
}

impl ServiceResponse {
    fn row_count(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.table_data.len())
    }
}

/// Watches one device for the presence of data rows on the current date.
pub struct DataPresenceChecker {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    device_code: String,
    interval: Duration,
    channel_id: String,
}

impl DataPresenceChecker {
    /// Create a checker for one (project, device) pair.
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        device_code: impl Into<String>,
        interval: Duration,
    ) -> Self {
        let project_id = project_id.into();
        let device_code = device_code.into();
        Self {
            channel_id: format!("data:{project_id}:{device_code}"),
            client,
            base_url: base_url.into(),
            project_id,
            device_code,
            interval,
        }
    }

    /// Today's date in the service's `YYYY-MM-DD` format, derived fresh on
    /// every tick so a check past midnight queries the current day.
    fn reference_date() -> String {
        chrono::Local::now().format("%Y-%m-%d").to_string()
    }

    async fn query(&self, date: &str) -> Result<ServiceResponse, CheckError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("tabla", "datos"),
                ("disp.id_proyecto", self.project_id.as_str()),
                ("limite", "1"),
                ("disp.codigo_interno", self.device_code.as_str()),
                ("fecha_inicio", date),
            ])
            .send()
            .await
            .map_err(|e| CheckError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CheckError::Status(response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| CheckError::Decode(e.to_string()))
    }

    fn evaluate(&self, response: &ServiceResponse, date: &str) -> Option<AlertEvent> {
        if response.status == "fail" || response.row_count() == 0 {
            Some(AlertEvent::new(
                self.channel_id.clone(),
                format!("Alert: missing data for device {}", self.device_code),
                format!(
                    "No data rows found for project {}, device {} on {}.",
                    self.project_id, self.device_code, date
                ),
            ))
        } else {
            None
        }
    }
}

#[async_trait]
impl SignalChecker for DataPresenceChecker {
    fn name(&self) -> &str {
        &self.channel_id
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn sample_and_evaluate(&mut self) -> Option<AlertEvent> {
        let date = Self::reference_date();

        let response = match self.query(&date).await {
            Ok(response) => response,
            Err(e) => {
                // Measurement error: log and let the next tick retry.
                tracing::error!(
                    channel = %self.channel_id,
                    date = %date,
                    error = %e,
                    "Data service check failed"
                );
                return None;
            }
        };

        match self.evaluate(&response, &date) {
            Some(event) => {
                tracing::warn!(channel = %self.channel_id, date = %date, "No data for device");
                Some(event)
            }
            None => {
                tracing::info!(
                    channel = %self.channel_id,
                    rows = response.row_count(),
                    date = %date,
                    "Data present"
                );
                None
            }
        }
    }
}

/// Data service check errors
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("data service returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Decode(String),
}
