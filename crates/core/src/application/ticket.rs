// Customer-facing ticket view

use crate::application::constants::ALMOST_YOUR_TURN_POSITION;
use crate::domain::Customer;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// What the customer display shows for one waiting customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub queue_id: String,
    pub position: u32,
    pub wait_time: u32,
    pub total_in_queue: u32,
    pub people_ahead: u32,
    /// Width of the progress bar, 0..=100
    pub progress_percent: u32,
    pub almost_your_turn: bool,
}

/// Payload encoded into the scannable code
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CodePayload<'a> {
    queue_id: &'a str,
    position: u32,
    timestamp: String,
}

impl Ticket {
    pub fn for_customer(customer: &Customer, total_in_queue: usize) -> Self {
        let total = total_in_queue as u32;
        let behind = total.saturating_sub(customer.position);
        let progress_percent = if total == 0 { 0 } else { behind * 100 / total };

        Self {
            queue_id: customer.queue_id.clone(),
            position: customer.position,
            wait_time: customer.wait_time,
            total_in_queue: total,
            people_ahead: customer.people_ahead(),
            progress_percent,
            almost_your_turn: customer.position == ALMOST_YOUR_TURN_POSITION,
        }
    }

    /// JSON payload for the QR code: `{queueId, position, timestamp}`
    pub fn code_payload(&self, now_millis: i64) -> Result<String> {
        let timestamp = chrono::DateTime::from_timestamp_millis(now_millis)
            .unwrap_or_default()
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let payload = CodePayload {
            queue_id: &self.queue_id,
            position: self.position,
            timestamp,
        };
        Ok(serde_json::to_string(&payload)?)
    }

    /// Confirmation shown right after check-in
    pub fn confirmation(&self) -> String {
        format!("You are number {} in the queue", self.position)
    }
}
