// Customer Domain Model

use serde::{Deserialize, Serialize};

/// Customer ID (opaque, injected by IdProvider)
pub type CustomerId = String;

/// Token surfaced to the customer (ticket / scannable code)
pub type QueueToken = String;

/// Reference into the service registry
pub type ServiceId = String;

/// How a customer left the line on a call-next cycle.
///
/// Rejoining means checking in again as a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerFate {
    Served,
    Evicted,
}

/// Customer Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone: String,

    /// 1-based rank in the waiting line
    pub position: u32,
    /// Estimated wait in minutes
    pub wait_time: u32,

    pub marketing_consent: bool,
    pub queue_id: QueueToken,

    /// Call-next cycles survived without being served
    pub positions_passed: u32,
    pub service_id: Option<ServiceId>,

    pub checked_in_at: i64, // epoch ms
}

impl Customer {
    /// Create a new waiting customer
    ///
    /// # Arguments
    ///
    /// * `id` - Unique customer ID (injected, not generated)
    /// * `queue_id` - Customer-facing token (injected, not generated)
    /// * `checked_in_at` - Check-in timestamp in epoch ms (injected, not system time)
    /// * `position` - 1-based rank at check-in
    /// * `wait_time` - Initial wait estimate in minutes
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        queue_id: impl Into<String>,
        checked_in_at: i64,
        name: impl Into<String>,
        phone: impl Into<String>,
        marketing_consent: bool,
        service_id: Option<ServiceId>,
        position: u32,
        wait_time: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: phone.into(),
            position,
            wait_time,
            marketing_consent,
            queue_id: queue_id.into(),
            positions_passed: 0,
            service_id,
            checked_in_at,
        }
    }

    /// Number of customers ahead in line
    pub fn people_ahead(&self) -> u32 {
        self.position.saturating_sub(1)
    }
}
