// Capability set of a front-desk instance
// One configurable desk replaces the separate kiosk / staff / manager variants

use serde::{Deserialize, Serialize};

/// Ordering of narration vs. state advance during call-next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallPolicy {
    /// Narrate first; the customer is marked served once narration finishes
    #[default]
    AnnounceThenAdvance,
    /// Advance immediately, then narrate
    AdvanceThenAnnounce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Check-in requires choosing a service
    pub with_service_selection: bool,
    /// Check-in offers the marketing opt-in
    pub with_marketing_consent: bool,
    /// Registry edits (counters, services) are allowed
    pub with_manager_controls: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            with_service_selection: true,
            with_marketing_consent: true,
            with_manager_controls: true,
        }
    }
}

impl Capabilities {
    /// Bare kiosk: name and phone only
    pub fn basic() -> Self {
        Self {
            with_service_selection: false,
            with_marketing_consent: false,
            with_manager_controls: false,
        }
    }
}
