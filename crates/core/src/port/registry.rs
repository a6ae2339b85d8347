// Registry Port (read-only service / counter lookup)

use crate::domain::{Counter, Service, ServiceRegistry};

/// Read-only view of services and counters.
///
/// The queue engine and announcement resolution depend on this trait only;
/// they never mutate the registry behind it.
pub trait Registry: Send + Sync {
    fn service_by_id(&self, id: &str) -> Option<&Service>;

    fn counter_by_id(&self, id: &str) -> Option<&Counter>;

    /// First counter flagged active, in registry order
    fn first_active_counter(&self) -> Option<&Counter>;

    /// Services offered on the check-in form
    fn active_services(&self) -> Vec<&Service>;
}

impl Registry for ServiceRegistry {
    fn service_by_id(&self, id: &str) -> Option<&Service> {
        self.services().iter().find(|s| s.id == id)
    }

    fn counter_by_id(&self, id: &str) -> Option<&Counter> {
        self.counters().iter().find(|c| c.id == id)
    }

    fn first_active_counter(&self) -> Option<&Counter> {
        self.counters().iter().find(|c| c.is_active)
    }

    fn active_services(&self) -> Vec<&Service> {
        self.services().iter().filter(|s| s.is_active).collect()
    }
}
