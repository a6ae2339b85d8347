// Service / Counter Registry Domain Model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Counter ID
pub type CounterId = String;

/// A category of request a customer selects at check-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub counter_id: CounterId,
    pub is_active: bool,
}

impl Service {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        counter_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            counter_id: counter_id.into(),
            is_active: true,
        }
    }
}

/// A physical service point customers are directed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub id: CounterId,
    pub name: String,
    pub staff_name: String,
    pub is_active: bool,
}

impl Counter {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        staff_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            staff_name: staff_name.into(),
            is_active: true,
        }
    }
}

/// In-memory registry of services and the counters they are bound to.
///
/// The queue engine only ever reads it (through the `Registry` port).
/// Mutations are manager actions performed by the staff console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRegistry {
    #[serde(default)]
    services: Vec<Service>,
    #[serde(default)]
    counters: Vec<Counter>,
}

impl Default for ServiceRegistry {
    /// Out-of-the-box setup: four services sharing a single staffed counter
    fn default() -> Self {
        Self {
            services: vec![
                Service::new("1", "General Inquiry", "1"),
                Service::new("2", "Account Services", "1"),
                Service::new("3", "Technical Support", "1"),
                Service::new("4", "Payments", "1"),
            ],
            counters: vec![Counter::new("1", "Counter 1", "John Doe")],
        }
    }
}

impl ServiceRegistry {
    pub fn new(services: Vec<Service>, counters: Vec<Counter>) -> Self {
        Self { services, counters }
    }

    /// Registry with no services and no counters
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Parse a registry from its JSON representation
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    /// Append a counter named after its ordinal, staffed by a placeholder.
    ///
    /// The ordinal is the smallest one whose id is still free, so registries
    /// loaded with sparse or custom ids never end up with duplicate ids.
    pub fn add_counter(&mut self) -> &Counter {
        let ordinal = (1..)
            .find(|n: &usize| {
                let id = n.to_string();
                !self.counters.iter().any(|c| c.id == id)
            })
            .unwrap_or(self.counters.len() + 1);
        self.counters.push(Counter::new(
            ordinal.to_string(),
            format!("Counter {}", ordinal),
            "New Staff",
        ));
        let index = self.counters.len() - 1;
        &self.counters[index]
    }

    pub fn rename_service(&mut self, service_id: &str, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "service name must not be empty".to_string(),
            ));
        }
        self.service_mut(service_id)?.name = name;
        Ok(())
    }

    /// Bind a service to another counter. The counter must exist.
    pub fn assign_service_counter(&mut self, service_id: &str, counter_id: &str) -> Result<()> {
        if !self.counters.iter().any(|c| c.id == counter_id) {
            return Err(DomainError::CounterNotFound(counter_id.to_string()));
        }
        self.service_mut(service_id)?.counter_id = counter_id.to_string();
        Ok(())
    }

    pub fn set_service_active(&mut self, service_id: &str, active: bool) -> Result<()> {
        self.service_mut(service_id)?.is_active = active;
        Ok(())
    }

    pub fn set_counter_active(&mut self, counter_id: &str, active: bool) -> Result<()> {
        let counter = self
            .counters
            .iter_mut()
            .find(|c| c.id == counter_id)
            .ok_or_else(|| DomainError::CounterNotFound(counter_id.to_string()))?;
        counter.is_active = active;
        Ok(())
    }

    pub fn set_counter_staff(&mut self, counter_id: &str, staff_name: impl Into<String>) -> Result<()> {
        let counter = self
            .counters
            .iter_mut()
            .find(|c| c.id == counter_id)
            .ok_or_else(|| DomainError::CounterNotFound(counter_id.to_string()))?;
        counter.staff_name = staff_name.into();
        Ok(())
    }

    fn service_mut(&mut self, service_id: &str) -> Result<&mut Service> {
        self.services
            .iter_mut()
            .find(|s| s.id == service_id)
            .ok_or_else(|| DomainError::ServiceNotFound(service_id.to_string()))
    }
}
