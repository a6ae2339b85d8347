// Domain Layer - Pure business logic and entities

pub mod customer;
pub mod error;
pub mod registry;

// Re-exports
pub use customer::{Customer, CustomerFate, CustomerId, QueueToken, ServiceId};
pub use error::DomainError;
pub use registry::{Counter, CounterId, Service, ServiceRegistry};
