// Port Layer - Interfaces for external collaborators

pub mod announcer;
pub mod id_provider; // For deterministic testing
pub mod marketing_export;
pub mod registry;
pub mod time_provider;

// Re-exports
pub use announcer::{AnnounceError, Announcer};
pub use id_provider::IdProvider;
pub use marketing_export::{ExportError, MarketingExport, MarketingRecord};
pub use registry::Registry;
pub use time_provider::TimeProvider;
