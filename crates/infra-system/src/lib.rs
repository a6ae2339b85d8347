// Walkin Infrastructure - System Adapters
// Implements: Announcer, MarketingExport

pub mod fallback_announcer;
pub mod log_announcer;
pub mod sheet_export;
pub mod speech_command;

pub use fallback_announcer::FallbackAnnouncer;
pub use log_announcer::LogAnnouncer;
pub use sheet_export::SheetMarketingExport;
pub use speech_command::CommandAnnouncer;
