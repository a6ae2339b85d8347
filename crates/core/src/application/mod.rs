// Application Layer - Use Cases and Business Logic

pub mod analytics;
pub mod announcement;
pub mod capabilities;
pub mod constants;
pub mod desk;
pub mod queue_engine;
pub mod ticket;

// Re-exports
pub use capabilities::{CallPolicy, Capabilities};
pub use desk::FrontDesk;
pub use queue_engine::{CallOutcome, CheckInRequest, QueueEngine, ServeReport};
