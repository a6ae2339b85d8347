// Announcer Port
// Abstraction over text-to-speech / voice-service narration

use async_trait::async_trait;
use thiserror::Error;

/// Announcement errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnounceError {
    #[error("Announcer unavailable: {0}")]
    Unavailable(String),

    #[error("Narration failed: {0}")]
    Failed(String),

    #[error("Narration timed out after {0}ms")]
    Timeout(u64),
}

/// Announcer trait
///
/// Implementations:
/// - LogAnnouncer: writes the announcement to the log
/// - CommandAnnouncer: pipes the text to a speech command
/// - FallbackAnnouncer: tries a primary announcer, then a simpler one
///
/// The queue never waits on an announcer to decide state; whether a caller
/// advances before or after `speak` resolves is the caller's policy.
#[async_trait]
pub trait Announcer: Send + Sync {
    /// Narrate `text` for the customer being sent to `counter_name`.
    ///
    /// `counter_name` is `None` when no counter could be resolved and the
    /// text is a generic announcement.
    async fn speak(&self, text: &str, counter_name: Option<&str>) -> Result<(), AnnounceError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock announcer behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always succeed
        Success,
        /// Always fail with message
        Fail(String),
    }

    /// Recording announcer for testing
    pub struct MockAnnouncer {
        behavior: Arc<Mutex<MockBehavior>>,
        spoken: Arc<Mutex<Vec<(String, Option<String>)>>>,
    }

    impl MockAnnouncer {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                spoken: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success)
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(message.into()))
        }

        /// Every `(text, counter_name)` passed to `speak`, including failed calls
        pub fn spoken(&self) -> Vec<(String, Option<String>)> {
            self.spoken.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.spoken.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Announcer for MockAnnouncer {
        async fn speak(&self, text: &str, counter_name: Option<&str>) -> Result<(), AnnounceError> {
            self.spoken
                .lock()
                .unwrap()
                .push((text.to_string(), counter_name.map(str::to_string)));

            let behavior = self.behavior.lock().unwrap().clone();
            match behavior {
                MockBehavior::Success => Ok(()),
                MockBehavior::Fail(msg) => Err(AnnounceError::Failed(msg)),
            }
        }
    }
}
