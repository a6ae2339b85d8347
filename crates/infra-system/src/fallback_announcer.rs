// Fallback announcer
// Tries the primary narration backend, then a simpler channel
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use walkin_core::port::announcer::{AnnounceError, Announcer};

/// Announcer chain: `primary` first, `fallback` when the primary fails.
///
/// Only the fallback's error is returned when both fail.
pub struct FallbackAnnouncer {
    primary: Arc<dyn Announcer>,
    fallback: Arc<dyn Announcer>,
}

impl FallbackAnnouncer {
    pub fn new(primary: Arc<dyn Announcer>, fallback: Arc<dyn Announcer>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl Announcer for FallbackAnnouncer {
    async fn speak(&self, text: &str, counter_name: Option<&str>) -> Result<(), AnnounceError> {
        match self.primary.speak(text, counter_name).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Primary announcer failed, using fallback channel");
                self.fallback.speak(text, counter_name).await
            }
        }
    }
}
