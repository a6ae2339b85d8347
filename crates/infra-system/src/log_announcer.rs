// Log announcer: the simplest announcement channel
use async_trait::async_trait;
use tracing::info;

use walkin_core::port::announcer::{AnnounceError, Announcer};

/// Writes announcements to the structured log. Never fails.
pub struct LogAnnouncer;

#[async_trait]
impl Announcer for LogAnnouncer {
    async fn speak(&self, text: &str, counter_name: Option<&str>) -> Result<(), AnnounceError> {
        info!(counter = ?counter_name, announcement = %text, "Announcement");
        Ok(())
    }
}
