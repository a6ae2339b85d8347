// Call-next Use Case
// Sequences narration around the engine's state advance

use crate::application::announcement::{self, Announcement};
use crate::application::capabilities::CallPolicy;
use crate::application::queue_engine::{CallOutcome, QueueEngine, ServeReport};
use crate::port::{Announcer, Registry};
use tracing::debug;

/// What happened when staff called the next customer
#[derive(Debug, Clone)]
pub struct CallReport {
    pub report: ServeReport,
    pub announcement: Announcement,
    /// Whether the announcer accepted the narration
    pub delivered: bool,
}

/// Execute call-next
///
/// Returns `None` when the line is empty (nothing announced, nothing
/// changed). The state advance happens regardless of the announcement
/// outcome; `policy` only decides whether it happens before or after.
pub async fn execute(
    engine: &mut QueueEngine,
    registry: &dyn Registry,
    announcer: &dyn Announcer,
    policy: CallPolicy,
) -> Option<CallReport> {
    let head = match engine.head() {
        Some(head) => head,
        None => {
            debug!("Call next requested on an empty line");
            return None;
        }
    };

    let announcement = announcement::prepare(registry, head);
    let counter_name = announcement.counter_name().map(str::to_string);

    let (outcome, delivered) = match policy {
        CallPolicy::AnnounceThenAdvance => {
            let delivered = announcement::deliver(announcer, &announcement).await;
            (engine.call_next(counter_name), delivered)
        }
        CallPolicy::AdvanceThenAnnounce => {
            let outcome = engine.call_next(counter_name);
            (outcome, announcement::deliver(announcer, &announcement).await)
        }
    };

    match outcome {
        CallOutcome::Served(report) => Some(CallReport {
            report,
            announcement,
            delivered,
        }),
        CallOutcome::Empty => None,
    }
}
