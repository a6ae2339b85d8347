// Announcement resolution
// Decides which counter a served customer is sent to and what gets said

use crate::domain::Customer;
use crate::port::{AnnounceError, Announcer, Registry};
use tracing::{debug, warn};

/// How the counter for an announcement was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterResolution {
    /// The customer's service is bound to this counter
    Resolved(String),
    /// No usable service binding; first active counter used instead
    ActiveCounterFallback(String),
    /// No counter at all
    Generic,
}

impl CounterResolution {
    pub fn counter_name(&self) -> Option<&str> {
        match self {
            CounterResolution::Resolved(name) | CounterResolution::ActiveCounterFallback(name) => {
                Some(name)
            }
            CounterResolution::Generic => None,
        }
    }
}

/// Text to narrate plus the counter it targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub text: String,
    pub resolution: CounterResolution,
}

impl Announcement {
    pub fn counter_name(&self) -> Option<&str> {
        self.resolution.counter_name()
    }
}

/// Resolve the counter for `customer`: service binding first, then the
/// first active counter, then a generic announcement. Read-only.
pub fn resolve_counter(registry: &dyn Registry, customer: &Customer) -> CounterResolution {
    let bound = customer
        .service_id
        .as_deref()
        .and_then(|id| registry.service_by_id(id))
        .and_then(|service| registry.counter_by_id(&service.counter_id));

    if let Some(counter) = bound {
        return CounterResolution::Resolved(counter.name.clone());
    }

    debug!(
        customer_id = %customer.id,
        service_id = ?customer.service_id,
        "No counter bound to service, falling back to first active counter"
    );

    match registry.first_active_counter() {
        Some(counter) => CounterResolution::ActiveCounterFallback(counter.name.clone()),
        None => CounterResolution::Generic,
    }
}

/// Build the announcement for calling `customer` to the counter
pub fn prepare(registry: &dyn Registry, customer: &Customer) -> Announcement {
    let resolution = resolve_counter(registry, customer);
    let text = match resolution.counter_name() {
        Some(counter) => format!(
            "Customer number {}, please proceed to {}",
            customer.position, counter
        ),
        None => format!(
            "Customer number {}, please proceed to the next available counter",
            customer.position
        ),
    };

    Announcement { text, resolution }
}

/// Narrate an announcement. Failures are logged and reported, never raised.
pub async fn deliver(announcer: &dyn Announcer, announcement: &Announcement) -> bool {
    match announcer
        .speak(&announcement.text, announcement.counter_name())
        .await
    {
        Ok(()) => true,
        Err(e) => {
            log_failure(&e, announcement);
            false
        }
    }
}

fn log_failure(error: &AnnounceError, announcement: &Announcement) {
    warn!(
        error = %error,
        counter = ?announcement.counter_name(),
        "Announcement failed (queue state unaffected)"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Counter, Service, ServiceRegistry};
    use crate::port::announcer::mocks::MockAnnouncer;

    fn customer(service_id: Option<&str>) -> Customer {
        Customer::new(
            "c-1",
            "q-1",
            0,
            "Ana",
            "555-0100",
            false,
            service_id.map(str::to_string),
            1,
            0,
        )
    }

    fn registry() -> ServiceRegistry {
        let mut idle = Counter::new("1", "Counter 1", "John Doe");
        idle.is_active = false;
        ServiceRegistry::new(
            vec![
                Service::new("loans", "Loans", "2"),
                Service::new("orphan", "Orphan", "99"),
            ],
            vec![idle, Counter::new("2", "Counter 2", "Jane Roe"), Counter::new("3", "Counter 3", "Sam")],
        )
    }

    #[test]
    fn test_resolves_service_counter() {
        let resolution = resolve_counter(&registry(), &customer(Some("loans")));
        assert_eq!(resolution, CounterResolution::Resolved("Counter 2".to_string()));
    }

    #[test]
    fn test_falls_back_to_first_active_counter() {
        let registry = registry();

        // no service
        assert_eq!(
            resolve_counter(&registry, &customer(None)),
            CounterResolution::ActiveCounterFallback("Counter 2".to_string())
        );
        // stale service id
        assert_eq!(
            resolve_counter(&registry, &customer(Some("gone"))),
            CounterResolution::ActiveCounterFallback("Counter 2".to_string())
        );
        // service bound to a counter that no longer exists
        assert_eq!(
            resolve_counter(&registry, &customer(Some("orphan"))),
            CounterResolution::ActiveCounterFallback("Counter 2".to_string())
        );
    }

    #[test]
    fn test_generic_when_no_active_counter() {
        let registry = ServiceRegistry::empty();
        let announcement = prepare(&registry, &customer(Some("loans")));

        assert_eq!(announcement.resolution, CounterResolution::Generic);
        assert_eq!(
            announcement.text,
            "Customer number 1, please proceed to the next available counter"
        );
    }

    #[test]
    fn test_resolution_does_not_mutate_registry() {
        let registry = registry();
        let before = registry.clone();
        let _ = prepare(&registry, &customer(Some("gone")));
        assert_eq!(registry, before);
    }

    #[tokio::test]
    async fn test_deliver_reports_failure() {
        let announcement = prepare(&registry(), &customer(Some("loans")));
        assert_eq!(announcement.text, "Customer number 1, please proceed to Counter 2");

        let ok = MockAnnouncer::new_success();
        assert!(deliver(&ok, &announcement).await);

        let failing = MockAnnouncer::new_fail("speaker unplugged");
        assert!(!deliver(&failing, &announcement).await);
        assert_eq!(
            failing.spoken(),
            vec![(announcement.text.clone(), Some("Counter 2".to_string()))]
        );
    }
}
