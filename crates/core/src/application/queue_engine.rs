//! Queue State Engine
//!
//! Owns the ordered line of waiting customers and is the only place it is
//! mutated. Three operations change state:
//! - `check_in`: append at the tail
//! - `call_next`: serve the head, age everyone else, evict no-shows
//! - `remove_customer`: staff removal with index-based renumbering
//!
//! All operations are synchronous and run to completion. The engine never
//! talks to announcers or exporters; callers sequence those around it.

use crate::application::constants::{MAX_POSITIONS_PASSED, MINUTES_PER_POSITION};
use crate::domain::{Customer, CustomerFate, ServiceId};
use crate::port::{IdProvider, TimeProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Check-in request (already validated by the caller)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInRequest {
    pub name: String,
    pub phone: String,

    #[serde(default)]
    pub marketing_consent: bool,

    #[serde(default)]
    pub service_id: Option<ServiceId>,
}

impl CheckInRequest {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            marketing_consent: false,
            service_id: None,
        }
    }

    pub fn with_consent(mut self, consent: bool) -> Self {
        self.marketing_consent = consent;
        self
    }

    pub fn with_service(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }
}

/// Result of one call-next cycle that served somebody
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeReport {
    /// Former head of the line
    pub served: Customer,
    /// Counter the served customer was sent to, as resolved by the caller
    pub counter_name: Option<String>,
    /// Customers dropped as no-shows during this cycle, in line order
    pub evicted: Vec<Customer>,
}

impl ServeReport {
    /// Every customer that left the line in this cycle, with how they left
    pub fn departures(&self) -> impl Iterator<Item = (&Customer, CustomerFate)> {
        std::iter::once((&self.served, CustomerFate::Served))
            .chain(self.evicted.iter().map(|c| (c, CustomerFate::Evicted)))
    }
}

/// Outcome of `call_next`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// Nothing to serve; state untouched
    Empty,
    Served(ServeReport),
}

impl CallOutcome {
    pub fn served(&self) -> Option<&Customer> {
        match self {
            CallOutcome::Empty => None,
            CallOutcome::Served(report) => Some(&report.served),
        }
    }

    pub fn evicted(&self) -> &[Customer] {
        match self {
            CallOutcome::Empty => &[],
            CallOutcome::Served(report) => &report.evicted,
        }
    }
}

/// In-memory, single-writer queue engine
pub struct QueueEngine {
    customers: Vec<Customer>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl QueueEngine {
    pub fn new(id_provider: Arc<dyn IdProvider>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            customers: Vec::new(),
            id_provider,
            time_provider,
        }
    }

    /// Waiting customers in line order (position 1 first)
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Customer who would be served by the next `call_next`
    pub fn head(&self) -> Option<&Customer> {
        self.customers.first()
    }

    pub fn find(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn find_by_queue_id(&self, queue_id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.queue_id == queue_id)
    }

    /// Append a new customer at the tail.
    ///
    /// The newcomer's position is the current length plus one and its wait
    /// estimate is `length * MINUTES_PER_POSITION`. Nobody else moves.
    pub fn check_in(&mut self, req: CheckInRequest) -> Customer {
        let ahead = self.customers.len() as u32;

        let customer = Customer::new(
            self.id_provider.generate_id(),
            self.id_provider.generate_token(),
            self.time_provider.now_millis(),
            req.name,
            req.phone,
            req.marketing_consent,
            req.service_id,
            ahead + 1,
            ahead * MINUTES_PER_POSITION,
        );

        info!(
            customer_id = %customer.id,
            queue_id = %customer.queue_id,
            position = customer.position,
            wait_time = customer.wait_time,
            service_id = ?customer.service_id,
            "Customer checked in"
        );

        self.customers.push(customer.clone());
        customer
    }

    /// Serve the head of the line and age everyone behind it.
    ///
    /// Each remaining customer gets `positions_passed += 1`. Reaching
    /// `MAX_POSITIONS_PASSED` evicts them; otherwise they move up one
    /// position and lose `MINUTES_PER_POSITION` of estimated wait (floored
    /// at zero).
    ///
    /// Eviction is the one exception to the plain one-position step: a
    /// survivor behind evicted customers moves up `1 + evicted` positions
    /// and loses that many wait slots. Stepping by one there would leave a
    /// gap in `1..N`, and the next check-in (`len + 1`) would then reuse a
    /// taken position. Keep the wider step.
    ///
    /// `counter_name` is recorded on the report as given.
    pub fn call_next(&mut self, counter_name: Option<String>) -> CallOutcome {
        if self.customers.is_empty() {
            debug!("call_next on empty queue, nothing to do");
            return CallOutcome::Empty;
        }

        let served = self.customers.remove(0);
        let mut evicted: Vec<Customer> = Vec::new();
        let mut survivors = Vec::with_capacity(self.customers.len());

        for mut customer in self.customers.drain(..) {
            customer.positions_passed += 1;

            if customer.positions_passed >= MAX_POSITIONS_PASSED {
                warn!(
                    customer_id = %customer.id,
                    name = %customer.name,
                    positions_passed = customer.positions_passed,
                    "Customer evicted after being passed too many times"
                );
                evicted.push(customer);
                continue;
            }

            // Wider than one step when evictions sit ahead; see doc above.
            let shift = 1 + evicted.len() as u32;
            customer.position -= shift;
            customer.wait_time = customer
                .wait_time
                .saturating_sub(shift * MINUTES_PER_POSITION);
            survivors.push(customer);
        }

        self.customers = survivors;

        info!(
            customer_id = %served.id,
            counter = ?counter_name,
            evicted = evicted.len(),
            remaining = self.customers.len(),
            "Customer served"
        );

        CallOutcome::Served(ServeReport {
            served,
            counter_name,
            evicted,
        })
    }

    /// Remove one customer by id (staff action).
    ///
    /// Unknown ids are a no-op and return `None`. Survivors are renumbered
    /// from scratch by their 0-based index `i`: `position = i + 1` and
    /// `wait_time = i * MINUTES_PER_POSITION`. This differs from the
    /// progression applied by `call_next`.
    pub fn remove_customer(&mut self, id: &str) -> Option<Customer> {
        let index = match self.customers.iter().position(|c| c.id == id) {
            Some(index) => index,
            None => {
                debug!(customer_id = %id, "remove_customer: id not in queue");
                return None;
            }
        };

        let removed = self.customers.remove(index);

        for (i, customer) in self.customers.iter_mut().enumerate() {
            customer.position = i as u32 + 1;
            customer.wait_time = i as u32 * MINUTES_PER_POSITION;
        }

        info!(
            customer_id = %removed.id,
            name = %removed.name,
            remaining = self.customers.len(),
            "Customer removed by staff"
        );

        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::id_provider::mocks::SequentialIdProvider;
    use crate::port::time_provider::mocks::FixedTimeProvider;

    fn engine() -> QueueEngine {
        QueueEngine::new(
            Arc::new(SequentialIdProvider::new()),
            Arc::new(FixedTimeProvider::new(1_000)),
        )
    }

    fn check_in_all(engine: &mut QueueEngine, names: &[&str]) -> Vec<Customer> {
        names
            .iter()
            .map(|name| engine.check_in(CheckInRequest::new(*name, "555-0100")))
            .collect()
    }

    fn snapshot(engine: &QueueEngine) -> Vec<(String, u32, u32, u32)> {
        engine
            .customers()
            .iter()
            .map(|c| (c.name.clone(), c.position, c.wait_time, c.positions_passed))
            .collect()
    }

    fn entry(name: &str, position: u32, wait: u32, passed: u32) -> (String, u32, u32, u32) {
        (name.to_string(), position, wait, passed)
    }

    #[test]
    fn test_check_in_assigns_sequential_positions() {
        let mut engine = engine();
        let customers = check_in_all(&mut engine, &["A", "B", "C", "D"]);

        for (i, customer) in customers.iter().enumerate() {
            assert_eq!(customer.position, i as u32 + 1);
            assert_eq!(customer.wait_time, i as u32 * 5);
            assert_eq!(customer.positions_passed, 0);
            assert_eq!(customer.checked_in_at, 1_000);
        }
        assert_eq!(engine.len(), 4);
        assert_eq!(customers[0].id, "c-1");
        assert_eq!(customers[0].queue_id, "q-1");
    }

    #[test]
    fn test_check_in_keeps_request_fields() {
        let mut engine = engine();
        let customer = engine.check_in(
            CheckInRequest::new("Ana", "555-0199")
                .with_consent(true)
                .with_service("3"),
        );

        assert_eq!(customer.name, "Ana");
        assert_eq!(customer.phone, "555-0199");
        assert!(customer.marketing_consent);
        assert_eq!(customer.service_id.as_deref(), Some("3"));
        assert_eq!(engine.find(&customer.id), Some(&customer));
        assert_eq!(engine.find_by_queue_id(&customer.queue_id), Some(&customer));
    }

    #[test]
    fn test_call_next_walkthrough() {
        let mut engine = engine();
        check_in_all(&mut engine, &["A", "B", "C"]);
        assert_eq!(
            snapshot(&engine),
            vec![entry("A", 1, 0, 0), entry("B", 2, 5, 0), entry("C", 3, 10, 0)]
        );

        let outcome = engine.call_next(Some("Counter 1".to_string()));
        assert_eq!(outcome.served().unwrap().name, "A");
        assert!(outcome.evicted().is_empty());
        assert_eq!(
            snapshot(&engine),
            vec![entry("B", 1, 0, 1), entry("C", 2, 5, 1)]
        );

        let outcome = engine.call_next(None);
        assert_eq!(outcome.served().unwrap().name, "B");
        assert_eq!(snapshot(&engine), vec![entry("C", 1, 0, 2)]);

        let outcome = engine.call_next(None);
        assert_eq!(outcome.served().unwrap().name, "C");
        assert!(engine.is_empty());
    }

    #[test]
    fn test_call_next_on_empty_queue_is_noop() {
        let mut engine = engine();
        assert_eq!(engine.call_next(Some("Counter 1".to_string())), CallOutcome::Empty);
        assert!(engine.is_empty());
    }

    #[test]
    fn test_call_next_records_counter_name() {
        let mut engine = engine();
        check_in_all(&mut engine, &["A"]);

        match engine.call_next(Some("Counter 7".to_string())) {
            CallOutcome::Served(report) => {
                assert_eq!(report.counter_name.as_deref(), Some("Counter 7"));
                let fates: Vec<CustomerFate> = report.departures().map(|(_, f)| f).collect();
                assert_eq!(fates, vec![CustomerFate::Served]);
            }
            CallOutcome::Empty => panic!("expected a served customer"),
        }
    }

    #[test]
    fn test_third_pass_evicts() {
        let mut engine = engine();
        check_in_all(&mut engine, &["A", "B", "C", "D"]);

        engine.call_next(None); // serves A, B/C/D passed once
        engine.call_next(None); // serves B, C/D passed twice
        assert_eq!(
            snapshot(&engine),
            vec![entry("C", 1, 0, 2), entry("D", 2, 5, 2)]
        );

        let outcome = engine.call_next(None); // serves C, D reaches 3
        assert_eq!(outcome.served().unwrap().name, "C");
        assert_eq!(outcome.evicted().len(), 1);
        assert_eq!(outcome.evicted()[0].name, "D");
        assert_eq!(outcome.evicted()[0].positions_passed, 3);
        assert!(engine.is_empty());

        match outcome {
            CallOutcome::Served(report) => {
                let fates: Vec<(String, CustomerFate)> = report
                    .departures()
                    .map(|(c, f)| (c.name.clone(), f))
                    .collect();
                assert_eq!(
                    fates,
                    vec![
                        ("C".to_string(), CustomerFate::Served),
                        ("D".to_string(), CustomerFate::Evicted)
                    ]
                );
            }
            CallOutcome::Empty => panic!("expected a served customer"),
        }
    }

    #[test]
    fn test_two_customers_never_reach_eviction() {
        // With only A and B, B becomes the head before it can be passed a
        // third time, so three cycles serve both and then do nothing.
        let mut engine = engine();
        check_in_all(&mut engine, &["A", "B"]);

        assert_eq!(engine.call_next(None).served().unwrap().name, "A");
        let second = engine.call_next(None);
        assert_eq!(second.served().unwrap().name, "B");
        assert_eq!(second.served().unwrap().positions_passed, 1);
        assert_eq!(engine.call_next(None), CallOutcome::Empty);
    }

    #[test]
    fn test_eviction_closes_position_gap_for_later_arrivals() {
        let mut engine = engine();
        check_in_all(&mut engine, &["A", "B", "C", "D"]);
        engine.call_next(None);
        engine.call_next(None);
        check_in_all(&mut engine, &["E", "F"]);
        assert_eq!(
            snapshot(&engine),
            vec![
                entry("C", 1, 0, 2),
                entry("D", 2, 5, 2),
                entry("E", 3, 10, 0),
                entry("F", 4, 15, 0)
            ]
        );

        let outcome = engine.call_next(None);
        assert_eq!(outcome.evicted()[0].name, "D");
        // E and F move up past the evicted D as well.
        assert_eq!(
            snapshot(&engine),
            vec![entry("E", 1, 0, 1), entry("F", 2, 5, 1)]
        );

        // Estimates still line up with positions, so a check-in followed by
        // its removal leaves the survivors untouched.
        let before = engine.customers().to_vec();
        let newcomer = engine.check_in(CheckInRequest::new("Z", "555-0000"));
        engine.remove_customer(&newcomer.id);
        assert_eq!(engine.customers(), before.as_slice());
    }

    #[test]
    fn test_survivors_never_exceed_two_passes() {
        let mut engine = engine();
        for round in 0..10 {
            check_in_all(&mut engine, &["X", "Y", "Z"]);
            let before: Vec<(String, u32)> = engine
                .customers()
                .iter()
                .map(|c| (c.id.clone(), c.position))
                .collect();

            let outcome = engine.call_next(None);
            let evicted = outcome.evicted().len() as u32;

            for customer in engine.customers() {
                assert!(customer.positions_passed <= 2, "round {}", round);
                let prior = before.iter().find(|(id, _)| *id == customer.id).unwrap().1;
                assert_eq!(customer.position, prior - 1 - evicted);
            }
            let positions: Vec<u32> = engine.customers().iter().map(|c| c.position).collect();
            let expected: Vec<u32> = (1..=engine.len() as u32).collect();
            assert_eq!(positions, expected);
        }
    }

    #[test]
    fn test_remove_renumbers_by_index() {
        let mut engine = engine();
        let customers = check_in_all(&mut engine, &["A", "B", "C", "D"]);

        let removed = engine.remove_customer(&customers[1].id).unwrap();
        assert_eq!(removed.name, "B");
        assert_eq!(
            snapshot(&engine),
            vec![entry("A", 1, 0, 0), entry("C", 2, 5, 0), entry("D", 3, 10, 0)]
        );
    }

    #[test]
    fn test_remove_and_call_next_renumber_differently() {
        // call_next progresses estimates relative to their previous value,
        // remove_customer recomputes them from the survivor's index. Seed a
        // line whose estimates drifted from `index * 5` to expose both.
        let line = |engine: &mut QueueEngine| {
            check_in_all(engine, &["A", "B", "C"]);
            for (customer, wait) in engine.customers.iter_mut().zip([0, 20, 30]) {
                customer.wait_time = wait;
            }
        };

        let mut progressed = engine();
        line(&mut progressed);
        progressed.call_next(None);
        assert_eq!(
            snapshot(&progressed),
            vec![entry("B", 1, 15, 1), entry("C", 2, 25, 1)]
        );

        let mut removed = engine();
        line(&mut removed);
        let head = removed.customers()[0].id.clone();
        removed.remove_customer(&head);
        assert_eq!(
            snapshot(&removed),
            vec![entry("B", 1, 0, 0), entry("C", 2, 5, 0)]
        );
    }

    #[test]
    fn test_wait_estimate_floors_at_zero() {
        let mut engine = engine();
        check_in_all(&mut engine, &["A", "B"]);
        engine.customers[1].wait_time = 3;

        engine.call_next(None);
        assert_eq!(engine.customers()[0].wait_time, 0);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut engine = engine();
        check_in_all(&mut engine, &["A", "B"]);
        let before = engine.customers().to_vec();

        assert!(engine.remove_customer("does-not-exist").is_none());
        assert_eq!(engine.customers(), before.as_slice());
    }

    #[test]
    fn test_check_in_then_remove_restores_state() {
        let mut engine = engine();
        check_in_all(&mut engine, &["A", "B", "C"]);
        engine.call_next(None);
        let before = engine.customers().to_vec();

        let newcomer = engine.check_in(CheckInRequest::new("Z", "555-0000"));
        engine.remove_customer(&newcomer.id);
        assert_eq!(engine.customers(), before.as_slice());
    }
}
