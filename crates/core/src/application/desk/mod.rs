// Front Desk - Owns the queue state and the collaborators around it

pub mod call_next;
pub mod check_in;


pub use call_next::CallReport;
pub use check_in::CheckInReceipt;

use crate::application::analytics::{self, PeriodCounts};
use crate::application::capabilities::{CallPolicy, Capabilities};
use crate::application::queue_engine::{CheckInRequest, QueueEngine};
use crate::application::ticket::Ticket;
use crate::domain::{Counter, Customer, CustomerId, Service, ServiceRegistry};
use crate::error::{AppError, Result};
use crate::port::{Announcer, IdProvider, MarketingExport, Registry, TimeProvider};
use std::sync::Arc;
use tracing::info;

/// Front desk: the single owner of one walk-in line.
///
/// Presentation adapters hold a `FrontDesk` and call its operations; there
/// is no global queue. The engine is only reachable through `&mut self`.
pub struct FrontDesk {
    engine: QueueEngine,
    registry: ServiceRegistry,
    announcer: Arc<dyn Announcer>,
    exporter: Arc<dyn MarketingExport>,
    time_provider: Arc<dyn TimeProvider>,
    capabilities: Capabilities,
    policy: CallPolicy,
    /// Customer whose ticket the customer view is showing
    current: Option<CustomerId>,
}

impl FrontDesk {
    pub fn new(
        registry: ServiceRegistry,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        announcer: Arc<dyn Announcer>,
        exporter: Arc<dyn MarketingExport>,
    ) -> Self {
        Self {
            engine: QueueEngine::new(id_provider, time_provider.clone()),
            registry,
            announcer,
            exporter,
            time_provider,
            capabilities: Capabilities::default(),
            policy: CallPolicy::default(),
            current: None,
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_call_policy(mut self, policy: CallPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn customers(&self) -> &[Customer] {
        self.engine.customers()
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Check a customer in and make them the one shown on the customer view
    pub async fn check_in(&mut self, req: CheckInRequest) -> Result<CheckInReceipt> {
        let receipt = check_in::execute(
            &mut self.engine,
            &self.registry,
            self.exporter.as_ref(),
            &self.capabilities,
            req,
        )
        .await?;

        self.current = Some(receipt.customer.id.clone());
        Ok(receipt)
    }

    /// Call the next customer (announce + advance per the call policy)
    pub async fn call_next(&mut self) -> Option<CallReport> {
        let call = call_next::execute(
            &mut self.engine,
            &self.registry,
            self.announcer.as_ref(),
            self.policy,
        )
        .await?;

        if let Some(current) = &self.current {
            if call.report.departures().any(|(c, _)| &c.id == current) {
                self.current = None;
            }
        }
        Some(call)
    }

    /// Staff removal. Unknown ids are ignored.
    pub fn remove_customer(&mut self, id: &str) -> Option<Customer> {
        let removed = self.engine.remove_customer(id)?;
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        Some(removed)
    }

    /// Ticket of the customer currently tracked by the customer view
    pub fn current_ticket(&self) -> Option<Ticket> {
        let id = self.current.as_deref()?;
        self.ticket_for(id)
    }

    pub fn current_customer(&self) -> Option<&Customer> {
        self.current.as_deref().and_then(|id| self.engine.find(id))
    }

    pub fn ticket_for(&self, id: &str) -> Option<Ticket> {
        self.engine
            .find(id)
            .map(|c| Ticket::for_customer(c, self.engine.len()))
    }

    /// Ticket lookup by the token printed on it (scanned code)
    pub fn ticket_by_queue_id(&self, queue_id: &str) -> Option<Ticket> {
        self.engine
            .find_by_queue_id(queue_id)
            .map(|c| Ticket::for_customer(c, self.engine.len()))
    }

    pub fn stats(&self) -> PeriodCounts {
        analytics::period_counts(self.engine.customers(), self.time_provider.now_millis())
    }

    /// Waiting customers who opted into marketing
    pub fn marketing_contacts(&self) -> Vec<&Customer> {
        self.engine
            .customers()
            .iter()
            .filter(|c| c.marketing_consent)
            .collect()
    }

    pub fn now_millis(&self) -> i64 {
        self.time_provider.now_millis()
    }

    // ------------------------------------------------------------------
    // Manager controls
    // ------------------------------------------------------------------

    fn require_manager(&self, action: &str) -> Result<()> {
        if self.capabilities.with_manager_controls {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "{} requires manager controls",
                action
            )))
        }
    }

    pub fn add_counter(&mut self) -> Result<Counter> {
        self.require_manager("Adding a counter")?;
        let counter = self.registry.add_counter().clone();
        info!(counter_id = %counter.id, name = %counter.name, "Counter added");
        Ok(counter)
    }

    pub fn rename_service(&mut self, service_id: &str, name: &str) -> Result<()> {
        self.require_manager("Renaming a service")?;
        self.registry.rename_service(service_id, name)?;
        info!(service_id = %service_id, name = %name, "Service renamed");
        Ok(())
    }

    pub fn assign_service_counter(&mut self, service_id: &str, counter_id: &str) -> Result<()> {
        self.require_manager("Reassigning a service")?;
        self.registry.assign_service_counter(service_id, counter_id)?;
        info!(service_id = %service_id, counter_id = %counter_id, "Service reassigned");
        Ok(())
    }

    pub fn set_service_active(&mut self, service_id: &str, active: bool) -> Result<()> {
        self.require_manager("Toggling a service")?;
        Ok(self.registry.set_service_active(service_id, active)?)
    }

    pub fn set_counter_active(&mut self, counter_id: &str, active: bool) -> Result<()> {
        self.require_manager("Toggling a counter")?;
        Ok(self.registry.set_counter_active(counter_id, active)?)
    }

    pub fn set_counter_staff(&mut self, counter_id: &str, staff_name: &str) -> Result<()> {
        self.require_manager("Assigning staff")?;
        Ok(self.registry.set_counter_staff(counter_id, staff_name)?)
    }

    /// Point the marketing export at another sheet.
    ///
    /// The export adapter validates the target; a rejected target leaves the
    /// previous one in place.
    pub fn set_marketing_sheet(&mut self, sheet_url: &str) -> Result<()> {
        self.require_manager("Changing the marketing sheet")?;
        self.exporter
            .retarget(sheet_url.trim())
            .map_err(|e| AppError::Validation(e.to_string()))?;
        info!(sheet_url = %sheet_url.trim(), "Marketing sheet updated");
        Ok(())
    }

    /// Services shown on the check-in form
    pub fn offered_services(&self) -> Vec<&Service> {
        self.registry.active_services()
    }
}
