// Check-in Use Case

use crate::application::capabilities::Capabilities;
use crate::application::queue_engine::{CheckInRequest, QueueEngine};
use crate::application::ticket::Ticket;
use crate::domain::Customer;
use crate::error::{AppError, Result};
use crate::port::{MarketingExport, MarketingRecord, Registry};
use tracing::warn;

/// Confirmation handed back to the check-in screen
#[derive(Debug, Clone)]
pub struct CheckInReceipt {
    pub customer: Customer,
    pub ticket: Ticket,
    /// Whether the marketing export accepted the contact (None: not attempted)
    pub exported: Option<bool>,
}

/// Validate a check-in request before it reaches the engine
pub fn validate_request(
    req: &CheckInRequest,
    capabilities: &Capabilities,
    registry: &dyn Registry,
) -> Result<()> {
    if req.name.trim().is_empty() || req.phone.trim().is_empty() {
        return Err(AppError::Validation(
            "Please fill in all fields: name and phone are required".to_string(),
        ));
    }

    match req.service_id.as_deref() {
        None if capabilities.with_service_selection => Err(AppError::Validation(
            "Please select a service".to_string(),
        )),
        None => Ok(()),
        Some(id) => match registry.service_by_id(id) {
            Some(service) if service.is_active => Ok(()),
            Some(_) => Err(AppError::Validation(format!(
                "Service {} is not currently offered",
                id
            ))),
            None => Err(AppError::Validation(format!("Unknown service: {}", id))),
        },
    }
}

/// Execute check-in: validate, append to the line, export consenting contacts
///
/// # Arguments
///
/// * `engine` - Queue engine (sole owner of the line)
/// * `registry` - Service registry for service validation
/// * `exporter` - Marketing export (failures are logged, not returned)
/// * `capabilities` - Features enabled on this desk
/// * `req` - Check-in request
pub async fn execute(
    engine: &mut QueueEngine,
    registry: &dyn Registry,
    exporter: &dyn MarketingExport,
    capabilities: &Capabilities,
    mut req: CheckInRequest,
) -> Result<CheckInReceipt> {
    if !capabilities.with_marketing_consent {
        req.marketing_consent = false;
    }
    if !capabilities.with_service_selection {
        req.service_id = None;
    }

    validate_request(&req, capabilities, registry)?;

    let req = CheckInRequest {
        name: req.name.trim().to_string(),
        phone: req.phone.trim().to_string(),
        ..req
    };

    let customer = engine.check_in(req);
    let ticket = Ticket::for_customer(&customer, engine.len());

    let exported = if customer.marketing_consent {
        Some(export_contact(exporter, &customer).await)
    } else {
        None
    };

    Ok(CheckInReceipt {
        customer,
        ticket,
        exported,
    })
}

async fn export_contact(exporter: &dyn MarketingExport, customer: &Customer) -> bool {
    let timestamp = chrono::DateTime::from_timestamp_millis(customer.checked_in_at)
        .unwrap_or_default()
        .to_rfc3339();

    let record = MarketingRecord {
        name: customer.name.clone(),
        phone: customer.phone.clone(),
        timestamp,
    };

    match exporter.append(&record).await {
        Ok(()) => true,
        Err(e) => {
            warn!(
                customer_id = %customer.id,
                error = %e,
                "Marketing export failed (check-in unaffected)"
            );
            false
        }
    }
}
