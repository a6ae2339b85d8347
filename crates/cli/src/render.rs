//! Table rendering for the desk session

use colored::Colorize;
use tabled::{Table, Tabled};
use walkin_core::application::analytics::PeriodCounts;
use walkin_core::application::ticket::Ticket;
use walkin_core::domain::{Customer, Service, ServiceRegistry};
use walkin_core::port::Registry;

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "#")]
    position: u32,
    id: String,
    name: String,
    phone: String,
    #[tabled(rename = "wait (min)")]
    wait_time: u32,
    passed: u32,
    service: String,
}

#[derive(Tabled)]
struct ServiceRow {
    id: String,
    name: String,
    counter: String,
    status: String,
}

#[derive(Tabled)]
struct CounterRow {
    id: String,
    name: String,
    staff: String,
    status: String,
}

#[derive(Tabled)]
struct ContactRow {
    name: String,
    phone: String,
}

#[derive(Tabled)]
struct PeriodRow {
    period: &'static str,
    customers: usize,
}

fn status(active: bool) -> String {
    let label = if active { "Active" } else { "Inactive" };
    label.to_string()
}

pub fn customers(customers: &[Customer], registry: &ServiceRegistry) {
    if customers.is_empty() {
        println!("{}", "Queue is empty".yellow());
        return;
    }

    let rows: Vec<CustomerRow> = customers
        .iter()
        .map(|c| CustomerRow {
            position: c.position,
            id: c.id.clone(),
            name: c.name.clone(),
            phone: c.phone.clone(),
            wait_time: c.wait_time,
            passed: c.positions_passed,
            service: c
                .service_id
                .as_deref()
                .map(|id| {
                    registry
                        .service_by_id(id)
                        .map(|s| s.name.clone())
                        .unwrap_or_else(|| format!("{} (unknown)", id))
                })
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    println!("{}", Table::new(rows));
}

pub fn ticket(ticket: &Ticket, now_millis: i64) -> walkin_core::Result<()> {
    println!("  {} {}", "Current Position:".bold(), ticket.position);
    println!("  {} {} mins", "Estimated Wait:".bold(), ticket.wait_time);
    println!(
        "  {} {} people ahead of you ({}% through)",
        "Progress:".bold(),
        ticket.people_ahead,
        ticket.progress_percent
    );
    println!("  {} {}", "Queue ID:".bold(), ticket.queue_id);
    println!("  {} {}", "Scan code:".bold(), ticket.code_payload(now_millis)?);
    if ticket.almost_your_turn {
        println!(
            "  {}",
            "Almost your turn! Please return to the waiting area.".cyan().bold()
        );
    }
    Ok(())
}

pub fn services(services: &[&Service], registry: &ServiceRegistry) {
    if services.is_empty() {
        println!("{}", "No services offered".yellow());
        return;
    }

    let rows: Vec<ServiceRow> = services
        .iter()
        .map(|s| ServiceRow {
            id: s.id.clone(),
            name: s.name.clone(),
            counter: registry
                .counter_by_id(&s.counter_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("{} (missing)", s.counter_id)),
            status: status(s.is_active),
        })
        .collect();

    println!("{}", Table::new(rows));
}

pub fn counters(registry: &ServiceRegistry) {
    let rows: Vec<CounterRow> = registry
        .counters()
        .iter()
        .map(|c| CounterRow {
            id: c.id.clone(),
            name: c.name.clone(),
            staff: c.staff_name.clone(),
            status: status(c.is_active),
        })
        .collect();

    println!("{}", Table::new(rows));
}

pub fn stats(counts: &PeriodCounts) {
    println!("  {} {}", "Total Customers:".bold(), counts.total);
    let rows = vec![
        PeriodRow {
            period: "Daily",
            customers: counts.daily,
        },
        PeriodRow {
            period: "Weekly",
            customers: counts.weekly,
        },
        PeriodRow {
            period: "Monthly",
            customers: counts.monthly,
        },
    ];
    println!("{}", Table::new(rows));
}

pub fn marketing(contacts: &[&Customer]) {
    if contacts.is_empty() {
        println!("{}", "No marketing opt-ins in the queue".yellow());
        return;
    }

    let rows: Vec<ContactRow> = contacts
        .iter()
        .map(|c| ContactRow {
            name: c.name.clone(),
            phone: c.phone.clone(),
        })
        .collect();
    println!("{}", Table::new(rows));
}
