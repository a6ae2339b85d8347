//! Line commands understood by the interactive desk session

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use walkin_core::application::{CheckInRequest, FrontDesk};
use walkin_core::domain::CustomerFate;
use walkin_core::AppError;

use crate::render;

#[derive(Parser, Debug)]
#[command(no_binary_name = true, name = "desk", disable_version_flag = true)]
pub struct Line {
    #[command(subcommand)]
    pub command: DeskCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum DeskCommand {
    /// Check a customer in
    Checkin {
        /// Full name (quote names with spaces)
        name: String,

        /// Phone number
        phone: String,

        /// Customer agrees to marketing contact
        #[arg(long)]
        consent: bool,

        /// Service ID (see `services`)
        #[arg(short, long)]
        service: Option<String>,
    },

    /// Announce and serve the next customer
    Next,

    /// Remove a customer by ID
    Remove { id: String },

    /// Show the waiting line
    List,

    /// Show a ticket (defaults to the most recent check-in)
    Ticket {
        /// Queue ID printed on the ticket
        queue_id: Option<String>,
    },

    /// List the services offered at check-in
    Services {
        /// Include disabled services
        #[arg(long)]
        all: bool,
    },

    /// List counters
    Counters,

    /// Add a counter (manager)
    AddCounter,

    /// Rename a service (manager)
    RenameService { id: String, name: String },

    /// Bind a service to a counter (manager)
    Assign { service: String, counter: String },

    /// Enable or disable a service (manager)
    ToggleService {
        id: String,
        #[arg(long)]
        off: bool,
    },

    /// Open or close a counter (manager)
    ToggleCounter {
        id: String,
        #[arg(long)]
        off: bool,
    },

    /// Assign staff to a counter (manager)
    Staff { counter: String, name: String },

    /// Change the marketing sheet URL (manager)
    Sheet { url: String },

    /// Check-in counts by period
    Stats,

    /// Customers who opted into marketing
    Marketing,

    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

/// Whether the session keeps reading commands
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Split a command line into words, honouring double quotes
pub fn split_args(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    words.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        words.push(current);
    }
    words
}

/// Run one command against the desk. Domain failures are printed, not
/// propagated: a bad command never ends the session.
pub async fn run(desk: &mut FrontDesk, command: DeskCommand) -> Result<Flow> {
    match dispatch(desk, command).await {
        Ok(flow) => Ok(flow),
        Err(e) => {
            println!("{} {}", "✗".red(), describe(&e));
            Ok(Flow::Continue)
        }
    }
}

fn describe(error: &AppError) -> String {
    match error {
        AppError::Validation(msg) | AppError::Forbidden(msg) => msg.clone(),
        other => other.to_string(),
    }
}

async fn dispatch(desk: &mut FrontDesk, command: DeskCommand) -> walkin_core::Result<Flow> {
    match command {
        DeskCommand::Checkin {
            name,
            phone,
            consent,
            service,
        } => {
            let mut req = CheckInRequest::new(name, phone).with_consent(consent);
            req.service_id = service;

            let receipt = desk.check_in(req).await?;
            println!(
                "{} {}",
                "✓ Check-in successful:".green().bold(),
                receipt.ticket.confirmation()
            );
            render::ticket(&receipt.ticket, desk.now_millis())?;
            if receipt.exported == Some(false) {
                println!("{}", "  (marketing export failed; check-in kept)".yellow());
            }
        }

        DeskCommand::Next => match desk.call_next().await {
            None => println!("{}", "Queue is empty".yellow()),
            Some(call) => {
                println!("{} {}", "📢".bold(), call.announcement.text);
                if !call.delivered {
                    println!("{}", "  (announcement failed; customer still called)".yellow());
                }
                for (customer, fate) in call.report.departures() {
                    match fate {
                        CustomerFate::Evicted => println!(
                            "{} {} has been removed after passing {} positions",
                            "⚠".red(),
                            customer.name,
                            customer.positions_passed
                        ),
                        CustomerFate::Served => println!(
                            "{} Now serving {} at {}",
                            "✓".green(),
                            customer.name,
                            call.report
                                .counter_name
                                .as_deref()
                                .unwrap_or("the next available counter")
                        ),
                    }
                }
            }
        },

        DeskCommand::Remove { id } => match desk.remove_customer(&id) {
            Some(customer) => println!(
                "{} {} has been removed from the queue",
                "✓".green(),
                customer.name
            ),
            None => println!("{}", format!("No customer with ID {}", id).yellow()),
        },

        DeskCommand::List => render::customers(desk.customers(), desk.registry()),

        DeskCommand::Ticket { queue_id } => {
            let ticket = match queue_id {
                Some(queue_id) => desk.ticket_by_queue_id(&queue_id),
                None => desk.current_ticket(),
            };
            match ticket {
                Some(ticket) => render::ticket(&ticket, desk.now_millis())?,
                None => println!("{}", "No such ticket in the queue".yellow()),
            }
        }

        DeskCommand::Services { all } => {
            let services: Vec<_> = if all {
                desk.registry().services().iter().collect()
            } else {
                desk.offered_services()
            };
            render::services(&services, desk.registry());
        }

        DeskCommand::Counters => render::counters(desk.registry()),

        DeskCommand::AddCounter => {
            let counter = desk.add_counter()?;
            println!("{} Added {} ({})", "✓".green(), counter.name, counter.staff_name);
        }

        DeskCommand::RenameService { id, name } => {
            desk.rename_service(&id, &name)?;
            println!("{} Services have been updated", "✓".green());
        }

        DeskCommand::Assign { service, counter } => {
            desk.assign_service_counter(&service, &counter)?;
            println!("{} Services have been updated", "✓".green());
        }

        DeskCommand::ToggleService { id, off } => {
            desk.set_service_active(&id, !off)?;
            println!("{} Services have been updated", "✓".green());
        }

        DeskCommand::ToggleCounter { id, off } => {
            desk.set_counter_active(&id, !off)?;
            println!("{} Counters have been updated", "✓".green());
        }

        DeskCommand::Staff { counter, name } => {
            desk.set_counter_staff(&counter, &name)?;
            println!("{} Counters have been updated", "✓".green());
        }

        DeskCommand::Sheet { url } => {
            desk.set_marketing_sheet(&url)?;
            println!("{} Marketing Sheet Updated", "✓".green());
        }

        DeskCommand::Stats => render::stats(&desk.stats()),

        DeskCommand::Marketing => render::marketing(&desk.marketing_contacts()),

        DeskCommand::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> DeskCommand {
        Line::try_parse_from(split_args(line)).unwrap().command
    }

    #[test]
    fn test_split_args_quotes() {
        assert_eq!(
            split_args(r#"checkin "Ana Maria" 555-0100  --consent"#),
            vec!["checkin", "Ana Maria", "555-0100", "--consent"]
        );
        assert_eq!(split_args(r#"rename-service 1 """#), vec!["rename-service", "1", ""]);
        assert!(split_args("   ").is_empty());
    }

    #[test]
    fn test_parse_checkin() {
        assert_eq!(
            parse(r#"checkin "Ana Maria" 555 --service 2"#),
            DeskCommand::Checkin {
                name: "Ana Maria".to_string(),
                phone: "555".to_string(),
                consent: false,
                service: Some("2".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_aliases_and_flags() {
        assert_eq!(parse("exit"), DeskCommand::Quit);
        assert_eq!(parse("add-counter"), DeskCommand::AddCounter);
        assert_eq!(
            parse("toggle-counter 1 --off"),
            DeskCommand::ToggleCounter {
                id: "1".to_string(),
                off: true
            }
        );
    }

    #[test]
    fn test_parse_services_and_sheet() {
        assert_eq!(parse("services"), DeskCommand::Services { all: false });
        assert_eq!(parse("services --all"), DeskCommand::Services { all: true });
        assert_eq!(
            parse("sheet https://docs.google.com/spreadsheets/d/abc/edit"),
            DeskCommand::Sheet {
                url: "https://docs.google.com/spreadsheets/d/abc/edit".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_command_is_error() {
        assert!(Line::try_parse_from(split_args("dance")).is_err());
    }
}
