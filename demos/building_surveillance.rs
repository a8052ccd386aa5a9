//! # Demo: building_surveillance
//!
//! A security hub publishes external visitor movements. Employees are told when
//! their own visitor arrives; the security desk logs every entry and exit. When the
//! entry cut-off is reached and nobody is left inside, every subscriber prints a
//! daily report.
//!
//! Shows how to:
//! - Implement [`Subscribe`] for stateful subscribers (`RefCell` visitor logs).
//! - Unsubscribe one subscriber mid-session with [`Subscription::cancel`].
//! - End the session with `publish_completed`.
//!
//! ## Run
//! ```bash
//! cargo run --example building_surveillance
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDateTime;
use notifyhub::{HubError, NotificationHub, Subscribe, SubscriberError, Subscription};
use tracing_subscriber::EnvFilter;

const INPUT_FORMAT: &str = "%d %b %Y %H:%M";
const OUTPUT_FORMAT: &str = "%d %m %Y %I:%M:%S %p";

#[derive(Debug, Clone)]
struct ExternalVisitor {
    id: u32,
    first_name: String,
    last_name: String,
    company: String,
    job_title: String,
    entered_at: NaiveDateTime,
    exited_at: Option<NaiveDateTime>,
    in_building: bool,
    contact_id: u32,
}

struct Employee {
    id: u32,
    first_name: &'static str,
    last_name: &'static str,
    job_title: &'static str,
}

/// Console colours owned by the subscribers, not the hub.
#[derive(Clone, Copy)]
enum Theme {
    Security,
    Employee,
}

impl Theme {
    fn paint(self, line: &str) -> String {
        let code = match self {
            Theme::Security => "44;93",
            Theme::Employee => "45;97",
        };
        format!("\x1b[{code}m{line}\x1b[0m")
    }
}

/// Visitor log shared by both subscriber kinds.
#[derive(Default)]
struct VisitorLog {
    visitors: RefCell<Vec<ExternalVisitor>>,
}

impl VisitorLog {
    /// Returns `true` for a first sighting, `false` for an update of a known visitor.
    fn record(&self, visitor: &ExternalVisitor) -> bool {
        let mut visitors = self.visitors.borrow_mut();
        match visitors.iter_mut().find(|v| v.id == visitor.id) {
            None => {
                visitors.push(visitor.clone());
                true
            }
            Some(known) => {
                if !visitor.in_building {
                    known.in_building = false;
                    known.exited_at = visitor.exited_at;
                }
                false
            }
        }
    }

    fn print_report(&self, heading: &str) {
        println!();
        println!("{heading}");
        println!("{}", "-".repeat(heading.len()));
        println!();
        for v in self.visitors.borrow_mut().iter_mut() {
            v.in_building = false;
            let exited = v
                .exited_at
                .map(|t| t.format(OUTPUT_FORMAT).to_string())
                .unwrap_or_default();
            println!(
                "{:<6}{:<15}{:<15}{:<25}{:<25}",
                v.id,
                v.first_name,
                v.last_name,
                v.entered_at.format("%d %m %Y %H:%M:%S").to_string(),
                exited
            );
        }
        println!();
        println!();
    }

    fn clear(&self) {
        self.visitors.borrow_mut().clear();
    }
}

struct EmployeeNotify {
    employee: Employee,
    log: VisitorLog,
}

impl Subscribe<ExternalVisitor> for EmployeeNotify {
    fn on_next(&self, visitor: &ExternalVisitor) -> Result<(), SubscriberError> {
        if visitor.contact_id != self.employee.id {
            return Ok(());
        }
        if self.log.record(visitor) {
            let e = &self.employee;
            let line = format!(
                "{} {}, your visitor has arrived. Visitor Id({}), FirstName({}), LastName({}), entered the building, DateTime({})",
                e.first_name,
                e.last_name,
                visitor.id,
                visitor.first_name,
                visitor.last_name,
                visitor.entered_at.format(OUTPUT_FORMAT)
            );
            println!("{}", Theme::Employee.paint(&line));
            println!();
        }
        Ok(())
    }

    fn on_completed(&self) -> Result<(), SubscriberError> {
        let e = &self.employee;
        self.log.print_report(&format!(
            "{} {} ({}) Daily Visitor's Report",
            e.first_name, e.last_name, e.job_title
        ));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "employee-notify"
    }
}

#[derive(Default)]
struct SecurityNotify {
    log: VisitorLog,
}

impl Subscribe<ExternalVisitor> for SecurityNotify {
    fn on_next(&self, visitor: &ExternalVisitor) -> Result<(), SubscriberError> {
        if self.log.record(visitor) {
            let line = format!(
                "Security notification: Visitor Id({}), FirstName({}), LastName({}), Company({}), JobTitle({}), entered the building, DateTime({})",
                visitor.id,
                visitor.first_name,
                visitor.last_name,
                visitor.company,
                visitor.job_title,
                visitor.entered_at.format(OUTPUT_FORMAT)
            );
            println!("{}", Theme::Security.paint(&line));
            println!();
        } else if let Some(exited_at) = visitor.exited_at.filter(|_| !visitor.in_building) {
            println!(
                "Security notification: Visitor Id({}), FirstName({}), LastName({}), exited the building, DateTime({})",
                visitor.id,
                visitor.first_name,
                visitor.last_name,
                exited_at.format(OUTPUT_FORMAT)
            );
            println!();
        }
        Ok(())
    }

    fn on_completed(&self) -> Result<(), SubscriberError> {
        self.log.print_report("Security Daily Visitor's Report");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "security-notify"
    }
}

/// Producer side: tracks visitors and publishes every movement.
#[derive(Default)]
struct SurveillanceHub {
    visitors: RefCell<Vec<ExternalVisitor>>,
    hub: NotificationHub<ExternalVisitor>,
}

impl SurveillanceHub {
    fn subscribe(&self, subscriber: Rc<dyn Subscribe<ExternalVisitor>>) -> Subscription<ExternalVisitor> {
        self.hub.subscribe(subscriber)
    }

    fn confirm_entry(&self, visitor: ExternalVisitor) -> Result<(), HubError> {
        self.visitors.borrow_mut().push(visitor.clone());
        self.hub.publish_next(visitor)?;
        Ok(())
    }

    fn confirm_exit(&self, visitor_id: u32, exited_at: NaiveDateTime) -> Result<(), HubError> {
        let updated = {
            let mut visitors = self.visitors.borrow_mut();
            let Some(v) = visitors.iter_mut().find(|v| v.id == visitor_id) else {
                return Ok(());
            };
            v.exited_at = Some(exited_at);
            v.in_building = false;
            v.clone()
        };
        self.hub.publish_next(updated)?;
        Ok(())
    }

    fn entry_cutoff_reached(&self) -> Result<(), HubError> {
        if self.visitors.borrow().iter().any(|v| v.in_building) {
            return Ok(());
        }
        self.hub.publish_completed()?;
        Ok(())
    }
}

fn at(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, INPUT_FORMAT)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let surveillance = SurveillanceHub::default();

    let bob = Rc::new(EmployeeNotify {
        employee: Employee {
            id: 1,
            first_name: "Bob",
            last_name: "Jones",
            job_title: "Development Manager",
        },
        log: VisitorLog::default(),
    });
    let dave = Rc::new(EmployeeNotify {
        employee: Employee {
            id: 2,
            first_name: "Dave",
            last_name: "Kendal",
            job_title: "Chief Information Officer",
        },
        log: VisitorLog::default(),
    });
    let security = Rc::new(SecurityNotify::default());

    let bob_sub = surveillance.subscribe(bob.clone());
    let _dave_sub = surveillance.subscribe(dave);
    let _security_sub = surveillance.subscribe(security);

    surveillance.confirm_entry(ExternalVisitor {
        id: 1,
        first_name: "Kartik".into(),
        last_name: "Ahir".into(),
        company: "Tridhyatech".into(),
        job_title: "DotNet Developer".into(),
        entered_at: at("15 Jan 2026 10:00")?,
        exited_at: None,
        in_building: true,
        contact_id: 1,
    })?;
    surveillance.confirm_entry(ExternalVisitor {
        id: 2,
        first_name: "Aryan".into(),
        last_name: "Nai".into(),
        company: "Tridhyatech".into(),
        job_title: "MERN Stack Developer".into(),
        entered_at: at("15 Jan 2026 11:00")?,
        exited_at: None,
        in_building: true,
        contact_id: 2,
    })?;

    // Bob leaves early: no more updates, and his log is dropped.
    bob_sub.cancel();
    bob.log.clear();

    surveillance.confirm_exit(1, at("15 Jan 2026 12:00")?)?;
    surveillance.confirm_exit(2, at("15 Jan 2026 13:00")?)?;

    surveillance.entry_cutoff_reached()?;
    Ok(())
}
