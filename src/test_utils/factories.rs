//! Test data factories. Each creates a complete, valid object with sensible
//! defaults; use the closure parameter to override fields as needed.

use chrono::{DateTime, TimeZone, Utc};

use crate::use_cases::inquiry::Inquiry;
use crate::use_cases::ticket::Ticket;

pub fn test_datetime() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn create_test_ticket(overrides: impl FnOnce(&mut Ticket)) -> Ticket {
    let mut ticket = Ticket {
        id: 1,
        subject: "Printer jam on floor 3".to_string(),
        description: Some("It is making a grinding noise".to_string()),
        status: 0,
        priority: 3,
        metadata: None,
        is_deleted: false,
        created_at: test_datetime(),
        updated_at: test_datetime(),
    };
    overrides(&mut ticket);
    ticket
}

pub fn create_test_inquiry(overrides: impl FnOnce(&mut Inquiry)) -> Inquiry {
    let mut inquiry = Inquiry {
        id: 1,
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        company_name: Some("Navy".to_string()),
        phone_number: None,
        email: "grace@example.com".to_string(),
        question: "Can we get a demo?".to_string(),
        submitted_at: test_datetime(),
    };
    overrides(&mut inquiry);
    inquiry
}
