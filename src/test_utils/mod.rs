//! Test utilities: in-memory repository implementations, data factories,
//! and a builder producing a fully-wired [`AppState`] for HTTP-level tests.
//!
//! [`AppState`]: crate::adapters::http::app_state::AppState

mod app_state_builder;
mod audit_mocks;
mod company_mocks;
mod factories;
mod inquiry_mocks;
mod ticket_mocks;

pub use app_state_builder::TestAppStateBuilder;
pub use audit_mocks::{FailingAuditLogRepo, InMemoryAuditLogRepo};
pub use company_mocks::{InMemoryCompanyRepo, InMemoryCompanyUserRepo};
pub use factories::{create_test_inquiry, create_test_ticket, test_datetime};
pub use inquiry_mocks::InMemoryInquiryRepo;
pub use ticket_mocks::InMemoryTicketRepo;
