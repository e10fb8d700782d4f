use std::sync::Arc;

use crate::application::totp::TotpVerifier;
use crate::application::use_cases::audit::AuditLogger;
use crate::application::use_cases::company::CompanyUseCases;
use crate::application::use_cases::company_user::CompanyUserUseCases;
use crate::application::use_cases::dashboard::DashboardUseCases;
use crate::application::use_cases::inquiry::InquiryUseCases;
use crate::application::use_cases::ticket::TicketUseCases;
use crate::infra::config::AppConfig;
use crate::infra::db::ConnectionManager;
use crate::infra::notifier::ChangeNotifier;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: ConnectionManager,
    pub companies: Arc<CompanyUseCases>,
    pub company_users: Arc<CompanyUserUseCases>,
    pub tickets: Arc<TicketUseCases>,
    pub inquiries: Arc<InquiryUseCases>,
    pub dashboard: Arc<DashboardUseCases>,
    pub audit: AuditLogger,
    pub totp: Arc<TotpVerifier>,
    pub notifier: Arc<ChangeNotifier>,
}
