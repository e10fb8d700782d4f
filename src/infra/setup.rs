use std::fs::File;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{http::app_state::AppState, persistence::PostgresPersistence},
    application::totp::TotpVerifier,
    infra::{config::AppConfig, db::ConnectionManager, notifier::ChangeNotifier},
    use_cases::{
        audit::{AuditLogRepo, AuditLogger},
        company::{CompanyRepo, CompanyUseCases},
        company_user::{CompanyUserRepo, CompanyUserUseCases},
        dashboard::{DashboardRepo, DashboardUseCases},
        inquiry::{InquiryRepo, InquiryUseCases},
        ticket::{TicketRepo, TicketUseCases},
    },
};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let db = ConnectionManager::from_config(&config)?;
    let persistence = Arc::new(PostgresPersistence::new(&db));

    let totp = Arc::new(TotpVerifier::new(
        &config.totp_secret,
        &config.totp_issuer,
        &config.totp_account,
    )?);

    let notifier = Arc::new(ChangeNotifier::new(
        db.primary().clone(),
        config.notify_channel.clone(),
    ));

    let audit = AuditLogger::new(persistence.clone() as Arc<dyn AuditLogRepo>);

    let companies = CompanyUseCases::new(
        persistence.clone() as Arc<dyn CompanyRepo>,
        audit.clone(),
    );
    let company_users = CompanyUserUseCases::new(
        persistence.clone() as Arc<dyn CompanyUserRepo>,
        audit.clone(),
    );
    let tickets = TicketUseCases::new(persistence.clone() as Arc<dyn TicketRepo>);
    let inquiries = InquiryUseCases::new(persistence.clone() as Arc<dyn InquiryRepo>);
    let dashboard = DashboardUseCases::new(persistence.clone() as Arc<dyn DashboardRepo>);

    Ok(AppState {
        config: Arc::new(config),
        db,
        companies: Arc::new(companies),
        company_users: Arc::new(company_users),
        tickets: Arc::new(tickets),
        inquiries: Arc::new(inquiries),
        dashboard: Arc::new(dashboard),
        audit,
        totp,
        notifier,
    })
}

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "opsdeck=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs)
    let file = File::create("app.log").expect("cannot create log file");
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
