use std::{fs::OpenOptions, sync::Arc};

use actix_web::{web, App, HttpServer};
use migration::{Migrator, MigratorTrait as _};
use sea_orm::Database;
use tracing::{info, Level};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{filter, fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

use crate::{
    audit::AuditLog,
    auth::Authority,
    payroll::{PayrollRunCoordinator, PayslipService, PeriodService, SubmissionGuard},
};

mod config;
mod consts;
mod error;
mod utils;

mod audit;
mod auth;
mod entity;
mod pages;
mod payroll;
mod store;

#[cfg(test)]
mod test_utils;

#[actix_web::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let log_file = OpenOptions::new()
        .append(true)
        .create(true)
        .open("trace.log")
        .unwrap();

    let subscriber = Registry::default()
        .with(
            fmt::layer()
                .with_ansi(true)
                .with_line_number(true)
                .with_filter(EnvFilter::from_default_env())
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(log_file)
                .with_filter(filter::LevelFilter::from_level(Level::TRACE))
        );

    tracing::subscriber::set_global_default(subscriber).unwrap();

    let config::Config {
        host_address,
        database_opt,
        jwt_key,
        audit_failure_policy,
        run_migrations,
    } = config::load();

    let db = Database::connect(database_opt).await.expect("Unable to connect to database");

    if run_migrations {
        info!("Applying pending migrations");
        Migrator::up(&db, None).await.expect("Unable to apply migrations");
    }

    let audit = AuditLog::new(audit_failure_policy);
    info!(policy = ?audit.policy(), "Audit log configured");

    let db = Arc::new(db);

    let authority = web::Data::new(Authority::new(jwt_key.as_bytes()));
    let submissions = web::Data::new(SubmissionGuard::new(Arc::clone(&db), audit));
    let periods = web::Data::new(PeriodService::new(Arc::clone(&db), audit));
    let coordinator = web::Data::new(PayrollRunCoordinator::new(Arc::clone(&db), audit));
    let payslips = web::Data::new(PayslipService::new(Arc::clone(&db)));
    let database = web::Data::from(db);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(database.clone())
            .app_data(authority.clone())
            .app_data(submissions.clone())
            .app_data(periods.clone())
            .app_data(coordinator.clone())
            .app_data(payslips.clone())
            .wrap(TracingLogger::default())
            .configure(pages::config)
    });

    info!(%host_address, "Starting server");

    server
        .bind(host_address).unwrap()
        .run().await.unwrap();
}
