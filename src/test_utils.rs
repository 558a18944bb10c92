//! Fixtures for tests that need a real database.
//!
//! Each call to [`setup_db`] opens a private in-memory SQLite database whose
//! tables are generated from the entities. The pool holds a single connection
//! so the database lives exactly as long as the returned handle, which is
//! shared with the services the same way `main` shares the pool.

use std::sync::Arc;

use actix_web::web;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeZone as _};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue::{Set, Unchanged}, ConnectOptions, ConnectionTrait as _, Database, DatabaseConnection, DbBackend,
    EntityTrait, FromQueryResult, PaginatorTrait as _, Schema,
};
use uuid::Uuid;

use crate::{
    audit::AuditLog,
    auth::{hash_password, Authority},
    entity::{
        attendance, audit_log, employee_profile, overtime, payroll_period, prelude::*, reimbursement,
        sea_orm_active_enums::RoleType, user,
    },
    payroll::{PayrollRunCoordinator, PayslipService, PeriodService, RequestOrigin, SubmissionGuard},
};

pub const SECRET: &[u8] = b"secret";

pub async fn setup_db() -> Arc<DatabaseConnection> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opt).await.expect("Unable to open in-memory database");
    let schema = Schema::new(DbBackend::Sqlite);

    create_table(&db, &schema, User).await;
    create_table(&db, &schema, EmployeeProfile).await;
    create_table(&db, &schema, PayrollPeriod).await;
    create_table(&db, &schema, Attendance).await;
    create_table(&db, &schema, Overtime).await;
    create_table(&db, &schema, Reimbursement).await;
    create_table(&db, &schema, Payslip).await;
    create_table(&db, &schema, audit_log::Entity).await;

    Arc::new(db)
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, schema: &Schema, entity: E) {
    let stmt = schema.create_table_from_entity(entity);
    db.execute(DbBackend::Sqlite.build(&stmt)).await.expect("Unable to create table");
}

pub fn origin() -> RequestOrigin {
    RequestOrigin {
        ip_address: "127.0.0.1".to_owned(),
        request_id: "test-request".to_owned(),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Wall-clock time in UTC+7.
pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(7 * 3600).unwrap()
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .unwrap()
}

async fn insert_user(db: &DatabaseConnection, username: &str, role: RoleType) -> Uuid {
    let now = Local::now().fixed_offset();

    User::insert(user::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        username: Set(username.to_owned()),
        password: Set(hash_password(username, username)),
        role: Set(role),
    }).exec_with_returning(db).await.unwrap().id
}

pub async fn insert_admin(db: &DatabaseConnection) -> Uuid {
    insert_user(db, "admin", RoleType::Admin).await
}

pub async fn insert_employee(db: &DatabaseConnection, username: &str) -> Uuid {
    insert_user(db, username, RoleType::Employee).await
}

pub async fn insert_profile(db: &DatabaseConnection, employee_id: Uuid, base_salary: Decimal) -> employee_profile::Model {
    let now = Local::now().fixed_offset();

    EmployeeProfile::insert(employee_profile::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(None),
        updated_by: Set(None),
        ip_address: Set(String::new()),
        employee_id: Set(employee_id),
        base_salary: Set(base_salary),
    }).exec_with_returning(db).await.unwrap()
}

pub async fn insert_period(db: &DatabaseConnection, start_date: NaiveDate, end_date: NaiveDate) -> payroll_period::Model {
    let now = Local::now().fixed_offset();

    PayrollPeriod::insert(payroll_period::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(None),
        updated_by: Set(None),
        ip_address: Set(String::new()),
        start_date: Set(start_date),
        end_date: Set(end_date),
        is_processed: Set(false),
        processed_at: Set(None),
    }).exec_with_returning(db).await.unwrap()
}

pub async fn insert_attendance(
    db: &DatabaseConnection,
    employee_id: Uuid,
    check_in: DateTime<FixedOffset>,
    check_out: Option<DateTime<FixedOffset>>,
) -> attendance::Model {
    Attendance::insert(attendance::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(check_in),
        updated_at: Set(check_in),
        created_by: Set(Some(employee_id)),
        updated_by: Set(Some(employee_id)),
        ip_address: Set(String::new()),
        employee_id: Set(employee_id),
        date: Set(check_in.date_naive()),
        check_in: Set(check_in),
        check_out: Set(check_out),
        payroll_period_id: Set(None),
    }).exec_with_returning(db).await.unwrap()
}

pub async fn tag_attendance(db: &DatabaseConnection, record: attendance::Model, period_id: Uuid) {
    Attendance::update(attendance::ActiveModel {
        id: Unchanged(record.id),
        payroll_period_id: Set(Some(period_id)),
        ..Default::default()
    }).exec(db).await.unwrap();
}

pub async fn insert_overtime(db: &DatabaseConnection, employee_id: Uuid, date: NaiveDate, hours: Decimal) -> overtime::Model {
    let now = Local::now().fixed_offset();

    Overtime::insert(overtime::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(Some(employee_id)),
        updated_by: Set(Some(employee_id)),
        ip_address: Set(String::new()),
        employee_id: Set(employee_id),
        date: Set(date),
        hours: Set(hours),
        payroll_period_id: Set(None),
    }).exec_with_returning(db).await.unwrap()
}

pub async fn insert_reimbursement(db: &DatabaseConnection, employee_id: Uuid, date: NaiveDate, amount: Decimal) -> reimbursement::Model {
    let now = Local::now().fixed_offset();

    Reimbursement::insert(reimbursement::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(Some(employee_id)),
        updated_by: Set(Some(employee_id)),
        ip_address: Set(String::new()),
        employee_id: Set(employee_id),
        date: Set(date),
        amount: Set(amount),
        description: Set("Taxi".to_owned()),
        payroll_period_id: Set(None),
    }).exec_with_returning(db).await.unwrap()
}

pub async fn count<E>(db: &DatabaseConnection) -> u64
where
    E: EntityTrait,
    E::Model: FromQueryResult + Sized + Send + Sync,
{
    E::find().count(db).await.unwrap()
}

/// Registers every service a handler may ask for, backed by `db`.
pub fn app_state(db: Arc<DatabaseConnection>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let audit = AuditLog::default();

        cfg
            .app_data(web::Data::new(Authority::new(SECRET)))
            .app_data(web::Data::new(SubmissionGuard::new(Arc::clone(&db), audit)))
            .app_data(web::Data::new(PeriodService::new(Arc::clone(&db), audit)))
            .app_data(web::Data::new(PayrollRunCoordinator::new(Arc::clone(&db), audit)))
            .app_data(web::Data::new(PayslipService::new(Arc::clone(&db))))
            .app_data(web::Data::from(db));
    }
}

/// `Authorization` header for a user signed with [`SECRET`].
pub fn bearer(id: Uuid, role: RoleType) -> (&'static str, String) {
    let now = Local::now().fixed_offset();
    let user = user::Model {
        id,
        created_at: now,
        updated_at: now,
        username: id.to_string(),
        password: Vec::new(),
        role,
    };

    let token = Authority::new(SECRET).issue_for(&user).unwrap();
    ("Authorization", format!("JWT {token}"))
}
