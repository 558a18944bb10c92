use std::{collections::BTreeSet, sync::Arc};

use chrono::Local;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait as _};
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    audit::{AuditEntry, AuditLog, AuditedEntity},
    entity::{payroll_period, payslip},
    error::PayrollError,
    store::{
        AttendanceStore as _, OvertimeStore as _, PayslipStore as _, PeriodStore as _, ProfileStore as _,
        ReimbursementStore as _, UserStore as _,
    },
};

use super::{finish, PayComponentCalculator, RequestOrigin};

/// Outcome of a committed run.
#[derive(Debug, Clone, Serialize)]
pub struct PayrollRun {
    pub period: payroll_period::Model,
    pub payslips: Vec<payslip::Model>,
    pub total_take_home_pay: Decimal,
}

/// Closes a payroll period exactly once.
///
/// A run either commits every payslip, every record tag and the processed
/// flag together, or leaves the database untouched.
///
/// The period row is locked before anything else is read. Submissions
/// share-lock the periods covering their date, so each one either commits
/// before the run reads, or waits and then finds the period processed.
#[derive(Debug, Clone)]
pub struct PayrollRunCoordinator {
    db: Arc<DatabaseConnection>,
    audit: AuditLog,
    calculator: PayComponentCalculator,
}

impl PayrollRunCoordinator {
    pub fn new(db: Arc<DatabaseConnection>, audit: AuditLog) -> Self {
        Self {
            db,
            audit,
            calculator: PayComponentCalculator,
        }
    }

    #[instrument(skip(self, origin), fields(request_id = %origin.request_id))]
    pub async fn run_payroll(
        &self,
        period_id: Uuid,
        processed_by: Uuid,
        origin: &RequestOrigin,
    ) -> Result<PayrollRun, PayrollError> {
        info!("starting payroll run");

        let txn = self.db.begin().await?;
        let res = self.run_in(&txn, period_id, processed_by, origin).await;
        let run = finish(txn, res).await?;

        info!(
            payslips = run.payslips.len(),
            total_take_home_pay = %run.total_take_home_pay,
            "payroll run committed"
        );

        Ok(run)
    }

    async fn run_in(
        &self,
        txn: &DatabaseTransaction,
        period_id: Uuid,
        processed_by: Uuid,
        origin: &RequestOrigin,
    ) -> Result<PayrollRun, PayrollError> {
        let period = txn.lock_period(period_id).await?
            .ok_or(PayrollError::PeriodNotFound)?;

        if period.is_processed {
            return Err(PayrollError::AlreadyProcessed)
        }

        let population = population(txn).await?;
        debug!(employees = population.len(), "resolved payroll population");

        let mut payslips = Vec::with_capacity(population.len());
        let mut total_take_home_pay = Decimal::ZERO;

        for employee_id in population {
            let calculation = self.calculator
                .calculate(txn, &period, employee_id, processed_by, origin)
                .await?;

            let payslip = txn.insert_payslip(calculation.payslip).await?;

            txn.tag_attendances(&calculation.attendances).await?;
            txn.tag_overtimes(&calculation.overtimes).await?;
            txn.tag_reimbursements(&calculation.reimbursements).await?;

            self.audit.record(
                txn,
                origin,
                AuditEntry::created(processed_by, AuditedEntity::Payslip, payslip.id, &payslip),
            ).await?;

            debug!(
                %employee_id,
                worked_hours = %calculation.components.total_worked_hours,
                overtime_hours = %calculation.components.total_overtime_hours,
                take_home = %payslip.total_take_home_pay,
                "priced employee"
            );

            total_take_home_pay += payslip.total_take_home_pay;
            payslips.push(payslip);
        }

        let processed_at = Local::now().fixed_offset();
        if !txn.mark_period_processed(period.id, processed_by, &origin.ip_address, processed_at).await? {
            return Err(PayrollError::ConcurrentRunConflict)
        }

        let processed = txn.find_period(period.id).await?
            .ok_or(PayrollError::PeriodNotFound)?;

        self.audit.record(
            txn,
            origin,
            AuditEntry::updated(processed_by, AuditedEntity::PayrollPeriod, processed.id, &period, &processed),
        ).await?;

        Ok(PayrollRun {
            period: processed,
            payslips,
            total_take_home_pay,
        })
    }
}

/// Everyone with a salary profile plus every employee account, ascending id.
///
/// An employee account without a profile stays in the population so the run
/// fails on it instead of silently skipping a person.
async fn population(txn: &DatabaseTransaction) -> Result<BTreeSet<Uuid>, PayrollError> {
    let mut ids = txn.list_profiles().await?
        .into_iter()
        .map(|p| p.employee_id)
        .collect::<BTreeSet<_>>();

    ids.extend(txn.list_employees().await?.into_iter().map(|u| u.id));

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use sea_orm::{ConnectionTrait as _, DatabaseBackend, EntityTrait as _, MockDatabase};

    use crate::{
        audit::AuditFailurePolicy,
        entity::{audit_log, prelude::{Payslip, Reimbursement}},
        store::{AttendanceStore as _, OvertimeStore as _, PeriodStore as _},
        test_utils::*,
    };

    use super::*;

    async fn seeded_period(db: &DatabaseConnection, employee: Uuid) -> payroll_period::Model {
        insert_profile(db, employee, Decimal::from(5_000_000)).await;
        let period = insert_period(db, date(2025, 9, 1), date(2025, 9, 12)).await;

        for day in 1..=12 {
            let d = date(2025, 9, day);
            if !crate::utils::is_weekend(d) {
                insert_attendance(db, employee, at(2025, 9, day, 8, 0), Some(at(2025, 9, day, 17, 0))).await;
            }
        }
        insert_overtime(db, employee, date(2025, 9, 3), Decimal::from(2)).await;
        insert_reimbursement(db, employee, date(2025, 9, 4), Decimal::from(150_000)).await;

        period
    }

    #[actix_web::test]
    async fn test_run_payroll() {
        let db = setup_db().await;
        let admin = insert_admin(&db).await;
        let employee = insert_employee(&db, "employee1").await;
        let period = seeded_period(&db, employee).await;

        let coordinator = PayrollRunCoordinator::new(db.clone(), AuditLog::default());
        let run = coordinator.run_payroll(period.id, admin, &origin()).await.unwrap();

        assert!(run.period.is_processed);
        assert!(run.period.processed_at.is_some());
        assert_eq!(run.period.updated_by, Some(admin));
        assert_eq!(run.payslips.len(), 1);

        let payslip = &run.payslips[0];
        assert_eq!(payslip.employee_id, employee);
        assert_eq!(payslip.prorated_salary, Decimal::from(5_000_000));
        assert_eq!(payslip.overtime_pay, Decimal::from(250_000));
        assert_eq!(payslip.total_reimbursement, Decimal::from(150_000));
        assert_eq!(payslip.total_take_home_pay, Decimal::from(5_400_000));
        assert_eq!(run.total_take_home_pay, Decimal::from(5_400_000));

        assert_eq!(db.attendances_for_period(employee, period.id).await.unwrap().len(), 10);
        assert_eq!(db.overtimes_for_period(employee, period.id).await.unwrap().len(), 1);

        let reimbursements = Reimbursement::find().all(db.as_ref()).await.unwrap();
        assert!(reimbursements.iter().all(|r| r.payroll_period_id == Some(period.id)));

        // one payslip creation and one period update
        let audits = audit_log::Entity::find().all(db.as_ref()).await.unwrap();
        assert_eq!(audits.len(), 2);
        assert!(audits.iter().any(|a| a.entity_name == "Payslip" && a.action == "CREATE"));
        assert!(audits.iter().any(|a| a.entity_name == "PayrollPeriod" && a.action == "UPDATE" && a.old_value.is_some()));
    }

    #[actix_web::test]
    async fn test_rerun_is_rejected_without_changes() {
        let db = setup_db().await;
        let admin = insert_admin(&db).await;
        let employee = insert_employee(&db, "employee1").await;
        let period = seeded_period(&db, employee).await;

        let coordinator = PayrollRunCoordinator::new(db.clone(), AuditLog::default());
        coordinator.run_payroll(period.id, admin, &origin()).await.unwrap();

        let payslips = Payslip::find().all(db.as_ref()).await.unwrap();
        let audits = count::<audit_log::Entity>(&db).await;
        let processed = db.find_period(period.id).await.unwrap().unwrap();

        let err = coordinator.run_payroll(period.id, admin, &origin()).await.unwrap_err();
        assert!(matches!(err, PayrollError::AlreadyProcessed));

        assert_eq!(Payslip::find().all(db.as_ref()).await.unwrap(), payslips);
        assert_eq!(count::<audit_log::Entity>(&db).await, audits);
        assert_eq!(db.find_period(period.id).await.unwrap().unwrap(), processed);
    }

    #[actix_web::test]
    async fn test_missing_profile_aborts_whole_run() {
        let db = setup_db().await;
        let admin = insert_admin(&db).await;

        let first = insert_employee(&db, "employee1").await;
        let second = insert_employee(&db, "employee2").await;
        let _unprofiled = insert_employee(&db, "employee3").await;
        insert_profile(&db, first, Decimal::from(4_000_000)).await;
        insert_profile(&db, second, Decimal::from(6_000_000)).await;
        insert_attendance(&db, first, at(2025, 9, 1, 8, 0), Some(at(2025, 9, 1, 16, 0))).await;

        let period = insert_period(&db, date(2025, 9, 1), date(2025, 9, 12)).await;

        let coordinator = PayrollRunCoordinator::new(db.clone(), AuditLog::default());
        let err = coordinator.run_payroll(period.id, admin, &origin()).await.unwrap_err();
        assert!(matches!(err, PayrollError::ProfileNotFound(_)));

        assert_eq!(count::<Payslip>(&db).await, 0);
        assert_eq!(count::<audit_log::Entity>(&db).await, 0);
        assert!(!db.find_period(period.id).await.unwrap().unwrap().is_processed);
        assert!(db.attendances_for_period(first, period.id).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_employee_without_submissions_gets_zero_payslip() {
        let db = setup_db().await;
        let admin = insert_admin(&db).await;
        let employee = insert_employee(&db, "employee1").await;
        insert_profile(&db, employee, Decimal::from(5_000_000)).await;
        let period = insert_period(&db, date(2025, 9, 1), date(2025, 9, 12)).await;

        let coordinator = PayrollRunCoordinator::new(db.clone(), AuditLog::default());
        let run = coordinator.run_payroll(period.id, admin, &origin()).await.unwrap();

        assert_eq!(run.payslips.len(), 1);
        assert_eq!(run.payslips[0].base_salary, Decimal::from(5_000_000));
        assert_eq!(run.payslips[0].total_take_home_pay, Decimal::ZERO);
    }

    #[actix_web::test]
    async fn test_unknown_period() {
        let db = setup_db().await;
        let admin = insert_admin(&db).await;

        let coordinator = PayrollRunCoordinator::new(db.clone(), AuditLog::default());
        let err = coordinator.run_payroll(Uuid::new_v4(), admin, &origin()).await.unwrap_err();

        assert!(matches!(err, PayrollError::PeriodNotFound));
    }

    #[actix_web::test]
    async fn test_processed_flag_is_set_once() {
        let db = setup_db().await;
        let admin = insert_admin(&db).await;
        let period = insert_period(&db, date(2025, 9, 1), date(2025, 9, 12)).await;
        let now = Local::now().fixed_offset();

        assert!(db.mark_period_processed(period.id, admin, "127.0.0.1", now).await.unwrap());
        assert!(!db.mark_period_processed(period.id, admin, "127.0.0.1", now).await.unwrap());
    }

    #[actix_web::test]
    async fn test_audit_failure_ignored() {
        let db = setup_db().await;
        let admin = insert_admin(&db).await;
        let employee = insert_employee(&db, "employee1").await;
        let period = seeded_period(&db, employee).await;
        db.execute_unprepared("DROP TABLE audit_log").await.unwrap();

        let coordinator = PayrollRunCoordinator::new(db.clone(), AuditLog::new(AuditFailurePolicy::Ignore));
        let run = coordinator.run_payroll(period.id, admin, &origin()).await.unwrap();

        assert!(run.period.is_processed);
        assert_eq!(count::<Payslip>(&db).await, 1);
    }

    #[actix_web::test]
    async fn test_audit_failure_fails_run() {
        let db = setup_db().await;
        let admin = insert_admin(&db).await;
        let employee = insert_employee(&db, "employee1").await;
        let period = seeded_period(&db, employee).await;
        db.execute_unprepared("DROP TABLE audit_log").await.unwrap();

        let coordinator = PayrollRunCoordinator::new(db.clone(), AuditLog::new(AuditFailurePolicy::FailOperation));
        let err = coordinator.run_payroll(period.id, admin, &origin()).await.unwrap_err();

        assert!(matches!(err, PayrollError::Audit(_)));
        assert_eq!(count::<Payslip>(&db).await, 0);
        assert!(!db.find_period(period.id).await.unwrap().unwrap().is_processed);
    }

    #[actix_web::test]
    async fn test_run_locks_period_before_reading() {
        let now = Local::now().fixed_offset();
        let period = payroll_period::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            created_by: None,
            updated_by: None,
            ip_address: String::new(),
            start_date: date(2025, 9, 1),
            end_date: date(2025, 9, 12),
            is_processed: true,
            processed_at: Some(now),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![period.clone()]])
                .into_connection()
        );

        let err = PayrollRunCoordinator::new(Arc::clone(&db), AuditLog::default())
            .run_payroll(period.id, Uuid::new_v4(), &origin())
            .await.unwrap_err();
        assert!(matches!(err, PayrollError::AlreadyProcessed));

        let log = Arc::into_inner(db).unwrap().into_transaction_log();
        let first_read = log.iter()
            .flat_map(|txn| txn.statements())
            .map(|stmt| stmt.sql.as_str())
            .find(|sql| *sql != "BEGIN");

        assert!(
            first_read.is_some_and(|sql| sql.contains(r#"FROM "payroll_period""#) && sql.ends_with("FOR UPDATE")),
            "{first_read:?}"
        );
    }
}
