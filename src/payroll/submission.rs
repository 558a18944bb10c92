use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local};
use rust_decimal::Decimal;
use sea_orm::{prelude::Date, ActiveValue::Set, DatabaseConnection, DatabaseTransaction, IntoActiveModel as _, TransactionTrait as _};
use serde::Serialize;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    audit::{AuditEntry, AuditLog, AuditedEntity},
    consts::MAX_OVERTIME_HOURS_PER_DAY,
    entity::{attendance, overtime, reimbursement},
    error::PayrollError,
    store::{AttendanceStore as _, OvertimeStore as _, PeriodStore as _, ReimbursementStore as _, UserStore as _},
    utils,
};

use super::{finish, RequestOrigin};

/// Whether a submission inserted a new record or replaced an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "record", rename_all = "snake_case")]
pub enum Submitted<T> {
    Created(T),
    Updated(T),
}

impl<T> Submitted<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Submitted::Created(_))
    }
}

/// Validates employee submissions before they reach storage.
///
/// Each accepted submission is written together with its audit entry in one
/// transaction. Rejections never write anything. Dates inside a processed
/// period are closed to every kind of submission.
#[derive(Debug, Clone)]
pub struct SubmissionGuard {
    db: Arc<DatabaseConnection>,
    audit: AuditLog,
}

impl SubmissionGuard {
    pub fn new(db: Arc<DatabaseConnection>, audit: AuditLog) -> Self {
        Self { db, audit }
    }

    /// One attendance per employee per calendar date of `check_in`; a second
    /// submission for the same date replaces the first.
    #[instrument(skip(self, origin), fields(request_id = %origin.request_id))]
    pub async fn submit_attendance(
        &self,
        employee_id: Uuid,
        check_in: DateTime<FixedOffset>,
        check_out: Option<DateTime<FixedOffset>>,
        origin: &RequestOrigin,
    ) -> Result<Submitted<attendance::Model>, PayrollError> {
        let date = check_in.date_naive();
        if utils::is_weekend(date) {
            return Err(PayrollError::WeekendSubmission)
        }

        if check_out.is_some_and(|out| out < check_in) {
            return Err(PayrollError::Validation("check_out must not be before check_in".to_owned()))
        }

        let txn = self.db.begin().await?;
        let res = self.attendance_in(&txn, employee_id, date, check_in, check_out, origin).await;
        let submitted = finish(txn, res).await?;

        debug!(created = submitted.is_created(), "attendance stored");

        Ok(submitted)
    }

    async fn attendance_in(
        &self,
        txn: &DatabaseTransaction,
        employee_id: Uuid,
        date: Date,
        check_in: DateTime<FixedOffset>,
        check_out: Option<DateTime<FixedOffset>>,
        origin: &RequestOrigin,
    ) -> Result<Submitted<attendance::Model>, PayrollError> {
        ensure_open(txn, date).await?;

        let now = Local::now().fixed_offset();

        match txn.find_attendance_on(employee_id, date).await? {
            Some(existing) => {
                if let Some(period_id) = existing.payroll_period_id {
                    return Err(PayrollError::RecordLocked(period_id))
                }

                let mut model = existing.clone().into_active_model();
                model.check_in = Set(check_in);
                model.check_out = Set(check_out);
                model.updated_at = Set(now);
                model.updated_by = Set(Some(employee_id));
                model.ip_address = Set(origin.ip_address.clone());

                let updated = txn.update_attendance(model).await?;
                self.audit.record(
                    txn,
                    origin,
                    AuditEntry::updated(employee_id, AuditedEntity::Attendance, updated.id, &existing, &updated),
                ).await?;

                Ok(Submitted::Updated(updated))
            },
            None => {
                let model = attendance::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    created_at: Set(now),
                    updated_at: Set(now),
                    created_by: Set(Some(employee_id)),
                    updated_by: Set(Some(employee_id)),
                    ip_address: Set(origin.ip_address.clone()),
                    employee_id: Set(employee_id),
                    date: Set(date),
                    check_in: Set(check_in),
                    check_out: Set(check_out),
                    payroll_period_id: Set(None),
                };

                let created = txn.insert_attendance(model).await?;
                self.audit.record(
                    txn,
                    origin,
                    AuditEntry::created(employee_id, AuditedEntity::Attendance, created.id, &created),
                ).await?;

                Ok(Submitted::Created(created))
            },
        }
    }

    /// Accepts overtime as long as the day's total stays within
    /// [`MAX_OVERTIME_HOURS_PER_DAY`]. Any calendar date is allowed.
    #[instrument(skip(self, origin), fields(request_id = %origin.request_id))]
    pub async fn submit_overtime(
        &self,
        employee_id: Uuid,
        date: Date,
        hours: Decimal,
        origin: &RequestOrigin,
    ) -> Result<overtime::Model, PayrollError> {
        if hours <= Decimal::ZERO {
            return Err(PayrollError::Validation("overtime hours must be positive".to_owned()))
        }

        let txn = self.db.begin().await?;
        let res = self.overtime_in(&txn, employee_id, date, hours, origin).await;
        let created = finish(txn, res).await?;

        debug!(hours = %created.hours, "overtime stored");

        Ok(created)
    }

    async fn overtime_in(
        &self,
        txn: &DatabaseTransaction,
        employee_id: Uuid,
        date: Date,
        hours: Decimal,
        origin: &RequestOrigin,
    ) -> Result<overtime::Model, PayrollError> {
        ensure_open(txn, date).await?;

        // held until commit so the day's total cannot change under the cap check
        if txn.lock_user(employee_id).await?.is_none() {
            return Err(PayrollError::Validation(format!("unknown employee {employee_id}")))
        }

        let same_day = txn.overtimes_on(employee_id, date).await?;

        if let Some(period_id) = same_day.iter().find_map(|o| o.payroll_period_id) {
            return Err(PayrollError::RecordLocked(period_id))
        }

        let existing: Decimal = same_day.iter().map(|o| o.hours).sum();
        if existing + hours > MAX_OVERTIME_HOURS_PER_DAY {
            return Err(PayrollError::DailyOvertimeCapExceeded {
                date,
                existing,
                requested: hours,
                cap: MAX_OVERTIME_HOURS_PER_DAY,
            })
        }

        let now = Local::now().fixed_offset();
        let model = overtime::ActiveModel {
            id: Set(Uuid::new_v4()),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(Some(employee_id)),
            updated_by: Set(Some(employee_id)),
            ip_address: Set(origin.ip_address.clone()),
            employee_id: Set(employee_id),
            date: Set(date),
            hours: Set(hours),
            payroll_period_id: Set(None),
        };

        let created = txn.insert_overtime(model).await?;
        self.audit.record(
            txn,
            origin,
            AuditEntry::created(employee_id, AuditedEntity::Overtime, created.id, &created),
        ).await?;

        Ok(created)
    }

    /// Always stores a new claim.
    #[instrument(skip(self, description, origin), fields(request_id = %origin.request_id))]
    pub async fn submit_reimbursement(
        &self,
        employee_id: Uuid,
        date: Date,
        amount: Decimal,
        description: String,
        origin: &RequestOrigin,
    ) -> Result<reimbursement::Model, PayrollError> {
        if amount <= Decimal::ZERO {
            return Err(PayrollError::Validation("reimbursement amount must be positive".to_owned()))
        }

        let now = Local::now().fixed_offset();
        let model = reimbursement::ActiveModel {
            id: Set(Uuid::new_v4()),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(Some(employee_id)),
            updated_by: Set(Some(employee_id)),
            ip_address: Set(origin.ip_address.clone()),
            employee_id: Set(employee_id),
            date: Set(date),
            amount: Set(amount),
            description: Set(description),
            payroll_period_id: Set(None),
        };

        let txn = self.db.begin().await?;
        let res: Result<_, PayrollError> = async {
            ensure_open(&txn, date).await?;

            let created = txn.insert_reimbursement(model).await?;
            self.audit.record(
                &txn,
                origin,
                AuditEntry::created(employee_id, AuditedEntity::Reimbursement, created.id, &created),
            ).await?;

            Ok(created)
        }.await;

        finish(txn, res).await
    }
}

/// Rejects dates that an already processed period has paid out.
async fn ensure_open(txn: &DatabaseTransaction, date: Date) -> Result<(), PayrollError> {
    match txn.lock_periods_covering(date).await?.into_iter().find(|p| p.is_processed) {
        Some(period) => Err(PayrollError::RecordLocked(period.id)),
        None => Ok(()),
    }
}
