use std::sync::Arc;

use chrono::Local;
use sea_orm::{prelude::Date, ActiveValue::Set, DatabaseConnection, TransactionTrait as _};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    audit::{AuditEntry, AuditLog, AuditedEntity},
    entity::payroll_period,
    error::PayrollError,
    store::PeriodStore as _,
};

use super::{finish, RequestOrigin};

#[derive(Debug, Clone)]
pub struct PeriodService {
    db: Arc<DatabaseConnection>,
    audit: AuditLog,
}

impl PeriodService {
    pub fn new(db: Arc<DatabaseConnection>, audit: AuditLog) -> Self {
        Self { db, audit }
    }

    /// Defines a new period. Both dates are inclusive and the range must not
    /// share a day with any existing period.
    #[instrument(skip(self, origin), fields(request_id = %origin.request_id))]
    pub async fn create_period(
        &self,
        start_date: Date,
        end_date: Date,
        created_by: Uuid,
        origin: &RequestOrigin,
    ) -> Result<payroll_period::Model, PayrollError> {
        if start_date >= end_date {
            return Err(PayrollError::InvalidPeriodRange { start_date, end_date })
        }

        let txn = self.db.begin().await?;
        let res: Result<_, PayrollError> = async {
            if !txn.overlapping_periods(start_date, end_date).await?.is_empty() {
                return Err(PayrollError::OverlappingPeriod { start_date, end_date })
            }

            let now = Local::now().fixed_offset();
            let period = txn.insert_period(payroll_period::ActiveModel {
                id: Set(Uuid::new_v4()),
                created_at: Set(now),
                updated_at: Set(now),
                created_by: Set(Some(created_by)),
                updated_by: Set(Some(created_by)),
                ip_address: Set(origin.ip_address.clone()),
                start_date: Set(start_date),
                end_date: Set(end_date),
                is_processed: Set(false),
                processed_at: Set(None),
            }).await?;

            self.audit.record(
                &txn,
                origin,
                AuditEntry::created(created_by, AuditedEntity::PayrollPeriod, period.id, &period),
            ).await?;

            Ok(period)
        }.await;

        let period = finish(txn, res).await?;
        info!(period_id = %period.id, "payroll period created");

        Ok(period)
    }

    pub async fn get_period(&self, id: Uuid) -> Result<payroll_period::Model, PayrollError> {
        self.db.find_period(id).await?.ok_or(PayrollError::PeriodNotFound)
    }

    pub async fn list_periods(&self) -> Result<Vec<payroll_period::Model>, PayrollError> {
        Ok(self.db.list_periods().await?)
    }
}
