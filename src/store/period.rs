use async_trait::async_trait;
use sea_orm::{prelude::{Date, DateTimeWithTimeZone}, ActiveModelTrait as _, ActiveValue::Set, ColumnTrait as _, ConnectionTrait, DbErr, EntityTrait as _, QueryFilter as _, QueryOrder as _, QuerySelect as _};
use uuid::Uuid;

use crate::entity::{payroll_period, prelude::*};

#[async_trait]
pub trait PeriodStore {
    async fn find_period(&self, id: Uuid) -> Result<Option<payroll_period::Model>, DbErr>;

    /// Like [`find_period`](Self::find_period), holding a row lock until the
    /// transaction ends.
    async fn lock_period(&self, id: Uuid) -> Result<Option<payroll_period::Model>, DbErr>;

    /// Periods whose range includes `date`, share-locked until the transaction
    /// ends. A run waits on this lock before it reads any submission.
    async fn lock_periods_covering(&self, date: Date) -> Result<Vec<payroll_period::Model>, DbErr>;

    /// Newest `start_date` first.
    async fn list_periods(&self) -> Result<Vec<payroll_period::Model>, DbErr>;

    /// Periods sharing at least one date with `[start, end]`.
    async fn overlapping_periods(&self, start: Date, end: Date) -> Result<Vec<payroll_period::Model>, DbErr>;

    async fn insert_period(&self, model: payroll_period::ActiveModel) -> Result<payroll_period::Model, DbErr>;

    /// Flips `is_processed` only while it is still false.
    ///
    /// Returns `false` when no row matched, meaning another run got there first
    /// (or the period vanished).
    async fn mark_period_processed(
        &self,
        id: Uuid,
        processed_by: Uuid,
        ip_address: &str,
        processed_at: DateTimeWithTimeZone,
    ) -> Result<bool, DbErr>;
}

#[async_trait]
impl<C> PeriodStore for C
where
    C: ConnectionTrait,
{
    async fn find_period(&self, id: Uuid) -> Result<Option<payroll_period::Model>, DbErr> {
        PayrollPeriod::find_by_id(id).one(self).await
    }

    async fn lock_period(&self, id: Uuid) -> Result<Option<payroll_period::Model>, DbErr> {
        PayrollPeriod::find_by_id(id)
            .lock_exclusive()
            .one(self).await
    }

    async fn lock_periods_covering(&self, date: Date) -> Result<Vec<payroll_period::Model>, DbErr> {
        PayrollPeriod::find()
            .filter(payroll_period::Column::StartDate.lte(date))
            .filter(payroll_period::Column::EndDate.gte(date))
            .lock_shared()
            .all(self).await
    }

    async fn list_periods(&self) -> Result<Vec<payroll_period::Model>, DbErr> {
        PayrollPeriod::find()
            .order_by_desc(payroll_period::Column::StartDate)
            .all(self).await
    }

    async fn overlapping_periods(&self, start: Date, end: Date) -> Result<Vec<payroll_period::Model>, DbErr> {
        PayrollPeriod::find()
            .filter(payroll_period::Column::StartDate.lte(end))
            .filter(payroll_period::Column::EndDate.gte(start))
            .all(self).await
    }

    async fn insert_period(&self, model: payroll_period::ActiveModel) -> Result<payroll_period::Model, DbErr> {
        model.insert(self).await
    }

    async fn mark_period_processed(
        &self,
        id: Uuid,
        processed_by: Uuid,
        ip_address: &str,
        processed_at: DateTimeWithTimeZone,
    ) -> Result<bool, DbErr> {
        let res = PayrollPeriod::update_many()
            .set(payroll_period::ActiveModel {
                updated_at: Set(processed_at),
                updated_by: Set(Some(processed_by)),
                ip_address: Set(ip_address.to_owned()),
                is_processed: Set(true),
                processed_at: Set(Some(processed_at)),
                ..Default::default()
            })
            .filter(payroll_period::Column::Id.eq(id))
            .filter(payroll_period::Column::IsProcessed.eq(false))
            .exec(self).await?;

        Ok(res.rows_affected > 0)
    }
}
