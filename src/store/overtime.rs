use async_trait::async_trait;
use sea_orm::{prelude::Date, ActiveModelTrait as _, ActiveValue::{Set, Unchanged}, ColumnTrait as _, ConnectionTrait, DbErr, EntityTrait as _, QueryFilter as _, QueryOrder as _};
use uuid::Uuid;

use crate::entity::{overtime, prelude::*};

#[async_trait]
pub trait OvertimeStore {
    async fn overtimes_on(&self, employee_id: Uuid, date: Date) -> Result<Vec<overtime::Model>, DbErr>;

    async fn overtimes_between(&self, employee_id: Uuid, start: Date, end: Date) -> Result<Vec<overtime::Model>, DbErr>;

    async fn overtimes_for_period(&self, employee_id: Uuid, payroll_period_id: Uuid) -> Result<Vec<overtime::Model>, DbErr>;

    async fn insert_overtime(&self, model: overtime::ActiveModel) -> Result<overtime::Model, DbErr>;

    async fn tag_overtimes(&self, records: &[overtime::Model]) -> Result<(), DbErr>;
}

#[async_trait]
impl<C> OvertimeStore for C
where
    C: ConnectionTrait,
{
    async fn overtimes_on(&self, employee_id: Uuid, date: Date) -> Result<Vec<overtime::Model>, DbErr> {
        Overtime::find()
            .filter(overtime::Column::EmployeeId.eq(employee_id))
            .filter(overtime::Column::Date.eq(date))
            .order_by_asc(overtime::Column::CreatedAt)
            .all(self).await
    }

    async fn overtimes_between(&self, employee_id: Uuid, start: Date, end: Date) -> Result<Vec<overtime::Model>, DbErr> {
        Overtime::find()
            .filter(overtime::Column::EmployeeId.eq(employee_id))
            .filter(overtime::Column::Date.between(start, end))
            .order_by_asc(overtime::Column::Date)
            .order_by_asc(overtime::Column::CreatedAt)
            .all(self).await
    }

    async fn overtimes_for_period(&self, employee_id: Uuid, payroll_period_id: Uuid) -> Result<Vec<overtime::Model>, DbErr> {
        Overtime::find()
            .filter(overtime::Column::EmployeeId.eq(employee_id))
            .filter(overtime::Column::PayrollPeriodId.eq(payroll_period_id))
            .order_by_asc(overtime::Column::Date)
            .order_by_asc(overtime::Column::CreatedAt)
            .all(self).await
    }

    async fn insert_overtime(&self, model: overtime::ActiveModel) -> Result<overtime::Model, DbErr> {
        model.insert(self).await
    }

    async fn tag_overtimes(&self, records: &[overtime::Model]) -> Result<(), DbErr> {
        for record in records {
            Overtime::update(overtime::ActiveModel {
                id: Unchanged(record.id),
                updated_at: Set(record.updated_at),
                updated_by: Set(record.updated_by),
                ip_address: Set(record.ip_address.clone()),
                payroll_period_id: Set(record.payroll_period_id),
                ..Default::default()
            }).exec(self).await?;
        }

        Ok(())
    }
}
