use async_trait::async_trait;
use sea_orm::{prelude::Date, ActiveModelTrait as _, ActiveValue::{Set, Unchanged}, ColumnTrait as _, ConnectionTrait, DbErr, EntityTrait as _, QueryFilter as _, QueryOrder as _};
use uuid::Uuid;

use crate::entity::{attendance, prelude::*};

#[async_trait]
pub trait AttendanceStore {
    /// The single record an employee may hold for a calendar date.
    async fn find_attendance_on(&self, employee_id: Uuid, date: Date) -> Result<Option<attendance::Model>, DbErr>;

    async fn attendances_between(&self, employee_id: Uuid, start: Date, end: Date) -> Result<Vec<attendance::Model>, DbErr>;

    async fn attendances_for_period(&self, employee_id: Uuid, payroll_period_id: Uuid) -> Result<Vec<attendance::Model>, DbErr>;

    async fn insert_attendance(&self, model: attendance::ActiveModel) -> Result<attendance::Model, DbErr>;

    async fn update_attendance(&self, model: attendance::ActiveModel) -> Result<attendance::Model, DbErr>;

    /// Persists the period tag and audit stamp of each record.
    async fn tag_attendances(&self, records: &[attendance::Model]) -> Result<(), DbErr>;
}

#[async_trait]
impl<C> AttendanceStore for C
where
    C: ConnectionTrait,
{
    async fn find_attendance_on(&self, employee_id: Uuid, date: Date) -> Result<Option<attendance::Model>, DbErr> {
        Attendance::find()
            .filter(attendance::Column::EmployeeId.eq(employee_id))
            .filter(attendance::Column::Date.eq(date))
            .one(self).await
    }

    async fn attendances_between(&self, employee_id: Uuid, start: Date, end: Date) -> Result<Vec<attendance::Model>, DbErr> {
        Attendance::find()
            .filter(attendance::Column::EmployeeId.eq(employee_id))
            .filter(attendance::Column::Date.between(start, end))
            .order_by_asc(attendance::Column::Date)
            .all(self).await
    }

    async fn attendances_for_period(&self, employee_id: Uuid, payroll_period_id: Uuid) -> Result<Vec<attendance::Model>, DbErr> {
        Attendance::find()
            .filter(attendance::Column::EmployeeId.eq(employee_id))
            .filter(attendance::Column::PayrollPeriodId.eq(payroll_period_id))
            .order_by_asc(attendance::Column::Date)
            .all(self).await
    }

    async fn insert_attendance(&self, model: attendance::ActiveModel) -> Result<attendance::Model, DbErr> {
        model.insert(self).await
    }

    async fn update_attendance(&self, model: attendance::ActiveModel) -> Result<attendance::Model, DbErr> {
        model.update(self).await
    }

    async fn tag_attendances(&self, records: &[attendance::Model]) -> Result<(), DbErr> {
        for record in records {
            Attendance::update(attendance::ActiveModel {
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
