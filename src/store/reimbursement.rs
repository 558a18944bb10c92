use async_trait::async_trait;
use sea_orm::{prelude::Date, ActiveModelTrait as _, ActiveValue::{Set, Unchanged}, ColumnTrait as _, ConnectionTrait, DbErr, EntityTrait as _, QueryFilter as _, QueryOrder as _};
use uuid::Uuid;

use crate::entity::{prelude::*, reimbursement};

#[async_trait]
pub trait ReimbursementStore {
    async fn reimbursements_between(&self, employee_id: Uuid, start: Date, end: Date) -> Result<Vec<reimbursement::Model>, DbErr>;

    async fn insert_reimbursement(&self, model: reimbursement::ActiveModel) -> Result<reimbursement::Model, DbErr>;

    async fn tag_reimbursements(&self, records: &[reimbursement::Model]) -> Result<(), DbErr>;
}

#[async_trait]
impl<C> ReimbursementStore for C
where
    C: ConnectionTrait,
{
    async fn reimbursements_between(&self, employee_id: Uuid, start: Date, end: Date) -> Result<Vec<reimbursement::Model>, DbErr> {
        Reimbursement::find()
            .filter(reimbursement::Column::EmployeeId.eq(employee_id))
            .filter(reimbursement::Column::Date.between(start, end))
            .order_by_asc(reimbursement::Column::Date)
            .order_by_asc(reimbursement::Column::CreatedAt)
            .all(self).await
    }

    async fn insert_reimbursement(&self, model: reimbursement::ActiveModel) -> Result<reimbursement::Model, DbErr> {
        model.insert(self).await
    }

    async fn tag_reimbursements(&self, records: &[reimbursement::Model]) -> Result<(), DbErr> {
        for record in records {
            Reimbursement::update(reimbursement::ActiveModel {
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
