use async_trait::async_trait;
use sea_orm::{ActiveModelTrait as _, ColumnTrait as _, ConnectionTrait, DbErr, EntityTrait as _, QueryFilter as _, QueryOrder as _};
use uuid::Uuid;

use crate::entity::{payslip, prelude::*};

#[async_trait]
pub trait PayslipStore {
    async fn insert_payslip(&self, model: payslip::ActiveModel) -> Result<payslip::Model, DbErr>;

    async fn find_payslip(&self, employee_id: Uuid, payroll_period_id: Uuid) -> Result<Option<payslip::Model>, DbErr>;

    async fn payslips_for_period(&self, payroll_period_id: Uuid) -> Result<Vec<payslip::Model>, DbErr>;
}

#[async_trait]
impl<C> PayslipStore for C
where
    C: ConnectionTrait,
{
    async fn insert_payslip(&self, model: payslip::ActiveModel) -> Result<payslip::Model, DbErr> {
        model.insert(self).await
    }

    async fn find_payslip(&self, employee_id: Uuid, payroll_period_id: Uuid) -> Result<Option<payslip::Model>, DbErr> {
        Payslip::find()
            .filter(payslip::Column::EmployeeId.eq(employee_id))
            .filter(payslip::Column::PayrollPeriodId.eq(payroll_period_id))
            .one(self).await
    }

    async fn payslips_for_period(&self, payroll_period_id: Uuid) -> Result<Vec<payslip::Model>, DbErr> {
        Payslip::find()
            .filter(payslip::Column::PayrollPeriodId.eq(payroll_period_id))
            .order_by_asc(payslip::Column::EmployeeId)
            .all(self).await
    }
}
