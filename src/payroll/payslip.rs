use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    entity::{attendance, overtime, payroll_period, payslip, reimbursement},
    error::PayrollError,
    store::{AttendanceStore as _, OvertimeStore as _, PayslipStore as _, PeriodStore as _, ReimbursementStore as _},
};

/// One employee's payslip with the records it was computed from.
#[derive(Debug, Clone, Serialize)]
pub struct PayslipDetail {
    pub period: payroll_period::Model,
    pub payslip: payslip::Model,
    pub attendances: Vec<attendance::Model>,
    pub overtimes: Vec<overtime::Model>,
    pub reimbursements: Vec<reimbursement::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayslipSummary {
    pub period: payroll_period::Model,
    pub payslips: Vec<payslip::Model>,
    pub total_take_home_pay: Decimal,
}

/// Read side of processed periods.
#[derive(Debug, Clone)]
pub struct PayslipService {
    db: Arc<DatabaseConnection>,
}

impl PayslipService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn processed_period(&self, period_id: Uuid) -> Result<payroll_period::Model, PayrollError> {
        let period = self.db.find_period(period_id).await?
            .ok_or(PayrollError::PeriodNotFound)?;

        if !period.is_processed {
            return Err(PayrollError::PeriodNotProcessed)
        }

        Ok(period)
    }

    pub async fn employee_payslip(&self, employee_id: Uuid, period_id: Uuid) -> Result<PayslipDetail, PayrollError> {
        let period = self.processed_period(period_id).await?;

        let payslip = self.db.find_payslip(employee_id, period_id).await?
            .ok_or(PayrollError::PayslipNotFound)?;

        let attendances = self.db.attendances_for_period(employee_id, period_id).await?;
        let overtimes = self.db.overtimes_for_period(employee_id, period_id).await?;
        let reimbursements = self.db
            .reimbursements_between(employee_id, period.start_date, period.end_date).await?
            .into_iter()
            .filter(|r| r.payroll_period_id == Some(period_id))
            .collect();

        Ok(PayslipDetail {
            period,
            payslip,
            attendances,
            overtimes,
            reimbursements,
        })
    }

    pub async fn summary(&self, period_id: Uuid) -> Result<PayslipSummary, PayrollError> {
        let period = self.processed_period(period_id).await?;
        let payslips = self.db.payslips_for_period(period_id).await?;
        let total_take_home_pay = payslips.iter().map(|p| p.total_take_home_pay).sum();

        Ok(PayslipSummary {
            period,
            payslips,
            total_take_home_pay,
        })
    }
}
