//! The payroll engine.
//!
//! Employees submit attendance, overtime and reimbursements through the
//! [`SubmissionGuard`]. An admin defines periods with the [`PeriodService`]
//! and runs them once through the [`PayrollRunCoordinator`], which prices
//! every employee with the [`PayComponentCalculator`] inside one transaction.

use sea_orm::DatabaseTransaction;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PayrollError;

mod calculator;
mod coordinator;
mod payslip;
mod period;
mod submission;

pub use calculator::{credited_hours, hourly_rate, possible_working_hours, PayComponentCalculator};
pub use coordinator::{PayrollRun, PayrollRunCoordinator};
pub use payslip::{PayslipDetail, PayslipService, PayslipSummary};
pub use period::PeriodService;
pub use submission::{SubmissionGuard, Submitted};

/// Where a request came from, stamped on records and audit entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOrigin {
    pub ip_address: String,
    pub request_id: String,
}

/// Commits on success, rolls back on failure.
async fn finish<T>(txn: DatabaseTransaction, res: Result<T, PayrollError>) -> Result<T, PayrollError> {
    match res {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        },
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        },
    }
}
