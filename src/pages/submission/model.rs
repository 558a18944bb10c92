use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct SubmitAttendance {
    pub(super) check_in: DateTimeWithTimeZone,
    #[serde(default)]
    pub(super) check_out: Option<DateTimeWithTimeZone>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct SubmitOvertime {
    pub(super) date: NaiveDate,
    pub(super) hours: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct SubmitReimbursement {
    pub(super) amount: Decimal,
    pub(super) description: String,
    /// Defaults to today
    #[serde(default)]
    pub(super) date: Option<NaiveDate>,
}
