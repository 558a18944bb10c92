use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    consts::{MONEY_SCALE, OVERTIME_MULTIPLIER},
    payroll::{credited_hours, hourly_rate, possible_working_hours, PayslipDetail},
};

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct CreatePeriod {
    pub(super) start_date: NaiveDate,
    pub(super) end_date: NaiveDate,
}

/// Payslip as shown to the employee, one line per consumed record.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct PayslipView {
    pub(super) payslip_id: Uuid,
    pub(super) employee_id: Uuid,
    pub(super) period: PayslipPeriod,
    pub(super) base_salary: Decimal,
    pub(super) possible_working_hours: Decimal,
    pub(super) hourly_rate: Decimal,
    pub(super) attendances: Vec<AttendanceLine>,
    pub(super) overtimes: Vec<OvertimeLine>,
    pub(super) reimbursements: Vec<ReimbursementLine>,
    pub(super) summary: PayslipTotals,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct PayslipPeriod {
    pub(super) id: Uuid,
    pub(super) start_date: NaiveDate,
    pub(super) end_date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct AttendanceLine {
    pub(super) date: NaiveDate,
    pub(super) check_in: DateTimeWithTimeZone,
    pub(super) check_out: Option<DateTimeWithTimeZone>,
    pub(super) hours: Decimal,
    pub(super) pay: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct OvertimeLine {
    pub(super) date: NaiveDate,
    pub(super) hours: Decimal,
    pub(super) pay: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct ReimbursementLine {
    pub(super) date: NaiveDate,
    pub(super) description: String,
    pub(super) amount: Decimal,
}

/// Stored totals. Line amounts are rounded individually, so they may differ
/// from these by a cent.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct PayslipTotals {
    pub(super) prorated_salary: Decimal,
    pub(super) overtime_pay: Decimal,
    pub(super) total_reimbursement: Decimal,
    pub(super) total_take_home_pay: Decimal,
}

impl From<PayslipDetail> for PayslipView {
    fn from(detail: PayslipDetail) -> Self {
        let PayslipDetail { period, payslip, attendances, overtimes, reimbursements } = detail;

        let possible_working_hours = possible_working_hours(period.start_date, period.end_date);
        let hourly_rate = hourly_rate(payslip.base_salary, possible_working_hours);

        Self {
            payslip_id: payslip.id,
            employee_id: payslip.employee_id,
            period: PayslipPeriod {
                id: period.id,
                start_date: period.start_date,
                end_date: period.end_date,
            },
            base_salary: payslip.base_salary,
            possible_working_hours,
            hourly_rate: hourly_rate.round_dp(MONEY_SCALE),
            attendances: attendances.iter()
                .map(|a| {
                    let hours = credited_hours(a);
                    AttendanceLine {
                        date: a.date,
                        check_in: a.check_in,
                        check_out: a.check_out,
                        hours,
                        pay: (hours * hourly_rate).round_dp(MONEY_SCALE),
                    }
                })
                .collect(),
            overtimes: overtimes.into_iter()
                .map(|o| OvertimeLine {
                    date: o.date,
                    hours: o.hours,
                    pay: (o.hours * hourly_rate * OVERTIME_MULTIPLIER).round_dp(MONEY_SCALE),
                })
                .collect(),
            reimbursements: reimbursements.into_iter()
                .map(|r| ReimbursementLine {
                    date: r.date,
                    description: r.description,
                    amount: r.amount,
                })
                .collect(),
            summary: PayslipTotals {
                prorated_salary: payslip.prorated_salary,
                overtime_pay: payslip.overtime_pay,
                total_reimbursement: payslip.total_reimbursement,
                total_take_home_pay: payslip.total_take_home_pay,
            },
        }
    }
}
