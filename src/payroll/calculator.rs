use chrono::{DateTime, FixedOffset, Local};
use rust_decimal::Decimal;
use sea_orm::{prelude::Date, ActiveValue::Set, ConnectionTrait};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    consts::{MONEY_SCALE, OVERTIME_MULTIPLIER, WORKING_HOURS_PER_DAY},
    entity::{attendance, overtime, payroll_period, payslip, reimbursement},
    error::PayrollError,
    store::{AttendanceStore as _, OvertimeStore as _, ProfileStore as _, ReimbursementStore as _},
    utils,
};

use super::RequestOrigin;

/// Every figure behind one payslip.
///
/// Monetary results are rounded to [`MONEY_SCALE`] places, while the hourly
/// rate keeps full precision so the rounding happens once per component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayComponents {
    pub base_salary: Decimal,
    pub possible_working_hours: Decimal,
    pub hourly_rate: Decimal,
    pub total_worked_hours: Decimal,
    pub prorated_salary: Decimal,
    pub total_overtime_hours: Decimal,
    pub overtime_pay: Decimal,
    pub total_reimbursement: Decimal,
    pub total_take_home_pay: Decimal,
}

/// Eight hours for every Monday to Friday date in the period.
pub fn possible_working_hours(start: Date, end: Date) -> Decimal {
    Decimal::from(utils::count_working_days(start, end)) * WORKING_HOURS_PER_DAY
}

pub fn hourly_rate(base_salary: Decimal, possible_working_hours: Decimal) -> Decimal {
    if possible_working_hours.is_zero() {
        return Decimal::ZERO
    }

    base_salary / possible_working_hours
}

/// Hours a single attendance earns: a full shift is credited as exactly
/// eight hours, anything shorter (or a missing checkout) earns nothing.
pub fn credited_hours(record: &attendance::Model) -> Decimal {
    let Some(check_out) = record.check_out else {
        return Decimal::ZERO
    };

    let worked = utils::hours_between(&record.check_in, &check_out);

    if worked >= WORKING_HOURS_PER_DAY {
        WORKING_HOURS_PER_DAY
    } else {
        Decimal::ZERO
    }
}

pub fn compute_components(
    period: &payroll_period::Model,
    base_salary: Decimal,
    attendances: &[attendance::Model],
    overtimes: &[overtime::Model],
    reimbursements: &[reimbursement::Model],
) -> PayComponents {
    let possible_working_hours = possible_working_hours(period.start_date, period.end_date);
    let hourly_rate = hourly_rate(base_salary, possible_working_hours);

    let total_worked_hours: Decimal = attendances.iter()
        .filter(|a| period.contains(a.date))
        .map(credited_hours)
        .sum();
    let prorated_salary = (hourly_rate * total_worked_hours).round_dp(MONEY_SCALE);

    let total_overtime_hours: Decimal = overtimes.iter().map(|o| o.hours).sum();
    let overtime_pay = (total_overtime_hours * hourly_rate * OVERTIME_MULTIPLIER).round_dp(MONEY_SCALE);

    let total_reimbursement = reimbursements.iter()
        .map(|r| r.amount)
        .sum::<Decimal>()
        .round_dp(MONEY_SCALE);

    PayComponents {
        base_salary,
        possible_working_hours,
        hourly_rate,
        total_worked_hours,
        prorated_salary,
        total_overtime_hours,
        overtime_pay,
        total_reimbursement,
        total_take_home_pay: prorated_salary + overtime_pay + total_reimbursement,
    }
}

/// A priced employee, not yet persisted.
///
/// The record lists are the ones the payslip consumed, already tagged with the
/// period id and re-stamped with the processing actor.
#[derive(Debug, Clone)]
pub struct Calculation {
    pub components: PayComponents,
    pub payslip: payslip::ActiveModel,
    pub attendances: Vec<attendance::Model>,
    pub overtimes: Vec<overtime::Model>,
    pub reimbursements: Vec<reimbursement::Model>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PayComponentCalculator;

impl PayComponentCalculator {
    /// Prices `employee_id` for `period`. Reads only, through `conn`, so a run
    /// can pass its transaction and see a consistent snapshot.
    pub async fn calculate<C>(
        &self,
        conn: &C,
        period: &payroll_period::Model,
        employee_id: Uuid,
        processed_by: Uuid,
        origin: &RequestOrigin,
    ) -> Result<Calculation, PayrollError>
    where
        C: ConnectionTrait,
    {
        let profile = conn.find_profile(employee_id).await?
            .ok_or(PayrollError::ProfileNotFound(employee_id))?;

        let mut attendances = conn.attendances_between(employee_id, period.start_date, period.end_date).await?;
        let mut overtimes = conn.overtimes_between(employee_id, period.start_date, period.end_date).await?;
        let mut reimbursements = conn.reimbursements_between(employee_id, period.start_date, period.end_date).await?;

        let components = compute_components(period, profile.base_salary, &attendances, &overtimes, &reimbursements);

        let now = Local::now().fixed_offset();
        let stamp = Stamp { period_id: period.id, processed_by, ip_address: &origin.ip_address, at: now };

        for a in &mut attendances {
            stamp.apply(&mut a.payroll_period_id, &mut a.updated_at, &mut a.updated_by, &mut a.ip_address);
        }
        for o in &mut overtimes {
            stamp.apply(&mut o.payroll_period_id, &mut o.updated_at, &mut o.updated_by, &mut o.ip_address);
        }
        for r in &mut reimbursements {
            stamp.apply(&mut r.payroll_period_id, &mut r.updated_at, &mut r.updated_by, &mut r.ip_address);
        }

        let payslip = payslip::ActiveModel {
            id: Set(Uuid::new_v4()),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(Some(processed_by)),
            updated_by: Set(Some(processed_by)),
            ip_address: Set(origin.ip_address.clone()),
            employee_id: Set(employee_id),
            payroll_period_id: Set(period.id),
            base_salary: Set(components.base_salary),
            prorated_salary: Set(components.prorated_salary),
            overtime_pay: Set(components.overtime_pay),
            total_reimbursement: Set(components.total_reimbursement),
            total_take_home_pay: Set(components.total_take_home_pay),
        };

        Ok(Calculation {
            components,
            payslip,
            attendances,
            overtimes,
            reimbursements,
        })
    }
}

struct Stamp<'a> {
    period_id: Uuid,
    processed_by: Uuid,
    ip_address: &'a str,
    at: DateTime<FixedOffset>,
}

impl Stamp<'_> {
    fn apply(
        &self,
        payroll_period_id: &mut Option<Uuid>,
        updated_at: &mut DateTime<FixedOffset>,
        updated_by: &mut Option<Uuid>,
        ip_address: &mut String,
    ) {
        *payroll_period_id = Some(self.period_id);
        *updated_at = self.at;
        *updated_by = Some(self.processed_by);
        self.ip_address.clone_into(ip_address);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone as _};

    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(7 * 3600).unwrap().with_ymd_and_hms(2025, 9, d, h, m, 0).unwrap()
    }

    fn period(start: u32, end: u32) -> payroll_period::Model {
        payroll_period::Model {
            id: Uuid::new_v4(),
            created_at: at(1, 0, 0),
            updated_at: at(1, 0, 0),
            created_by: None,
            updated_by: None,
            ip_address: String::new(),
            start_date: date(start),
            end_date: date(end),
            is_processed: false,
            processed_at: None,
        }
    }

    fn shift(d: u32, hours: u32) -> attendance::Model {
        attendance::Model {
            id: Uuid::new_v4(),
            created_at: at(d, 9, 0),
            updated_at: at(d, 9, 0),
            created_by: None,
            updated_by: None,
            ip_address: String::new(),
            employee_id: Uuid::nil(),
            date: date(d),
            check_in: at(d, 8, 0),
            check_out: Some(at(d, 8 + hours, 0)),
            payroll_period_id: None,
        }
    }

    fn overtime(d: u32, hours: Decimal) -> overtime::Model {
        overtime::Model {
            id: Uuid::new_v4(),
            created_at: at(d, 18, 0),
            updated_at: at(d, 18, 0),
            created_by: None,
            updated_by: None,
            ip_address: String::new(),
            employee_id: Uuid::nil(),
            date: date(d),
            hours,
            payroll_period_id: None,
        }
    }

    fn reimbursement(d: u32, amount: Decimal) -> reimbursement::Model {
        reimbursement::Model {
            id: Uuid::new_v4(),
            created_at: at(d, 12, 0),
            updated_at: at(d, 12, 0),
            created_by: None,
            updated_by: None,
            ip_address: String::new(),
            employee_id: Uuid::nil(),
            date: date(d),
            amount,
            description: "Taxi".to_string(),
            payroll_period_id: None,
        }
    }

    #[test]
    fn test_full_period() {
        // 2025-09-01 is a Monday, 2025-09-12 a Friday
        let period = period(1, 12);
        let attendances = (1..=12)
            .filter(|d| !utils::is_weekend(date(*d)))
            .map(|d| shift(d, 8))
            .collect::<Vec<_>>();
        assert_eq!(attendances.len(), 10);

        let components = compute_components(
            &period,
            Decimal::from(5_000_000),
            &attendances,
            &[overtime(3, Decimal::from(2))],
            &[reimbursement(4, Decimal::from(150_000))],
        );

        assert_eq!(components.possible_working_hours, Decimal::from(80));
        assert_eq!(components.hourly_rate, Decimal::from(62_500));
        assert_eq!(components.total_worked_hours, Decimal::from(80));
        assert_eq!(components.prorated_salary, Decimal::from(5_000_000));
        assert_eq!(components.total_overtime_hours, Decimal::from(2));
        assert_eq!(components.overtime_pay, Decimal::from(250_000));
        assert_eq!(components.total_reimbursement, Decimal::from(150_000));
        assert_eq!(components.total_take_home_pay, Decimal::from(5_400_000));
    }

    #[test]
    fn test_credited_hours_clamp() {
        assert_eq!(credited_hours(&shift(1, 10)), Decimal::from(8));
        assert_eq!(credited_hours(&shift(1, 8)), Decimal::from(8));
        assert_eq!(credited_hours(&shift(1, 5)), Decimal::ZERO);

        let mut short_by_a_minute = shift(1, 8);
        short_by_a_minute.check_out = Some(at(1, 15, 59));
        assert_eq!(credited_hours(&short_by_a_minute), Decimal::ZERO);

        let mut no_checkout = shift(1, 8);
        no_checkout.check_out = None;
        assert_eq!(credited_hours(&no_checkout), Decimal::ZERO);
    }

    #[test]
    fn test_partial_attendance() {
        let period = period(1, 12);
        let attendances = vec![shift(1, 10), shift(2, 5), shift(3, 8)];

        let components = compute_components(&period, Decimal::from(5_000_000), &attendances, &[], &[]);

        assert_eq!(components.total_worked_hours, Decimal::from(16));
        assert_eq!(components.prorated_salary, Decimal::from(1_000_000));
        assert_eq!(components.total_take_home_pay, Decimal::from(1_000_000));
    }

    #[test]
    fn test_attendance_outside_period_is_ignored() {
        let period = period(2, 5);
        let attendances = vec![shift(1, 8), shift(2, 8), shift(8, 8)];

        let components = compute_components(&period, Decimal::from(3_200_000), &attendances, &[], &[]);

        assert_eq!(components.possible_working_hours, Decimal::from(32));
        assert_eq!(components.total_worked_hours, Decimal::from(8));
        assert_eq!(components.prorated_salary, Decimal::from(800_000));
    }

    #[test]
    fn test_no_submissions() {
        let components = compute_components(&period(1, 12), Decimal::from(5_000_000), &[], &[], &[]);

        assert_eq!(components.base_salary, Decimal::from(5_000_000));
        assert_eq!(components.prorated_salary, Decimal::ZERO);
        assert_eq!(components.overtime_pay, Decimal::ZERO);
        assert_eq!(components.total_reimbursement, Decimal::ZERO);
        assert_eq!(components.total_take_home_pay, Decimal::ZERO);
    }

    #[test]
    fn test_weekend_only_period_has_zero_rate() {
        // Saturday and Sunday
        let components = compute_components(&period(6, 7), Decimal::from(5_000_000), &[], &[overtime(6, Decimal::ONE)], &[]);

        assert_eq!(components.possible_working_hours, Decimal::ZERO);
        assert_eq!(components.hourly_rate, Decimal::ZERO);
        assert_eq!(components.overtime_pay, Decimal::ZERO);
    }

    #[test]
    fn test_money_is_rounded_once_per_component() {
        // 1,000,000 / 88h = 11,363.6363...
        let period = period(1, 11);
        let attendances = (1..=11)
            .filter(|d| !utils::is_weekend(date(*d)))
            .map(|d| shift(d, 8))
            .collect::<Vec<_>>();

        let components = compute_components(
            &period,
            Decimal::from(1_000_000),
            &attendances,
            &[overtime(2, Decimal::new(15, 1))],
            &[reimbursement(2, Decimal::new(1_005, 2))],
        );

        assert_eq!(components.possible_working_hours, Decimal::from(88));
        assert_eq!(components.prorated_salary, Decimal::from(1_000_000));
        assert_eq!(components.overtime_pay, Decimal::new(3_409_091, 2));
        assert_eq!(components.total_reimbursement, Decimal::new(1_005, 2));
        assert_eq!(components.total_take_home_pay, Decimal::new(103_410_096, 2));
    }
}
