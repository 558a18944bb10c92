use rust_decimal::Decimal;

/// A full shift. Anything shorter earns no hours for the day.
pub const WORKING_HOURS_PER_DAY: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Cumulative overtime an employee may submit for a single calendar date.
pub const MAX_OVERTIME_HOURS_PER_DAY: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

pub const OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// Decimal places kept on every monetary payslip field.
pub const MONEY_SCALE: u32 = 2;

pub const SECONDS_PER_HOUR: i64 = 3600;
