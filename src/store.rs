//! Persistence capabilities, one trait per entity.
//!
//! Every trait is implemented for any sea-orm [`ConnectionTrait`](sea_orm::ConnectionTrait),
//! so services run the same queries on a pooled connection, inside a
//! [`DatabaseTransaction`](sea_orm::DatabaseTransaction), or against a mock.

mod attendance;
mod audit;
mod overtime;
mod payslip;
mod period;
mod profile;
mod reimbursement;
mod user;

pub use attendance::AttendanceStore;
pub use audit::AuditStore;
pub use overtime::OvertimeStore;
pub use payslip::PayslipStore;
pub use period::PeriodStore;
pub use profile::ProfileStore;
pub use reimbursement::ReimbursementStore;
pub use user::UserStore;
