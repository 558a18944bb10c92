use sea_orm_migration::{prelude::{extension::postgres::TypeDropStatement, *}, sea_orm::{ActiveEnum, DbBackend, DeriveActiveEnum, EnumIter, Schema}};

use crate::{setup_user_table_fk, util::{default_table_statement, default_user_table_statement, money, DefaultColumn}};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(DbBackend::Postgres);

        manager
            .create_type(
                schema.create_enum_from_active_enum::<RoleType>()
            ).await?;

        manager
            .create_table(default_table_statement()
                .table(User::Table)
                .col(ColumnDef::new(User::Username)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(User::Password)
                    .binary()
                    .not_null()) // SHA-256 of `{password}:{username}`
                .col(ColumnDef::new(User::Role)
                    .custom(RoleType::name())
                    .not_null())
                .take()
            ).await?;

        manager
            .create_table(default_user_table_statement()
                .table(EmployeeProfile::Table)
                .col(ColumnDef::new(EmployeeProfile::EmployeeId)
                    .uuid()
                    .unique_key()
                    .not_null())
                .col(money(EmployeeProfile::BaseSalary))
                .take()
            ).await?;
        setup_user_table_fk!(manager, EmployeeProfile::Table);
        manager.create_foreign_key(employee_fk(EmployeeProfile::Table)).await?;

        manager
            .create_table(default_user_table_statement()
                .table(PayrollPeriod::Table)
                .col(ColumnDef::new(PayrollPeriod::StartDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(PayrollPeriod::EndDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(PayrollPeriod::IsProcessed)
                    .boolean()
                    .not_null()
                    .default(false))
                .col(ColumnDef::new(PayrollPeriod::ProcessedAt)
                    .timestamp_with_time_zone())
                .check(Expr::col(PayrollPeriod::StartDate).lt(Expr::col(PayrollPeriod::EndDate)))
                .take()
            ).await?;
        setup_user_table_fk!(manager, PayrollPeriod::Table);

        manager
            .create_table(default_user_table_statement()
                .table(Attendance::Table)
                .col(ColumnDef::new(Submission::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Submission::Date)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Attendance::CheckIn)
                    .timestamp_with_time_zone()
                    .not_null())
                .col(ColumnDef::new(Attendance::CheckOut)
                    .timestamp_with_time_zone())
                .col(ColumnDef::new(Submission::PayrollPeriodId)
                    .uuid())
                .take()
            ).await?;
        setup_user_table_fk!(manager, Attendance::Table);
        manager.create_foreign_key(employee_fk(Attendance::Table)).await?;
        manager.create_foreign_key(period_fk(Attendance::Table)).await?;

        // One attendance per employee per day
        manager
            .create_index(Index::create()
                .name("attendance_employee_id_date_key")
                .table(Attendance::Table)
                .col(Submission::EmployeeId)
                .col(Submission::Date)
                .unique()
                .take()
            ).await?;

        manager
            .create_table(default_user_table_statement()
                .table(Overtime::Table)
                .col(ColumnDef::new(Submission::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Submission::Date)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Overtime::Hours)
                    .decimal_len(5, 2)
                    .not_null())
                .col(ColumnDef::new(Submission::PayrollPeriodId)
                    .uuid())
                .check(Expr::col(Overtime::Hours).gt(0))
                .take()
            ).await?;
        setup_user_table_fk!(manager, Overtime::Table);
        manager.create_foreign_key(employee_fk(Overtime::Table)).await?;
        manager.create_foreign_key(period_fk(Overtime::Table)).await?;

        manager
            .create_index(Index::create()
                .name("overtime_employee_id_date_idx")
                .table(Overtime::Table)
                .col(Submission::EmployeeId)
                .col(Submission::Date)
                .take()
            ).await?;

        manager
            .create_table(default_user_table_statement()
                .table(Reimbursement::Table)
                .col(ColumnDef::new(Submission::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Submission::Date)
                    .date()
                    .not_null())
                .col(money(Reimbursement::Amount))
                .col(ColumnDef::new(Reimbursement::Description)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Submission::PayrollPeriodId)
                    .uuid())
                .take()
            ).await?;
        setup_user_table_fk!(manager, Reimbursement::Table);
        manager.create_foreign_key(employee_fk(Reimbursement::Table)).await?;
        manager.create_foreign_key(period_fk(Reimbursement::Table)).await?;

        manager
            .create_table(default_user_table_statement()
                .table(Payslip::Table)
                .col(ColumnDef::new(Submission::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Submission::PayrollPeriodId)
                    .uuid()
                    .not_null())
                .col(money(Payslip::BaseSalary))
                .col(money(Payslip::ProratedSalary))
                .col(money(Payslip::OvertimePay))
                .col(money(Payslip::TotalReimbursement))
                .col(money(Payslip::TotalTakeHomePay))
                .take()
            ).await?;
        setup_user_table_fk!(manager, Payslip::Table);
        manager.create_foreign_key(employee_fk(Payslip::Table)).await?;
        manager.create_foreign_key(period_fk(Payslip::Table)).await?;

        // A period is priced once per employee
        manager
            .create_index(Index::create()
                .name("payslip_employee_id_payroll_period_id_key")
                .table(Payslip::Table)
                .col(Submission::EmployeeId)
                .col(Submission::PayrollPeriodId)
                .unique()
                .take()
            ).await?;

        manager
            .create_table(TableCreateStatement::new()
                .if_not_exists()
                .table(AuditLog::Table)
                .col(ColumnDef::new(DefaultColumn::Id)
                    .uuid()
                    .primary_key()
                    .default(Expr::cust("GEN_RANDOM_UUID()")))
                .col(ColumnDef::new(DefaultColumn::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null())
                .col(ColumnDef::new(AuditLog::ActorId)
                    .uuid())
                .col(ColumnDef::new(AuditLog::Action)
                    .text()
                    .not_null())
                .col(ColumnDef::new(AuditLog::EntityName)
                    .text()
                    .not_null())
                .col(ColumnDef::new(AuditLog::EntityId)
                    .uuid())
                .col(ColumnDef::new(AuditLog::OldValue)
                    .json_binary())
                .col(ColumnDef::new(AuditLog::NewValue)
                    .json_binary())
                .col(ColumnDef::new(AuditLog::RequestId)
                    .text()
                    .not_null())
                .col(ColumnDef::new(AuditLog::IpAddress)
                    .text()
                    .not_null())
                .take()
            ).await?;

        manager
            .create_index(Index::create()
                .name("audit_log_entity_idx")
                .table(AuditLog::Table)
                .col(AuditLog::EntityName)
                .col(AuditLog::EntityId)
                .take()
            ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                TableDropStatement::new()
                    .table(AuditLog::Table)
                    .table(Payslip::Table)
                    .table(Reimbursement::Table)
                    .table(Overtime::Table)
                    .table(Attendance::Table)
                    .table(PayrollPeriod::Table)
                    .table(EmployeeProfile::Table)
                    .table(User::Table)
                    .take()
            ).await?;

        manager
            .drop_type(
                TypeDropStatement::new()
                    .name(RoleType::name())
                    .to_owned()
            ).await?;

        Ok(())
    }
}

fn employee_fk<T: IntoIden + 'static>(table: T) -> ForeignKeyCreateStatement {
    ForeignKeyCreateStatement::new()
        .from(table, Submission::EmployeeId)
        .to(User::Table, DefaultColumn::Id)
        .on_delete(ForeignKeyAction::Restrict)
        .on_update(ForeignKeyAction::Cascade)
        .take()
}

fn period_fk<T: IntoIden + 'static>(table: T) -> ForeignKeyCreateStatement {
    ForeignKeyCreateStatement::new()
        .from(table, Submission::PayrollPeriodId)
        .to(PayrollPeriod::Table, DefaultColumn::Id)
        .on_delete(ForeignKeyAction::Restrict)
        .on_update(ForeignKeyAction::Cascade)
        .take()
}

#[derive(Iden)]
pub(crate) enum User {
    Table,
    Username,
    Password,
    Role,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role_type")]
enum RoleType {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "employee")]
    Employee,
}

#[derive(Iden)]
pub(crate) enum EmployeeProfile {
    Table,
    EmployeeId,
    BaseSalary,
}

#[derive(Iden)]
enum PayrollPeriod {
    Table,
    StartDate,
    EndDate,
    IsProcessed,
    ProcessedAt,
}

/// Columns shared by the per-employee tables
#[derive(Iden)]
enum Submission {
    EmployeeId,
    Date,
    PayrollPeriodId,
}

#[derive(Iden)]
enum Attendance {
    Table,
    CheckIn,
    CheckOut,
}

#[derive(Iden)]
enum Overtime {
    Table,
    Hours,
}

#[derive(Iden)]
enum Reimbursement {
    Table,
    Amount,
    Description,
}

#[derive(Iden)]
enum Payslip {
    Table,
    BaseSalary,
    ProratedSalary,
    OvertimePay,
    TotalReimbursement,
    TotalTakeHomePay,
}

#[derive(Iden)]
enum AuditLog {
    Table,
    ActorId,
    Action,
    EntityName,
    EntityId,
    OldValue,
    NewValue,
    RequestId,
    IpAddress,
}
