use sea_orm_migration::prelude::*;

pub(crate) fn default_table_statement() -> TableCreateStatement {
    TableCreateStatement::new()
        .if_not_exists()
        .col(ColumnDef::new(DefaultColumn::Id)
            .uuid()
            .primary_key()
            .default(Expr::cust("GEN_RANDOM_UUID()"))
            .take())
        .col(ColumnDef::new(DefaultColumn::CreatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .take())
        .col(ColumnDef::new(DefaultColumn::UpdatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .take())
        .take()
}

#[derive(DeriveIden)]
pub(crate) enum DefaultColumn {
    Id,
    CreatedAt,
    UpdatedAt,
}

/// Default columns plus the actor stamp (`created_by`, `updated_by`,
/// `ip_address`) every user-submitted record carries.
///
/// Must run `setup_user_table_fk` macro on the table afterwards
///
/// # Example
///
/// ```rs
/// manager
///     .create_table(default_user_table_statement()
///         .table(PayrollPeriod::Table)
///         .col(ColumnDef::new(PayrollPeriod::StartDate)
///             .date()
///             .not_null())
///         .take()
///     ).await?;
/// setup_user_table_fk!(manager, PayrollPeriod::Table);
/// ```
pub(crate) fn default_user_table_statement() -> TableCreateStatement {
    default_table_statement()
        .col(ColumnDef::new(DefaultUserColumn::CreatedBy)
            .uuid())
        .col(ColumnDef::new(DefaultUserColumn::UpdatedBy)
            .uuid())
        .col(ColumnDef::new(DefaultUserColumn::IpAddress)
            .text()
            .not_null()
            .default(""))
        .take()
}

#[macro_export]
macro_rules! setup_user_table_fk {
    ($m:expr,$t:expr) => {{
        use crate::util::*;
        use crate::m20250901_000001_payroll_schema::User;

        $m.create_foreign_key(ForeignKeyCreateStatement::new()
                .from($t, DefaultUserColumn::CreatedBy)
                .to(User::Table, DefaultColumn::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .on_update(ForeignKeyAction::Cascade)
                .take()
        ).await?;

        $m.create_foreign_key(ForeignKeyCreateStatement::new()
                .from($t, DefaultUserColumn::UpdatedBy)
                .to(User::Table, DefaultColumn::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .on_update(ForeignKeyAction::Cascade)
                .take()
        ).await?;
    }};
}

#[derive(DeriveIden)]
pub(crate) enum DefaultUserColumn {
    CreatedBy,
    UpdatedBy,
    IpAddress,
}

/// Money columns: `NUMERIC(16, 4)`
pub(crate) fn money<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .decimal_len(16, 4)
        .not_null()
        .take()
}
