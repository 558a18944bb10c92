use sea_orm_migration::prelude::*;
use sha2::Digest as _;

use crate::m20250901_000001_payroll_schema::{EmployeeProfile, User};

const ADMIN_ID: u128 = 12345;

fn seeded_id(i: u128) -> SimpleExpr {
    Expr::val(format!("{i:032x}")).cast_as("uuid")
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let time = Expr::val("2025-09-01T00:00:00.000Z").cast_as("timestamptz");

        let hashed_password = &sha2::Sha256::digest("admin:admin")[..];

        manager
            .exec_stmt(Query::insert()
                .into_table(User::Table)
                .columns(["id", "created_at", "updated_at", "username", "password", "role"])
                .values_panic([seeded_id(ADMIN_ID), time.clone(), time.clone(), "admin".into(), hashed_password.into(), Expr::val("admin").cast_as("role_type")])
                .to_owned()
        ).await?;

        // 100 employees, each logging in with their username as password
        for i in 1..=100u128 {
            let username = i.to_string();
            let salary: i64 = rand::random_range(5_000_000..=20_000_000);

            let hashed_password = &sha2::Sha256::digest(format!("{username}:{username}"))[..];

            manager
                .exec_stmt(Query::insert()
                    .into_table(User::Table)
                    .columns(["id", "created_at", "updated_at", "username", "password", "role"])
                    .values_panic([seeded_id(i), time.clone(), time.clone(), username.into(), hashed_password.into(), Expr::val("employee").cast_as("role_type")])
                    .to_owned()
            ).await?;

            manager
                .exec_stmt(Query::insert()
                    .into_table(EmployeeProfile::Table)
                    .columns(["created_at", "updated_at", "created_by", "updated_by", "employee_id", "base_salary"])
                    .values_panic([time.clone(), time.clone(), seeded_id(ADMIN_ID), seeded_id(ADMIN_ID), seeded_id(i), Expr::val(salary).cast_as("numeric")])
                    .to_owned()
            ).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete()
                .from_table(EmployeeProfile::Table)
                .to_owned()
        ).await?;

        for i in (1..=100u128).chain([ADMIN_ID]) {
            manager
                .exec_stmt(Query::delete()
                    .from_table(User::Table)
                    .and_where(Expr::col("id").eq(seeded_id(i)))
                    .to_owned()
            ).await?;
        }

        Ok(())
    }
}
