use async_trait::async_trait;
use sea_orm::{ColumnTrait as _, ConnectionTrait, DbErr, EntityTrait as _, QueryFilter as _, QueryOrder as _};
use uuid::Uuid;

use crate::entity::{employee_profile, prelude::*};

#[async_trait]
pub trait ProfileStore {
    async fn find_profile(&self, employee_id: Uuid) -> Result<Option<employee_profile::Model>, DbErr>;

    /// Ordered by employee id.
    async fn list_profiles(&self) -> Result<Vec<employee_profile::Model>, DbErr>;
}

#[async_trait]
impl<C> ProfileStore for C
where
    C: ConnectionTrait,
{
    async fn find_profile(&self, employee_id: Uuid) -> Result<Option<employee_profile::Model>, DbErr> {
        EmployeeProfile::find()
            .filter(employee_profile::Column::EmployeeId.eq(employee_id))
            .one(self).await
    }

    async fn list_profiles(&self) -> Result<Vec<employee_profile::Model>, DbErr> {
        EmployeeProfile::find()
            .order_by_asc(employee_profile::Column::EmployeeId)
            .all(self).await
    }
}
