use async_trait::async_trait;
use sea_orm::{ColumnTrait as _, ConnectionTrait, DbErr, EntityTrait as _, QueryFilter as _, QueryOrder as _, QuerySelect as _};
use uuid::Uuid;

use crate::entity::{prelude::*, sea_orm_active_enums::RoleType, user};

#[async_trait]
pub trait UserStore {
    async fn find_user_by_credentials(&self, username: &str, password_hash: &[u8]) -> Result<Option<user::Model>, DbErr>;

    /// Users holding the employee role, ordered by id.
    async fn list_employees(&self) -> Result<Vec<user::Model>, DbErr>;

    /// Serializes writes made on behalf of one user.
    async fn lock_user(&self, id: Uuid) -> Result<Option<user::Model>, DbErr>;
}

#[async_trait]
impl<C> UserStore for C
where
    C: ConnectionTrait,
{
    async fn find_user_by_credentials(&self, username: &str, password_hash: &[u8]) -> Result<Option<user::Model>, DbErr> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::Password.eq(password_hash))
            .one(self).await
    }

    async fn list_employees(&self) -> Result<Vec<user::Model>, DbErr> {
        User::find()
            .filter(user::Column::Role.eq(RoleType::Employee))
            .order_by_asc(user::Column::Id)
            .all(self).await
    }

    async fn lock_user(&self, id: Uuid) -> Result<Option<user::Model>, DbErr> {
        User::find_by_id(id)
            .lock_exclusive()
            .one(self).await
    }
}
