use async_trait::async_trait;
use sea_orm::{ActiveModelTrait as _, ConnectionTrait, DbErr};

use crate::entity::audit_log;

#[async_trait]
pub trait AuditStore {
    async fn append_audit(&self, entry: audit_log::ActiveModel) -> Result<audit_log::Model, DbErr>;
}

#[async_trait]
impl<C> AuditStore for C
where
    C: ConnectionTrait,
{
    async fn append_audit(&self, entry: audit_log::ActiveModel) -> Result<audit_log::Model, DbErr> {
        entry.insert(self).await
    }
}
