//! Append-only change log.
//!
//! Every create/update of attendance, overtime, reimbursement, payslip and
//! payroll period leaves one entry. Entries are written inside a savepoint of
//! the caller's transaction, so a failed write can be discarded without
//! aborting the surrounding work when the policy says to ignore it.

use std::{fmt, str::FromStr};

use chrono::Local;
use sea_orm::{ActiveValue::Set, DbErr, TransactionTrait};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::{entity::audit_log, error::PayrollError, payroll::RequestOrigin, store::AuditStore as _};

/// What to do when an audit entry cannot be written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuditFailurePolicy {
    /// Log and carry on with the primary operation.
    #[default]
    Ignore,
    /// Fail (and roll back) the primary operation.
    FailOperation,
}

impl FromStr for AuditFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "fail-operation" | "fail_operation" => Ok(Self::FailOperation),
            other => Err(format!("unknown audit failure policy `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Create,
    Update,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditedEntity {
    Attendance,
    Overtime,
    Reimbursement,
    Payslip,
    PayrollPeriod,
}

impl fmt::Display for AuditedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuditedEntity::Attendance => "Attendance",
            AuditedEntity::Overtime => "Overtime",
            AuditedEntity::Reimbursement => "Reimbursement",
            AuditedEntity::Payslip => "Payslip",
            AuditedEntity::PayrollPeriod => "PayrollPeriod",
        })
    }
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("unable to snapshot audited value")]
    Snapshot(#[from] serde_json::Error),

    #[error("unable to persist audit entry")]
    Database(#[from] DbErr),
}

/// A single change to record. `old` is `None` for creations.
pub struct AuditEntry<'a, T> {
    pub actor_id: Option<Uuid>,
    pub action: AuditAction,
    pub entity: AuditedEntity,
    pub entity_id: Uuid,
    pub old: Option<&'a T>,
    pub new: &'a T,
}

impl<'a, T> AuditEntry<'a, T> {
    pub fn created(actor_id: Uuid, entity: AuditedEntity, entity_id: Uuid, new: &'a T) -> Self {
        Self {
            actor_id: Some(actor_id),
            action: AuditAction::Create,
            entity,
            entity_id,
            old: None,
            new,
        }
    }

    pub fn updated(actor_id: Uuid, entity: AuditedEntity, entity_id: Uuid, old: &'a T, new: &'a T) -> Self {
        Self {
            actor_id: Some(actor_id),
            action: AuditAction::Update,
            entity,
            entity_id,
            old: Some(old),
            new,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AuditLog {
    policy: AuditFailurePolicy,
}

impl AuditLog {
    pub fn new(policy: AuditFailurePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> AuditFailurePolicy {
        self.policy
    }

    pub async fn record<C, T>(&self, conn: &C, origin: &RequestOrigin, entry: AuditEntry<'_, T>) -> Result<(), PayrollError>
    where
        C: TransactionTrait,
        T: Serialize,
    {
        let action = entry.action;
        let entity = entry.entity;
        let entity_id = entry.entity_id;

        match write(conn, origin, entry).await {
            Ok(()) => Ok(()),
            Err(err) => match self.policy {
                AuditFailurePolicy::Ignore => {
                    warn!(error = %err, action = action.as_str(), %entity, %entity_id, "dropping audit entry");
                    Ok(())
                },
                AuditFailurePolicy::FailOperation => Err(PayrollError::Audit(err)),
            },
        }
    }
}

async fn write<C, T>(conn: &C, origin: &RequestOrigin, entry: AuditEntry<'_, T>) -> Result<(), AuditError>
where
    C: TransactionTrait,
    T: Serialize,
{
    let old_value = entry.old.map(serde_json::to_value).transpose()?;
    let new_value = serde_json::to_value(entry.new)?;

    let model = audit_log::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(Local::now().fixed_offset()),
        actor_id: Set(entry.actor_id),
        action: Set(entry.action.as_str().to_owned()),
        entity_name: Set(entry.entity.to_string()),
        entity_id: Set(Some(entry.entity_id)),
        old_value: Set(old_value),
        new_value: Set(Some(new_value)),
        request_id: Set(origin.request_id.clone()),
        ip_address: Set(origin.ip_address.clone()),
    };

    let savepoint = conn.begin().await?;
    match savepoint.append_audit(model).await {
        Ok(_) => savepoint.commit().await?,
        Err(err) => {
            savepoint.rollback().await?;
            return Err(err.into())
        },
    }

    Ok(())
}
