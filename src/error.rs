use actix_web::{body, http::{header::ContentType, StatusCode}, HttpResponse};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::audit::AuditError;

#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("attendance cannot be submitted on weekends")]
    WeekendSubmission,

    #[error("total overtime for {date} cannot exceed {cap} hours ({existing} already submitted, {requested} requested)")]
    DailyOvertimeCapExceeded {
        date: NaiveDate,
        existing: Decimal,
        requested: Decimal,
        cap: Decimal,
    },

    #[error("end date {end_date} must be after start date {start_date}")]
    InvalidPeriodRange {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    #[error("{0}")]
    Validation(String),

    #[error("payroll period not found")]
    PeriodNotFound,

    #[error("salary profile not found for employee {0}")]
    ProfileNotFound(Uuid),

    #[error("payslip not found for this employee and period")]
    PayslipNotFound,

    #[error("payroll period is already processed")]
    AlreadyProcessed,

    #[error("payroll period is not processed yet")]
    PeriodNotProcessed,

    #[error("payroll period was processed by a concurrent run")]
    ConcurrentRunConflict,

    #[error("a payroll period overlapping {start_date}..={end_date} already exists")]
    OverlappingPeriod {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    #[error("record is locked by payroll period {0}")]
    RecordLocked(Uuid),

    #[error("audit log write failed")]
    Audit(#[source] AuditError),

    #[error("database error")]
    Database(#[from] DbErr),
}

impl actix_web::error::ResponseError for PayrollError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PayrollError::WeekendSubmission
            | PayrollError::DailyOvertimeCapExceeded { .. }
            | PayrollError::InvalidPeriodRange { .. }
            | PayrollError::Validation(_) => StatusCode::BAD_REQUEST,

            PayrollError::PeriodNotFound
            | PayrollError::ProfileNotFound(_)
            | PayrollError::PayslipNotFound => StatusCode::NOT_FOUND,

            PayrollError::AlreadyProcessed
            | PayrollError::PeriodNotProcessed
            | PayrollError::ConcurrentRunConflict
            | PayrollError::OverlappingPeriod { .. }
            | PayrollError::RecordLocked(_) => StatusCode::CONFLICT,

            PayrollError::Audit(_)
            | PayrollError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
