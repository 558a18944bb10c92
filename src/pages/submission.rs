use actix_web::{post, web, HttpResponse};
use chrono::Local;

use crate::{
    auth::Identity,
    error::PayrollError,
    payroll::{RequestOrigin, SubmissionGuard, Submitted},
};

use model::*;

mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(submit_attendance)
        .service(submit_overtime)
        .service(submit_reimbursement);
}

#[post("/attendance")]
async fn submit_attendance(
    guard: web::Data<SubmissionGuard>,
    employee: Identity,
    origin: RequestOrigin,
    payload: web::Json<SubmitAttendance>,
) -> Result<HttpResponse, PayrollError> {
    let submitted = guard
        .submit_attendance(employee.id, payload.check_in, payload.check_out, &origin)
        .await?;

    Ok(match submitted {
        Submitted::Created(record) => HttpResponse::Created().json(record),
        Submitted::Updated(record) => HttpResponse::Ok().json(record),
    })
}

#[post("/overtime")]
async fn submit_overtime(
    guard: web::Data<SubmissionGuard>,
    employee: Identity,
    origin: RequestOrigin,
    payload: web::Json<SubmitOvertime>,
) -> Result<HttpResponse, PayrollError> {
    let record = guard
        .submit_overtime(employee.id, payload.date, payload.hours, &origin)
        .await?;

    Ok(HttpResponse::Created().json(record))
}

#[post("/reimbursement")]
async fn submit_reimbursement(
    guard: web::Data<SubmissionGuard>,
    employee: Identity,
    origin: RequestOrigin,
    payload: web::Json<SubmitReimbursement>,
) -> Result<HttpResponse, PayrollError> {
    let SubmitReimbursement { amount, description, date } = payload.into_inner();
    let date = date.unwrap_or_else(|| Local::now().date_naive());

    let record = guard
        .submit_reimbursement(employee.id, date, amount, description, &origin)
        .await?;

    Ok(HttpResponse::Created().json(record))
}
