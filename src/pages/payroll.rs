use actix_web::{get, post, web, HttpResponse, Responder};

use crate::{
    auth::{Admin, Identity},
    entity::payroll_period,
    error::PayrollError,
    payroll::{PayrollRunCoordinator, PayslipService, PeriodService, RequestOrigin},
};

use model::*;

mod extractor;
mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(create_period)
        .service(list_periods)
        .service(get_period)
        .service(run_payroll)
        .service(get_payslip)
        .service(get_payslips);
}

#[post("")]
async fn create_period(
    periods: web::Data<PeriodService>,
    admin: Admin,
    origin: RequestOrigin,
    payload: web::Json<CreatePeriod>,
) -> Result<HttpResponse, PayrollError> {
    let period = periods
        .create_period(payload.start_date, payload.end_date, admin.id, &origin)
        .await?;

    Ok(HttpResponse::Created().json(period))
}

#[get("")]
async fn list_periods(periods: web::Data<PeriodService>, _identity: Identity) -> Result<impl Responder, PayrollError> {
    Ok(web::Json(periods.list_periods().await?))
}

#[get("/{period_id}")]
async fn get_period(_identity: Identity, period: payroll_period::Model) -> impl Responder {
    web::Json(period)
}

#[post("/{period_id}/run")]
async fn run_payroll(
    coordinator: web::Data<PayrollRunCoordinator>,
    admin: Admin,
    origin: RequestOrigin,
    period: payroll_period::Model,
) -> Result<impl Responder, PayrollError> {
    let run = coordinator.run_payroll(period.id, admin.id, &origin).await?;

    Ok(web::Json(run))
}

#[get("/{period_id}/payslip")]
async fn get_payslip(
    payslips: web::Data<PayslipService>,
    employee: Identity,
    period: payroll_period::Model,
) -> Result<impl Responder, PayrollError> {
    let detail = payslips.employee_payslip(employee.id, period.id).await?;

    Ok(web::Json(PayslipView::from(detail)))
}

#[get("/{period_id}/payslips")]
async fn get_payslips(
    payslips: web::Data<PayslipService>,
    _admin: Admin,
    period: payroll_period::Model,
) -> Result<impl Responder, PayrollError> {
    Ok(web::Json(payslips.summary(period.id).await?))
}
