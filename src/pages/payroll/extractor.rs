use std::str::FromStr as _;

use actix_web::{dev, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{entity::payroll_period, error::PayrollError, store::PeriodStore as _};

impl FromRequest for payroll_period::Model {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let Some(period_id) = req.match_info().get("period_id") else {
                return Err(actix_web::error::ErrorInternalServerError("route has no `period_id` segment"))
            };
            let Ok(period_id) = Uuid::from_str(period_id) else {
                return Err(PayrollError::Validation("invalid `period_id`".to_owned()).into())
            };

            let Some(db) = req.app_data::<web::Data<DatabaseConnection>>() else {
                return Err(actix_web::error::ErrorInternalServerError("database is not configured"))
            };

            let period = db.find_period(period_id).await
                .map_err(PayrollError::from)?
                .ok_or(PayrollError::PeriodNotFound)?;

            Ok(period)
        })
    }
}
