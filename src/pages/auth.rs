use actix_web::{get, post, web, HttpResponse, Responder};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    auth::{hash_password, Authority, Identity},
    error::PayrollError,
    store::UserStore as _,
};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(login)
        .service(whoami);
}

#[derive(Debug, Serialize, Deserialize)]
struct Login {
    username: String,
    password: String,
}

#[post("/login")]
async fn login(db: web::Data<DatabaseConnection>, authority: web::Data<Authority>, credentials: web::Json<Login>) -> actix_web::Result<HttpResponse> {
    let hashed_password = hash_password(&credentials.username, &credentials.password);

    let Some(user) = db.find_user_by_credentials(&credentials.username, &hashed_password).await
        .map_err(PayrollError::from)?
    else {
        warn!(username = %credentials.username, "rejected login");
        return Err(actix_web::error::ErrorForbidden("invalid credentials"));
    };

    info!(user_id = %user.id, "issued token");

    Ok(HttpResponse::Ok().body(authority.issue_for(&user)?))
}

#[get("")]
async fn whoami(identity: Identity) -> impl Responder {
    web::Json(identity)
}
