use actix_web::{dev, web, FromRequest, HttpMessage as _, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing_actix_web::RequestId;
use uuid::Uuid;

use crate::payroll::RequestOrigin;

mod auth;
mod payroll;
mod submission;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(web::scope("/auth")
            .configure(auth::config))
        .service(web::scope("/payroll_period")
            .configure(payroll::config))
        .configure(submission::config);
}

impl FromRequest for RequestOrigin {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let ip_address = req.connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_owned();

        // Client supplied id wins, then the one TracingLogger assigned
        let request_id = req.headers()
            .get("X-Request-ID")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
            .or_else(|| req.extensions().get::<RequestId>().map(ToString::to_string))
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        ready(Ok(Self { ip_address, request_id }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{get, test, App, Responder};
    use tracing_actix_web::TracingLogger;

    use super::*;

    #[get("/")]
    async fn echo_origin(origin: RequestOrigin) -> impl Responder {
        web::Json(origin)
    }

    #[actix_web::test]
    async fn test_origin_from_header() {
        let app = test::init_service(App::new().service(echo_origin)).await;

        let req = test::TestRequest::default()
            .peer_addr("10.1.2.3:4567".parse().unwrap())
            .insert_header(("X-Request-ID", "abc-123"))
            .to_request();

        let origin: RequestOrigin = test::call_and_read_body_json(&app, req).await;
        assert_eq!(origin.request_id, "abc-123");
        assert!(origin.ip_address.starts_with("10.1.2.3"));
    }

    #[actix_web::test]
    async fn test_origin_falls_back_to_tracing_request_id() {
        let app = test::init_service(
            App::new()
                .wrap(TracingLogger::default())
                .service(echo_origin)
        ).await;

        let req = test::TestRequest::default().to_request();

        let origin: RequestOrigin = test::call_and_read_body_json(&app, req).await;
        assert!(Uuid::parse_str(&origin.request_id).is_ok());
    }
}
