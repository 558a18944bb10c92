use std::ops::Deref;

use actix_web::{body, dev, http::{self, header::ContentType, StatusCode}, web, FromRequest, HttpRequest, HttpResponse};
use chrono::{Duration, Local};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::entity::{sea_orm_active_enums::RoleType, user};

/// Stored password digest: SHA-256 of `"{password}:{username}"`.
pub fn hash_password(username: &str, password: &str) -> Vec<u8> {
    Sha256::digest(format!("{password}:{username}")).to_vec()
}

/// Who is calling, as carried inside the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub role: RoleType,
}

impl From<&user::Model> for Identity {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Signs and verifies identity tokens
pub struct Authority {
    jwt_key: (EncodingKey, DecodingKey),
}

impl Authority {
    pub fn new(jwt_key: &[u8]) -> Self {
        Self {
            jwt_key: (EncodingKey::from_secret(jwt_key), DecodingKey::from_secret(jwt_key))
        }
    }

    /// Issue a token for specified user with 1 week of expiration time
    pub fn issue_for(&self, user: &user::Model) -> Result<String, AuthError> {
        let claims = Claims {
            exp: (Local::now() + Duration::weeks(1)).timestamp(),
            data: Identity::from(user),
        };

        Ok(encode(&Header::default(), &claims, &self.jwt_key.0)?)
    }

    pub fn authorize(&self, token: impl AsRef<str>) -> Result<Identity, AuthError> {
        let payload = decode::<Claims<Identity>>(token.as_ref(), &self.jwt_key.1, &Validation::default())?;

        Ok(payload.claims.data)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims<T> {
    exp: i64,
    data: T,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authority error")]
    AuthorityError(#[from] jsonwebtoken::errors::Error),
}

impl actix_web::error::ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> http::StatusCode {
        match self {
            AuthError::AuthorityError(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // Value after the first space of `Authorization`, e.g. `JWT <token>`
            let Some(Ok(Some((_, token)))) = req.headers()
                .get("Authorization")
                .map(|v|
                    v.to_str()
                        .map(|str| str.split_once(' '))
                )
            else {
                return Err(actix_web::error::ErrorUnauthorized("unauthorized"))
            };

            let Some(authority) = req.app_data::<web::Data<Authority>>() else {
                return Err(actix_web::error::ErrorInternalServerError("authority is not configured"))
            };

            Ok(authority.authorize(token)?)
        })
    }
}

pub struct Admin(pub Identity);

impl Deref for Admin {
    type Target = Identity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Admin {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let identity = Identity::from_request(&req, &mut dev::Payload::None).await?;

            if identity.role != RoleType::Admin {
                return Err(actix_web::error::ErrorForbidden("forbidden"))
            }

            Ok(Self(identity))
        })
    }
}
