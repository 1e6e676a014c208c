//! Maps domain errors onto HTTP status codes and JSON error bodies.

use std::fmt;

use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::web::{JsonConfig, PathConfig, QueryConfig};
use actix_web::{HttpRequest, HttpResponse};
use crime_portal_identity::IdentityError;
use crime_portal_missing::ItemError;
use crime_portal_report_models::FieldErrors;
use crime_portal_server_models::ApiError;
use crime_portal_store::ReportError;
use thiserror::Error;

/// Any failure a handler can surface.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Report store, query, or transition error.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Session or account error.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Missing items board error.
    #[error(transparent)]
    Item(#[from] ItemError),

    /// Query string or body values that could not be parsed.
    #[error("Invalid request: {0}")]
    InvalidRequest(FieldErrors),
}

impl ServerError {
    /// The HTTP status this error is reported with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Report(ReportError::NotFound { .. })
            | Self::Identity(IdentityError::NotFound { .. })
            | Self::Item(ItemError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Report(ReportError::NotAuthorized { .. })
            | Self::Identity(
                IdentityError::NotAuthorized { .. } | IdentityError::AccountInactive { .. },
            )
            | Self::Item(ItemError::NotAuthorized { .. }) => StatusCode::FORBIDDEN,
            Self::Report(ReportError::Validation(_))
            | Self::Identity(IdentityError::Validation(_))
            | Self::Item(ItemError::Validation(_))
            | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Identity(IdentityError::InvalidCredentials | IdentityError::Unauthenticated) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Identity(IdentityError::EmailTaken { .. }) => StatusCode::CONFLICT,
            Self::Report(ReportError::Fixture { .. })
            | Self::Identity(IdentityError::Fixture { .. } | IdentityError::PasswordHash { .. })
            | Self::Item(ItemError::Fixture { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn fields(&self) -> Option<&FieldErrors> {
        match self {
            Self::Report(ReportError::Validation(fields))
            | Self::Identity(IdentityError::Validation(fields))
            | Self::Item(ItemError::Validation(fields))
            | Self::InvalidRequest(fields) => Some(fields),
            _ => None,
        }
    }

    /// Builds the JSON error response, logging server-side failures.
    #[must_use]
    pub fn to_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {self}");
        } else {
            log::debug!("Request rejected with {status}: {self}");
        }

        let fields = self.fields().cloned();
        let error = if fields.is_some() {
            "Validation failed".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(ApiError { error, fields })
    }
}

/// Answers a request whose `field` could not be extracted with the JSON
/// error body handlers use, instead of actix's plain-text rejection.
pub fn malformed<E>(err: E, field: &str) -> actix_web::Error
where
    E: fmt::Debug + fmt::Display + 'static,
{
    let mut fields = FieldErrors::new();
    fields.insert(field, err.to_string());
    let response = ServerError::InvalidRequest(fields).to_response();
    InternalError::from_response(err, response).into()
}

/// `Json` extractor config reporting unparsable bodies under `body`.
#[must_use]
pub fn json_config() -> JsonConfig {
    JsonConfig::default().error_handler(|err, _req: &HttpRequest| malformed(err, "body"))
}

/// `Path` extractor config reporting a non-numeric ID under `id`.
#[must_use]
pub fn path_config() -> PathConfig {
    PathConfig::default().error_handler(|err, _req: &HttpRequest| malformed(err, "id"))
}

/// `Query` extractor config reporting an unparsable query under `query`.
#[must_use]
pub fn query_config() -> QueryConfig {
    QueryConfig::default().error_handler(|err, _req: &HttpRequest| malformed(err, "query"))
}

/// Serializes `result` as a 200 response, or its error as described by
/// [`ServerError::to_response`].
pub fn respond<T: serde::Serialize>(result: Result<T, ServerError>) -> HttpResponse {
    respond_with(StatusCode::OK, result)
}

/// Like [`respond`], with `status` for the success case.
pub fn respond_with<T: serde::Serialize>(
    status: StatusCode,
    result: Result<T, ServerError>,
) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::build(status).json(body),
        Err(e) => e.to_response(),
    }
}

#[cfg(test)]
mod tests {
    use crime_portal_user_models::Role;

    use super::*;

    #[test]
    fn maps_each_kind_to_its_status() {
        let cases = [
            (ServerError::from(ReportError::NotFound { id: 1 }), 404),
            (
                ServerError::from(ReportError::NotAuthorized {
                    user_id: 1,
                    role: Role::Citizen,
                    action: "change report status",
                }),
                403,
            ),
            (ServerError::from(ReportError::Validation(FieldErrors::new())), 400),
            (ServerError::from(IdentityError::Unauthenticated), 401),
            (ServerError::from(IdentityError::InvalidCredentials), 401),
            (
                ServerError::from(IdentityError::EmailTaken {
                    email: "a@b.c".to_string(),
                }),
                409,
            ),
            (ServerError::from(ItemError::NotFound { id: 2 }), 404),
            (ServerError::InvalidRequest(FieldErrors::new()), 400),
            (
                ServerError::from(IdentityError::PasswordHash {
                    message: "out of memory".to_string(),
                }),
                500,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.status_code().as_u16(), expected, "{error}");
        }
    }

    #[test]
    fn validation_carries_fields() {
        let mut fields = FieldErrors::new();
        fields.insert("title", "Title is required");
        let error = ServerError::from(ReportError::Validation(fields));
        assert_eq!(
            error.fields().and_then(|f| f.get("title")),
            Some("Title is required")
        );
        assert!(ServerError::from(IdentityError::Unauthenticated).fields().is_none());
    }
}
