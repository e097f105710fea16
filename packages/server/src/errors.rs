//! Errors a request handler can return, and their HTTP mapping.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;
use us_languages_census::CensusError;
use us_languages_geography_models::GeographyError;
use us_languages_server_models::ApiErrorBody;

/// An error that happened while serving a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request selected no valid geography.
    #[error(transparent)]
    Geography(#[from] GeographyError),

    /// The Census API call or the table extraction failed.
    #[error(transparent)]
    Census(#[from] CensusError),

    /// The query string could not be decoded.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Geography(_) | Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::Census(e) if e.is_upstream() => StatusCode::BAD_GATEWAY,
            Self::Census(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiErrorBody {
            error: self.to_string(),
        })
    }
}
