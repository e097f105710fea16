//! HTTP handler functions for the language lookup API.

use actix_web::{HttpResponse, ResponseError as _, web};
use us_languages_server_models::{ApiHealth, ApiLanguage, LanguageQueryParams};

use crate::languages::most_spoken_languages;
use crate::{ApiError, AppState};

/// `GET /health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /languages/us`
///
/// Returns up to five non-English languages spoken in a state, county or
/// ZCTA, ordered by descending population.
pub async fn languages(
    state: web::Data<AppState>,
    params: web::Query<LanguageQueryParams>,
) -> Result<HttpResponse, ApiError> {
    let result = most_spoken_languages(
        &state.census,
        &state.api_key,
        &params.location_type,
        params.state_fips.as_deref(),
        params.county_fips.as_deref(),
        params.zcta_code.as_deref(),
    )
    .await;

    match result {
        Ok(records) => {
            let languages: Vec<ApiLanguage> = records.into_iter().map(ApiLanguage::from).collect();
            Ok(HttpResponse::Ok().json(languages))
        }
        Err(e) => {
            if e.status_code().is_client_error() {
                log::warn!("Rejected language lookup: {e}");
            } else {
                log::error!("Failed to look up languages: {e}");
            }
            Err(e)
        }
    }
}
