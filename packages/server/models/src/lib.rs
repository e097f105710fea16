#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the language lookup server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the census record types to allow independent evolution of the API
//! contract.

use serde::{Deserialize, Serialize};
use us_languages_census_models::LanguageRecord;

/// Query parameters for `GET /languages/us`.
///
/// `location_type` is kept as a string so that unsupported values are
/// reported with the same error body as missing codes.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageQueryParams {
    /// One of `state`, `county`, `zcta`.
    pub location_type: String,
    /// Two-digit state FIPS code (state and county lookups).
    pub state_fips: Option<String>,
    /// Three-digit county FIPS code (county lookups).
    pub county_fips: Option<String>,
    /// Five-digit ZCTA code (zcta lookups).
    pub zcta_code: Option<String>,
}

/// A language as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiLanguage {
    /// Language name.
    pub language: String,
    /// Estimated number of speakers aged 5 and over.
    pub population: u64,
    /// Share of the geography's population aged 5 and over, in percent.
    pub percentage: f64,
}

impl From<LanguageRecord> for ApiLanguage {
    fn from(record: LanguageRecord) -> Self {
        Self {
            language: record.language,
            population: record.population,
            percentage: record.percentage,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable error message.
    pub error: String,
}
