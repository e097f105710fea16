#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Census Bureau ACS API client and language table extraction.
//!
//! [`client::CensusClient`] reads the two responses a language lookup
//! needs (variable labels and the table values for one geography), and
//! [`extract::extract`] joins them into [`LanguageRecord`] rows.
//!
//! See <https://www.census.gov/data/developers/data-sets/acs-1year.html>
//!
//! [`LanguageRecord`]: us_languages_census_models::LanguageRecord

pub mod client;
pub mod extract;

use thiserror::Error;

/// Errors from Census API requests and table extraction.
#[derive(Debug, Error)]
pub enum CensusError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Census API returned HTTP {status} for {url}")]
    UpstreamStatus {
        /// Response status.
        status: reqwest::StatusCode,
        /// Request URL without its query string.
        url: String,
    },

    /// The response body could not be decoded.
    #[error("Malformed Census API response: {message}")]
    MalformedResponse {
        /// Description of the decoding failure.
        message: String,
    },

    /// The table response lacks a header row and a value row.
    #[error("Table response contains {rows} row(s), expected a header and a value row")]
    InsufficientRows {
        /// Number of rows received.
        rows: usize,
    },

    /// The table's total population column is zero.
    #[error("Total population for the geography is zero")]
    ZeroTotalPopulation,

    /// A population value could not be parsed as an integer.
    #[error("Value {value:?} of {code} is not an integer")]
    NotAnInteger {
        /// Variable code of the column.
        code: String,
        /// The raw cell value (`null` when absent).
        value: String,
    },
}

impl CensusError {
    /// Returns `true` if the error was caused by the remote API rather than
    /// by the content of a well-formed response.
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::UpstreamStatus { .. } | Self::MalformedResponse { .. }
        )
    }
}
