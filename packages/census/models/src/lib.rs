#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! ACS survey table and language record types.
//!
//! These types describe the data read from the Census Bureau American
//! Community Survey (ACS) API for table `B16001` ("Language Spoken at Home
//! by Ability to Speak English for the Population 5 Years and Over") and
//! the ranked language rows derived from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use us_languages_geography_models::LocationType;

/// ACS table holding language-spoken-at-home estimates.
pub const LANGUAGE_TABLE: &str = "B16001";

/// Maps a variable code (e.g. `B16001_005E`) to its label
/// (e.g. `Estimate!!Total:!!Spanish:`).
pub type VariableLabels = BTreeMap<String, String>;

/// A decoded data API response.
///
/// Row 0 holds variable codes, row 1 holds the values for the requested
/// geography, position for position. Cells are `None` where the API
/// returns `null` (annotation columns usually do).
pub type RawTable = Vec<Vec<Option<String>>>;

/// The survey year and dataset a request reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurveyVintage {
    /// Survey year (e.g. `"2023"`).
    pub year: &'static str,
    /// Dataset path below the year (e.g. `"acs/acs1"`).
    pub dataset: &'static str,
}

impl SurveyVintage {
    /// ACS 1-year estimates, 2023. Used for states and counties.
    pub const ACS1_2023: Self = Self {
        year: "2023",
        dataset: "acs/acs1",
    };

    /// ACS 5-year estimates, 2015. Used for ZCTAs.
    pub const ACS5_2015: Self = Self {
        year: "2015",
        dataset: "acs/acs5",
    };

    /// Returns the vintage used for a given kind of geography.
    #[must_use]
    pub const fn for_location(location_type: LocationType) -> Self {
        match location_type {
            LocationType::Zcta => Self::ACS5_2015,
            LocationType::State | LocationType::County => Self::ACS1_2023,
        }
    }
}

impl std::fmt::Display for SurveyVintage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.year, self.dataset)
    }
}

/// Number of speakers of one language in a geography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageRecord {
    /// Language name (first word of the cleaned variable label).
    pub language: String,
    /// Estimated number of speakers aged 5 and over.
    pub population: u64,
    /// Share of the table's total population, rounded to 2 decimals.
    pub percentage: f64,
}
