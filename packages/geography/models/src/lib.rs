#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Census geographic identifier types.
//!
//! The Census Bureau data API accepts a `ucgid` ("uniform census geography
//! identifier") query parameter that selects a single geography. A UCGID is
//! a 3-digit summary level, the literal `0000US`, and the concatenated FIPS
//! (or ZCTA) codes of the area:
//!
//! | Geography | Summary level | Example            |
//! |-----------|---------------|--------------------|
//! | State     | `040`         | `0400000US17`      |
//! | County    | `050`         | `0500000US17031`   |
//! | ZCTA      | `860`         | `8600000US60601`   |

use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Summary level for a whole state.
pub const SUMMARY_LEVEL_STATE: &str = "040";

/// Summary level for a county within a state.
pub const SUMMARY_LEVEL_COUNTY: &str = "050";

/// Summary level for a ZIP Code Tabulation Area.
pub const SUMMARY_LEVEL_ZCTA: &str = "860";

/// Separator between the summary level and the area codes.
pub const UCGID_SEPARATOR: &str = "0000US";

/// Errors raised while building a [`Ucgid`] from request input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeographyError {
    /// A state or county lookup was requested without a state FIPS code.
    #[error("state_fips is required for {location_type} lookups")]
    MissingStateFips {
        /// The location type that needed the code.
        location_type: LocationType,
    },

    /// A county lookup was requested without a county FIPS code.
    #[error("county_fips is required for county lookups")]
    MissingCountyFips,

    /// A ZCTA lookup was requested without a ZCTA code.
    #[error("zcta_code is required for zcta lookups")]
    MissingZctaCode,

    /// The `location_type` is not one of `state`, `county` or `zcta`.
    #[error("unsupported location_type {0:?}: expected one of state, county, zcta")]
    UnsupportedLocationType(String),
}

/// The kind of geography a request selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum LocationType {
    /// A whole state.
    State,
    /// A county within a state.
    County,
    /// A ZIP Code Tabulation Area.
    Zcta,
}

impl LocationType {
    /// Parses the `location_type` query value.
    ///
    /// # Errors
    ///
    /// Returns [`GeographyError::UnsupportedLocationType`] for anything but
    /// `state`, `county` or `zcta`.
    pub fn parse(value: &str) -> Result<Self, GeographyError> {
        value
            .parse()
            .map_err(|_| GeographyError::UnsupportedLocationType(value.to_string()))
    }
}

/// A single census geography, encodable as a UCGID string via [`Display`].
///
/// Only the `from_*` constructors build one, so every code it holds is
/// trimmed and non-empty.
///
/// [`Display`]: std::fmt::Display
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ucgid {
    /// A whole state.
    State {
        /// Two-digit state FIPS code.
        state_fips: String,
    },
    /// A county within a state.
    County {
        /// Two-digit state FIPS code.
        state_fips: String,
        /// Three-digit county FIPS code.
        county_fips: String,
    },
    /// A ZIP Code Tabulation Area.
    Zcta {
        /// Five-digit ZCTA code.
        zcta_code: String,
    },
}

impl Ucgid {
    /// Builds a state identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GeographyError::MissingStateFips`] if `state_fips` is empty.
    pub fn from_state(state_fips: &str) -> Result<Self, GeographyError> {
        let state_fips = required(state_fips).ok_or(GeographyError::MissingStateFips {
            location_type: LocationType::State,
        })?;

        Ok(Self::State { state_fips })
    }

    /// Builds a county identifier.
    ///
    /// The state code is checked first: a county without a state is
    /// rejected regardless of `county_fips`.
    ///
    /// # Errors
    ///
    /// Returns [`GeographyError::MissingStateFips`] if `state_fips` is empty
    /// and [`GeographyError::MissingCountyFips`] if `county_fips` is empty.
    pub fn from_county(state_fips: &str, county_fips: &str) -> Result<Self, GeographyError> {
        let state_fips = required(state_fips).ok_or(GeographyError::MissingStateFips {
            location_type: LocationType::County,
        })?;
        let county_fips = required(county_fips).ok_or(GeographyError::MissingCountyFips)?;

        Ok(Self::County {
            state_fips,
            county_fips,
        })
    }

    /// Builds a ZCTA identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GeographyError::MissingZctaCode`] if `zcta_code` is empty.
    pub fn from_zcta(zcta_code: &str) -> Result<Self, GeographyError> {
        let zcta_code = required(zcta_code).ok_or(GeographyError::MissingZctaCode)?;

        Ok(Self::Zcta { zcta_code })
    }

    /// Builds an identifier from the optional query fields of a request,
    /// dispatching on `location_type`. Fields that do not apply to the
    /// chosen type are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`GeographyError`] if a field the location type needs is
    /// missing or empty.
    pub fn from_selector(
        location_type: LocationType,
        state_fips: Option<&str>,
        county_fips: Option<&str>,
        zcta_code: Option<&str>,
    ) -> Result<Self, GeographyError> {
        match location_type {
            LocationType::State => Self::from_state(state_fips.unwrap_or_default()),
            LocationType::County => Self::from_county(
                state_fips.unwrap_or_default(),
                county_fips.unwrap_or_default(),
            ),
            LocationType::Zcta => Self::from_zcta(zcta_code.unwrap_or_default()),
        }
    }

    /// Returns the kind of geography this identifier selects.
    #[must_use]
    pub const fn location_type(&self) -> LocationType {
        match self {
            Self::State { .. } => LocationType::State,
            Self::County { .. } => LocationType::County,
            Self::Zcta { .. } => LocationType::Zcta,
        }
    }

    /// Returns the 3-digit summary level code.
    #[must_use]
    pub const fn summary_level(&self) -> &'static str {
        match self {
            Self::State { .. } => SUMMARY_LEVEL_STATE,
            Self::County { .. } => SUMMARY_LEVEL_COUNTY,
            Self::Zcta { .. } => SUMMARY_LEVEL_ZCTA,
        }
    }
}

impl std::fmt::Display for Ucgid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = self.summary_level();
        match self {
            Self::State { state_fips } => write!(f, "{level}{UCGID_SEPARATOR}{state_fips}"),
            Self::County {
                state_fips,
                county_fips,
            } => write!(f, "{level}{UCGID_SEPARATOR}{state_fips}{county_fips}"),
            Self::Zcta { zcta_code } => write!(f, "{level}{UCGID_SEPARATOR}{zcta_code}"),
        }
    }
}

/// Trims `value` and returns it as an owned string, or `None` if it is
/// blank.
fn required(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_ucgid() {
        for fips in ["01", "06", "17", "56"] {
            let id = Ucgid::from_state(fips).unwrap();
            assert_eq!(id.to_string(), format!("0400000US{fips}"));
        }
    }

    #[test]
    fn county_ucgid() {
        let id = Ucgid::from_county("17", "031").unwrap();
        assert_eq!(id.to_string(), "0500000US17031");
        assert_eq!(id.location_type(), LocationType::County);
    }

    #[test]
    fn zcta_ucgid() {
        let id = Ucgid::from_zcta("60601").unwrap();
        assert_eq!(id.to_string(), "8600000US60601");
        assert_eq!(id.summary_level(), SUMMARY_LEVEL_ZCTA);
    }

    #[test]
    fn county_without_state_is_rejected() {
        for county in ["031", "", "999"] {
            assert_eq!(
                Ucgid::from_county("", county),
                Err(GeographyError::MissingStateFips {
                    location_type: LocationType::County
                }),
                "county {county:?} should require a state"
            );
        }
    }

    #[test]
    fn county_without_county_code_is_rejected() {
        assert_eq!(
            Ucgid::from_county("17", "  "),
            Err(GeographyError::MissingCountyFips)
        );
    }

    #[test]
    fn empty_codes_are_rejected() {
        assert_eq!(
            Ucgid::from_state(""),
            Err(GeographyError::MissingStateFips {
                location_type: LocationType::State
            })
        );
        assert_eq!(Ucgid::from_zcta(" "), Err(GeographyError::MissingZctaCode));
    }

    #[test]
    fn codes_are_trimmed() {
        let id = Ucgid::from_county(" 17", "031 ").unwrap();
        assert_eq!(id.to_string(), "0500000US17031");
    }

    #[test]
    fn selector_dispatches_on_location_type() {
        let state = Ucgid::from_selector(LocationType::State, Some("06"), None, None).unwrap();
        assert_eq!(state.to_string(), "0400000US06");

        let county =
            Ucgid::from_selector(LocationType::County, Some("06"), Some("037"), None).unwrap();
        assert_eq!(county.to_string(), "0500000US06037");

        // State fields are ignored for ZCTA lookups.
        let zcta =
            Ucgid::from_selector(LocationType::Zcta, Some("06"), None, Some("90210")).unwrap();
        assert_eq!(zcta.to_string(), "8600000US90210");
    }

    #[test]
    fn selector_reports_missing_fields() {
        assert_eq!(
            Ucgid::from_selector(LocationType::Zcta, Some("06"), None, None),
            Err(GeographyError::MissingZctaCode)
        );
        assert_eq!(
            Ucgid::from_selector(LocationType::County, None, Some("037"), None),
            Err(GeographyError::MissingStateFips {
                location_type: LocationType::County
            })
        );
    }

    #[test]
    fn selector_never_builds_a_county_without_a_state() {
        let codes = [None, Some(""), Some("  "), Some("17")];
        let mut built = 0;
        for state in codes {
            for county in codes {
                let Ok(id) = Ucgid::from_selector(LocationType::County, state, county, None) else {
                    continue;
                };
                let Ucgid::County {
                    state_fips,
                    county_fips,
                } = &id
                else {
                    panic!("county selector built {id:?}");
                };
                assert_eq!(state_fips, "17");
                assert_eq!(county_fips, "17");
                assert_eq!(id.to_string(), "0500000US1717");
                built += 1;
            }
        }
        assert_eq!(built, 1);
    }

    #[test]
    fn parses_location_type() {
        assert_eq!(LocationType::parse("state"), Ok(LocationType::State));
        assert_eq!(LocationType::parse("county"), Ok(LocationType::County));
        assert_eq!(LocationType::parse("zcta"), Ok(LocationType::Zcta));
        assert_eq!(
            LocationType::parse("tract"),
            Err(GeographyError::UnsupportedLocationType("tract".to_string()))
        );
        assert_eq!(LocationType::County.to_string(), "county");
    }
}
