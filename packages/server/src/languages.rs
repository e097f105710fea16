//! Most-spoken-language lookup for a single geography.

use us_languages_census::client::CensusClient;
use us_languages_census::extract::extract;
use us_languages_census_models::{LANGUAGE_TABLE, LanguageRecord, SurveyVintage};
use us_languages_geography_models::{LocationType, Ucgid};

use crate::ApiError;

/// Number of languages returned per lookup.
pub const TOP_LANGUAGES: usize = 5;

/// Returns the [`TOP_LANGUAGES`] most spoken non-English languages in the
/// selected geography, by descending population.
///
/// Variable labels and table values are fetched concurrently; if either
/// request fails the lookup fails with that error and the other result is
/// discarded.
///
/// # Errors
///
/// Returns [`ApiError::Geography`] for an unsupported `location_type` or a
/// missing code, and [`ApiError::Census`] if a Census API call or the table
/// extraction fails.
pub async fn most_spoken_languages(
    census: &CensusClient,
    api_key: &str,
    location_type: &str,
    state_fips: Option<&str>,
    county_fips: Option<&str>,
    zcta_code: Option<&str>,
) -> Result<Vec<LanguageRecord>, ApiError> {
    let location_type = LocationType::parse(location_type)?;
    let ucgid = Ucgid::from_selector(location_type, state_fips, county_fips, zcta_code)?;
    let vintage = SurveyVintage::for_location(ucgid.location_type());

    log::info!("Looking up {LANGUAGE_TABLE} for {ucgid} ({vintage})");

    let (labels, table) = tokio::try_join!(
        census.fetch_variable_labels(vintage, LANGUAGE_TABLE),
        census.fetch_table_data(vintage, LANGUAGE_TABLE, &ucgid, api_key),
    )?;

    let records = extract(&table, &labels)?;

    log::debug!("{ucgid}: {} language rows", records.len());

    Ok(top_by_population(records, TOP_LANGUAGES))
}

/// Sorts `records` by population, largest first, and keeps at most
/// `limit`. Equal populations keep their table column order.
#[must_use]
pub fn top_by_population(mut records: Vec<LanguageRecord>, limit: usize) -> Vec<LanguageRecord> {
    records.sort_by(|a, b| b.population.cmp(&a.population));
    records.truncate(limit);
    records
}

#[cfg(test)]
pub(crate) mod tests {
    use httpmock::prelude::*;
    use serde_json::{Value, json};
    use us_languages_census::CensusError;
    use us_languages_geography_models::GeographyError;

    use super::*;

    /// Languages in `B16001` column order with their populations.
    pub const FIXTURE_LANGUAGES: &[(&str, &str, u64)] = &[
        ("B16001_003E", "Spanish", 1_600_000),
        ("B16001_006E", "French, Haitian, or Cajun", 30_000),
        ("B16001_009E", "German or other West Germanic languages", 20_000),
        ("B16001_012E", "Russian, Polish, or other Slavic languages", 180_000),
        ("B16001_015E", "Other Indo-European languages", 150_000),
        ("B16001_018E", "Korean", 30_000),
        ("B16001_021E", "Chinese (incl. Mandarin, Cantonese)", 110_000),
        ("B16001_024E", "Vietnamese", 25_000),
        ("B16001_027E", "Tagalog (incl. Filipino)", 90_000),
    ];

    pub const FIXTURE_TOTAL: u64 = 12_000_000;

    pub fn variables_json() -> Value {
        let mut variables = serde_json::Map::new();
        variables.insert("B16001_001E".into(), json!({"label": "Estimate!!Total:"}));
        variables.insert(
            "B16001_002E".into(),
            json!({"label": "Estimate!!Total:!!Speak only English"}),
        );
        for (code, name, _) in FIXTURE_LANGUAGES {
            variables.insert(
                (*code).into(),
                json!({"label": format!("Estimate!!Total:!!{name}:")}),
            );
        }
        variables.insert(
            "B16001_004E".into(),
            json!({"label": "Estimate!!Total:!!Spanish:!!Speak English \"very well\""}),
        );
        variables.insert("B01001_001E".into(), json!({"label": "Estimate!!Total:"}));
        json!({ "variables": variables })
    }

    pub fn table_json() -> Value {
        let mut header = vec![json!("B16001_001E"), json!("B16001_001M"), json!("B16001_002E")];
        let mut values = vec![
            json!(FIXTURE_TOTAL.to_string()),
            json!("5000"),
            json!("9000000"),
        ];
        for (code, _, population) in FIXTURE_LANGUAGES {
            header.push(json!(code));
            values.push(json!(population.to_string()));
        }
        header.push(json!("B16001_004E"));
        values.push(json!("1000000"));
        header.extend([json!("GEO_ID"), json!("NAME")]);
        values.extend([json!("0400000US17"), json!("Illinois")]);
        json!([header, values])
    }

    fn record(language: &str, population: u64) -> LanguageRecord {
        LanguageRecord {
            language: language.to_string(),
            population,
            percentage: 0.0,
        }
    }

    #[test]
    fn top_by_population_sorts_and_truncates() {
        let records = vec![
            record("A", 10),
            record("B", 30),
            record("C", 20),
            record("D", 50),
            record("E", 40),
            record("F", 5),
        ];
        let top: Vec<String> = top_by_population(records, 5)
            .into_iter()
            .map(|r| r.language)
            .collect();
        assert_eq!(top, ["D", "E", "B", "C", "A"]);
    }

    #[test]
    fn top_by_population_keeps_column_order_for_ties() {
        let records = vec![record("A", 10), record("B", 20), record("C", 10), record("D", 20)];
        let top: Vec<String> = top_by_population(records, 3)
            .into_iter()
            .map(|r| r.language)
            .collect();
        assert_eq!(top, ["B", "D", "A"]);
    }

    #[test]
    fn top_by_population_never_pads() {
        assert_eq!(top_by_population(vec![record("A", 1)], 5).len(), 1);
        assert!(top_by_population(Vec::new(), 5).is_empty());
    }

    #[tokio::test]
    async fn ranks_state_languages() {
        let server = MockServer::start_async().await;
        let labels_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/data/2023/acs/acs1/variables.json");
                then.status(200).json_body(variables_json());
            })
            .await;
        let data_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/data/2023/acs/acs1")
                    .query_param("get", "group(B16001)")
                    .query_param("ucgid", "0400000US17")
                    .query_param("key", "test-key");
                then.status(200).json_body(table_json());
            })
            .await;

        let census = CensusClient::new(server.base_url()).unwrap();
        let top =
            most_spoken_languages(&census, "test-key", "state", Some("17"), None, None)
                .await
                .unwrap();

        labels_mock.assert_async().await;
        data_mock.assert_async().await;

        let names: Vec<&str> = top.iter().map(|r| r.language.as_str()).collect();
        assert_eq!(names, ["Spanish", "Russian", "Chinese", "Tagalog", "French"]);
        assert!(top.windows(2).all(|w| w[0].population >= w[1].population));
        assert!((top[0].percentage - 13.33).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn zcta_reads_2015_five_year_estimates() {
        let server = MockServer::start_async().await;
        let labels_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/data/2015/acs/acs5/variables.json");
                then.status(200).json_body(variables_json());
            })
            .await;
        let data_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/data/2015/acs/acs5")
                    .query_param("ucgid", "8600000US60601");
                then.status(200).json_body(table_json());
            })
            .await;

        let census = CensusClient::new(server.base_url()).unwrap();
        let top = most_spoken_languages(&census, "k", "zcta", None, None, Some("60601"))
            .await
            .unwrap();

        labels_mock.assert_async().await;
        data_mock.assert_async().await;
        assert_eq!(top.len(), TOP_LANGUAGES);
    }

    #[tokio::test]
    async fn label_failure_aborts_lookup() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/data/2023/acs/acs1/variables.json");
                then.status(500);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/data/2023/acs/acs1");
                then.status(200).json_body(table_json());
            })
            .await;

        let census = CensusClient::new(server.base_url()).unwrap();
        let err = most_spoken_languages(&census, "k", "county", Some("17"), Some("031"), None)
            .await
            .unwrap_err();

        assert!(
            matches!(err, ApiError::Census(CensusError::UpstreamStatus { .. })),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn data_failure_aborts_lookup() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/data/2023/acs/acs1/variables.json");
                then.status(200).json_body(variables_json());
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/data/2023/acs/acs1");
                then.status(200).body("not json");
            })
            .await;

        let census = CensusClient::new(server.base_url()).unwrap();
        let err = most_spoken_languages(&census, "k", "state", Some("17"), None, None)
            .await
            .unwrap_err();

        assert!(
            matches!(err, ApiError::Census(CensusError::MalformedResponse { .. })),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn header_only_table_is_a_data_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/data/2023/acs/acs1/variables.json");
                then.status(200).json_body(variables_json());
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/data/2023/acs/acs1");
                then.status(200).json_body(json!([["B16001_001E", "NAME"]]));
            })
            .await;

        let census = CensusClient::new(server.base_url()).unwrap();
        let err = most_spoken_languages(&census, "k", "state", Some("17"), None, None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Census(CensusError::InsufficientRows { rows: 1 })
        ));
    }

    #[tokio::test]
    async fn invalid_selectors_make_no_requests() {
        let server = MockServer::start_async().await;
        let any = server
            .mock_async(|when, then| {
                when.path_contains("/");
                then.status(200);
            })
            .await;
        let census = CensusClient::new(server.base_url()).unwrap();

        let err = most_spoken_languages(&census, "k", "tract", Some("17"), None, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Geography(GeographyError::UnsupportedLocationType(_))
        ));

        let err = most_spoken_languages(&census, "k", "county", None, Some("031"), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Geography(GeographyError::MissingStateFips { .. })
        ));

        any.assert_hits_async(0).await;
    }
}
