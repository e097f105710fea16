//! Census Bureau data API client.
//!
//! Two independent reads back a language lookup:
//!
//! - Variable labels: `GET /data/{year}/{dataset}/variables.json`
//! - Table values: `GET /data/{year}/{dataset}?get=group({table})&ucgid={id}&key={key}`
//!
//! Neither call is retried. Every request is bounded by
//! [`REQUEST_TIMEOUT`]; a timeout surfaces as [`CensusError::Http`].

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use us_languages_census_models::{RawTable, SurveyVintage, VariableLabels};
use us_languages_geography_models::Ucgid;

use crate::CensusError;

/// Public Census Bureau API host.
pub const DEFAULT_BASE_URL: &str = "https://api.census.gov";

/// Upper bound on each Census API request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Maximum length of a response body preview included in logs.
const BODY_PREVIEW_LEN: usize = 300;

/// Body of `variables.json`. Only labels are kept; `concept`, `group`,
/// `predicateType` and friends are ignored.
#[derive(Debug, Deserialize)]
struct VariablesResponse {
    variables: HashMap<String, VariableInfo>,
}

#[derive(Debug, Deserialize)]
struct VariableInfo {
    #[serde(default)]
    label: String,
}

/// Client for the Census Bureau data API.
///
/// Cheap to clone: clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct CensusClient {
    client: reqwest::Client,
    base_url: String,
}

impl CensusClient {
    /// Creates a client for the API hosted at `base_url`
    /// (normally [`DEFAULT_BASE_URL`]).
    ///
    /// # Errors
    ///
    /// Returns [`CensusError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, CensusError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// The API host this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches variable labels for `vintage`, keeping only codes that
    /// start with `table_prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError`] if the request fails, the API answers with a
    /// non-success status, or the body has no `variables` object.
    pub async fn fetch_variable_labels(
        &self,
        vintage: SurveyVintage,
        table_prefix: &str,
    ) -> Result<VariableLabels, CensusError> {
        let url = format!(
            "{}/data/{}/{}/variables.json",
            self.base_url, vintage.year, vintage.dataset
        );

        log::debug!("Fetching variable labels: {url}");

        let resp = self.client.get(&url).send().await?;
        let body = success_body(resp, &url).await?;

        let parsed: VariablesResponse =
            serde_json::from_str(&body).map_err(|e| CensusError::MalformedResponse {
                message: format!("Failed to parse variables from {url}: {e}"),
            })?;

        let labels: VariableLabels = parsed
            .variables
            .into_iter()
            .filter(|(code, _)| code.starts_with(table_prefix))
            .map(|(code, info)| (code, info.label))
            .collect();

        log::debug!("{vintage}: {} labels for {table_prefix}", labels.len());

        Ok(labels)
    }

    /// Fetches every column of table `table_prefix` for one geography.
    ///
    /// An empty body (the API answers `204 No Content` for geographies it
    /// has no data for) yields an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError`] if the request fails, the API answers with a
    /// non-success status, or the body is not a JSON array of arrays.
    pub async fn fetch_table_data(
        &self,
        vintage: SurveyVintage,
        table_prefix: &str,
        ucgid: &Ucgid,
        api_key: &str,
    ) -> Result<RawTable, CensusError> {
        // Logged and reported without the query string so the key never
        // shows up in logs.
        let url = format!("{}/data/{}/{}", self.base_url, vintage.year, vintage.dataset);
        let group = format!("group({table_prefix})");
        let ucgid = ucgid.to_string();

        log::debug!("Fetching {group} for {ucgid}: {url}");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("get", group.as_str()),
                ("ucgid", ucgid.as_str()),
                ("key", api_key),
            ])
            .send()
            .await?;
        let body = success_body(resp, &url).await?;

        if body.trim().is_empty() {
            log::warn!("{vintage}: no {group} data for {ucgid}");
            return Ok(RawTable::new());
        }

        serde_json::from_str(&body).map_err(|e| CensusError::MalformedResponse {
            message: format!("Failed to parse {group} table for {ucgid}: {e}"),
        })
    }
}

/// Reads the body of a successful response, or turns a non-success status
/// into [`CensusError::UpstreamStatus`].
async fn success_body(resp: reqwest::Response, url: &str) -> Result<String, CensusError> {
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        log::warn!(
            "Census API returned HTTP {status} for {url}: {}",
            truncate_for_log(&body, BODY_PREVIEW_LEN)
        );
        return Err(CensusError::UpstreamStatus {
            status,
            url: url.to_string(),
        });
    }

    Ok(resp.text().await?)
}

/// Truncates a string for logging, appending "..." if it exceeds `max_len`
/// characters.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len).collect();
        format!("{head}...")
    }
}
