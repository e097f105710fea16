//! Language row extraction from a `B16001` table response.
//!
//! `B16001` mixes language totals with nested "speaks English very well /
//! less than very well" breakdowns, margin-of-error and annotation columns,
//! and category subtotals. Rows are kept by a label heuristic
//! ([`language_from_label`]) that is tuned to this one table: it is close,
//! not exact.

use std::sync::LazyLock;

use regex::Regex;
use us_languages_census_models::{LanguageRecord, RawTable, VariableLabels};

use crate::CensusError;

/// Column holding the geography's display name.
pub const GEOGRAPHY_NAME_COLUMN: &str = "NAME";

/// Estimate columns end in `E`; margins of error end in `M`, annotations in
/// `EA`/`MA`.
pub const ESTIMATE_SUFFIX: char = 'E';

/// Leading label words that name a category rather than a language.
pub const NON_LANGUAGE_TOKENS: &[&str] = &["Other", "Speak", "Total"];

/// Label levels above the language name. Older vintages group languages
/// under a "Speak a language other than English" level.
const LABEL_PREFIXES: &[&str] = &[
    "Estimate!!",
    "Total!!",
    "Speak a language other than English!!",
];

/// Matches labels still nested below a language after cleaning.
static NESTED_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+!!.+$").expect("valid regex"));

/// Joins a table response with its variable labels.
///
/// The first estimate column is the table total and is the denominator of
/// every percentage. Records come out in header column order.
///
/// # Errors
///
/// Returns [`CensusError::InsufficientRows`] if `table` lacks a header and
/// value row, [`CensusError::ZeroTotalPopulation`] if the total is zero,
/// and [`CensusError::NotAnInteger`] if a kept estimate is not an integer.
pub fn extract(
    table: &RawTable,
    labels: &VariableLabels,
) -> Result<Vec<LanguageRecord>, CensusError> {
    let [header, values, ..] = table.as_slice() else {
        return Err(CensusError::InsufficientRows { rows: table.len() });
    };

    if header.len() != values.len() {
        log::warn!(
            "Header has {} columns but value row has {}; ignoring unpaired cells",
            header.len(),
            values.len()
        );
    }

    let mut estimates = header
        .iter()
        .zip(values)
        .filter_map(|(code, value)| Some((code.as_deref()?, value.as_deref())))
        .filter(|(code, _)| is_estimate_column(code));

    let Some((total_code, total_value)) = estimates.next() else {
        return Ok(Vec::new());
    };
    let total = parse_count(total_code, total_value)?;
    if total == 0 {
        return Err(CensusError::ZeroTotalPopulation);
    }

    let mut records = Vec::new();

    for (code, value) in std::iter::once((total_code, total_value)).chain(estimates) {
        let label = labels.get(code).map_or("", String::as_str);

        let Some(language) = language_from_label(label) else {
            log::trace!("Skipping {code}: {label:?}");
            continue;
        };

        let population = parse_count(code, value)?;

        records.push(LanguageRecord {
            language,
            population,
            percentage: percentage(population, total),
        });
    }

    Ok(records)
}

/// Returns the language named by a `B16001` variable label, or `None` if
/// the label is a total, a category, or a nested breakdown.
///
/// `Estimate!!Total:!!Spanish:` gives `Spanish`;
/// `Estimate!!Total:!!Spanish:!!Speak English "very well"` and
/// `Estimate!!Total:!!Speak only English` give `None`.
#[must_use]
pub fn language_from_label(label: &str) -> Option<String> {
    let cleaned = LABEL_PREFIXES
        .iter()
        .fold(label.replace(':', ""), |acc, prefix| acc.replace(prefix, ""));

    if NESTED_LABEL_RE.is_match(&cleaned) {
        return None;
    }

    let cleaned = cleaned.replace(',', "");
    let language = cleaned.split_whitespace().next()?;

    if NON_LANGUAGE_TOKENS.contains(&language) {
        return None;
    }

    Some(language.to_string())
}

fn is_estimate_column(code: &str) -> bool {
    code != GEOGRAPHY_NAME_COLUMN && code.ends_with(ESTIMATE_SUFFIX)
}

fn parse_count(code: &str, value: Option<&str>) -> Result<u64, CensusError> {
    value
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| CensusError::NotAnInteger {
            code: code.to_string(),
            value: value.unwrap_or("null").to_string(),
        })
}

/// `population / total` as a percentage rounded to 2 decimals.
///
/// The exact ratio is rounded half to even, so `1 / 800` (0.125%) gives
/// `0.12` and `3 / 800` (0.375%) gives `0.38`.
#[allow(clippy::cast_precision_loss)]
fn percentage(population: u64, total: u64) -> f64 {
    let scaled = u128::from(population) * 10_000;
    let total = u128::from(total);
    let quotient = scaled / total;
    let remainder = scaled % total;

    let hundredths = match (remainder * 2).cmp(&total) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + (quotient % 2),
    };

    hundredths as f64 / 100.0
}
