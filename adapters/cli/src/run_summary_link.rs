//! Query-string codec for shareable run summaries.

use droids_core::RunSummary;
use thiserror::Error;
use url::Url;

const SCORE: &str = "score";
const LEVEL: &str = "level";
const SEED: &str = "seed";
const TELEPORTS: &str = "teleports";

/// Errors that can occur while decoding run-summary links.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum SummaryLinkError {
    /// The link is not an absolute URL.
    #[error("link is not a valid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// A required query parameter is absent.
    #[error("link is missing the '{0}' parameter")]
    MissingField(&'static str),
    /// A query parameter is not a plain non-negative integer.
    #[error("parameter '{field}' has invalid value '{value}'")]
    InvalidField {
        /// Name of the offending parameter.
        field: &'static str,
        /// Raw value found in the link.
        value: String,
    },
}

/// Appends the summary to `base` as `score`, `level`, `seed` and `teleports`
/// query parameters, replacing any existing query.
#[must_use]
pub(crate) fn build_link(base: &Url, summary: &RunSummary) -> Url {
    let mut link = base.clone();
    let _ = link
        .query_pairs_mut()
        .clear()
        .append_pair(SCORE, &summary.score.to_string())
        .append_pair(LEVEL, &summary.level.to_string())
        .append_pair(SEED, &summary.seed.to_string())
        .append_pair(TELEPORTS, &summary.teleports.to_string());
    link
}

/// Decodes a run summary from a link produced by [`build_link`].
///
/// Every parameter must be present and consist of ASCII digits only.
pub(crate) fn parse_link(link: &str) -> Result<RunSummary, SummaryLinkError> {
    let url = Url::parse(link.trim())?;
    Ok(RunSummary {
        score: field(&url, SCORE)?,
        level: field(&url, LEVEL)?,
        seed: field(&url, SEED)?,
        teleports: field(&url, TELEPORTS)?,
    })
}

fn field<T: std::str::FromStr>(url: &Url, name: &'static str) -> Result<T, SummaryLinkError> {
    let value = url
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .ok_or(SummaryLinkError::MissingField(name))?;

    let invalid = || SummaryLinkError::InvalidField {
        field: name,
        value: value.clone(),
    };
    if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/game").expect("valid base")
    }

    #[test]
    fn round_trips_run_summary() {
        let summary = RunSummary {
            score: 480,
            level: 7,
            seed: 20_260_102,
            teleports: 2,
        };

        let link = build_link(&base(), &summary);
        assert_eq!(
            link.as_str(),
            "https://example.com/game?score=480&level=7&seed=20260102&teleports=2"
        );
        assert_eq!(parse_link(link.as_str()), Ok(summary));
    }

    #[test]
    fn replaces_existing_query() {
        let base = Url::parse("https://example.com/game?ref=abc").expect("valid base");
        let summary = RunSummary {
            score: 1,
            level: 1,
            seed: 1,
            teleports: 0,
        };
        let link = build_link(&base, &summary);
        assert!(!link.as_str().contains("ref="));
    }

    #[test]
    fn rejects_non_numeric_values() {
        assert_eq!(
            parse_link("https://example.com/game?score=x&level=2&seed=3&teleports=1"),
            Err(SummaryLinkError::InvalidField {
                field: SCORE,
                value: "x".to_owned(),
            })
        );
        assert!(parse_link("https://example.com/game?score=-4&level=2&seed=3&teleports=1").is_err());
        assert!(parse_link("https://example.com/game?score=1.5&level=2&seed=3&teleports=1").is_err());
    }

    #[test]
    fn rejects_missing_values() {
        assert_eq!(
            parse_link("https://example.com/game?score=12&level=2&seed=3"),
            Err(SummaryLinkError::MissingField(TELEPORTS))
        );
    }

    #[test]
    fn accepts_millisecond_timestamp_seeds() {
        assert_eq!(
            parse_link("https://example.com/play?score=120&level=3&seed=1739999999999&teleports=1"),
            Ok(RunSummary {
                score: 120,
                level: 3,
                seed: 1_739_999_999_999,
                teleports: 1,
            })
        );
    }

    #[test]
    fn rejects_values_that_overflow_their_field() {
        assert!(matches!(
            parse_link("https://example.com/game?score=1&level=2&seed=99999999999999999999&teleports=1"),
            Err(SummaryLinkError::InvalidField { field: SEED, .. })
        ));
        assert!(matches!(
            parse_link("https://example.com/game?score=1&level=4294967296&seed=3&teleports=1"),
            Err(SummaryLinkError::InvalidField { field: LEVEL, .. })
        ));
    }

    #[test]
    fn rejects_relative_links() {
        assert!(matches!(
            parse_link("/game?score=1&level=2&seed=3&teleports=1"),
            Err(SummaryLinkError::InvalidUrl(_))
        ));
    }
}
