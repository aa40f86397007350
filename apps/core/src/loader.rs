//! Single-pass fallback over candidate locations.
//!
//! The fetch itself is supplied by the caller (reqwest or the filesystem in the
//! terminal app, `window.fetch` in the browser), so this module stays free of
//! any I/O runtime.

use std::future::Future;

use serde::de::DeserializeOwned;

use crate::error::{Attempt, FetchError, LoadError};
use crate::facility::FacilityCollection;

/// A document and the location it came from.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub location: String,
    pub value: T,
}

/// Tries each candidate in order and returns the first that fetches and parses.
///
/// A candidate is only requested after the previous one has failed. When all
/// fail the error lists every attempt.
pub async fn load_first<T, F, Fut, P>(
    candidates: &[String],
    mut fetch: F,
    parse: P,
) -> Result<Loaded<T>, LoadError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<String, FetchError>>,
    P: Fn(&str) -> Result<T, FetchError>,
{
    if candidates.is_empty() {
        return Err(LoadError::NoCandidates);
    }

    let mut attempts = Vec::with_capacity(candidates.len());
    for location in candidates {
        log::debug!("fetching {location}");
        let outcome = match fetch(location.clone()).await {
            Ok(body) => parse(&body),
            Err(error) => Err(error),
        };

        match outcome {
            Ok(value) => {
                log::info!("loaded {location}");
                return Ok(Loaded {
                    location: location.clone(),
                    value,
                });
            }
            Err(error) => {
                log::warn!("{location} failed: {error}");
                attempts.push(Attempt {
                    location: location.clone(),
                    error,
                });
            }
        }
    }

    Err(LoadError::Exhausted { attempts })
}

pub fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))
}

pub fn parse_facilities(body: &str) -> Result<FacilityCollection, FetchError> {
    FacilityCollection::parse(body).map_err(|e| FetchError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsSummary;
    use std::cell::RefCell;
    use std::collections::HashMap;

    fn candidates(locations: &[&str]) -> Vec<String> {
        locations.iter().map(ToString::to_string).collect()
    }

    fn responses() -> HashMap<&'static str, Result<&'static str, u16>> {
        HashMap::from([
            ("data/facilities.geojson", Err(404)),
            ("broken.geojson", Ok("{ not json")),
            (
                "facilities.geojson",
                Ok(r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":{"type":"Point","coordinates":[-90,35]},"properties":{"name":"A","modes":"Rail"}}]}"#),
            ),
            ("data/metrics.json", Ok(r#"{"overall":{"true_intermodal_pct":21.4}}"#)),
        ])
    }

    async fn fake_fetch(location: String) -> Result<String, FetchError> {
        match responses().get(location.as_str()) {
            Some(Ok(body)) => Ok((*body).to_string()),
            Some(Err(status)) => Err(FetchError::Status(*status)),
            None => Err(FetchError::Network(format!("no route to {location}"))),
        }
    }

    #[tokio::test]
    async fn falls_through_to_first_success_in_order() {
        let requested = RefCell::new(Vec::new());
        let loaded = load_first(
            &candidates(&["data/facilities.geojson", "broken.geojson", "facilities.geojson", "never.geojson"]),
            |location| {
                requested.borrow_mut().push(location.clone());
                fake_fetch(location)
            },
            parse_facilities,
        )
        .await
        .unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(loaded.location, "facilities.geojson");
        assert_eq!(loaded.value.len(), 1);
        assert_eq!(
            *requested.borrow(),
            vec!["data/facilities.geojson", "broken.geojson", "facilities.geojson"]
        );
    }

    #[tokio::test]
    async fn all_failures_aggregate_into_one_error() {
        let result = load_first(
            &candidates(&["data/facilities.geojson", "broken.geojson", "missing.geojson"]),
            fake_fetch,
            parse_facilities,
        )
        .await;

        let Err(LoadError::Exhausted { attempts }) = result else {
            panic!("expected exhausted error");
        };
        assert_eq!(attempts.len(), 3);
        assert!(matches!(attempts[0].error, FetchError::Status(404)));
        assert!(matches!(attempts[1].error, FetchError::Parse(_)));
        assert!(matches!(attempts[2].error, FetchError::Network(_)));
    }

    #[tokio::test]
    async fn empty_candidate_list_is_rejected() {
        let result = load_first(&[], fake_fetch, parse_json::<MetricsSummary>).await;
        assert!(matches!(result, Err(LoadError::NoCandidates)));
    }

    #[tokio::test]
    async fn metrics_summary_loads_as_json() {
        let loaded = load_first(
            &candidates(&["data/metrics.json"]),
            fake_fetch,
            parse_json::<MetricsSummary>,
        )
        .await
        .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(loaded.value.intermodal_percentage(), Some(21));
    }
}
