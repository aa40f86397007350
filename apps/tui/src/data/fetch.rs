use facility_map_core::loader::{load_first, parse_facilities, parse_json};
use facility_map_core::metrics::MetricsSummary;
use facility_map_core::{FacilityCollection, FetchError, MapConfig, MapError};
use reqwest::Client;

/// Everything the terminal app needs before it can draw the map.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub collection: FacilityCollection,
    pub source: String,
    pub summary: Option<MetricsSummary>,
    pub metrics_source: Option<String>,
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Reads one candidate: HTTP(S) through `client`, anything else from disk.
pub async fn fetch_location(client: Client, location: String) -> Result<String, FetchError> {
    if !is_remote(&location) {
        return tokio::fs::read_to_string(&location)
            .await
            .map_err(|e| FetchError::Io(e.to_string()));
    }

    let response = client
        .get(&location)
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    response
        .text()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))
}

/// Loads the facility collection and, if available, the metrics summary.
///
/// Facilities are required. A missing metrics file only costs the
/// precomputed headline, so it is logged and skipped.
pub async fn load_dataset(config: &MapConfig) -> Result<Dataset, MapError> {
    let client = Client::new();

    let facilities = load_first(
        &config.data_paths,
        |location| fetch_location(client.clone(), location),
        parse_facilities,
    )
    .await?;

    log::info!(
        "{} facilities ({} hubs) from {}",
        facilities.value.len(),
        facilities.value.hub_count(),
        facilities.location
    );

    let (summary, metrics_source) = if config.metrics_paths.is_empty() {
        (None, None)
    } else {
        match load_first(
            &config.metrics_paths,
            |location| fetch_location(client.clone(), location),
            parse_json::<MetricsSummary>,
        )
        .await
        {
            Ok(loaded) => (Some(loaded.value), Some(loaded.location)),
            Err(e) => {
                log::warn!("metrics unavailable, headline falls back to the live value: {e}");
                (None, None)
            }
        }
    };

    Ok(Dataset {
        collection: facilities.value,
        source: facilities.location,
        summary,
        metrics_source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("facility-map-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap_or_else(|e| panic!("{e}"));
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap_or_else(|e| panic!("{e}"));
        path
    }

    const FACILITIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature",
              "geometry": { "type": "Point", "coordinates": [-122.4, 37.8] },
              "properties": { "name": "Ferry Building", "modes": "Ferry,Bus,Rail" } },
            { "type": "Feature",
              "geometry": { "type": "Point", "coordinates": [-122.3, 37.5] },
              "properties": { "name": "Airport", "modes": ["Air"] } }
        ]
    }"#;

    #[test]
    fn remote_locations_are_detected() {
        assert!(is_remote("https://example.org/f.geojson"));
        assert!(is_remote("http://localhost/f.geojson"));
        assert!(!is_remote("data/f.geojson"));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let result = fetch_location(Client::new(), "/definitely/not/here.geojson".to_string()).await;
        assert!(matches!(result, Err(FetchError::Io(_))));
    }

    #[tokio::test]
    async fn falls_back_to_second_candidate_and_tolerates_missing_metrics() {
        let good = scratch_file("fallback.geojson", FACILITIES);
        let config = MapConfig {
            data_paths: vec![
                "/definitely/not/here.geojson".to_string(),
                good.display().to_string(),
            ],
            metrics_paths: vec!["/definitely/not/metrics.json".to_string()],
            ..MapConfig::default()
        };

        let dataset = load_dataset(&config).await.unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(dataset.source, good.display().to_string());
        assert_eq!(dataset.collection.len(), 2);
        assert_eq!(dataset.collection.hub_count(), 1);
        assert!(dataset.summary.is_none());
    }

    #[tokio::test]
    async fn loads_metrics_when_present() {
        let data = scratch_file("with-metrics.geojson", FACILITIES);
        let metrics = scratch_file("metrics.json", r#"{ "overall": { "true_intermodal_pct": 42.4 } }"#);
        let config = MapConfig {
            data_paths: vec![data.display().to_string()],
            metrics_paths: vec![metrics.display().to_string()],
            ..MapConfig::default()
        };

        let dataset = load_dataset(&config).await.unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(
            dataset.summary.and_then(|s| s.intermodal_percentage()),
            Some(42)
        );
        assert_eq!(dataset.metrics_source, Some(metrics.display().to_string()));
    }

    #[tokio::test]
    async fn every_candidate_failing_is_fatal() {
        let broken = scratch_file("broken.geojson", "{ not json");
        let config = MapConfig {
            data_paths: vec![broken.display().to_string()],
            metrics_paths: Vec::new(),
            ..MapConfig::default()
        };

        let error = load_dataset(&config).await.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(error.contains("1 candidate locations failed"));
    }
}
